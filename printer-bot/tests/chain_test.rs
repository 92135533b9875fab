//! Tests for HandlerChain ordering: before (all) → handle (until Stop/Reply) → after (reverse).

use async_trait::async_trait;
use printer_bot::{
    Chat, Handler, HandlerChain, HandlerResponse, Message, MessageDirection, Result, User,
};
use std::sync::{Arc, Mutex};

fn message() -> Message {
    Message {
        id: "m1".to_string(),
        user: User {
            id: 1,
            username: None,
            first_name: None,
            last_name: None,
        },
        chat: Chat {
            id: 1,
            chat_type: "private".to_string(),
        },
        content: "hi".to_string(),
        message_type: "text".to_string(),
        direction: MessageDirection::Incoming,
        created_at: chrono::Utc::now(),
        attachment: None,
    }
}

/// Records chain phases into a shared log; behavior per phase is configurable.
struct RecordingHandler {
    name: &'static str,
    log: Arc<Mutex<Vec<String>>>,
    response: HandlerResponse,
    before_continues: bool,
}

impl RecordingHandler {
    fn new(
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
        response: HandlerResponse,
    ) -> Arc<Self> {
        Arc::new(Self {
            name,
            log,
            response,
            before_continues: true,
        })
    }

    fn stopping_before(name: &'static str, log: Arc<Mutex<Vec<String>>>) -> Arc<Self> {
        Arc::new(Self {
            name,
            log,
            response: HandlerResponse::Continue,
            before_continues: false,
        })
    }

    fn record(&self, phase: &str) {
        self.log.lock().unwrap().push(format!("{}:{}", self.name, phase));
    }
}

#[async_trait]
impl Handler for RecordingHandler {
    async fn before(&self, _message: &Message) -> Result<bool> {
        self.record("before");
        Ok(self.before_continues)
    }

    async fn handle(&self, _message: &Message) -> Result<HandlerResponse> {
        self.record("handle");
        Ok(self.response.clone())
    }

    async fn after(&self, _message: &Message, _response: &HandlerResponse) -> Result<()> {
        self.record("after");
        Ok(())
    }
}

#[tokio::test]
async fn test_chain_runs_before_handle_after_in_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let chain = HandlerChain::new()
        .add_handler(RecordingHandler::new("a", log.clone(), HandlerResponse::Continue))
        .add_handler(RecordingHandler::new(
            "b",
            log.clone(),
            HandlerResponse::Reply("done".to_string()),
        ));

    let response = chain.handle(&message()).await.expect("chain");
    assert_eq!(response, HandlerResponse::Reply("done".to_string()));
    assert_eq!(
        *log.lock().unwrap(),
        vec![
            "a:before", "b:before", "a:handle", "b:handle", "b:after", "a:after"
        ]
    );
}

#[tokio::test]
async fn test_chain_stops_handle_phase_at_reply() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let chain = HandlerChain::new()
        .add_handler(RecordingHandler::new(
            "a",
            log.clone(),
            HandlerResponse::Reply("first".to_string()),
        ))
        .add_handler(RecordingHandler::new("b", log.clone(), HandlerResponse::Continue));

    let response = chain.handle(&message()).await.expect("chain");
    assert_eq!(response, HandlerResponse::Reply("first".to_string()));
    let entries = log.lock().unwrap().clone();
    assert!(entries.contains(&"a:handle".to_string()));
    assert!(!entries.contains(&"b:handle".to_string()));
    // after still runs for every handler, in reverse.
    assert!(entries.ends_with(&["b:after".to_string(), "a:after".to_string()]));
}

#[tokio::test]
async fn test_chain_stops_when_before_returns_false() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let chain = HandlerChain::new()
        .add_handler(RecordingHandler::stopping_before("gate", log.clone()))
        .add_handler(RecordingHandler::new("b", log.clone(), HandlerResponse::Continue));

    let response = chain.handle(&message()).await.expect("chain");
    assert_eq!(response, HandlerResponse::Stop);
    let entries = log.lock().unwrap().clone();
    assert_eq!(*entries, vec!["gate:before".to_string()]);
}
