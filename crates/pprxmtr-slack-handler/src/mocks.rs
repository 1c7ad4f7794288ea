//! Recording test doubles for the publish and reply seams.

use std::sync::{Arc, Mutex};

use crate::notification::Reply;
use crate::publisher::PublishClient;
use crate::reply::ReplySink;

#[derive(Debug, Clone)]
pub struct MockError(pub String);

impl std::fmt::Display for MockError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for MockError {}

/// What a mock did, in call order across every mock sharing the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockEvent {
    Published,
    PublishFailed,
    Replied,
    ReplyFailed,
}

/// Shared between mocks with `with_event_log` to observe cross-mock ordering.
#[derive(Debug, Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<MockEvent>>>);

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<MockEvent> {
        self.0.lock().unwrap().clone()
    }

    fn push(&self, event: MockEvent) {
        self.0.lock().unwrap().push(event);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedMessage {
    pub topic_arn: String,
    pub message: String,
}

/// Records every publish. `fail_next_publish` makes the next call error.
#[derive(Debug, Clone, Default)]
pub struct MockPublishClient {
    published: Arc<Mutex<Vec<PublishedMessage>>>,
    attempts: Arc<Mutex<u32>>,
    fail_count: Arc<Mutex<u32>>,
    events: EventLog,
}

impl MockPublishClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_event_log(mut self, events: EventLog) -> Self {
        self.events = events;
        self
    }

    pub fn fail_next_publish(&self) {
        *self.fail_count.lock().unwrap() = 1;
    }

    /// Fail every publish from now on.
    pub fn fail_all_publishes(&self) {
        *self.fail_count.lock().unwrap() = u32::MAX;
    }

    /// Successfully published messages, oldest first.
    pub fn published(&self) -> Vec<PublishedMessage> {
        self.published.lock().unwrap().clone()
    }

    /// Publish calls, failed ones included.
    pub fn attempts(&self) -> u32 {
        *self.attempts.lock().unwrap()
    }
}

impl PublishClient for MockPublishClient {
    type PublishError = MockError;

    async fn publish_message(
        &self,
        topic_arn: &str,
        message: String,
    ) -> Result<Option<String>, MockError> {
        *self.attempts.lock().unwrap() += 1;
        {
            let mut remaining = self.fail_count.lock().unwrap();
            if *remaining > 0 {
                if *remaining != u32::MAX {
                    *remaining -= 1;
                }
                self.events.push(MockEvent::PublishFailed);
                return Err(MockError("mock: publish failed".to_string()));
            }
        }
        let mut published = self.published.lock().unwrap();
        published.push(PublishedMessage {
            topic_arn: topic_arn.to_string(),
            message,
        });
        self.events.push(MockEvent::Published);
        Ok(Some(format!("mock-message-{}", published.len())))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentReply {
    pub response_url: String,
    pub text: String,
}

/// Records every private reply.
#[derive(Debug, Clone, Default)]
pub struct MockReplySink {
    sent: Arc<Mutex<Vec<SentReply>>>,
    should_fail: Arc<Mutex<bool>>,
    events: EventLog,
}

impl MockReplySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_event_log(mut self, events: EventLog) -> Self {
        self.events = events;
        self
    }

    pub fn fail_replies(&self) {
        *self.should_fail.lock().unwrap() = true;
    }

    pub fn sent(&self) -> Vec<SentReply> {
        self.sent.lock().unwrap().clone()
    }
}

impl ReplySink for MockReplySink {
    type ReplyError = MockError;

    async fn reply_private(&self, response_url: &str, reply: &Reply) -> Result<(), MockError> {
        if *self.should_fail.lock().unwrap() {
            self.events.push(MockEvent::ReplyFailed);
            return Err(MockError("mock: reply failed".to_string()));
        }
        self.sent.lock().unwrap().push(SentReply {
            response_url: response_url.to_string(),
            text: reply.text.clone(),
        });
        self.events.push(MockEvent::Replied);
        Ok(())
    }
}
