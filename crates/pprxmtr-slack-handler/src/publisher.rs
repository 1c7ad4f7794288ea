use std::error::Error;
use std::future::Future;

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::topic::TopicArn;

/// The single transport operation the publisher needs.
///
/// Implemented for [`aws_sdk_sns::Client`] in production and by
/// `MockPublishClient` in tests.
pub trait PublishClient: Send + Sync + Clone + 'static {
    type PublishError: Error + Send + Sync + 'static;

    /// Publishes `message` to `topic_arn`, returning the transport's message id.
    fn publish_message(
        &self,
        topic_arn: &str,
        message: String,
    ) -> impl Future<Output = Result<Option<String>, Self::PublishError>> + Send;
}

impl PublishClient for aws_sdk_sns::Client {
    type PublishError =
        aws_sdk_sns::error::SdkError<aws_sdk_sns::operation::publish::PublishError>;

    async fn publish_message(
        &self,
        topic_arn: &str,
        message: String,
    ) -> Result<Option<String>, Self::PublishError> {
        let output = self
            .publish()
            .topic_arn(topic_arn)
            .message(message)
            .send()
            .await?;
        Ok(output.message_id().map(str::to_string))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("failed to serialize notification: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("publish to {topic} failed: {source}")]
    Transport {
        topic: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReceipt {
    pub message_id: Option<String>,
}

/// Serializes notifications to JSON and hands them to the transport.
///
/// Exactly one transport call per [`publish`](Self::publish); no retries.
#[derive(Debug, Clone)]
pub struct NotificationPublisher<P: PublishClient> {
    client: P,
}

impl<P: PublishClient> NotificationPublisher<P> {
    pub fn new(client: P) -> Self {
        Self { client }
    }

    #[instrument(name = "sns.publish", skip_all, fields(topic = %topic))]
    pub async fn publish<T: Serialize>(
        &self,
        topic: &TopicArn,
        payload: &T,
    ) -> Result<PublishReceipt, PublishError> {
        let message = serde_json::to_string(payload)?;

        if tracing::enabled!(tracing::Level::DEBUG)
            && let Ok(pretty) = serde_json::to_string_pretty(payload)
        {
            debug!(notification = %pretty, "Sending notification");
        }
        info!(topic_name = topic.name(), "Sending SNS publish request to topic");

        let message_id = self
            .client
            .publish_message(topic.as_str(), message)
            .await
            .map_err(|e| PublishError::Transport {
                topic: topic.to_string(),
                source: Box::new(e),
            })?;

        info!(message_id = message_id.as_deref().unwrap_or(""), "Notification published");
        Ok(PublishReceipt { message_id })
    }
}
