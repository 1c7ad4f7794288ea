use std::error::Error;
use std::future::Future;

use crate::notification::Reply;

/// Delivers a reply visible only to the user who ran the command.
pub trait ReplySink: Send + Sync + Clone + 'static {
    type ReplyError: Error + Send + Sync + 'static;

    fn reply_private(
        &self,
        response_url: &str,
        reply: &Reply,
    ) -> impl Future<Output = Result<(), Self::ReplyError>> + Send;
}

#[derive(Debug, thiserror::Error)]
pub enum ReplyError {
    #[error("response_url is empty")]
    MissingUrl,
    #[error("reply request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("response_url answered with HTTP {0}")]
    Status(u16),
}

/// Posts ephemeral messages to the `response_url` Slack attaches to each
/// slash command.
#[derive(Debug, Clone, Default)]
pub struct ResponseUrlReplier {
    http: reqwest::Client,
}

impl ResponseUrlReplier {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

impl ReplySink for ResponseUrlReplier {
    type ReplyError = ReplyError;

    async fn reply_private(&self, response_url: &str, reply: &Reply) -> Result<(), ReplyError> {
        if response_url.is_empty() {
            return Err(ReplyError::MissingUrl);
        }
        let resp = self
            .http
            .post(response_url)
            .json(&reply.private_body())
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(ReplyError::Status(resp.status().as_u16()));
        }
        Ok(())
    }
}
