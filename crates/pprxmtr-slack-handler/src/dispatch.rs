use tracing::{error, info, instrument, warn};

use crate::command::CommandOutcome;
use crate::config::ReplyPolicy;
use crate::publisher::{NotificationPublisher, PublishClient};
use crate::reply::ReplySink;

/// What happened to one command after the handler ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    pub published: bool,
    pub replied: bool,
}

/// Publishes a handler's notification, then sends its reply.
///
/// The reply is only attempted after the publish has settled. With
/// [`ReplyPolicy::Always`] it goes out even if the publish failed.
#[derive(Debug, Clone)]
pub struct Dispatcher<P: PublishClient, R: ReplySink> {
    publisher: NotificationPublisher<P>,
    replies: R,
    policy: ReplyPolicy,
}

impl<P: PublishClient, R: ReplySink> Dispatcher<P, R> {
    pub fn new(publisher: NotificationPublisher<P>, replies: R, policy: ReplyPolicy) -> Self {
        Self {
            publisher,
            replies,
            policy,
        }
    }

    #[instrument(name = "command.dispatch", skip_all, fields(topic = %outcome.topic))]
    pub async fn dispatch(&self, response_url: &str, outcome: CommandOutcome) -> Delivery {
        let published = match self
            .publisher
            .publish(&outcome.topic, &outcome.notification)
            .await
        {
            Ok(_) => true,
            Err(e) => {
                error!(error = %e, "Failed to publish notification");
                false
            }
        };

        if !published && self.policy == ReplyPolicy::OnSuccess {
            warn!("Skipping private reply because the publish failed");
            return Delivery {
                published,
                replied: false,
            };
        }

        let replied = match self.replies.reply_private(response_url, &outcome.reply).await {
            Ok(()) => {
                info!("Private reply sent");
                true
            }
            Err(e) => {
                error!(error = %e, "Failed to send private reply");
                false
            }
        };

        Delivery { published, replied }
    }
}
