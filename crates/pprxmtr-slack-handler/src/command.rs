use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;

use crate::config::HandlerConfig;
use crate::locale::{Catalog, LocaleError, SLASH_COMMAND_RESPONSE};
use crate::notification::{Notification, Reply, SlackContext};
use crate::topic::TopicArn;

/// Slash-command payload as Slack posts it (`application/x-www-form-urlencoded`).
///
/// `token` is checked and dropped; every other field is forwarded to the
/// consumer through [`SlackContext`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlashCommand {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub response_url: String,
    pub team_id: Option<String>,
    pub team_domain: Option<String>,
    pub channel_id: Option<String>,
    pub channel_name: Option<String>,
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub trigger_id: Option<String>,
    /// Set to `1` when Slack only probes the endpoint's certificate.
    pub ssl_check: Option<String>,
}

impl SlashCommand {
    pub fn is_ssl_check(&self) -> bool {
        self.ssl_check.as_deref() == Some("1")
    }

    /// Everything the consumer needs to answer the user, minus the token.
    pub fn context(&self) -> SlackContext {
        let non_empty = |v: &str| (!v.is_empty()).then(|| v.to_string());
        SlackContext {
            command: non_empty(&self.command),
            response_url: non_empty(&self.response_url),
            team_id: self.team_id.clone(),
            team_domain: self.team_domain.clone(),
            channel_id: self.channel_id.clone(),
            channel_name: self.channel_name.clone(),
            user_id: self.user_id.clone(),
            user_name: self.user_name.clone(),
            trigger_id: self.trigger_id.clone(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error(transparent)]
    Locale(#[from] LocaleError),
}

/// What a handler wants done for one command: publish `notification` to
/// `topic`, then send `reply` to the invoking user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub topic: TopicArn,
    pub notification: Notification,
    pub reply: Reply,
}

pub trait CommandHandler: Send + Sync {
    fn handle(&self, command: &SlashCommand) -> Result<CommandOutcome, HandlerError>;
}

/// Turns the command text into a `handle-emoji` notification.
pub struct EmojiCommand {
    catalog: Arc<Catalog>,
    locale: String,
    oauth: String,
    topic: TopicArn,
}

impl EmojiCommand {
    pub fn new(config: &HandlerConfig, catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            locale: config.locale.clone(),
            oauth: config.oauth_access_token.clone(),
            topic: TopicArn::handle_emoji(config),
        }
    }
}

impl CommandHandler for EmojiCommand {
    fn handle(&self, command: &SlashCommand) -> Result<CommandOutcome, HandlerError> {
        let text = self
            .catalog
            .translate(SLASH_COMMAND_RESPONSE, &[command.text.as_str()])?;

        Ok(CommandOutcome {
            topic: self.topic.clone(),
            notification: Notification {
                text: command.text.clone(),
                context: command.context(),
                locale: self.locale.clone(),
                oauth: self.oauth.clone(),
            },
            reply: Reply { text },
        })
    }
}

/// Command name → handler, fixed at startup.
#[derive(Default, Clone)]
pub struct CommandRegistry {
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, name: impl Into<String>, handler: Arc<dyn CommandHandler>) -> Self {
        self.handlers.insert(name.into(), handler);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn CommandHandler>> {
        self.handlers.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}
