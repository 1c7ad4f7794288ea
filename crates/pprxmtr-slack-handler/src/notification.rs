use serde::{Deserialize, Serialize};

/// Message published for the downstream emoji pipeline.
///
/// The inbound command fields come first, then `locale` and `oauth`:
/// `{"text":…,"command":…,"response_url":…,"channel_id":…,…,"locale":…,"oauth":…}`.
/// Absent Slack fields are left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Command text exactly as the user typed it.
    pub text: String,
    #[serde(flatten)]
    pub context: SlackContext,
    pub locale: String,
    /// Credential the consumer uses to upload the finished emoji.
    pub oauth: String,
}

/// Where the command came from. The consumer answers the user through
/// `response_url` and `channel_id` once the emoji is ready.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlackContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_id: Option<String>,
}

/// Text sent back to the user who ran the command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
}

/// Only the invoking user sees the message.
const EPHEMERAL: &str = "ephemeral";

/// Body posted to `response_url` (or returned inline) for a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplyBody<'a> {
    pub response_type: &'static str,
    pub text: &'a str,
}

impl Reply {
    pub fn private_body(&self) -> ReplyBody<'_> {
        ReplyBody {
            response_type: EPHEMERAL,
            text: &self.text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_keeps_field_order() {
        let n = Notification {
            text: "hello".to_string(),
            context: SlackContext::default(),
            locale: "en".to_string(),
            oauth: "xoxp-1".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&n).unwrap(),
            r#"{"text":"hello","locale":"en","oauth":"xoxp-1"}"#
        );
    }

    #[test]
    fn slack_context_sits_between_text_and_locale() {
        let n = Notification {
            text: "party".to_string(),
            context: SlackContext {
                response_url: Some("https://hooks.slack.test/1".to_string()),
                channel_id: Some("C1".to_string()),
                user_name: Some("someone".to_string()),
                ..Default::default()
            },
            locale: "fi".to_string(),
            oauth: "xoxp-1".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&n).unwrap(),
            r#"{"text":"party","response_url":"https://hooks.slack.test/1","channel_id":"C1","user_name":"someone","locale":"fi","oauth":"xoxp-1"}"#
        );
    }

    #[test]
    fn decodes_body_with_and_without_context() {
        let bare: Notification =
            serde_json::from_str(r#"{"text":"a","locale":"en","oauth":"o"}"#).unwrap();
        assert_eq!(bare.context, SlackContext::default());

        let full: Notification = serde_json::from_str(
            r#"{"text":"a","channel_id":"C9","user_name":"u","locale":"en","oauth":"o"}"#,
        )
        .unwrap();
        assert_eq!(full.context.channel_id.as_deref(), Some("C9"));
        assert_eq!(full.context.user_name.as_deref(), Some("u"));
    }

    #[test]
    fn private_body_is_ephemeral() {
        let reply = Reply {
            text: "only you".to_string(),
        };
        assert_eq!(
            serde_json::to_value(reply.private_body()).unwrap(),
            serde_json::json!({ "response_type": "ephemeral", "text": "only you" })
        );
    }
}
