use crate::env::ReadEnv;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_COMMAND: &str = "/vince";
const DEFAULT_COMMANDS_PATH: &str = "/slack/commands";

const REQUIRED: [&str; 5] = [
    "VERIFICATION_TOKEN",
    "REGION",
    "USER_ID",
    "OAUTH_ACCESS_TOKEN",
    "LOCALE",
];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),
    #[error("required environment variable {0} is empty")]
    Empty(&'static str),
}

/// Whether the private reply is still sent after the publish failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyPolicy {
    /// Reply once the publish settles, whatever the outcome.
    Always,
    /// Reply only when the publish succeeded.
    OnSuccess,
}

/// Log verbosity switches. Only used to pick the default tracing filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogFlags {
    pub debug: bool,
    pub error: bool,
}

/// Process-wide configuration, read once at startup.
///
/// Resolved from environment variables:
/// - `VERIFICATION_TOKEN`: token Slack includes in every command payload (required)
/// - `REGION`, `USER_ID`: AWS region and account id used to build topic ARNs (required)
/// - `OAUTH_ACCESS_TOKEN`: credential forwarded to downstream consumers (required)
/// - `LOCALE`: reply language, e.g. `en` or `fi` (required)
/// - `DEBUG`, `ERROR`: logging switches, on when set to any non-empty value
/// - `SLACK_INTEGRATOR_SNS`, `SLACK_INTEGRATOR_SF`: integrator identifiers, carried but unused
/// - `SLACK_SIGNING_SECRET`: enables `X-Slack-Signature` verification
/// - `SLACK_COMMAND`: registered command name (default: `/vince`)
/// - `SLACK_COMMANDS_PATH`: HTTP path Slack posts commands to (default: `/slack/commands`)
/// - `PORT`: HTTP listening port (default: 3000)
/// - `REPLY_ON_PUBLISH_ERROR`: reply even when the publish failed (default: true)
#[derive(Debug, Clone)]
pub struct HandlerConfig {
    pub log: LogFlags,
    pub verification_token: String,
    pub integrator_sns: Option<String>,
    pub integrator_sf: Option<String>,
    pub region: String,
    pub user_id: String,
    pub oauth_access_token: String,
    pub locale: String,
    pub signing_secret: Option<String>,
    pub command: String,
    pub commands_path: String,
    pub port: u16,
    pub reply_policy: ReplyPolicy,
}

impl HandlerConfig {
    pub fn from_env<E: ReadEnv>(env: &E) -> Result<Self, ConfigError> {
        let [verification_token, region, user_id, oauth_access_token, locale] =
            REQUIRED.map(|key| required_var(env, key));

        Ok(Self {
            log: LogFlags {
                debug: flag(env, "DEBUG"),
                error: flag(env, "ERROR"),
            },
            verification_token: verification_token?,
            integrator_sns: optional_var(env, "SLACK_INTEGRATOR_SNS"),
            integrator_sf: optional_var(env, "SLACK_INTEGRATOR_SF"),
            region: region?,
            user_id: user_id?,
            oauth_access_token: oauth_access_token?,
            locale: locale?,
            signing_secret: optional_var(env, "SLACK_SIGNING_SECRET"),
            command: env
                .var("SLACK_COMMAND")
                .unwrap_or_else(|_| DEFAULT_COMMAND.to_string()),
            commands_path: env
                .var("SLACK_COMMANDS_PATH")
                .unwrap_or_else(|_| DEFAULT_COMMANDS_PATH.to_string()),
            port: env
                .var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            reply_policy: match env.var("REPLY_ON_PUBLISH_ERROR") {
                Ok(v) if v == "false" || v == "0" => ReplyPolicy::OnSuccess,
                _ => ReplyPolicy::Always,
            },
        })
    }
}

fn required_var<E: ReadEnv>(env: &E, key: &'static str) -> Result<String, ConfigError> {
    match env.var(key) {
        Ok(v) if v.trim().is_empty() => Err(ConfigError::Empty(key)),
        Ok(v) => Ok(v),
        Err(_) => Err(ConfigError::Missing(key)),
    }
}

fn optional_var<E: ReadEnv>(env: &E, key: &str) -> Option<String> {
    env.var(key).ok().filter(|v| !v.is_empty())
}

/// Any non-empty value turns the flag on, `0` and `false` included.
fn flag<E: ReadEnv>(env: &E, key: &str) -> bool {
    env.var(key).map(|v| !v.is_empty()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::InMemoryEnv;

    fn base_env() -> InMemoryEnv {
        InMemoryEnv::new()
            .with("VERIFICATION_TOKEN", "verify-me")
            .with("REGION", "us-east-1")
            .with("USER_ID", "123456789012")
            .with("OAUTH_ACCESS_TOKEN", "xoxp-oauth")
            .with("LOCALE", "en")
    }

    #[test]
    fn from_env_defaults() {
        let config = HandlerConfig::from_env(&base_env()).unwrap();
        assert_eq!(config.verification_token, "verify-me");
        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.user_id, "123456789012");
        assert_eq!(config.oauth_access_token, "xoxp-oauth");
        assert_eq!(config.locale, "en");
        assert_eq!(config.log, LogFlags::default());
        assert!(config.integrator_sns.is_none());
        assert!(config.integrator_sf.is_none());
        assert!(config.signing_secret.is_none());
        assert_eq!(config.command, "/vince");
        assert_eq!(config.commands_path, "/slack/commands");
        assert_eq!(config.port, 3000);
        assert_eq!(config.reply_policy, ReplyPolicy::Always);
    }

    #[test]
    fn reads_optional_vars() {
        let env = base_env()
            .with("DEBUG", "true")
            .with("ERROR", "1")
            .with("SLACK_INTEGRATOR_SNS", "slack-integrator")
            .with("SLACK_INTEGRATOR_SF", "step-fn")
            .with("SLACK_SIGNING_SECRET", "shh")
            .with("SLACK_COMMAND", "/approx")
            .with("SLACK_COMMANDS_PATH", "/hooks/slack")
            .with("PORT", "9090")
            .with("REPLY_ON_PUBLISH_ERROR", "false");

        let config = HandlerConfig::from_env(&env).unwrap();

        assert!(config.log.debug);
        assert!(config.log.error);
        assert_eq!(config.integrator_sns.as_deref(), Some("slack-integrator"));
        assert_eq!(config.integrator_sf.as_deref(), Some("step-fn"));
        assert_eq!(config.signing_secret.as_deref(), Some("shh"));
        assert_eq!(config.command, "/approx");
        assert_eq!(config.commands_path, "/hooks/slack");
        assert_eq!(config.port, 9090);
        assert_eq!(config.reply_policy, ReplyPolicy::OnSuccess);
    }

    #[test]
    fn each_required_var_is_reported_when_missing() {
        for key in REQUIRED {
            let err = HandlerConfig::from_env(&base_env().without(key)).unwrap_err();
            assert_eq!(err, ConfigError::Missing(key));
        }
    }

    #[test]
    fn blank_required_var_is_rejected() {
        let err = HandlerConfig::from_env(&base_env().with("REGION", "  ")).unwrap_err();
        assert_eq!(err, ConfigError::Empty("REGION"));
    }

    #[test]
    fn any_non_empty_value_sets_flag() {
        for value in ["1", "true", "0", "false", "yes"] {
            let config =
                HandlerConfig::from_env(&base_env().with("DEBUG", value).with("ERROR", value))
                    .unwrap();
            assert!(config.log.debug, "DEBUG={value}");
            assert!(config.log.error, "ERROR={value}");
        }
    }

    #[test]
    fn empty_flag_is_off() {
        let config = HandlerConfig::from_env(&base_env().with("DEBUG", "")).unwrap();
        assert!(!config.log.debug);
    }

    #[test]
    fn invalid_port_falls_back_to_default() {
        let config = HandlerConfig::from_env(&base_env().with("PORT", "not-a-port")).unwrap();
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn empty_signing_secret_is_none() {
        let config =
            HandlerConfig::from_env(&base_env().with("SLACK_SIGNING_SECRET", "")).unwrap();
        assert!(config.signing_secret.is_none());
    }

    #[test]
    fn reply_policy_any_other_value_is_always() {
        let config =
            HandlerConfig::from_env(&base_env().with("REPLY_ON_PUBLISH_ERROR", "nope")).unwrap();
        assert_eq!(config.reply_policy, ReplyPolicy::Always);
    }
}
