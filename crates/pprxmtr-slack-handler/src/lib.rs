//! # pprxmtr-slack-handler
//!
//! Slack slash-command webhook that asks the emoji approximator pipeline to
//! process the command text.
//!
//! ## How it works
//!
//! 1. Slack sends `POST /slack/commands` with a form-encoded command payload.
//! 2. The payload's `token` is checked against `VERIFICATION_TOKEN`, and the
//!    `X-Slack-Signature` header against `SLACK_SIGNING_SECRET` when set.
//! 3. The registered handler builds a notification and a localized reply.
//! 4. The notification is published to SNS topic
//!    `arn:aws:sns:{REGION}:{USER_ID}:handle-emoji`.
//! 5. Once the publish settles, the reply is posted to the command's
//!    `response_url` as an ephemeral message.
//!
//! ## SNS message format
//!
//! The command payload minus its `token`, plus `locale` and `oauth`:
//!
//! ```text
//! {"text":"<command text>","command":"/vince","response_url":"…",
//!  "team_id":"…","channel_id":"…","user_id":"…","user_name":"…","trigger_id":"…",
//!  "locale":"<LOCALE>","oauth":"<OAUTH_ACCESS_TOKEN>"}
//! ```
//!
//! Slack fields missing from the command are left out. The consumer replies to
//! the user through `response_url` and `channel_id`.
//!
//! ## Configuration (env vars)
//!
//! | Variable | Default | Description |
//! |---|---|---|
//! | `VERIFICATION_TOKEN` | required | Token Slack sends with each command |
//! | `REGION` | required | AWS region of the topic |
//! | `USER_ID` | required | AWS account id of the topic |
//! | `OAUTH_ACCESS_TOKEN` | required | Credential forwarded to consumers |
//! | `LOCALE` | required | Reply language (`en`, `fi`) |
//! | `DEBUG` / `ERROR` | off | Any non-empty value sets default log level `debug` / `error` |
//! | `SLACK_SIGNING_SECRET` | none | Enables signature verification |
//! | `SLACK_COMMAND` | `/vince` | Registered command name |
//! | `SLACK_COMMANDS_PATH` | `/slack/commands` | HTTP path for commands |
//! | `PORT` | `3000` | HTTP listening port |
//! | `REPLY_ON_PUBLISH_ERROR` | `true` | Reply even when the publish failed |
//! | `SLACK_INTEGRATOR_SNS` / `SLACK_INTEGRATOR_SF` | none | Carried, unused |

pub mod command;
pub mod config;
pub mod dispatch;
pub mod env;
pub mod locale;
pub mod notification;
pub mod publisher;
pub mod reply;
pub mod server;
pub mod telemetry;
pub mod topic;
pub mod verify;

#[cfg(any(test, feature = "test-support"))]
pub mod mocks;

pub use config::{ConfigError, HandlerConfig, ReplyPolicy};
pub use server::{AppState, router, serve};
