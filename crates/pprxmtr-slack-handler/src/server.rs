use std::net::SocketAddr;
use std::sync::Arc;
use std::time::SystemTime;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tracing::{debug, info, instrument, warn};

use crate::command::{CommandRegistry, EmojiCommand, HandlerError, SlashCommand};
use crate::config::HandlerConfig;
use crate::dispatch::Dispatcher;
use crate::locale::{Catalog, LocaleError, UNKNOWN_COMMAND_RESPONSE};
use crate::notification::Reply;
use crate::publisher::{NotificationPublisher, PublishClient};
use crate::reply::ReplySink;
use crate::verify::{self, SIGNATURE_HEADER, SignatureError, TIMESTAMP_HEADER};

/// Shared, read-only state for every request.
pub struct AppState<P: PublishClient, R: ReplySink> {
    pub config: Arc<HandlerConfig>,
    pub catalog: Arc<Catalog>,
    pub registry: Arc<CommandRegistry>,
    pub dispatcher: Arc<Dispatcher<P, R>>,
}

impl<P: PublishClient, R: ReplySink> Clone for AppState<P, R> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            catalog: self.catalog.clone(),
            registry: self.registry.clone(),
            dispatcher: self.dispatcher.clone(),
        }
    }
}

impl<P: PublishClient, R: ReplySink> AppState<P, R> {
    /// Loads the catalog for the configured locale and registers the emoji
    /// command under `config.command`.
    pub fn new(config: HandlerConfig, publish_client: P, replies: R) -> Result<Self, LocaleError> {
        let catalog = Arc::new(Catalog::load(&config.locale)?);
        let registry = CommandRegistry::new().register(
            config.command.clone(),
            Arc::new(EmojiCommand::new(&config, catalog.clone())),
        );
        let dispatcher = Dispatcher::new(
            NotificationPublisher::new(publish_client),
            replies,
            config.reply_policy,
        );
        Ok(Self {
            config: Arc::new(config),
            catalog,
            registry: Arc::new(registry),
            dispatcher: Arc::new(dispatcher),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("invalid request signature: {0}")]
    Signature(#[from] SignatureError),
    #[error("verification token mismatch")]
    Token,
    #[error("malformed command payload: {0}")]
    Payload(#[from] serde_urlencoded::de::Error),
    #[error("command handler failed: {0}")]
    Handler(#[from] HandlerError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Signature(_) | Self::Token => StatusCode::UNAUTHORIZED,
            Self::Payload(_) => StatusCode::BAD_REQUEST,
            Self::Handler(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "Slash command failed");
        } else {
            warn!(error = %self, "Rejected slash command request");
        }
        (status, self.to_string()).into_response()
    }
}

pub fn router<P: PublishClient, R: ReplySink>(state: AppState<P, R>) -> Router {
    let path = state.config.commands_path.clone();
    Router::new()
        .route(&path, post(handle_command::<P, R>))
        .route("/health", get(health))
        .with_state(state)
}

/// Binds `0.0.0.0:{config.port}` and serves until Ctrl+C.
pub async fn serve<P: PublishClient, R: ReplySink>(
    state: AppState<P, R>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = SocketAddr::from(([0, 0, 0, 0], state.config.port));
    let commands: Vec<String> = state.registry.names().map(str::to_string).collect();
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, ?commands, "Slack command server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("Received Ctrl+C, shutting down");
}

async fn health() -> &'static str {
    "ok"
}

#[instrument(
    name = "slack.command",
    skip_all,
    fields(command = tracing::field::Empty, user = tracing::field::Empty)
)]
async fn handle_command<P: PublishClient, R: ReplySink>(
    State(state): State<AppState<P, R>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ServerError> {
    if let Some(secret) = &state.config.signing_secret {
        verify::verify_signature(
            secret,
            header_str(&headers, TIMESTAMP_HEADER),
            header_str(&headers, SIGNATURE_HEADER),
            &body,
            SystemTime::now(),
        )?;
    }

    let command: SlashCommand = serde_urlencoded::from_bytes(&body)?;

    if !verify::token_matches(&command.token, &state.config.verification_token) {
        return Err(ServerError::Token);
    }

    if command.is_ssl_check() {
        return Ok(StatusCode::OK.into_response());
    }

    let span = tracing::Span::current();
    span.record("command", command.command.as_str());
    span.record("user", command.user_id.as_deref().unwrap_or(""));
    debug!(
        text = %command.text,
        team_id = command.team_id.as_deref(),
        channel_id = command.channel_id.as_deref(),
        user_name = command.user_name.as_deref(),
        response_url = %command.response_url,
        "Received slash command"
    );

    let Some(handler) = state.registry.get(&command.command) else {
        warn!("No handler registered for command");
        return Ok(unknown_command(&state.catalog));
    };

    let outcome = handler.handle(&command)?;
    let delivery = state
        .dispatcher
        .dispatch(&command.response_url, outcome)
        .await;
    info!(
        published = delivery.published,
        replied = delivery.replied,
        "Slash command handled"
    );

    Ok(StatusCode::OK.into_response())
}

fn unknown_command(catalog: &Catalog) -> Response {
    match catalog.translate(UNKNOWN_COMMAND_RESPONSE, &[]) {
        Ok(text) => Json(Reply { text }.private_body()).into_response(),
        Err(e) => {
            warn!(error = %e, "No text for unknown command reply");
            StatusCode::OK.into_response()
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_errors_map_to_401() {
        let cases = [
            ServerError::Token,
            ServerError::Signature(SignatureError::Mismatch),
            ServerError::Signature(SignatureError::StaleTimestamp),
        ];
        for err in cases {
            assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn handler_error_maps_to_500() {
        let err = ServerError::Handler(HandlerError::Locale(LocaleError::MissingKey {
            locale: "en".to_string(),
            key: "slashCommandResponse".to_string(),
        }));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn unknown_command_reply_is_ephemeral_json() {
        let catalog = Catalog::load("en").unwrap();
        let resp = unknown_command(&catalog);
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("content-type").unwrap(),
            "application/json"
        );
    }

    #[test]
    fn unknown_command_without_text_is_plain_ok() {
        let catalog = Catalog::parse("en", "{}").unwrap();
        let resp = unknown_command(&catalog);
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().get("content-type").is_none());
    }
}
