use aws_config::{BehaviorVersion, Region};
use pprxmtr_slack_handler::env::SystemEnv;
use pprxmtr_slack_handler::reply::ResponseUrlReplier;
use pprxmtr_slack_handler::{AppState, HandlerConfig, serve, telemetry};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = HandlerConfig::from_env(&SystemEnv)?;
    telemetry::init(config.log)?;

    tracing::debug!(
        integrator_sns = config.integrator_sns.as_deref(),
        integrator_sf = config.integrator_sf.as_deref(),
        signature_check = config.signing_secret.is_some(),
        "Configuration loaded"
    );

    tracing::info!(region = %config.region, "Loading AWS configuration...");
    let aws = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .load()
        .await;
    let sns = aws_sdk_sns::Client::new(&aws);

    let replies = ResponseUrlReplier::new(reqwest::Client::new());
    let state = AppState::new(config, sns, replies)?;

    serve(state).await
}
