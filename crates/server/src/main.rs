mod config;
mod http;
mod state;

use adapter::TwitterClient;
use anyhow::Context;
use domain::PipelineEvent;
use dotenvy::dotenv;
use engine::{BroadcastHooks, Pipeline, Scheduler};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Settings;
use http::router::build_router;
use state::AppState;
use storage::Db;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::new().context("Failed to load configuration")?;

    let db = Db::new(&settings.database.url)
        .await?
        .with_moderation(settings.database.hold_for_moderation);
    let source = TwitterClient::new(settings.twitter_config())
        .context("Failed to build Twitter HTTP client")?;

    let (tx_events, rx_events) = broadcast::channel(100);
    tokio::spawn(log_events(rx_events));

    let pipeline = Arc::new(
        Pipeline::builder()
            .posts(Arc::new(db.clone()))
            .comments(Arc::new(db.clone()))
            .options(Arc::new(db.clone()))
            .authors(Arc::new(db))
            .source(Arc::new(source))
            .hooks(Arc::new(BroadcastHooks::new(tx_events)))
            .config(settings.pipeline_config()?)
            .build(),
    );

    let options = pipeline.activate().await.context("Failed to activate options")?;
    info!(
        manual_cron = options.manual_cron,
        posts_per_check = options.posts_per_check,
        exclude_retweets = options.exclude_retweets,
        "Options loaded"
    );

    let scheduler = Scheduler::register(
        pipeline.clone(),
        Duration::from_secs(settings.scheduler.interval_secs),
    );

    let state = AppState {
        pipeline,
        admin_token: settings.security.admin_token.clone(),
    };
    let app = build_router(state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to address: {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // 停用时注销定时任务
    scheduler.deactivate().await;
    Ok(())
}

async fn log_events(mut rx: broadcast::Receiver<PipelineEvent>) {
    loop {
        match rx.recv().await {
            Ok(PipelineEvent::CommentInserted {
                comment_id,
                comment,
            }) => debug!(
                comment_id,
                post_id = comment.post_id,
                author = %comment.author,
                "Mention inserted"
            ),
            Ok(PipelineEvent::ApiCounterReset) => debug!("API call counter reset"),
            Ok(PipelineEvent::SweepFinished { inserted }) => {
                debug!(inserted, "Sweep finished event")
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "Event logger lagged")
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully...");
        },
    }
}
