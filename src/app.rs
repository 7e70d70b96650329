use crate::config::Config;
use crate::spoonacular::SpoonacularApi;
use crate::state::AppState;
use crate::utils::fmt_duration;
use crate::web::create_router;
use anyhow::Context;
use axum::http::HeaderValue;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tracing::{error, info, warn};

/// Main application struct containing all necessary components
pub struct App {
    config: Config,
    app_state: AppState,
}

impl App {
    /// Build the upstream client and shared state from `config`.
    pub fn new(config: Config) -> Result<Self, anyhow::Error> {
        let spoonacular = SpoonacularApi::new(
            config.spoonacular_base(),
            config.spoonacular_api_key.clone(),
            config.upstream_timeout,
        )
        .context("Failed to create Spoonacular client")?;

        let cache_settings = config.cache_settings();
        info!(
            base_url = %config.spoonacular_base(),
            upstream_timeout = fmt_duration(config.upstream_timeout),
            popular_ttl = fmt_duration(cache_settings.popular.ttl),
            recipe_ttl = fmt_duration(cache_settings.detail.ttl),
            recipe_capacity = ?cache_settings.recipe_capacity,
            "recipe proxy configured"
        );

        let app_state = AppState::new(Arc::new(spoonacular), cache_settings);

        Ok(App { config, app_state })
    }

    fn cors_origin(&self) -> Result<Option<HeaderValue>, anyhow::Error> {
        let origin = self.config.cors_origin.trim();
        if origin.is_empty() {
            return Ok(None);
        }
        HeaderValue::from_str(origin)
            .map(Some)
            .with_context(|| format!("Invalid CORS origin '{origin}'"))
    }

    /// Serve HTTP until a shutdown signal arrives, then drain in-flight
    /// requests for at most `SHUTDOWN_TIMEOUT`.
    pub async fn run(self) -> ExitCode {
        let cors_origin = match self.cors_origin() {
            Ok(origin) => origin,
            Err(e) => {
                error!(error = ?e, "invalid configuration");
                return ExitCode::FAILURE;
            }
        };
        let router = create_router(self.app_state, cors_origin);

        let address = format!("0.0.0.0:{}", self.config.port);
        let listener = match TcpListener::bind(&address).await {
            Ok(listener) => listener,
            Err(e) => {
                error!(address = %address, error = %e, "failed to bind");
                return ExitCode::FAILURE;
            }
        };
        info!(address = %address, "web server listening");

        let stop = Arc::new(Notify::new());
        let server = axum::serve(listener, router).with_graceful_shutdown({
            let stop = stop.clone();
            async move { stop.notified().await }
        });
        let mut server_task = tokio::spawn(async move { server.await });

        tokio::select! {
            result = &mut server_task => {
                error!(result = ?result, "web server exited unexpectedly");
                ExitCode::FAILURE
            }
            _ = shutdown_signal() => {
                let timeout = self.config.shutdown_timeout;
                info!(timeout = fmt_duration(timeout), "shutdown signal received, draining connections");
                stop.notify_one();

                match tokio::time::timeout(timeout, server_task).await {
                    Ok(Ok(Ok(()))) => {
                        info!("web server stopped");
                        ExitCode::SUCCESS
                    }
                    Ok(Ok(Err(e))) => {
                        error!(error = %e, "web server failed during shutdown");
                        ExitCode::FAILURE
                    }
                    Ok(Err(e)) => {
                        error!(error = %e, "web server task panicked");
                        ExitCode::FAILURE
                    }
                    Err(_) => {
                        warn!("graceful shutdown timed out, exiting");
                        ExitCode::FAILURE
                    }
                }
            }
        }
    }
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
