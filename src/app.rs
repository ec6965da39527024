/*
 * Responsibility
 * - Config読み込み → 依存生成 (PgPool / AdmissionPipeline) → Router 組み立て
 * - Middleware の適用 (http / CORS / origin gate / admission)
 * - axum::serve() で起動、SIGINT / SIGTERM で graceful shutdown
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::{Router, http::Uri, routing::get};
use sqlx::postgres::PgPoolOptions;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api,
    config::Config,
    error::AppError,
    middleware,
    repos::{PgUserRepo, UserRepo},
    services::auth::build_admission_pipeline,
    state::AppState,
};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,bookstore_api=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // development: crash the whole process so we notice immediately.
        // production: default hook, then CatchPanicLayer answers 500.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    // The acquire timeout is the only timeout admission ever waits on.
    let db = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(config.database_acquire_timeout)
        .connect(&config.database_url)
        .await
        .context("failed to connect to the user database")?;
    tracing::info!("database connected");

    let users: Arc<dyn UserRepo> = Arc::new(PgUserRepo::new(db));
    let admission = build_admission_pipeline(config, users);

    Ok(AppState::new(admission))
}

pub(crate) fn build_router(state: AppState) -> Router {
    let pipeline = state.admission.clone();
    let allow_list = pipeline.allow_list().clone();

    let router = Router::new()
        .route("/", get(welcome))
        .nest("/api/v1", api::v1::routes(state.clone()))
        .fallback(route_not_found)
        .with_state(state);

    // innermost first: origin gate < cors < http
    let router = middleware::origin::apply(router, pipeline);
    let router = middleware::cors::apply(router, allow_list);
    middleware::http::apply(router)
}

async fn welcome() -> &'static str {
    "Welcome to the Bookstore API"
}

async fn route_not_found(uri: Uri) -> AppError {
    tracing::debug!(%uri, "route not found");
    AppError::RouteNotFound
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
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

    tracing::info!("shutdown signal received");
}
