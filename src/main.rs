use std::future::IntoFuture;
use std::pin::pin;
use std::process;
use std::sync::Arc;

use stanza::{
    application::categories::CategoryService,
    application::error::AppError,
    application::posts::PostService,
    application::related::RelatedPostsService,
    application::repos::{CategoriesRepo, PostsRepo, PostsWriteRepo},
    config,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, AppState},
        telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(config::ServeArgs::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Migrate(_) => run_migrate(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;

    let posts_repo: Arc<dyn PostsRepo> = repositories.clone();
    let writes_repo: Arc<dyn PostsWriteRepo> = repositories.clone();
    let categories_repo: Arc<dyn CategoriesRepo> = repositories.clone();

    let state = AppState {
        posts: PostService::new(posts_repo.clone(), writes_repo, categories_repo.clone()),
        related: RelatedPostsService::new(posts_repo),
        categories: CategoryService::new(categories_repo),
        related_limit: settings.content.related_limit.get(),
    };

    let router = http::build_router(state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "stanza::server",
        addr = %settings.server.addr,
        "Listening"
    );

    serve_http(&settings, listener, router).await
}

async fn serve_http(
    settings: &config::Settings,
    listener: tokio::net::TcpListener,
    router: axum::Router,
) -> Result<(), AppError> {
    let (drain_tx, drain_rx) = tokio::sync::oneshot::channel::<()>();
    let server = axum::serve(listener, router.into_make_service()).with_graceful_shutdown(
        async move {
            let _ = drain_rx.await;
        },
    );

    let mut server = pin!(server.into_future());
    tokio::select! {
        result = &mut server => {
            result.map_err(|err| AppError::unexpected(format!("server error: {err}")))?;
        }
        signal = tokio::signal::ctrl_c() => {
            signal.map_err(|err| AppError::from(InfraError::from(err)))?;
            info!(target = "stanza::server", "Shutdown signal received, draining connections");
            let _ = drain_tx.send(());
            let grace = settings.server.graceful_shutdown;
            match tokio::time::timeout(grace, &mut server).await {
                Ok(result) => {
                    result.map_err(|err| AppError::unexpected(format!("server error: {err}")))?;
                }
                Err(_) => {
                    warn!(
                        target = "stanza::server",
                        grace_seconds = grace.as_secs(),
                        "Graceful shutdown timed out"
                    );
                }
            }
        }
    }

    Ok(())
}

async fn run_migrate(settings: config::Settings) -> Result<(), AppError> {
    init_repositories(&settings).await?;
    info!(target = "stanza::migrate", "Migrations applied");
    Ok(())
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))
        .map_err(AppError::from)?;

    let pool =
        PostgresRepositories::connect(database_url, settings.database.max_connections.get())
            .await
            .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    Ok(Arc::new(PostgresRepositories::new(pool)))
}
