use std::sync::Arc;

use axum::serve;
use interfaces_github_repos::{BuildGithubClientError, GithubClient};
use projects_repo_tracker::{
	config::{load_dotenv, Config, ConfigError},
	db::{build_pool, repository::store::PgRepositoryStore, run_migrations, BuildPoolError, RunMigrationsError},
	endpoints::router,
	services::{PullRequestService, RepositoryService},
};
use thiserror::Error;
use tracing::{error, info};
use utils_trace::tracing_init;

#[derive(Debug, Error)]
pub enum MainError {
	#[error("Config: {source}")]
	Config {
		#[source]
		source: ConfigError,
	},
	#[error("TracingInit: {source}")]
	TracingInit {
		#[source]
		source: utils_trace::TracingInitError,
	},
	#[error("BuildPool: {source}")]
	BuildPool {
		#[source]
		source: BuildPoolError,
	},
	#[error("RunMigrations: {source}")]
	RunMigrations {
		#[source]
		source: RunMigrationsError,
	},
	#[error("BuildGithubClient: {source}")]
	BuildGithubClient {
		#[source]
		source: BuildGithubClientError,
	},
	#[error("BlockingStartup: {source}")]
	BlockingStartup {
		#[source]
		source: tokio::task::JoinError,
	},
	#[error("TcpListenerBind: {source}")]
	TcpListenerBind {
		#[source]
		source: std::io::Error,
	},
	#[error("Serve: {source}")]
	Serve {
		#[source]
		source: std::io::Error,
	}
}

#[tokio::main]
async fn main() -> Result<(), MainError> {
	load_dotenv().map_err(|source| MainError::Config { source })?;
	let config = Config::from_env().map_err(|source| MainError::Config { source })?;

	tracing_init(&config.log_level, config.log_format)
		.map_err(|source| MainError::TracingInit { source })?;

	if config.github_token.is_empty() {
		error!("GITHUB_TOKEN not set, upstream requests will be unauthenticated");
	}

	// r2d2 connects eagerly and migrations are blocking diesel calls
	let pool = {
		let database_url = config.database_url.clone();
		let (pool_size, query_timeout) = (config.pool_size, config.query_timeout);
		tokio::task::spawn_blocking(move || -> Result<_, MainError> {
			let pool = build_pool(&database_url, pool_size, query_timeout)
				.map_err(|source| MainError::BuildPool { source })?;
			let applied = run_migrations(&pool)
				.map_err(|source| MainError::RunMigrations { source })?;
			info!(applied, "database migrations up to date");
			Ok(pool)
		})
		.await
		.map_err(|source| MainError::BlockingStartup { source })??
	};

	let store = Arc::new(PgRepositoryStore::new(pool, config.query_timeout));
	let github = Arc::new(
		GithubClient::new(&config.github_api_url, &config.github_token)
			.map_err(|source| MainError::BuildGithubClient { source })?,
	);

	let app = router(
		RepositoryService::new(store.clone(), github.clone()),
		PullRequestService::new(store, github),
	);

	let listener = tokio::net::TcpListener::bind(config.bind_addr)
		.await
		.map_err(|source| MainError::TcpListenerBind { source })?;

	info!("Server running on addr: {}", config.bind_addr);

	serve(listener, app)
		.with_graceful_shutdown(shutdown_signal())
		.await
		.map_err(|source| MainError::Serve { source })?;

	info!("Server stopped");
	Ok(())
}

async fn shutdown_signal() {
	if let Err(err) = tokio::signal::ctrl_c().await {
		error!(error = %err, "failed to listen for shutdown signal");
		std::future::pending::<()>().await;
	}
}
