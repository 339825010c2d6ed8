use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::{
    config::Settings,
    database::DatabasePool,
    repositories::{
        repository_repo::SqlxRepositoryRepository, scan_result_repo::SqlxScanResultRepository,
        user_repo::SqlxUserRepository, RepositoryRepository, ScanResultRepository, UserRepository,
    },
    services::{
        AuthService, CoverageService, DelayWindow, MockCoverageSource, MockUpgradeSource,
        MockVulnerabilitySource, RepositoryService, ScanService, SecurityService, VersionService,
    },
};

pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod services;
pub mod utils;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub db_pool: DatabasePool,
    pub auth_service: Arc<AuthService>,
    pub repository_service: Arc<RepositoryService>,
    pub scan_service: Arc<ScanService>,
    pub security_service: Arc<SecurityService>,
    pub version_service: Arc<VersionService>,
    pub coverage_service: Arc<CoverageService>,
    pub user_repository: Arc<dyn UserRepository + Send + Sync>,
    pub repository_repository: Arc<dyn RepositoryRepository + Send + Sync>,
    pub scan_result_repository: Arc<dyn ScanResultRepository + Send + Sync>,
}

impl AppState {
    /// Create new application state with dependency injection
    pub async fn new(config: Settings) -> Result<Self, crate::error::ApiError> {
        let db_pool = crate::database::create_connection_pool(&config.database_url).await?;
        Self::new_with_pool(config, db_pool).await
    }

    /// Create new application state with an existing database pool
    pub async fn new_with_pool(
        config: Settings,
        db_pool: DatabasePool,
    ) -> Result<Self, crate::error::ApiError> {
        let config = Arc::new(config);

        // Create repositories
        let user_repository: Arc<dyn UserRepository + Send + Sync> =
            Arc::new(SqlxUserRepository::new(db_pool.clone()));
        let repository_repository: Arc<dyn RepositoryRepository + Send + Sync> =
            Arc::new(SqlxRepositoryRepository::new(db_pool.clone()));
        let scan_result_repository: Arc<dyn ScanResultRepository + Send + Sync> =
            Arc::new(SqlxScanResultRepository::new(db_pool.clone()));

        // Create finding sources with the configured simulated latency
        let delay = DelayWindow::from_millis(config.scan_delay_min_ms, config.scan_delay_max_ms);
        let vulnerability_source = Arc::new(MockVulnerabilitySource::new(delay));
        let upgrade_source = Arc::new(MockUpgradeSource::new(delay));
        let coverage_source = Arc::new(MockCoverageSource::new(delay));

        // Create services with dependency injection
        let auth_service = Arc::new(AuthService::new(config.clone(), user_repository.clone()));
        let repository_service = Arc::new(RepositoryService::new(
            repository_repository.clone(),
            scan_result_repository.clone(),
        ));
        let scan_service = Arc::new(ScanService::new(scan_result_repository.clone()));
        let security_service = Arc::new(SecurityService::new(
            vulnerability_source,
            scan_result_repository.clone(),
            repository_repository.clone(),
            delay,
        ));
        let version_service = Arc::new(VersionService::new(
            upgrade_source,
            scan_result_repository.clone(),
            repository_repository.clone(),
            delay,
        ));
        let coverage_service = Arc::new(CoverageService::new(
            coverage_source,
            scan_result_repository.clone(),
            repository_repository.clone(),
        ));

        Ok(Self {
            config,
            db_pool,
            auth_service,
            repository_service,
            scan_service,
            security_service,
            version_service,
            coverage_service,
            user_repository,
            repository_repository,
            scan_result_repository,
        })
    }
}

/// Build the API router: public routes plus the bearer-auth protected
/// surface. Global layers (CORS, tracing) are applied by the caller.
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::health_handlers::health_check))
        .route("/auth/register", post(handlers::auth_handlers::register))
        .route("/auth/login", post(handlers::auth_handlers::login));

    let protected_routes = Router::new()
        .route("/auth/me", get(handlers::auth_handlers::me))
        // Repository endpoints
        .route(
            "/repositories",
            get(handlers::repository_handlers::list_repositories),
        )
        .route(
            "/repositories",
            post(handlers::repository_handlers::create_repository),
        )
        .route(
            "/repositories/:repo_id",
            get(handlers::repository_handlers::get_repository),
        )
        .route(
            "/repositories/:repo_id",
            delete(handlers::repository_handlers::delete_repository),
        )
        // Scan endpoints
        .route(
            "/scans/security",
            post(handlers::scan_handlers::run_security_scan),
        )
        .route(
            "/scans/version",
            post(handlers::scan_handlers::run_version_scan),
        )
        .route(
            "/scans/coverage",
            post(handlers::scan_handlers::run_coverage_scan),
        )
        // Dashboard metrics
        .route(
            "/dashboard/metrics",
            get(handlers::dashboard_handlers::get_dashboard_metrics),
        )
        // Function endpoints
        .route(
            "/functions/detect-current-version",
            post(handlers::function_handlers::detect_current_version),
        )
        .route(
            "/functions/create-upgrade-pr",
            post(handlers::function_handlers::create_upgrade_pr),
        )
        .route(
            "/functions/fix-vulnerability",
            post(handlers::function_handlers::fix_vulnerability),
        )
        .route(
            "/functions/fetch-coverage-data",
            post(handlers::function_handlers::fetch_coverage_data),
        )
        .route(
            "/functions/improve-coverage",
            post(handlers::function_handlers::improve_coverage),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
