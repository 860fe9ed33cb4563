use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::trace_id;
use crate::routes::{
    auth, dashboard, dashboard_users, health, mappings, shifts, summary, timeline, users,
    usertypes,
};
use crate::services::ReportService;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn reports(&self) -> ReportService {
        ReportService::new(self.pool.clone(), &self.config.reports)
    }
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);

    let state = AppState {
        pool,
        config: config.clone(),
    };

    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let report_routes = Router::new()
        .route("/api/summary/kpis", get(summary::kpis))
        .route("/api/summary/top-apps", get(summary::top_apps))
        .route("/api/summary/users-activity", get(summary::users_activity))
        .route("/api/summary/user-breakdown", get(summary::user_breakdown))
        .route("/api/summary/charts", get(summary::charts))
        .route("/api/dashboard", get(dashboard::overview))
        .route("/api/user-timeline", get(timeline::user_timeline));

    let admin_routes = Router::new()
        .route("/api/login", post(auth::login))
        .route("/api/users", get(users::list_users).post(users::create_user))
        .route(
            "/api/users/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/api/dashboard-users",
            get(dashboard_users::list_dashboard_users).post(dashboard_users::create_dashboard_user),
        )
        .route(
            "/api/dashboard-users/:id",
            put(dashboard_users::update_dashboard_user)
                .delete(dashboard_users::delete_dashboard_user),
        )
        .route(
            "/api/dashboard-users/:id/password",
            put(dashboard_users::change_password),
        )
        .route(
            "/api/usertypes",
            get(usertypes::list_usertypes).post(usertypes::create_usertype),
        )
        .route("/api/shifts", get(shifts::list_shifts))
        .route("/api/shifts/options", get(shifts::shift_options))
        .route(
            "/api/shifts/:user_id",
            put(shifts::upsert_shift).delete(shifts::delete_shift),
        );

    let mapping_routes = Router::new()
        .route(
            "/api/device-mappings",
            get(mappings::list_device_mappings).post(mappings::create_device_mapping),
        )
        .route(
            "/api/device-mappings/:id",
            delete(mappings::delete_device_mapping),
        )
        .route(
            "/api/windows-username-mappings",
            get(mappings::list_windows_username_mappings)
                .post(mappings::create_windows_username_mapping),
        )
        .route(
            "/api/windows-username-mappings/:id",
            delete(mappings::delete_windows_username_mapping),
        )
        .route(
            "/api/unregistered-sessions",
            get(mappings::list_unregistered_sessions),
        )
        .route(
            "/api/register-user-from-session",
            post(mappings::register_user_from_session),
        )
        .route(
            "/api/map-user-to-session",
            post(mappings::map_user_to_session),
        );

    let public_routes = Router::new().route("/api/health", get(health::health_check));

    Router::new()
        .merge(public_routes)
        .merge(report_routes)
        .merge(admin_routes)
        .merge(mapping_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
