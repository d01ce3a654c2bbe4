//! HTTP API Layer
//!
//! This crate provides the REST API for the policy rating service using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for policies, quotes, auth and health
//! - **Middleware**: Bearer authentication, tracing, audit logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent `{ error, message }` responses
//! - **Seeding**: Optional demo data for empty stores
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let app = create_router(AppState::in_memory(config));
//! axum::serve(listener, app).await?;
//! ```

pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod seed;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use domain_policy::memory::InMemoryPolicyStore;
use domain_policy::{ComponentCatalog, PolicyService, PolicyStore};
use domain_subscriber::memory::InMemorySubscriberStore;
use domain_subscriber::{SubscriberService, SubscriberStore};

use crate::config::ApiConfig;
use crate::handlers::{health, policy};
use crate::middleware::{audit_middleware, auth_middleware};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub policies: Arc<PolicyService>,
    pub subscribers: Arc<SubscriberService>,
    pub config: ApiConfig,
}

impl AppState {
    /// Builds the state over the given stores with the standard catalog
    pub fn new(
        policy_store: Arc<dyn PolicyStore>,
        subscriber_store: Arc<dyn SubscriberStore>,
        config: ApiConfig,
    ) -> Self {
        Self {
            policies: Arc::new(PolicyService::new(policy_store, ComponentCatalog::standard())),
            subscribers: Arc::new(SubscriberService::new(subscriber_store, config.bcrypt_cost)),
            config,
        }
    }

    /// Builds the state over fresh in-memory stores
    pub fn in_memory(config: ApiConfig) -> Self {
        Self::new(
            Arc::new(InMemoryPolicyStore::new()),
            Arc::new(InMemorySubscriberStore::new()),
            config,
        )
    }
}

/// Creates the main API router
///
/// # Arguments
///
/// * `state` - Services and configuration shared by all handlers
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    let policy_routes = Router::new()
        .route("/", get(policy::list_policies).post(policy::create_policy))
        .route("/quote", post(policy::calculate_quote))
        .route(
            "/:policy_number",
            get(policy::get_policy)
                .put(policy::update_policy)
                .delete(policy::delete_policy),
        )
        .layer(axum_middleware::from_fn(audit_middleware))
        .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/policies", policy_routes);

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}
