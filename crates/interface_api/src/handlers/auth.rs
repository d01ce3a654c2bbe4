//! Subscriber registration and login handlers

use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use tracing::info;
use validator::Validate;

use domain_subscriber::RegisterSubscriber;

use crate::auth::create_token;
use crate::dto::auth::{LoginRequest, SubscriberResponse, TokenResponse};
use crate::{error::ApiError, AppState};

/// Registers a subscriber
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterSubscriber>, JsonRejection>,
) -> Result<(StatusCode, Json<SubscriberResponse>), ApiError> {
    let Json(request) = body?;
    let subscriber = state.subscribers.register(request).await?;
    Ok((StatusCode::CREATED, Json(subscriber.into())))
}

/// Exchanges email and password for a bearer token
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(request) = body?;
    request.validate()?;

    let subscriber = state
        .subscribers
        .authenticate(&request.email, &request.password)
        .await?;
    let token = create_token(&subscriber, &state.config)?;

    info!(subscriber_id = %subscriber.id, "Subscriber logged in");
    Ok(Json(TokenResponse::bearer(token, state.config.jwt_expiration_secs)))
}
