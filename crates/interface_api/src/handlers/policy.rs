//! Policy handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use validator::Validate;

use core_kernel::{PageRequest, PolicyNumber};
use core_kernel::pagination::DEFAULT_PAGE_SIZE;

use crate::dto::policy::*;
use crate::{error::ApiError, AppState};

fn policy_number(value: i64) -> Result<PolicyNumber, ApiError> {
    Ok(PolicyNumber::new(value)?)
}

/// Lists policies, one page at a time
pub async fn list_policies(
    State(state): State<AppState>,
    query: Result<Query<ListPoliciesQuery>, QueryRejection>,
) -> Result<Json<PolicyPageResponse>, ApiError> {
    let Query(query) = query?;
    let request = PageRequest::new(
        query.page.unwrap_or(1),
        query.size.unwrap_or(DEFAULT_PAGE_SIZE),
    )?;

    let page = state.policies.list_policies(request).await?;
    Ok(Json(page.into()))
}

/// Gets a policy by its policy number
pub async fn get_policy(
    State(state): State<AppState>,
    Path(number): Path<i64>,
) -> Result<Json<PolicyResponse>, ApiError> {
    let policy = state.policies.get_policy(policy_number(number)?).await?;
    Ok(Json(policy.into()))
}

/// Creates a policy with its four components
pub async fn create_policy(
    State(state): State<AppState>,
    body: Result<Json<CreatePolicyRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PolicyResponse>), ApiError> {
    let Json(request) = body?;
    request.validate()?;

    let policy = state.policies.create_policy(request.into()).await?;
    Ok((StatusCode::CREATED, Json(policy.into())))
}

/// Renames a policy and/or changes component values
pub async fn update_policy(
    State(state): State<AppState>,
    Path(number): Path<i64>,
    body: Result<Json<UpdatePolicyRequest>, JsonRejection>,
) -> Result<Json<PolicyResponse>, ApiError> {
    let Json(request) = body?;
    request.validate()?;

    let policy = state
        .policies
        .update_policy(policy_number(number)?, request.into())
        .await?;
    Ok(Json(policy.into()))
}

/// Deletes a policy and its components
pub async fn delete_policy(
    State(state): State<AppState>,
    Path(number): Path<i64>,
) -> Result<Json<DeletePolicyResponse>, ApiError> {
    let deletion = state.policies.delete_policy(policy_number(number)?).await?;
    Ok(Json(deletion.into()))
}

/// Calculates a premium for a stored policy at a market value
pub async fn calculate_quote(
    State(state): State<AppState>,
    body: Result<Json<QuoteRequest>, JsonRejection>,
) -> Result<Json<QuoteResponse>, ApiError> {
    let Json(request) = body?;
    request.validate()?;

    let quote = state
        .policies
        .calculate_premium(policy_number(request.policy_number)?, request.market_value)
        .await
        .map_err(ApiError::from_quote)?;
    Ok(Json(quote.into()))
}
