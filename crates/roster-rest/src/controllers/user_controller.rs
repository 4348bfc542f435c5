//! `/users` resource: CRUD over the coordinated repository.

use crate::{
    dto::{CreateUserRequest, UpdateUserRequest, UserListResponse, UserResponse},
    extractors::{PaginationQuery, ValidatedJson},
    responses::{created, ok, ApiResponse, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use roster_core::{ListRequest, PageInfo, RosterError, UserId};
use tracing::debug;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

/// One page of users in identity order, with totals for the pager.
async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> ApiResult<UserListResponse> {
    let request = ListRequest::from(query);
    debug!(limit = request.limit, offset = request.offset, "listing users");

    let users = state.users.list_users(request).await?;
    let total = state.users.count_users().await?;

    ok(UserListResponse {
        users: users.into_iter().map(UserResponse::from).collect(),
        page_info: PageInfo::new(query.page(), request.limit, total),
    })
}

async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), AppError> {
    let user = state.users.create_user(body.into_fields()?).await?;
    Ok(created(user.into()))
}

async fn get_user(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<UserResponse> {
    let user = state.users.get_user(user_id(&raw_id)?).await?;
    ok(user.into())
}

/// Replaces the record; fields left out of the body keep their stored value.
/// The current record is read from the store, never the cache.
async fn update_user(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<UserResponse> {
    let id = user_id(&raw_id)?;
    let current = state.users.get_user_fresh(id).await?;
    let user = state
        .users
        .update_user(id, body.merge_into(&current)?)
        .await?;
    ok(user.into())
}

async fn delete_user(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.users.delete_user(user_id(&raw_id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn user_id(raw: &str) -> Result<UserId, RosterError> {
    raw.parse::<UserId>()
        .map_err(|_| RosterError::invalid_input(format!("'{}' is not a user id", raw)))
}
