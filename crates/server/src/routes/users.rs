use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use models::User;
use serde_json::Value;

use crate::errors::ApiError;
use crate::routes::AppState;

#[utoipa::path(
    get,
    path = "/users/{userid}",
    tag = "users",
    params(("userid" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User record", body = crate::openapi::UserDoc),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(userid): Path<String>,
) -> Result<Json<User>, ApiError> {
    let user = state.directory.get_user(&userid).await?;
    Ok(Json(user))
}

#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = crate::openapi::UserDoc,
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Bad Request"),
        (status = 404, description = "Unknown group"),
        (status = 409, description = "Conflict")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(body) = body?;
    state.directory.create_user(&body).await?;
    Ok(StatusCode::CREATED)
}

#[utoipa::path(
    delete,
    path = "/users/{userid}",
    tag = "users",
    params(("userid" = String, Path, description = "User identifier")),
    responses((status = 200, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(userid): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.directory.delete_user(&userid).await?;
    Ok(StatusCode::OK)
}

#[utoipa::path(
    put,
    path = "/users/{userid}",
    tag = "users",
    params(("userid" = String, Path, description = "User identifier")),
    request_body = crate::openapi::UserDoc,
    responses(
        (status = 202, description = "Accepted"),
        (status = 400, description = "Bad Request"),
        (status = 404, description = "Unknown user or group"),
        (status = 409, description = "Renamed onto an existing userid")
    )
)]
pub async fn replace_user(
    State(state): State<AppState>,
    Path(userid): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(body) = body?;
    state.directory.replace_user(&userid, &body).await?;
    Ok(StatusCode::ACCEPTED)
}
