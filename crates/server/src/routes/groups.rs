use axum::{
    extract::{rejection::{FormRejection, JsonRejection}, Path, State},
    http::StatusCode,
    Form, Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::errors::ApiError;
use crate::routes::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateGroupForm {
    pub name: Option<String>,
}

#[utoipa::path(
    get,
    path = "/groups/{name}",
    tag = "groups",
    params(("name" = String, Path, description = "Group name")),
    responses(
        (status = 200, description = "Userids of the members", body = Vec<String>),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_group(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<String>>, ApiError> {
    let members = state.directory.group_members(&name).await?;
    Ok(Json(members))
}

#[utoipa::path(
    post,
    path = "/groups",
    tag = "groups",
    request_body(content = crate::openapi::CreateGroupFormDoc, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Missing name"),
        (status = 409, description = "Conflict")
    )
)]
pub async fn create_group(
    State(state): State<AppState>,
    form: Result<Form<CreateGroupForm>, FormRejection>,
) -> Result<StatusCode, ApiError> {
    let Form(form) = form?;
    state.directory.create_group(form.name.as_deref()).await?;
    Ok(StatusCode::CREATED)
}

#[utoipa::path(
    delete,
    path = "/groups/{name}",
    tag = "groups",
    params(("name" = String, Path, description = "Group name")),
    responses((status = 200, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn delete_group(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.directory.delete_group(&name).await?;
    Ok(StatusCode::OK)
}

#[utoipa::path(
    put,
    path = "/groups/{name}",
    tag = "groups",
    params(("name" = String, Path, description = "Group name")),
    request_body = Vec<String>,
    responses(
        (status = 202, description = "Accepted"),
        (status = 400, description = "Not a list of userids, or none of them exist"),
        (status = 404, description = "Unknown group, or empty list")
    )
)]
pub async fn replace_membership(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    // A bad body is only reported once the group is known to exist.
    let body = body.ok().map(|Json(v)| v);
    state.directory.replace_membership(&name, body.as_ref()).await?;
    Ok(StatusCode::ACCEPTED)
}
