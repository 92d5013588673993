use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// A user record; exactly these four fields are accepted.
#[derive(ToSchema)]
pub struct UserDoc {
    pub first_name: String,
    pub last_name: String,
    pub userid: String,
    pub groups: Vec<String>,
}

#[derive(ToSchema)]
pub struct CreateGroupFormDoc { pub name: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::users::get_user,
        crate::routes::users::create_user,
        crate::routes::users::delete_user,
        crate::routes::users::replace_user,
        crate::routes::groups::get_group,
        crate::routes::groups::create_group,
        crate::routes::groups::delete_group,
        crate::routes::groups::replace_membership,
    ),
    components(
        schemas(
            HealthResponse,
            UserDoc,
            CreateGroupFormDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "users"),
        (name = "groups")
    )
)]
pub struct ApiDoc;
