use crate::db::DbConnection;
use crate::types::ApiResult;
use rocket::serde::json::Json;

pub mod models;

use self::models::User;

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    users: Vec<User>,
}

#[get("/users")]
pub async fn list(connection: DbConnection) -> ApiResult<UsersResponse> {
    let users = connection.run(User::load_all).await?;
    Ok(Json(UsersResponse { users }))
}
