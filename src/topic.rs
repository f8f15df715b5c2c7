use crate::db::schema::topics;
use crate::db::DbConnection;
use crate::types::{ApiError, ApiResult};
use diesel::prelude::*;
use rocket::serde::json::Json;

#[derive(Debug, Queryable, Selectable, Insertable, Serialize, Deserialize, PartialEq)]
#[diesel(table_name = topics)]
pub struct Topic {
    pub slug: String,
    pub description: Option<String>,
    pub img_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TopicsResponse {
    topics: Vec<Topic>,
}

impl Topic {
    pub fn load_all(connection: &mut PgConnection) -> Result<Vec<Topic>, ApiError> {
        topics::table
            .select(Topic::as_select())
            .load::<Topic>(connection)
            .map_err(|e| e.into())
    }
}

#[get("/topics")]
pub async fn list(connection: DbConnection) -> ApiResult<TopicsResponse> {
    let topics = connection.run(Topic::load_all).await?;
    Ok(Json(TopicsResponse { topics }))
}
