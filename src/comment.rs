use crate::db::schema::comments;
use crate::db::DbConnection;
use crate::types::{ApiError, ApiResult, Validate};
use crate::utils::{json_body, parse_id, serialize_date};
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::{delete as diesel_delete, insert_into};
use log::info;
use rocket::http::{ContentType, Status};
use rocket::response::status;
use rocket::serde::json::{self, Json};

pub const EMPTY_BODY: &str = "Comment body empty";

#[derive(Debug, Queryable, Selectable, Serialize, PartialEq)]
#[diesel(table_name = comments)]
pub struct Comment {
    pub comment_id: i32,
    pub article_id: Option<i32>,
    pub body: Option<String>,
    pub votes: Option<i32>,
    pub author: Option<String>,
    #[serde(serialize_with = "serialize_date")]
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = comments)]
pub struct NewComment {
    article_id: i32,
    author: String,
    body: String,
}

/// Request body of `POST /api/articles/<id>/comments`.
#[derive(Debug, Deserialize)]
pub struct CommentDetails {
    #[serde(default)]
    username: String,
    #[serde(default)]
    body: String,
}

impl Validate for CommentDetails {
    type Error = ApiError;
    fn validate(self) -> Result<Self, ApiError> {
        if self.body.trim().is_empty() {
            return Err(ApiError::bad_request(EMPTY_BODY));
        }
        Ok(self)
    }
}

impl CommentDetails {
    fn for_article(self, article_id: i32) -> NewComment {
        NewComment {
            article_id,
            author: self.username,
            body: self.body,
        }
    }
}

impl Comment {
    /// Newest first. An article without comments is indistinguishable from
    /// a missing article here; both are not found.
    pub fn load_for_article(
        id: i32,
        connection: &mut PgConnection,
    ) -> Result<Vec<Comment>, ApiError> {
        use crate::db::schema::comments::dsl::*;
        let found = comments
            .filter(article_id.eq(id))
            .order(created_at.desc())
            .select(Comment::as_select())
            .load::<Comment>(connection)?;
        if found.is_empty() {
            return Err(ApiError::not_found(format!(
                "No comments found for article with id {}",
                id
            )));
        }
        Ok(found)
    }

    /// Unknown authors or articles surface as foreign key violations.
    pub fn create(
        new_comment: NewComment,
        connection: &mut PgConnection,
    ) -> Result<Comment, ApiError> {
        insert_into(comments::table)
            .values(&new_comment)
            .returning(Comment::as_returning())
            .get_result::<Comment>(connection)
            .map_err(|e| e.into())
    }

    pub fn delete_by_id(id: i32, connection: &mut PgConnection) -> Result<(), ApiError> {
        let deleted = diesel_delete(comments::table.find(id)).execute(connection)?;
        if deleted == 0 {
            return Err(ApiError::not_found(format!(
                "No comment found under comment id: {}",
                id
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentsResponse {
    article_comments: Vec<Comment>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    article_comment: Comment,
}

#[get("/articles/<article_id>/comments")]
pub async fn list(
    connection: DbConnection,
    article_id: Result<i32, &str>,
) -> ApiResult<CommentsResponse> {
    let id = parse_id(article_id)?;
    let article_comments = connection
        .run(move |conn| Comment::load_for_article(id, conn))
        .await?;
    Ok(Json(CommentsResponse { article_comments }))
}

#[post("/articles/<article_id>/comments", data = "<details>")]
pub async fn add(
    connection: DbConnection,
    article_id: Result<i32, &str>,
    content_type: Option<&ContentType>,
    details: Result<Json<CommentDetails>, json::Error<'_>>,
) -> Result<status::Custom<Json<CommentResponse>>, ApiError> {
    let id = parse_id(article_id)?;
    let details = json_body(content_type, details)?
        .validate()?
        .into_inner();
    let new_comment = details.for_article(id);
    let article_comment = connection
        .run(move |conn| Comment::create(new_comment, conn))
        .await?;
    info!(
        "comment {} added to article {}",
        article_comment.comment_id, id
    );
    Ok(status::Custom(
        Status::Created,
        Json(CommentResponse { article_comment }),
    ))
}

#[delete("/comments/<comment_id>")]
pub async fn delete(
    connection: DbConnection,
    comment_id: Result<i32, &str>,
) -> Result<status::NoContent, ApiError> {
    let id = parse_id(comment_id)?;
    connection
        .run(move |conn| Comment::delete_by_id(id, conn))
        .await?;
    info!("comment {} deleted", id);
    Ok(status::NoContent)
}
