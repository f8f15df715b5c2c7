use crate::db::schema::articles;
use crate::db::DbConnection;
use crate::types::{ApiError, ApiResult};
use crate::utils::{json_body, parse_id, serialize_date};
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{BigInt, Integer, Nullable, Text};
use log::info;
use rocket::http::ContentType;
use rocket::serde::json::{self, Json};
use std::fmt;
use std::str::FromStr;

pub const INVALID_SORT: &str = "Invalid sorting field";
pub const NO_MATCHING_ARTICLES: &str = "No articles found for those filters";

static SELECT_ARTICLE_WITH_COUNT: &str = "select articles.article_id,
       articles.title,
       articles.topic,
       articles.author,
       articles.body,
       articles.created_at,
       articles.votes,
       articles.article_img_url,
       count(comments.comment_id) as comment_count
  from articles left join comments on comments.article_id = articles.article_id
 where articles.article_id = $1
 group by articles.article_id";

// Ordering is spliced in from `SortBy`/`Order`, never from raw input.
static SELECT_ARTICLE_SUMMARIES: &str = "select articles.author,
       articles.title,
       articles.article_id,
       articles.topic,
       articles.created_at,
       articles.votes,
       articles.article_img_url,
       count(comments.comment_id) as comment_count
  from articles left join comments on comments.article_id = articles.article_id
 where $1::varchar is null or articles.topic = $1
 group by articles.article_id";

/// A full `articles` row.
#[derive(Debug, Queryable, Selectable, Serialize, PartialEq)]
#[diesel(table_name = articles)]
pub struct Article {
    pub article_id: i32,
    pub title: Option<String>,
    pub topic: Option<String>,
    pub author: Option<String>,
    pub body: Option<String>,
    #[serde(serialize_with = "serialize_date")]
    pub created_at: Option<NaiveDateTime>,
    pub votes: Option<i32>,
    pub article_img_url: Option<String>,
}

#[derive(Debug, QueryableByName, Serialize)]
#[diesel(table_name = articles)]
pub struct ArticleWithCount {
    pub article_id: i32,
    pub title: Option<String>,
    pub topic: Option<String>,
    pub author: Option<String>,
    pub body: Option<String>,
    #[serde(serialize_with = "serialize_date")]
    pub created_at: Option<NaiveDateTime>,
    pub votes: Option<i32>,
    pub article_img_url: Option<String>,
    #[diesel(sql_type = BigInt)]
    pub comment_count: i64,
}

/// Listing row; carries no `body`.
#[derive(Debug, QueryableByName, Serialize)]
#[diesel(table_name = articles)]
pub struct ArticleSummary {
    pub author: Option<String>,
    pub title: Option<String>,
    pub article_id: i32,
    pub topic: Option<String>,
    #[serde(serialize_with = "serialize_date")]
    pub created_at: Option<NaiveDateTime>,
    pub votes: Option<i32>,
    pub article_img_url: Option<String>,
    #[diesel(sql_type = BigInt)]
    pub comment_count: i64,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    Author,
    Title,
    ArticleId,
    Topic,
    #[default]
    CreatedAt,
    Votes,
}

impl SortBy {
    fn column(self) -> &'static str {
        match self {
            SortBy::Author => "articles.author",
            SortBy::Title => "articles.title",
            SortBy::ArticleId => "articles.article_id",
            SortBy::Topic => "articles.topic",
            SortBy::CreatedAt => "articles.created_at",
            SortBy::Votes => "articles.votes",
        }
    }
}

impl FromStr for SortBy {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "author" => Ok(SortBy::Author),
            "title" => Ok(SortBy::Title),
            "article_id" => Ok(SortBy::ArticleId),
            "topic" => Ok(SortBy::Topic),
            "created_at" => Ok(SortBy::CreatedAt),
            "votes" => Ok(SortBy::Votes),
            _ => Err(ApiError::bad_request(INVALID_SORT)),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    #[default]
    Desc,
}

impl FromStr for Order {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(Order::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(Order::Desc)
        } else {
            Err(ApiError::bad_request(INVALID_SORT))
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Order::Asc => f.write_str("asc"),
            Order::Desc => f.write_str("desc"),
        }
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct ArticleFilter {
    pub sort_by: SortBy,
    pub order: Order,
    pub topic: Option<String>,
}

impl ArticleFilter {
    pub fn parse(
        sort_by: Option<&str>,
        order: Option<&str>,
        topic: Option<String>,
    ) -> Result<ArticleFilter, ApiError> {
        let sort_by = match sort_by {
            Some(s) => s.parse()?,
            None => SortBy::default(),
        };
        let order = match order {
            Some(o) => o.parse()?,
            None => Order::default(),
        };
        Ok(ArticleFilter {
            sort_by,
            order,
            topic,
        })
    }

    fn query(&self) -> String {
        format!(
            "{} order by {} {}",
            SELECT_ARTICLE_SUMMARIES,
            self.sort_by.column(),
            self.order
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct VoteUpdate {
    inc_votes: i32,
}

impl ArticleWithCount {
    pub fn load_by_id(
        id: i32,
        connection: &mut PgConnection,
    ) -> Result<ArticleWithCount, ApiError> {
        sql_query(SELECT_ARTICLE_WITH_COUNT)
            .bind::<Integer, _>(id)
            .get_result::<ArticleWithCount>(connection)
            .optional()?
            .ok_or_else(|| ApiError::not_found(format!("article_id {} not found", id)))
    }
}

impl ArticleSummary {
    pub fn load_filtered(
        filter: &ArticleFilter,
        connection: &mut PgConnection,
    ) -> Result<Vec<ArticleSummary>, ApiError> {
        let articles = sql_query(filter.query())
            .bind::<Nullable<Text>, _>(filter.topic.as_deref())
            .load::<ArticleSummary>(connection)?;
        if articles.is_empty() {
            return Err(ApiError::not_found(NO_MATCHING_ARTICLES));
        }
        Ok(articles)
    }
}

impl Article {
    pub fn add_votes(
        id: i32,
        increment: i32,
        connection: &mut PgConnection,
    ) -> Result<Article, ApiError> {
        use crate::db::schema::articles::dsl::*;
        diesel::update(articles.find(id))
            .set(votes.eq(votes + increment))
            .returning(Article::as_returning())
            .get_result::<Article>(connection)
            .optional()?
            .ok_or_else(|| ApiError::not_found(format!("article_id {} not found", id)))
    }
}

#[derive(Debug, Serialize)]
pub struct ArticlesResponse<T> {
    articles: Vec<T>,
}

#[derive(Debug, Serialize)]
pub struct ArticleResponse {
    article: Article,
}

#[get("/?<sort_by>&<order>&<topic>")]
pub async fn list(
    connection: DbConnection,
    sort_by: Option<&str>,
    order: Option<&str>,
    topic: Option<String>,
) -> ApiResult<ArticlesResponse<ArticleSummary>> {
    let filter = ArticleFilter::parse(sort_by, order, topic)?;
    let articles = connection
        .run(move |conn| ArticleSummary::load_filtered(&filter, conn))
        .await?;
    Ok(Json(ArticlesResponse { articles }))
}

#[get("/<article_id>")]
pub async fn by_id(
    connection: DbConnection,
    article_id: Result<i32, &str>,
) -> ApiResult<ArticlesResponse<ArticleWithCount>> {
    let id = parse_id(article_id)?;
    let article = connection
        .run(move |conn| ArticleWithCount::load_by_id(id, conn))
        .await?;
    Ok(Json(ArticlesResponse {
        articles: vec![article],
    }))
}

#[patch("/<article_id>", data = "<update>")]
pub async fn update_votes(
    connection: DbConnection,
    article_id: Result<i32, &str>,
    content_type: Option<&ContentType>,
    update: Result<Json<VoteUpdate>, json::Error<'_>>,
) -> ApiResult<ArticleResponse> {
    let id = parse_id(article_id)?;
    let update = json_body(content_type, update)?.into_inner();
    let article = connection
        .run(move |conn| Article::add_votes(id, update.inc_votes, conn))
        .await?;
    info!("article {} votes changed by {}", id, update.inc_votes);
    Ok(Json(ArticleResponse { article }))
}
