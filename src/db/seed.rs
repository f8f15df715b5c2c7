//! Bulk loading of fixture data. Administrative only: the HTTP surface never
//! calls into this module.

use super::schema::{articles, comments, topics, users};
use super::{ErrorKind, Result};
use crate::topic::Topic;
use crate::users::models::User;
use chrono::{DateTime, NaiveDateTime};
use diesel::prelude::*;
use diesel::{insert_into, sql_query};
use std::collections::HashMap;

static TEST_TOPICS: &str = include_str!("../../data/test/topics.json");
static TEST_USERS: &str = include_str!("../../data/test/users.json");
static TEST_ARTICLES: &str = include_str!("../../data/test/articles.json");
static TEST_COMMENTS: &str = include_str!("../../data/test/comments.json");

/// Article fixture; `created_at` is milliseconds since the epoch.
#[derive(Debug, Deserialize)]
pub struct ArticleData {
    pub title: String,
    pub topic: String,
    pub author: String,
    pub body: String,
    pub created_at: i64,
    #[serde(default)]
    pub votes: i32,
    pub article_img_url: String,
}

/// Comment fixture, attached to its article by title.
#[derive(Debug, Deserialize)]
pub struct CommentData {
    pub body: String,
    #[serde(default)]
    pub votes: i32,
    pub author: String,
    pub article_title: String,
    pub created_at: i64,
}

#[derive(Debug, Deserialize)]
pub struct SeedData {
    pub topics: Vec<Topic>,
    pub users: Vec<User>,
    pub articles: Vec<ArticleData>,
    pub comments: Vec<CommentData>,
}

#[derive(Debug, Default, PartialEq)]
pub struct SeedSummary {
    pub topics: usize,
    pub users: usize,
    pub articles: usize,
    pub comments: usize,
}

#[derive(Insertable)]
#[diesel(table_name = articles)]
struct ArticleRow<'a> {
    title: &'a str,
    topic: &'a str,
    author: &'a str,
    body: &'a str,
    created_at: NaiveDateTime,
    votes: i32,
    article_img_url: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = comments)]
struct CommentRow<'a> {
    article_id: i32,
    body: &'a str,
    votes: i32,
    author: &'a str,
    created_at: NaiveDateTime,
}

fn timestamp(millis: i64) -> Result<NaiveDateTime> {
    DateTime::from_timestamp_millis(millis)
        .map(|date| date.naive_utc())
        .ok_or_else(|| ErrorKind::InvalidTimestamp(millis).into())
}

impl SeedData {
    /// The fixture set the route tests are written against.
    pub fn test() -> Result<SeedData> {
        Ok(SeedData {
            topics: ::serde_json::from_str(TEST_TOPICS)?,
            users: ::serde_json::from_str(TEST_USERS)?,
            articles: ::serde_json::from_str(TEST_ARTICLES)?,
            comments: ::serde_json::from_str(TEST_COMMENTS)?,
        })
    }

    fn article_rows(&self) -> Result<Vec<ArticleRow>> {
        self.articles
            .iter()
            .map(|article| {
                Ok(ArticleRow {
                    title: &article.title,
                    topic: &article.topic,
                    author: &article.author,
                    body: &article.body,
                    created_at: timestamp(article.created_at)?,
                    votes: article.votes,
                    article_img_url: &article.article_img_url,
                })
            })
            .collect()
    }

    fn comment_rows(&self, article_ids: &HashMap<String, i32>) -> Result<Vec<CommentRow>> {
        self.comments
            .iter()
            .map(|comment| {
                let article_id = *article_ids
                    .get(&comment.article_title)
                    .ok_or_else(|| ErrorKind::UnknownArticle(comment.article_title.clone()))?;
                Ok(CommentRow {
                    article_id,
                    body: &comment.body,
                    votes: comment.votes,
                    author: &comment.author,
                    created_at: timestamp(comment.created_at)?,
                })
            })
            .collect()
    }
}

/// Replaces the contents of every table with `data` in one transaction and
/// restarts the id sequences, so ids follow fixture order.
pub fn seed(connection: &mut PgConnection, data: &SeedData) -> Result<SeedSummary> {
    let article_rows = data.article_rows()?;
    connection.transaction::<_, super::Error, _>(|conn| {
        sql_query("truncate comments, articles, users, topics restart identity").execute(conn)?;

        let mut summary = SeedSummary::default();
        summary.topics = insert_into(topics::table)
            .values(&data.topics)
            .execute(conn)?;
        summary.users = insert_into(users::table)
            .values(&data.users)
            .execute(conn)?;

        let inserted = insert_into(articles::table)
            .values(&article_rows)
            .returning((articles::title, articles::article_id))
            .get_results::<(Option<String>, i32)>(conn)?;
        summary.articles = inserted.len();
        let article_ids = inserted
            .into_iter()
            .filter_map(|(title, id)| title.map(|title| (title, id)))
            .collect::<HashMap<_, _>>();

        let comment_rows = data.comment_rows(&article_ids)?;
        summary.comments = insert_into(comments::table)
            .values(&comment_rows)
            .execute(conn)?;
        Ok(summary)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_test_data_parses() {
        let data = SeedData::test().unwrap();
        assert_eq!(data.topics.len(), 3);
        assert_eq!(data.users.len(), 4);
        assert_eq!(data.articles.len(), 13);
        assert_eq!(data.comments.len(), 18);
    }

    #[test]
    fn every_comment_names_a_known_article() {
        let data = SeedData::test().unwrap();
        let ids = data
            .articles
            .iter()
            .enumerate()
            .map(|(i, a)| (a.title.clone(), i as i32 + 1))
            .collect::<HashMap<_, _>>();
        let rows = data.comment_rows(&ids).unwrap();
        assert_eq!(rows.iter().filter(|c| c.article_id == 1).count(), 11);
        assert_eq!(rows.iter().filter(|c| c.article_id == 5).count(), 2);
    }

    #[test]
    fn unknown_article_titles_fail() {
        let data = SeedData::test().unwrap();
        let err = data.comment_rows(&HashMap::new()).err().unwrap();
        match err.kind() {
            ErrorKind::UnknownArticle(_) => {}
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn timestamps_are_utc() {
        let date = timestamp(1606176480000).unwrap();
        assert_eq!(crate::utils::format_date(&date), "2020-11-24T00:08:00.000Z");
    }
}
