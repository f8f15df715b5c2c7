//! Requests that are rejected before any query runs. The pool points at an
//! address nothing listens on and is never checked out from.

use diesel::pg::PgConnection;
use diesel::r2d2::ConnectionManager;
use news::db::Pool;
use rocket::http::{ContentType, Status};
use rocket::local::blocking::{Client, LocalResponse};
use rocket::serde::json::Value;

fn client() -> Client {
    let manager = ConnectionManager::<PgConnection>::new("postgres://127.0.0.1:1/unreachable");
    let pool = Pool::builder().min_idle(Some(0)).build_unchecked(manager);
    Client::tracked(news::rocket(pool)).expect("valid rocket instance")
}

fn assert_msg(response: LocalResponse, status: Status, msg: &str) {
    assert_eq!(response.status(), status);
    assert_eq!(response.content_type(), Some(ContentType::JSON));
    let body = response.into_json::<Value>().expect("json body");
    assert_eq!(body["msg"], msg);
}

#[test]
fn serves_endpoint_document() {
    let client = client();
    let response = client.get("/api").dispatch();
    assert_eq!(response.status(), Status::Ok);
    let body = response.into_json::<Value>().unwrap();
    let expected: Value = serde_json::from_str(include_str!("../endpoints.json")).unwrap();
    assert_eq!(body["endpoints"], expected);
}

#[test]
fn unknown_paths_are_not_found() {
    let client = client();
    for path in &["/api/topicazo", "/nope", "/api/articles/1/likes"] {
        let response = client.get(*path).dispatch();
        assert_msg(response, Status::NotFound, "Not found");
    }
    let response = client.put("/api/topics").dispatch();
    assert_msg(response, Status::NotFound, "Not found");
    let response = client.delete("/api/articles/1").dispatch();
    assert_msg(response, Status::NotFound, "Not found");
}

#[test]
fn non_numeric_ids_are_bad_requests() {
    let client = client();
    for path in &[
        "/api/articles/mountain",
        "/api/articles/cat/comments",
        "/api/articles/1.5",
        "/api/articles/99999999999",
    ] {
        let response = client.get(*path).dispatch();
        assert_msg(response, Status::BadRequest, "Bad request");
    }

    let response = client.delete("/api/comments/abc").dispatch();
    assert_msg(response, Status::BadRequest, "Bad request");

    let response = client
        .patch("/api/articles/banana")
        .header(ContentType::JSON)
        .body(r#"{"inc_votes":1}"#)
        .dispatch();
    assert_msg(response, Status::BadRequest, "Bad request");

    let response = client
        .post("/api/articles/banana/comments")
        .header(ContentType::JSON)
        .body(r#"{"username":"butter_bridge","body":"hi"}"#)
        .dispatch();
    assert_msg(response, Status::BadRequest, "Bad request");
}

#[test]
fn invalid_sorting_is_rejected() {
    let client = client();
    for query in &[
        "sort_by=bananas",
        "sort_by=",
        "sort_by=body",
        "order=sideways",
        "order=",
        "sort_by=votes&order=up",
    ] {
        let response = client.get(format!("/api/articles?{}", query)).dispatch();
        assert_msg(response, Status::BadRequest, "Invalid sorting field");
    }
}

#[test]
fn empty_comment_bodies_are_rejected() {
    let client = client();
    for body in &[
        r#"{"username":"butter_bridge","body":""}"#,
        r#"{"username":"butter_bridge","body":"   "}"#,
        r#"{"username":"butter_bridge"}"#,
    ] {
        let response = client
            .post("/api/articles/1/comments")
            .header(ContentType::JSON)
            .body(*body)
            .dispatch();
        assert_msg(response, Status::BadRequest, "Comment body empty");
    }
}

#[test]
fn malformed_bodies_are_bad_requests() {
    let client = client();
    let response = client
        .post("/api/articles/1/comments")
        .header(ContentType::JSON)
        .body("{not json")
        .dispatch();
    assert_msg(response, Status::BadRequest, "Bad request");

    for body in &[
        r#"{"inc_votes":"banana"}"#,
        r#"{"inc_votes":1.5}"#,
        r#"{"inc_votes":null}"#,
        r#"{"votes":1}"#,
        r#"{"inc_votes":99999999999}"#,
        "",
    ] {
        let response = client
            .patch("/api/articles/1")
            .header(ContentType::JSON)
            .body(*body)
            .dispatch();
        assert_msg(response, Status::BadRequest, "Bad request");
    }
}

#[test]
fn bodies_must_be_declared_json() {
    let client = client();
    let response = client
        .post("/api/articles/1/comments")
        .header(ContentType::Plain)
        .body(r#"{"username":"butter_bridge","body":"hi"}"#)
        .dispatch();
    assert_msg(response, Status::BadRequest, "Bad request");

    let response = client
        .patch("/api/articles/1")
        .body(r#"{"inc_votes":1}"#)
        .dispatch();
    assert_msg(response, Status::BadRequest, "Bad request");
}
