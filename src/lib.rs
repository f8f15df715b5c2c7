#[macro_use]
extern crate rocket;
#[macro_use]
extern crate diesel;
#[macro_use]
extern crate diesel_migrations;
#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate serde_derive;

pub mod api;
pub mod article;
pub mod comment;
pub mod db;
pub mod topic;
pub mod types;
pub mod users;
pub mod utils;

use rocket::http::Status;
use rocket::request::Request;
use rocket::serde::json::{json, Value};
use rocket::{Build, Rocket};
use types::{BAD_REQUEST, INTERNAL_ERROR, NOT_FOUND, UNAVAILABLE};

#[catch(400)]
fn bad_request() -> Value {
    json!({ "msg": BAD_REQUEST })
}

#[catch(404)]
fn not_found() -> Value {
    json!({ "msg": NOT_FOUND })
}

#[catch(500)]
fn internal_error() -> Value {
    json!({ "msg": INTERNAL_ERROR })
}

#[catch(503)]
fn unavailable() -> Value {
    json!({ "msg": UNAVAILABLE })
}

#[catch(default)]
fn fallback(status: Status, _req: &Request<'_>) -> Value {
    json!({ "msg": status.reason().unwrap_or(INTERNAL_ERROR) })
}

/// Builds the application around an existing pool.
pub fn rocket(pool: db::Pool) -> Rocket<Build> {
    rocket::build()
        .manage(pool)
        .mount("/api", routes![api::endpoints, topic::list, users::list])
        .mount(
            "/api/articles",
            routes![article::list, article::by_id, article::update_votes],
        )
        .mount("/api", routes![comment::list, comment::add, comment::delete])
        .register(
            "/",
            catchers![
                bad_request,
                not_found,
                internal_error,
                unavailable,
                fallback
            ],
        )
}
