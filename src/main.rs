#[macro_use]
extern crate rocket;

use news::db;

#[launch]
fn rocket() -> _ {
    let pool = db::connect_and_migrate().expect("Failed to create database pool");
    news::rocket(pool)
}
