use crate::types::ApiError;
use diesel::pg::PgConnection;
use diesel::r2d2::{self, ConnectionManager};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness};
use dotenv::dotenv;
use log::{error, info};
use rocket::http::Status;
use rocket::outcome::Outcome;
use rocket::request::{self, FromRequest};
use rocket::tokio::task;
use rocket::{Request, State};
use std::env;

pub mod schema;
pub mod seed;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

const DEFAULT_POOL_SIZE: u32 = 10;

// An alias to the type for a pool of Diesel Postgres connections.
pub type Pool = r2d2::Pool<ConnectionManager<PgConnection>>;
pub type Connection = r2d2::PooledConnection<ConnectionManager<PgConnection>>;

error_chain! {
    foreign_links {
        Var(::std::env::VarError);
        PoolSize(::std::num::ParseIntError);
        R2D2(r2d2::PoolError);
        Diesel(::diesel::result::Error);
        Json(::serde_json::Error);
    }

    errors {
        Migration(reason: String) {
            description("migration failed")
            display("migration failed: {}", reason)
        }
        UnknownArticle(title: String) {
            description("comment fixture refers to an unknown article")
            display("no article titled '{}'", title)
        }
        InvalidTimestamp(millis: i64) {
            description("fixture timestamp out of range")
            display("timestamp out of range: {}", millis)
        }
    }
}

/// Handle on the managed pool. A connection is checked out only when
/// [`DbConnection::run`] is called, so handlers that reject their input
/// never touch the database.
pub struct DbConnection(Pool);

/// Retrieves the managed pool. If no pool is currently managed, fails with
/// an `InternalServerError` status.
#[rocket::async_trait]
impl<'r> FromRequest<'r> for DbConnection {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<DbConnection, ()> {
        match request.guard::<&State<Pool>>().await {
            Outcome::Success(pool) => Outcome::Success(DbConnection(pool.inner().clone())),
            _ => Outcome::Error((Status::InternalServerError, ())),
        }
    }
}

impl DbConnection {
    /// Runs `f` with one pooled connection on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> ::std::result::Result<T, ApiError>
    where
        F: FnOnce(&mut PgConnection) -> ::std::result::Result<T, ApiError> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.0.clone();
        task::spawn_blocking(move || {
            let mut connection = pool.get()?;
            f(&mut *connection)
        })
        .await
        .map_err(|e| {
            error!("database task failed: {}", e);
            ApiError::Internal
        })?
    }
}

pub fn database_url() -> Result<String> {
    dotenv().ok();
    Ok(env::var("DATABASE_URL")?)
}

fn pool_size() -> Result<u32> {
    match env::var("DATABASE_POOL_SIZE") {
        Ok(size) => Ok(size.trim().parse::<u32>()?),
        Err(env::VarError::NotPresent) => Ok(DEFAULT_POOL_SIZE),
        Err(e) => Err(e.into()),
    }
}

pub fn init_pool() -> Result<Pool> {
    let database_url = database_url()?;
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = Pool::builder().max_size(pool_size()?).build(manager)?;
    Ok(pool)
}

pub fn run_migrations(connection: &mut PgConnection) -> Result<()> {
    let applied = connection
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| ErrorKind::Migration(e.to_string()))?;
    for version in applied {
        info!("applied migration {}", version);
    }
    Ok(())
}

pub fn connect_and_migrate() -> Result<Pool> {
    let pool = init_pool()?;
    let mut connection = pool.get()?;
    run_migrations(&mut connection)?;
    Ok(pool)
}
