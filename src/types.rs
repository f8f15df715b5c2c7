use crate::utils::try_respond;
use diesel::r2d2::PoolError;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use log::{debug, error, warn};
use rocket::http::Status;
use rocket::request::Request;
use rocket::response::{self, Responder};
use rocket::serde::json::{json, Json};
use std::borrow::Cow;

pub const BAD_REQUEST: &str = "Bad request";
pub const NOT_FOUND: &str = "Not found";
pub const USER_OR_ARTICLE_NOT_FOUND: &str = "User or article not found";
pub const INTERNAL_ERROR: &str = "Internal server error";
pub const UNAVAILABLE: &str = "Service unavailable";

pub trait Validate
where
    Self: Sized,
{
    type Error;
    fn validate(self) -> Result<Self, Self::Error>;
}

#[derive(Debug)]
pub enum ApiError {
    Diesel(DieselError),
    BadRequest(String),
    NotFound(String),
    Unavailable,
    Internal,
}

impl ApiError {
    pub fn bad_request<M: Into<String>>(msg: M) -> Self {
        ApiError::BadRequest(msg.into())
    }

    pub fn not_found<M: Into<String>>(msg: M) -> Self {
        ApiError::NotFound(msg.into())
    }

    /// Status and `msg` body this error is rendered with.
    pub fn status_and_message(&self) -> (Status, Cow<'_, str>) {
        match self {
            ApiError::BadRequest(msg) => (Status::BadRequest, Cow::Borrowed(msg.as_str())),
            ApiError::NotFound(msg) => (Status::NotFound, Cow::Borrowed(msg.as_str())),
            ApiError::Diesel(error) => match error {
                DieselError::NotFound => (Status::NotFound, Cow::Borrowed(NOT_FOUND)),
                DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                    (Status::NotFound, Cow::Borrowed(USER_OR_ARTICLE_NOT_FOUND))
                }
                // Postgres reports arithmetic overflow as "integer out of range".
                DieselError::DatabaseError(DatabaseErrorKind::Unknown, info)
                    if info.message().contains("out of range") =>
                {
                    (Status::BadRequest, Cow::Borrowed(BAD_REQUEST))
                }
                _ => (Status::InternalServerError, Cow::Borrowed(INTERNAL_ERROR)),
            },
            ApiError::Unavailable => (Status::ServiceUnavailable, Cow::Borrowed(UNAVAILABLE)),
            ApiError::Internal => (Status::InternalServerError, Cow::Borrowed(INTERNAL_ERROR)),
        }
    }
}

impl From<DieselError> for ApiError {
    fn from(err: DieselError) -> ApiError {
        ApiError::Diesel(err)
    }
}

impl From<PoolError> for ApiError {
    fn from(err: PoolError) -> ApiError {
        warn!("could not check out a database connection: {}", err);
        ApiError::Unavailable
    }
}

pub type ApiResult<T> = Result<Json<T>, ApiError>;

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        let (status, msg) = self.status_and_message();
        if status.code >= 500 {
            error!("{} {} failed: {:?}", req.method(), req.uri(), self);
        } else {
            debug!("{} {} rejected: {}", req.method(), req.uri(), msg);
        }
        try_respond(req, &json!({ "msg": msg }), status)
    }
}

impl<T> Validate for Json<T>
where
    T: Validate,
{
    type Error = <T as Validate>::Error;
    fn validate(self) -> Result<Self, Self::Error> {
        let inner = self.into_inner();
        let validated = inner.validate()?;
        Ok(Json(validated))
    }
}
