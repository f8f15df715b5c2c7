use crate::types::{ApiError, BAD_REQUEST};
use chrono::{NaiveDateTime, SecondsFormat};
use log::debug;
use rocket::http::{ContentType, Status};
use rocket::request::Request;
use rocket::response::{self, Responder, Response};
use rocket::serde::json::{self, Json, Value};
use serde::Serializer;

pub fn try_respond(req: &Request<'_>, json: &Value, status: Status) -> response::Result<'static> {
    let resp = Json(json.clone()).respond_to(req)?;
    Response::build_from(resp).status(status).ok()
}

/// Numeric path ids arrive as `Result<i32, &str>`; anything unparseable is a
/// bad request rather than a routing miss.
pub fn parse_id(id: Result<i32, &str>) -> Result<i32, ApiError> {
    id.map_err(|_| ApiError::bad_request(BAD_REQUEST))
}

/// Accepts a body only when it is declared as JSON and parses into `T`.
pub fn json_body<T>(
    content_type: Option<&ContentType>,
    body: Result<Json<T>, json::Error<'_>>,
) -> Result<Json<T>, ApiError> {
    if !content_type.map_or(false, |c| c.is_json()) {
        debug!("body rejected: content type {:?}", content_type);
        return Err(ApiError::bad_request(BAD_REQUEST));
    }
    body.map_err(|e| {
        debug!("body rejected: {}", e);
        ApiError::bad_request(BAD_REQUEST)
    })
}

/// Timestamps are stored without a zone and are always UTC.
pub fn format_date(date: &NaiveDateTime) -> String {
    date.and_utc().to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn serialize_date<S>(date: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match date {
        Some(date) => serializer.serialize_str(&format_date(date)),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[derive(Debug)]
    struct Body {
        n: i32,
    }

    #[test]
    fn only_json_bodies_are_accepted() {
        let parsed = json_body(Some(&ContentType::JSON), Ok(Json(Body { n: 1 }))).unwrap();
        assert_eq!(parsed.n, 1);

        for content_type in &[None, Some(&ContentType::Plain), Some(&ContentType::Form)] {
            let err = json_body(*content_type, Ok(Json(Body { n: 1 }))).unwrap_err();
            assert_eq!(err.status_and_message().0, Status::BadRequest);
        }
    }

    #[test]
    fn dates_render_as_utc_millis() {
        let date = NaiveDate::from_ymd_opt(2020, 11, 24)
            .and_then(|d| d.and_hms_opt(0, 8, 0))
            .unwrap();
        assert_eq!(format_date(&date), "2020-11-24T00:08:00.000Z");
    }

    #[test]
    fn missing_dates_render_as_null() {
        #[derive(Serialize)]
        struct Row {
            #[serde(serialize_with = "serialize_date")]
            created_at: Option<NaiveDateTime>,
        }
        let row = Row { created_at: None };
        assert_eq!(
            ::serde_json::to_string(&row).unwrap(),
            r#"{"created_at":null}"#
        );
    }
}
