use rocket::serde::json::{Json, Value};

static ENDPOINTS_JSON: &str = include_str!("../endpoints.json");

lazy_static! {
    static ref ENDPOINTS: Value = serde_json::from_str(ENDPOINTS_JSON).unwrap();
}

#[derive(Debug, Serialize)]
pub struct EndpointsResponse {
    endpoints: &'static Value,
}

#[get("/")]
pub fn endpoints() -> Json<EndpointsResponse> {
    Json(EndpointsResponse {
        endpoints: &*ENDPOINTS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route() {
        let documented = ENDPOINTS.as_object().unwrap();
        for route in &[
            "GET /api",
            "GET /api/topics",
            "GET /api/articles",
            "GET /api/articles/:article_id",
            "PATCH /api/articles/:article_id",
            "GET /api/articles/:article_id/comments",
            "POST /api/articles/:article_id/comments",
            "DELETE /api/comments/:comment_id",
            "GET /api/users",
        ] {
            assert!(documented.contains_key(*route), "{} is undocumented", route);
        }
    }
}
