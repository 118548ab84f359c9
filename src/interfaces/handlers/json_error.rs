use actix_multipart::MultipartError;
use actix_web::{http::StatusCode, HttpRequest, HttpResponse};

pub fn json_error(status: StatusCode, error: &str, details: &str) -> HttpResponse {
    HttpResponse::build(status).json(serde_json::json!({
        "error": error,
        "details": details
    }))
}

/// Malformed or oversized multipart bodies get the same JSON shape as other
/// client errors.
pub fn multipart_error(err: MultipartError, _req: &HttpRequest) -> actix_web::Error {
    let details = err.to_string();
    tracing::warn!("Rejected multipart form: {}", details);
    actix_web::error::InternalError::from_response(
        err,
        json_error(StatusCode::BAD_REQUEST, "Invalid form data", &details),
    )
    .into()
}
