use chrono::NaiveDate;
use validator::ValidationError;

// ───── Shared Validation Helpers ────────────────────────────────────

pub fn new_validation_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

pub fn validate_url(url: &str) -> Result<(), ValidationError> {
    match url::Url::parse(url) {
        Ok(parsed) => {
            if parsed.scheme() == "http" || parsed.scheme() == "https" {
                Ok(())
            } else {
                Err(new_validation_error("invalid_url_scheme", "URL must start with http:// or https://"))
            }
        }
        Err(_) => Err(new_validation_error("invalid_url", "Invalid URL format")),
    }
}

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(new_validation_error("blank", "This field is required"));
    }
    Ok(())
}

pub fn validate_date_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), ValidationError> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => Err(new_validation_error(
            "invalid_date_range",
            "End date cannot be before the start date",
        )),
        _ => Ok(()),
    }
}

/// Form posts send empty strings for untouched optional inputs.
pub fn blank_to_none(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
