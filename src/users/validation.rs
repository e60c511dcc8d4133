//! Registration body validation
//!
//! Rules run in order and the first failure wins:
//! presence, string type, no surrounding whitespace on the credentials,
//! minimum lengths (all fields), maximum lengths (all fields).

use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

pub const REQUIRED_FIELDS: [&str; 4] = ["username", "password", "firstName", "lastName"];
const TRIMMED_FIELDS: [&str; 2] = ["username", "password"];

/// (field, min, max) measured in UTF-16 code units on the trimmed value
const SIZED_FIELDS: [(&str, Option<usize>, Option<usize>); 2] =
    [("username", Some(1), None), ("password", Some(7), Some(72))];

/// 422 body shared by every registration failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ValidationError {
    #[schema(example = 422)]
    pub code: u16,
    #[schema(example = "ValidationError")]
    pub reason: &'static str,
    #[schema(example = "Missing Field")]
    pub message: String,
    #[schema(example = "username")]
    pub location: &'static str,
}

impl ValidationError {
    pub fn new(message: impl Into<String>, location: &'static str) -> Self {
        Self {
            code: 422,
            reason: "ValidationError",
            message: message.into(),
            location,
        }
    }
}

/// Validated registration fields, names already trimmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

pub fn validate_registration(body: &Value) -> Result<Registration, ValidationError> {
    let obj = body.as_object();
    let field = |name: &str| obj.and_then(|o| o.get(name));

    if let Some(missing) = REQUIRED_FIELDS.into_iter().find(|f| field(*f).is_none()) {
        return Err(ValidationError::new("Missing Field", missing));
    }

    if let Some(bad) = REQUIRED_FIELDS
        .into_iter()
        .find(|f| !field(*f).is_some_and(Value::is_string))
    {
        return Err(ValidationError::new(
            "Incorrect field type: expected string",
            bad,
        ));
    }

    let text = |name: &str| field(name).and_then(Value::as_str).unwrap_or_default();

    if let Some(untrimmed) = TRIMMED_FIELDS
        .into_iter()
        .find(|f| text(*f).trim() != text(*f))
    {
        return Err(ValidationError::new(
            "Cannot start or end with whitespace",
            untrimmed,
        ));
    }

    let len = |name: &str| text(name).trim().encode_utf16().count();
    let too_small = SIZED_FIELDS
        .into_iter()
        .find_map(|(f, min, _)| min.filter(|m| len(f) < *m).map(|m| (f, m)));
    if let Some((f, min)) = too_small {
        return Err(ValidationError::new(
            format!("Must be at least {min} characters long"),
            f,
        ));
    }
    let too_large = SIZED_FIELDS
        .into_iter()
        .find_map(|(f, _, max)| max.filter(|m| len(f) > *m).map(|m| (f, m)));
    if let Some((f, max)) = too_large {
        return Err(ValidationError::new(
            format!("Must be at most {max} characters long"),
            f,
        ));
    }

    Ok(Registration {
        username: text("username").to_string(),
        password: text("password").to_string(),
        first_name: text("firstName").trim().to_string(),
        last_name: text("lastName").trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body() -> Value {
        json!({
            "username": "exampleUser",
            "password": "examplePassword",
            "firstName": " Derek ",
            "lastName": "Jeter"
        })
    }

    fn failure(body: Value) -> (String, &'static str) {
        let err = validate_registration(&body).unwrap_err();
        assert_eq!(err.code, 422);
        assert_eq!(err.reason, "ValidationError");
        (err.message, err.location)
    }

    #[test]
    fn test_valid_registration_trims_names() {
        let reg = validate_registration(&body()).unwrap();
        assert_eq!(reg.username, "exampleUser");
        assert_eq!(reg.first_name, "Derek");
        assert_eq!(reg.last_name, "Jeter");
    }

    #[test]
    fn test_missing_field_reports_first_in_order() {
        for field in REQUIRED_FIELDS {
            let mut b = body();
            b.as_object_mut().unwrap().remove(field);
            assert_eq!(failure(b), ("Missing Field".to_string(), field));
        }

        let (msg, loc) = failure(json!({"lastName": "Jeter"}));
        assert_eq!((msg.as_str(), loc), ("Missing Field", "username"));
    }

    #[test]
    fn test_non_string_field() {
        let mut b = body();
        b["firstName"] = json!(42);
        assert_eq!(
            failure(b),
            ("Incorrect field type: expected string".to_string(), "firstName")
        );
    }

    #[test]
    fn test_untrimmed_credentials() {
        let mut b = body();
        b["password"] = json!(" examplePassword");
        assert_eq!(
            failure(b),
            ("Cannot start or end with whitespace".to_string(), "password")
        );
    }

    #[test]
    fn test_password_too_short() {
        let mut b = body();
        b["password"] = json!("123456");
        assert_eq!(
            failure(b),
            ("Must be at least 7 characters long".to_string(), "password")
        );
    }

    #[test]
    fn test_password_too_long() {
        let mut b = body();
        b["password"] = json!("x".repeat(73));
        assert_eq!(
            failure(b),
            ("Must be at most 72 characters long".to_string(), "password")
        );
    }

    #[test]
    fn test_too_small_wins_over_too_large() {
        let mut b = body();
        b["username"] = json!("");
        b["password"] = json!("x".repeat(80));
        assert_eq!(
            failure(b),
            ("Must be at least 1 characters long".to_string(), "username")
        );
    }

    #[test]
    fn test_length_counts_utf16_units() {
        // Each emoji is two UTF-16 units
        let mut b = body();
        b["password"] = json!("😀😀😀😀");
        assert!(validate_registration(&b).is_ok());

        b["password"] = json!("😀😀😀");
        assert_eq!(
            failure(b),
            ("Must be at least 7 characters long".to_string(), "password")
        );

        let mut b = body();
        b["password"] = json!("😀".repeat(37));
        assert_eq!(
            failure(b),
            ("Must be at most 72 characters long".to_string(), "password")
        );
    }
}
