use serde::{Deserialize, Serialize};

pub const SUBMIT_SUCCESS: &str = "Attendance submitted successfully!";

/// Body of `POST /submit`. Every field is optional here so that missing
/// fields come back as validation errors instead of a body rejection.
#[derive(Debug, Default, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub institute: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub message: String,
}

impl SubmitResponse {
    pub fn success() -> Self {
        Self {
            message: SUBMIT_SUCCESS.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_deserialize_as_none() {
        let req: SubmitRequest = serde_json::from_str(r#"{"name":"Alice"}"#).unwrap();
        assert_eq!(req.name.as_deref(), Some("Alice"));
        assert!(req.phone.is_none());
        assert!(req.email.is_none());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let req: SubmitRequest =
            serde_json::from_str(r#"{"name":"Alice","nickname":"Al"}"#).unwrap();
        assert_eq!(req.name.as_deref(), Some("Alice"));
    }

    #[test]
    fn success_message_matches_client_expectation() {
        let json = serde_json::to_string(&SubmitResponse::success()).unwrap();
        assert_eq!(json, r#"{"message":"Attendance submitted successfully!"}"#);
    }
}
