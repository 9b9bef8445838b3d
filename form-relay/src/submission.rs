//! Contact form payload parsing and validation.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::error::RequestError;
use crate::gateway::FormRequest;

/// The only accepted request media type.
pub const EXPECTED_CONTENT_TYPE: &str = "application/json";

/// A validated form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub name: String,
    pub company_name: String,
    pub company_industry: String,
    pub email_address: String,
    pub phone_number: String,
    pub message: String,
}

/// Wire shape of the JSON body. Every field may be absent or null here;
/// required fields are enforced when converting into [`Submission`].
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSubmission {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    company_name: Option<String>,
    #[serde(default)]
    company_industry: Option<String>,
    #[serde(default)]
    email_address: Option<String>,
    #[serde(default)]
    phone_number: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl TryFrom<RawSubmission> for Submission {
    type Error = RequestError;

    fn try_from(raw: RawSubmission) -> Result<Self, Self::Error> {
        Ok(Submission {
            company_name: required(raw.company_name, "companyName")?,
            company_industry: required(raw.company_industry, "companyIndustry")?,
            email_address: required(raw.email_address, "emailAddress")?,
            phone_number: required(raw.phone_number, "phoneNumber")?,
            name: raw.name.unwrap_or_default(),
            message: raw.message.unwrap_or_default(),
        })
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, RequestError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(RequestError::MissingField(field))
}

impl Submission {
    /// Short stable identifier for log correlation that avoids logging PII.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(
            format!(
                "{}-{}-{}",
                self.company_name, self.email_address, self.phone_number
            )
            .as_bytes(),
        );
        let hash = hex::encode(hasher.finalize());
        hash[..12].to_string()
    }
}

/// Extract a [`Submission`] from the request body.
///
/// The content type must be `application/json`; parameters like `charset`
/// are ignored. Base64 bodies are decoded before JSON parsing.
pub fn parse_submission(request: &FormRequest) -> Result<Submission, RequestError> {
    let content_type = request.header("content-type");
    if !is_json_content_type(content_type) {
        return Err(RequestError::InvalidContentType(
            content_type.map(str::to_string),
        ));
    }

    if let Some(reason) = &request.body_error {
        return Err(RequestError::UnreadableBody(reason.clone()));
    }

    let body = request.body.as_deref().unwrap_or_default();

    let raw: RawSubmission = if request.is_base64_encoded {
        let decoded = BASE64.decode(body.trim_ascii())?;
        serde_json::from_slice(&decoded)?
    } else {
        serde_json::from_slice(body)?
    };

    Submission::try_from(raw)
}

fn is_json_content_type(value: Option<&str>) -> bool {
    value
        .and_then(|v| v.split(';').next())
        .map(|media_type| media_type.trim().eq_ignore_ascii_case(EXPECTED_CONTENT_TYPE))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_BODY: &str = r#"{"name":"A","companyName":"B","companyIndustry":"C","emailAddress":"d@e.com","phoneNumber":"123","message":"hi"}"#;

    fn json_request(body: &str) -> FormRequest {
        FormRequest::new("POST", "/submit")
            .with_header("content-type", "application/json")
            .with_body(body)
    }

    #[test]
    fn test_parse_plain_json() {
        let submission = parse_submission(&json_request(FULL_BODY)).unwrap();

        assert_eq!(submission.name, "A");
        assert_eq!(submission.company_name, "B");
        assert_eq!(submission.company_industry, "C");
        assert_eq!(submission.email_address, "d@e.com");
        assert_eq!(submission.phone_number, "123");
        assert_eq!(submission.message, "hi");
    }

    #[test]
    fn test_parse_base64_json() {
        let request = json_request(&BASE64.encode(FULL_BODY)).base64_encoded(true);
        let submission = parse_submission(&request).unwrap();

        assert_eq!(submission.company_name, "B");
        assert_eq!(submission.phone_number, "123");
    }

    #[test]
    fn test_optional_fields_default_empty() {
        let body = r#"{"companyName":"B","companyIndustry":"C","emailAddress":"d@e.com","phoneNumber":"123","message":null}"#;
        let submission = parse_submission(&json_request(body)).unwrap();

        assert_eq!(submission.name, "");
        assert_eq!(submission.message, "");
    }

    #[test]
    fn test_missing_required_field() {
        let body = r#"{"companyName":"B","companyIndustry":"C","emailAddress":"d@e.com"}"#;
        let err = parse_submission(&json_request(body)).unwrap_err();
        assert!(matches!(err, RequestError::MissingField("phoneNumber")));
    }

    #[test]
    fn test_blank_required_field() {
        let body = r#"{"companyName":"  ","companyIndustry":"C","emailAddress":"d@e.com","phoneNumber":"1"}"#;
        let err = parse_submission(&json_request(body)).unwrap_err();
        assert!(matches!(err, RequestError::MissingField("companyName")));
    }

    #[test]
    fn test_wrong_content_type() {
        let request = FormRequest::new("POST", "/submit")
            .with_header("content-type", "text/plain")
            .with_body(FULL_BODY);
        let err = parse_submission(&request).unwrap_err();
        assert!(matches!(err, RequestError::InvalidContentType(Some(ct)) if ct == "text/plain"));
    }

    #[test]
    fn test_missing_content_type() {
        let request = FormRequest::new("POST", "/submit").with_body(FULL_BODY);
        let err = parse_submission(&request).unwrap_err();
        assert!(matches!(err, RequestError::InvalidContentType(None)));
    }

    #[test]
    fn test_content_type_parameters_ignored() {
        let request = FormRequest::new("POST", "/submit")
            .with_header("Content-Type", "Application/JSON; charset=utf-8")
            .with_body(FULL_BODY);
        assert!(parse_submission(&request).is_ok());
    }

    #[test]
    fn test_invalid_base64() {
        let request = json_request("not base64!!").base64_encoded(true);
        let err = parse_submission(&request).unwrap_err();
        assert!(matches!(err, RequestError::InvalidEncoding(_)));
    }

    #[test]
    fn test_invalid_json() {
        let err = parse_submission(&json_request("{not json")).unwrap_err();
        assert!(matches!(err, RequestError::InvalidJson(_)));
    }

    #[test]
    fn test_missing_body() {
        let request = FormRequest::new("POST", "/submit").with_header("content-type", "application/json");
        let err = parse_submission(&request).unwrap_err();
        assert!(matches!(err, RequestError::InvalidJson(_)));
    }

    #[test]
    fn test_non_utf8_body_is_invalid_json() {
        let request = FormRequest::new("POST", "/submit")
            .with_header("content-type", "application/json")
            .with_body(vec![0xff, 0xfe, 0x00]);
        let err = parse_submission(&request).unwrap_err();
        assert!(matches!(err, RequestError::InvalidJson(_)));
    }

    #[test]
    fn test_unreadable_body() {
        let mut request = json_request(FULL_BODY);
        request.body_error = Some("length limit exceeded".to_string());
        let err = parse_submission(&request).unwrap_err();
        assert!(matches!(err, RequestError::UnreadableBody(reason) if reason == "length limit exceeded"));
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let a = parse_submission(&json_request(FULL_BODY)).unwrap();
        let b = parse_submission(&json_request(FULL_BODY)).unwrap();

        assert_eq!(a.fingerprint().len(), 12);
        assert_eq!(a.fingerprint(), b.fingerprint());
    }
}
