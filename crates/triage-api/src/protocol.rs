//! Wire types for the classification endpoint.
//! These mirror the server's response model; every field is optional and
//! absence is handled by fixed display fallbacks downstream.

use serde::Deserialize;

use triage_core::response::Outcome;

#[derive(Debug, Clone, Deserialize)]
pub struct ClassifyResponse {
    pub filename: Option<String>,
    pub classification: Option<String>,
    pub email_subject: Option<String>,
    pub auto_response: Option<String>,
}

impl From<ClassifyResponse> for Outcome {
    fn from(resp: ClassifyResponse) -> Self {
        Outcome::Success {
            filename: resp.filename,
            classification: resp.classification,
            email_subject: resp.email_subject,
            auto_response: resp.auto_response,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_response_deserializes() {
        let resp: ClassifyResponse = serde_json::from_str(
            r#"{
                "filename": "report.pdf",
                "classification": "Invoice",
                "email_subject": "Invoice #123",
                "auto_response": "Thanks"
            }"#,
        )
        .expect("full body parses");
        assert_eq!(resp.filename.as_deref(), Some("report.pdf"));
        assert_eq!(resp.classification.as_deref(), Some("Invoice"));
        assert_eq!(resp.email_subject.as_deref(), Some("Invoice #123"));
        assert_eq!(resp.auto_response.as_deref(), Some("Thanks"));
    }

    #[test]
    fn missing_fields_deserialize_as_none() {
        let resp: ClassifyResponse =
            serde_json::from_str(r#"{"classification": "Productive"}"#).expect("partial body parses");
        assert_eq!(resp.classification.as_deref(), Some("Productive"));
        assert!(resp.filename.is_none());
        assert!(resp.email_subject.is_none());
        assert!(resp.auto_response.is_none());
    }

    #[test]
    fn partial_response_converts_to_success_outcome() {
        let resp: ClassifyResponse =
            serde_json::from_str(r#"{"email_subject": "Hello"}"#).expect("parses");
        let outcome: Outcome = resp.into();
        match outcome {
            Outcome::Success {
                email_subject,
                classification,
                ..
            } => {
                assert_eq!(email_subject.as_deref(), Some("Hello"));
                assert!(classification.is_none());
            }
            other => panic!("expected success outcome, got {other:?}"),
        }
    }
}
