//! Response state and the outcome reducers.
//!
//! `ResponseState` is the single source of truth for what the response area
//! displays. Every transition rewrites the whole value: the in-flight state
//! and the three terminal states are each produced by a pure function from a
//! complete outcome, so success fields can never linger after an error and
//! vice versa.

// ── Placeholder and marker strings ──────────────────────────────

pub const WAITING_PLACEHOLDER: &str = "Awaiting submission";
pub const WAITING_STATUS: &str = "Awaiting submission...";
pub const PROCESSING_PLACEHOLDER: &str = "Processing...";
pub const AWAITING_RESPONSE_PLACEHOLDER: &str = "Awaiting response...";
pub const CONNECTING_STATUS: &str = "Connecting to the API...";

pub const FALLBACK_CLASSIFICATION: &str = "Unclassified";
pub const FALLBACK_SUBJECT: &str = "Subject not found";
pub const FALLBACK_AUTO_RESPONSE: &str = "Default automatic reply";

pub const API_ERROR_MARKER: &str = "API ERROR";
pub const CONNECTION_ERROR_MARKER: &str = "CONNECTION ERROR";
pub const CONNECTION_ERROR_SUBJECT: &str = "Check that the backend is running.";
pub const CONNECTION_ERROR_STATUS: &str =
    "Connection error. Check that the backend is up and reachable.";

/// Fixed label for pasted text in the success status line.
pub const PASTED_TEXT_LABEL: &str = "pasted email text";

/// Server-error bodies are truncated to this many characters for display.
pub const ERROR_BODY_LIMIT: usize = 300;
const TRUNCATION_MARKER: &str = "...";

/// What the response area currently displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseState {
    pub classification: String,
    pub email_subject: String,
    pub auto_response: String,
    pub status_message: String,
    /// True for the entire window between submission start and the terminal
    /// outcome. This is the sole re-entrancy guard.
    pub loading: bool,
}

impl Default for ResponseState {
    fn default() -> Self {
        Self::initial()
    }
}

/// The result of exactly one submission attempt, as reported by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Transport succeeded and the server reported success. All fields are
    /// optional on the wire; absent ones fall back to fixed defaults.
    Success {
        filename: Option<String>,
        classification: Option<String>,
        email_subject: Option<String>,
        auto_response: Option<String>,
    },
    /// Transport succeeded but the server reported a non-success status.
    ServerError {
        status: u16,
        status_text: String,
        body: String,
    },
    /// The request itself never completed.
    TransportError { detail: String },
}

/// What to call the processed content in the success status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    /// Uploaded file. The server-reported filename wins; the staged name is
    /// the fallback.
    Upload { staged_name: String },
    /// Pasted text is always reported under a fixed label.
    PastedText,
}

impl ResponseState {
    /// The waiting state shown before any submission.
    pub fn initial() -> Self {
        Self {
            classification: WAITING_PLACEHOLDER.to_string(),
            email_subject: WAITING_PLACEHOLDER.to_string(),
            auto_response: WAITING_PLACEHOLDER.to_string(),
            status_message: WAITING_STATUS.to_string(),
            loading: false,
        }
    }

    /// Reset the three content fields to their waiting placeholders.
    /// The status line and loading flag are left alone; this runs on mode
    /// switches and fresh selections, never mid-flight.
    pub fn reset_results(&mut self) {
        self.classification = WAITING_PLACEHOLDER.to_string();
        self.email_subject = WAITING_PLACEHOLDER.to_string();
        self.auto_response = WAITING_PLACEHOLDER.to_string();
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
    }

    /// The complete in-flight state. Written in one step at submission start
    /// so the UI never observes `loading` alongside stale terminal content.
    pub fn in_flight() -> Self {
        Self {
            classification: PROCESSING_PLACEHOLDER.to_string(),
            email_subject: AWAITING_RESPONSE_PLACEHOLDER.to_string(),
            auto_response: AWAITING_RESPONSE_PLACEHOLDER.to_string(),
            status_message: CONNECTING_STATUS.to_string(),
            loading: true,
        }
    }

    /// Reduce a terminal outcome to its complete display state. Exactly one
    /// of the three arms fires per submission, and each overwrites every
    /// field and clears `loading`.
    pub fn conclude(outcome: Outcome, artifact: &Artifact) -> Self {
        match outcome {
            Outcome::Success {
                filename,
                classification,
                email_subject,
                auto_response,
            } => {
                let label = match artifact {
                    Artifact::Upload { staged_name } => {
                        filename.unwrap_or_else(|| staged_name.clone())
                    }
                    Artifact::PastedText => PASTED_TEXT_LABEL.to_string(),
                };
                Self {
                    classification: classification
                        .unwrap_or_else(|| FALLBACK_CLASSIFICATION.to_string()),
                    email_subject: email_subject.unwrap_or_else(|| FALLBACK_SUBJECT.to_string()),
                    auto_response: auto_response
                        .unwrap_or_else(|| FALLBACK_AUTO_RESPONSE.to_string()),
                    status_message: format!("Success! Content \"{label}\" processed."),
                    loading: false,
                }
            }
            Outcome::ServerError {
                status,
                status_text,
                body,
            } => Self {
                classification: API_ERROR_MARKER.to_string(),
                email_subject: format!("Status: {status}"),
                auto_response: format!(
                    "{}{}",
                    truncate_chars(&body, ERROR_BODY_LIMIT),
                    TRUNCATION_MARKER
                ),
                status_message: format!("HTTP error ({status} - {status_text})."),
                loading: false,
            },
            Outcome::TransportError { detail } => Self {
                classification: CONNECTION_ERROR_MARKER.to_string(),
                email_subject: CONNECTION_ERROR_SUBJECT.to_string(),
                auto_response: format!("Error detail: {detail}"),
                status_message: CONNECTION_ERROR_STATUS.to_string(),
                loading: false,
            },
        }
    }
}

/// Truncate to at most `max` characters, respecting char boundaries.
fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_is_all_waiting_placeholders() {
        let state = ResponseState::initial();
        assert_eq!(state.classification, WAITING_PLACEHOLDER);
        assert_eq!(state.email_subject, WAITING_PLACEHOLDER);
        assert_eq!(state.auto_response, WAITING_PLACEHOLDER);
        assert_eq!(state.status_message, WAITING_STATUS);
        assert!(!state.loading);
    }

    #[test]
    fn reset_results_touches_content_fields_only() {
        let mut state = ResponseState::initial();
        state.classification = "Invoice".to_string();
        state.email_subject = "Invoice #123".to_string();
        state.auto_response = "Thanks".to_string();
        state.set_status("File report.pdf selected.");

        state.reset_results();
        assert_eq!(state.classification, WAITING_PLACEHOLDER);
        assert_eq!(state.email_subject, WAITING_PLACEHOLDER);
        assert_eq!(state.auto_response, WAITING_PLACEHOLDER);
        assert_eq!(state.status_message, "File report.pdf selected.");
    }

    #[test]
    fn in_flight_state_is_complete_and_loading() {
        let state = ResponseState::in_flight();
        assert!(state.loading);
        assert_eq!(state.classification, PROCESSING_PLACEHOLDER);
        assert_eq!(state.email_subject, AWAITING_RESPONSE_PLACEHOLDER);
        assert_eq!(state.auto_response, AWAITING_RESPONSE_PLACEHOLDER);
        assert_eq!(state.status_message, CONNECTING_STATUS);
    }

    #[test]
    fn success_reducer_uses_response_fields_and_names_the_file() {
        let outcome = Outcome::Success {
            filename: Some("report.pdf".to_string()),
            classification: Some("Invoice".to_string()),
            email_subject: Some("Invoice #123".to_string()),
            auto_response: Some("Thanks".to_string()),
        };
        let artifact = Artifact::Upload {
            staged_name: "report.pdf".to_string(),
        };

        let state = ResponseState::conclude(outcome, &artifact);
        assert_eq!(state.classification, "Invoice");
        assert_eq!(state.email_subject, "Invoice #123");
        assert_eq!(state.auto_response, "Thanks");
        assert!(state.status_message.contains("report.pdf"));
        assert!(!state.loading);
    }

    #[test]
    fn success_reducer_falls_back_for_missing_fields() {
        let outcome = Outcome::Success {
            filename: None,
            classification: None,
            email_subject: None,
            auto_response: None,
        };
        let artifact = Artifact::Upload {
            staged_name: "fallback.txt".to_string(),
        };

        let state = ResponseState::conclude(outcome, &artifact);
        assert_eq!(state.classification, FALLBACK_CLASSIFICATION);
        assert_eq!(state.email_subject, FALLBACK_SUBJECT);
        assert_eq!(state.auto_response, FALLBACK_AUTO_RESPONSE);
        assert!(state.status_message.contains("fallback.txt"));
    }

    #[test]
    fn success_reducer_labels_pasted_text_with_fixed_label() {
        let outcome = Outcome::Success {
            filename: Some("email_content.txt".to_string()),
            classification: Some("Productive".to_string()),
            email_subject: None,
            auto_response: None,
        };

        let state = ResponseState::conclude(outcome, &Artifact::PastedText);
        // The server-side filename is ignored for pasted text.
        assert!(state.status_message.contains(PASTED_TEXT_LABEL));
        assert!(!state.status_message.contains("email_content.txt"));
    }

    #[test]
    fn server_error_reducer_embeds_status_and_truncated_body() {
        let outcome = Outcome::ServerError {
            status: 500,
            status_text: "Internal Server Error".to_string(),
            body: "Internal error".to_string(),
        };
        let artifact = Artifact::Upload {
            staged_name: "report.pdf".to_string(),
        };

        let state = ResponseState::conclude(outcome, &artifact);
        assert_eq!(state.classification, API_ERROR_MARKER);
        assert_eq!(state.email_subject, "Status: 500");
        assert_eq!(state.auto_response, "Internal error...");
        assert!(state.status_message.contains("500"));
        assert!(state.status_message.contains("Internal Server Error"));
        assert!(!state.loading);
    }

    #[test]
    fn server_error_body_is_limited_to_300_chars() {
        let body = "x".repeat(1000);
        let outcome = Outcome::ServerError {
            status: 502,
            status_text: "Bad Gateway".to_string(),
            body,
        };

        let state = ResponseState::conclude(outcome, &Artifact::PastedText);
        assert_eq!(
            state.auto_response.len(),
            ERROR_BODY_LIMIT + TRUNCATION_MARKER.len()
        );
        assert!(state.auto_response.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn truncation_respects_multibyte_boundaries() {
        let s = "é".repeat(10);
        assert_eq!(truncate_chars(&s, 4), "éééé");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[test]
    fn transport_error_reducer_surfaces_the_underlying_message() {
        let outcome = Outcome::TransportError {
            detail: "dns error: failed to lookup address".to_string(),
        };

        let state = ResponseState::conclude(outcome, &Artifact::PastedText);
        assert_eq!(state.classification, CONNECTION_ERROR_MARKER);
        assert_eq!(state.email_subject, CONNECTION_ERROR_SUBJECT);
        assert!(state.auto_response.contains("dns error"));
        assert_eq!(state.status_message, CONNECTION_ERROR_STATUS);
        assert!(!state.loading);
    }

    #[test]
    fn every_reducer_overwrites_all_fields() {
        // Starting from a success state, an error outcome must leave no
        // success field behind.
        let success = ResponseState::conclude(
            Outcome::Success {
                filename: None,
                classification: Some("Invoice".to_string()),
                email_subject: Some("Subject".to_string()),
                auto_response: Some("Reply".to_string()),
            },
            &Artifact::PastedText,
        );
        let error = ResponseState::conclude(
            Outcome::ServerError {
                status: 404,
                status_text: "Not Found".to_string(),
                body: "missing".to_string(),
            },
            &Artifact::PastedText,
        );

        assert_ne!(success.classification, error.classification);
        assert_ne!(success.email_subject, error.email_subject);
        assert_ne!(success.auto_response, error.auto_response);
        assert_ne!(success.status_message, error.status_message);
    }
}
