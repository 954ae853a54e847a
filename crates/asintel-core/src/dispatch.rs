//! Command dispatch: turning user actions into session turns and
//! retrieval requests.
//!
//! The dispatcher owns the conversation session and the most recent
//! identifier batch. Every error in the taxonomy is recovered here and
//! surfaced as an agent turn in user-facing language; nothing
//! propagates as a fault. Retrieval itself is asynchronous: dispatch
//! returns a [`RetrievalRequest`] for the caller to run, and the
//! eventual outcome comes back through [`Dispatcher::complete_retrieval`].

use tracing::{debug, info};

use asintel_types::batch::Batch;
use asintel_types::chat::ChatTurn;
use asintel_types::retrieval::{
    Domain, ProviderError, RequestedField, RetrievalRequest, RetrievalResponse,
};

use crate::extract::{self, ExtractionInput};
use crate::session::ConversationSession;

/// Greeting seeded into every new session.
const GREETING: &str =
    "Hi! Upload a CSV of ASINs or paste them here, then tell me which product fields to look up.";

/// A user interaction handed to the dispatcher.
#[derive(Debug, Clone)]
pub enum Trigger {
    /// A file was selected; the caller has already read its contents.
    FileSelected { name: String, contents: String },
    /// A block of text was pasted.
    TextPasted { contents: String },
    /// The explicit "get info" action, using the configured default fields.
    ExplicitAction,
    /// A free-form chat utterance.
    ChatUtterance { text: String },
}

/// What a dispatch call decided.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// A new batch was extracted and stored.
    BatchReady { identifiers: usize, rejected: u32 },
    /// Extraction found nothing usable; the session was told.
    NoIdentifiers,
    /// A retrieval request is ready; the caller should run it and feed
    /// the result back via `complete_retrieval` with this generation.
    RetrievalStarted {
        request: RetrievalRequest,
        generation: u64,
    },
    /// The agent replied directly; nothing to run.
    Replied,
}

/// Interprets triggers against the session and batch state.
pub struct Dispatcher {
    session: ConversationSession,
    latest_batch: Option<Batch>,
    /// Generation of the most recently dispatched retrieval. Results
    /// arriving for older generations are appended flagged stale.
    generation: u64,
    default_fields: Vec<RequestedField>,
    domain: Domain,
}

impl Dispatcher {
    /// Create a dispatcher with a fresh, greeted session.
    pub fn new(default_fields: Vec<RequestedField>, domain: Domain) -> Self {
        Self {
            session: ConversationSession::new(GREETING),
            latest_batch: None,
            generation: 0,
            default_fields,
            domain,
        }
    }

    /// The conversation session (read-only projection for rendering).
    pub fn session(&self) -> &ConversationSession {
        &self.session
    }

    /// The most recent batch, if any.
    pub fn latest_batch(&self) -> Option<&Batch> {
        self.latest_batch.as_ref()
    }

    /// Handle one user interaction to completion.
    pub fn dispatch(&mut self, trigger: Trigger) -> DispatchOutcome {
        match trigger {
            Trigger::FileSelected { name, contents } => {
                self.ingest(ExtractionInput::FileContents(contents), Some(&name))
            }
            Trigger::TextPasted { contents } => {
                self.ingest(ExtractionInput::PastedText(contents), None)
            }
            Trigger::ExplicitAction => {
                self.session
                    .append_user_message("Get info for the current ASIN batch.")
                    .expect("canned utterance is non-empty");
                self.start_retrieval(self.default_fields.clone())
            }
            Trigger::ChatUtterance { text } => {
                if self.session.append_user_message(&text).is_err() {
                    self.session
                        .append_agent_message("I didn't catch that. Type a message, or /help for commands.");
                    return DispatchOutcome::Replied;
                }

                let fields = parse_requested_fields(&text);
                if fields.is_empty() {
                    self.session.append_agent_message(format!(
                        "Tell me which fields to retrieve. I know about: {}.",
                        field_menu()
                    ));
                    return DispatchOutcome::Replied;
                }
                self.start_retrieval(fields)
            }
        }
    }

    /// Deliver the outcome of a retrieval dispatched earlier.
    ///
    /// Results for a generation older than the latest dispatched one are
    /// appended flagged stale; session ordering is preserved and no
    /// result is ever discarded silently. Returns the appended turn.
    pub fn complete_retrieval(
        &mut self,
        generation: u64,
        outcome: Result<RetrievalResponse, ProviderError>,
    ) -> &ChatTurn {
        let stale = generation < self.generation;
        let text = match outcome {
            Ok(response) => summarize_response(&response),
            Err(err) => describe_provider_error(&err),
        };

        if stale {
            debug!(generation, latest = self.generation, "Appending stale retrieval result");
            self.session.append_stale_agent_message(text)
        } else {
            self.session.append_agent_message(text)
        }
    }

    fn ingest(&mut self, input: ExtractionInput, file_name: Option<&str>) -> DispatchOutcome {
        let origin = match file_name {
            Some(name) => format!("'{name}'"),
            None => "the pasted text".to_string(),
        };

        match extract::extract(&input) {
            Ok(batch) => {
                let identifiers = batch.len();
                let rejected = batch.rejected_rows();
                info!(identifiers, rejected, "Batch extracted");

                let skipped = if rejected > 0 {
                    format!(" ({rejected} row(s) skipped)")
                } else {
                    String::new()
                };
                self.session.append_agent_message(format!(
                    "Found {identifiers} ASIN(s) in {origin}{skipped}. \
                     Which fields should I retrieve? I know about: {}.",
                    field_menu()
                ));
                self.latest_batch = Some(batch);
                DispatchOutcome::BatchReady {
                    identifiers,
                    rejected,
                }
            }
            Err(_) => {
                self.session.append_agent_message(format!(
                    "I couldn't find any valid ASINs in {origin}. \
                     An ASIN is 10 letters and digits, like B00NLLUMOE."
                ));
                DispatchOutcome::NoIdentifiers
            }
        }
    }

    fn start_retrieval(&mut self, fields: Vec<RequestedField>) -> DispatchOutcome {
        let Some(batch) = self.latest_batch.clone() else {
            // NoBatchAvailable, recovered as exactly one agent turn.
            self.session.append_agent_message(
                "I don't have any ASINs yet. Upload a CSV or paste identifiers first.",
            );
            return DispatchOutcome::Replied;
        };

        self.generation += 1;
        let request = RetrievalRequest::new(batch, fields, self.domain);
        info!(
            request_id = %request.id,
            identifiers = request.batch.len(),
            fields = request.fields.len(),
            generation = self.generation,
            "Retrieval dispatched"
        );
        DispatchOutcome::RetrievalStarted {
            request,
            generation: self.generation,
        }
    }
}

/// Scan an utterance for field names and aliases.
///
/// Case-insensitive, first-mention order, deduplicated. Words are
/// compared after stripping surrounding punctuation.
pub fn parse_requested_fields(text: &str) -> Vec<RequestedField> {
    let mut fields = Vec::new();
    for word in text.split_whitespace() {
        let cleaned = word.trim_matches(|c: char| !c.is_ascii_alphanumeric() && c != '_');
        if cleaned.is_empty() {
            continue;
        }
        if let Ok(field) = cleaned.parse::<RequestedField>() {
            if !fields.contains(&field) {
                fields.push(field);
            }
        }
    }
    fields
}

/// Render a retrieval response as agent chat text.
///
/// One line per record with the values that came back; identifiers the
/// provider had no data for are listed at the end.
pub fn summarize_response(response: &RetrievalResponse) -> String {
    let mut lines = Vec::with_capacity(response.records.len() + 1);
    lines.push(format!(
        "Here's what I found for {} product(s):",
        response.records.len()
    ));

    for record in &response.records {
        let values = record
            .values
            .iter()
            .map(|(field, value)| format!("{}: {}", field.label(), format_value(value)))
            .collect::<Vec<_>>()
            .join(", ");
        if values.is_empty() {
            lines.push(format!("- {} (no data)", record.asin));
        } else {
            lines.push(format!("- {} | {}", record.asin, values));
        }
    }

    if let Some(tokens) = response.tokens_left {
        lines.push(format!("(provider tokens left: {tokens})"));
    }

    lines.join("\n")
}

/// User-facing description of a provider failure.
fn describe_provider_error(err: &ProviderError) -> String {
    match err {
        ProviderError::AuthenticationFailed => {
            "The product-data provider rejected the API key. Check KEEPA_API_KEY.".to_string()
        }
        ProviderError::RateLimited { .. } => {
            "The product-data provider is rate limiting us. Wait a moment and try again."
                .to_string()
        }
        ProviderError::EmptyResult => {
            "The provider had no data for these ASINs. Check the identifiers and marketplace."
                .to_string()
        }
        ProviderError::Provider { message } => {
            format!("The product lookup failed: {message}")
        }
        ProviderError::Deserialization(_) => {
            "The provider sent a response I couldn't read. Please try again.".to_string()
        }
    }
}

fn field_menu() -> String {
    RequestedField::ALL
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asintel_types::chat::Sender;
    use asintel_types::retrieval::ProductRecord;

    use std::collections::BTreeMap;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(
            vec![RequestedField::Title, RequestedField::Rating],
            Domain::Us,
        )
    }

    fn load_batch(d: &mut Dispatcher) {
        let outcome = d.dispatch(Trigger::TextPasted {
            contents: "B00NLLUMOE\nB07FKGVWWP".to_string(),
        });
        assert!(matches!(
            outcome,
            DispatchOutcome::BatchReady {
                identifiers: 2,
                rejected: 0
            }
        ));
    }

    #[test]
    fn test_file_selected_extracts_and_asks_for_fields() {
        let mut d = dispatcher();
        let outcome = d.dispatch(Trigger::FileSelected {
            name: "asins.csv".to_string(),
            contents: "asin\nB00NLLUMOE\nB00NLLUMOE\nB07FKGVWWP".to_string(),
        });
        assert!(matches!(
            outcome,
            DispatchOutcome::BatchReady {
                identifiers: 2,
                rejected: 0
            }
        ));
        let last = d.session().last().unwrap();
        assert_eq!(last.sender, Sender::Agent);
        assert!(last.text.contains("Which fields"));
        assert!(last.text.contains("asins.csv"));
        assert_eq!(d.latest_batch().unwrap().len(), 2);
    }

    #[test]
    fn test_empty_input_reported_not_fatal() {
        let mut d = dispatcher();
        let outcome = d.dispatch(Trigger::TextPasted {
            contents: "\n\n".to_string(),
        });
        assert!(matches!(outcome, DispatchOutcome::NoIdentifiers));
        assert!(d.latest_batch().is_none());
        let last = d.session().last().unwrap();
        assert_eq!(last.sender, Sender::Agent);
        assert!(last.text.contains("couldn't find any valid ASINs"));
    }

    #[test]
    fn test_rejected_rows_reported_in_turn() {
        let mut d = dispatcher();
        d.dispatch(Trigger::TextPasted {
            contents: "B00NLLUMOE\njunk".to_string(),
        });
        let last = d.session().last().unwrap();
        assert!(last.text.contains("1 row(s) skipped"));
    }

    #[test]
    fn test_explicit_action_without_batch_appends_one_agent_turn() {
        let mut d = dispatcher();
        let before = d.session().len();
        let outcome = d.dispatch(Trigger::ExplicitAction);
        assert!(matches!(outcome, DispatchOutcome::Replied));
        // Canned user turn + exactly one agent turn.
        assert_eq!(d.session().len(), before + 2);
        let agent_turns: Vec<_> = d
            .session()
            .history()
            .skip(before)
            .filter(|t| t.sender == Sender::Agent)
            .collect();
        assert_eq!(agent_turns.len(), 1);
        assert!(agent_turns[0].text.contains("don't have any ASINs yet"));
    }

    #[test]
    fn test_explicit_action_uses_default_fields() {
        let mut d = dispatcher();
        load_batch(&mut d);
        let outcome = d.dispatch(Trigger::ExplicitAction);
        match outcome {
            DispatchOutcome::RetrievalStarted { request, generation } => {
                assert_eq!(generation, 1);
                assert_eq!(
                    request.fields,
                    vec![RequestedField::Title, RequestedField::Rating]
                );
                assert_eq!(request.batch.len(), 2);
            }
            other => panic!("expected RetrievalStarted, got {other:?}"),
        }
    }

    #[test]
    fn test_utterance_names_fields() {
        let mut d = dispatcher();
        load_batch(&mut d);
        let outcome = d.dispatch(Trigger::ChatUtterance {
            text: "what's the price and BSR for these?".to_string(),
        });
        match outcome {
            DispatchOutcome::RetrievalStarted { request, .. } => {
                assert_eq!(
                    request.fields,
                    vec![RequestedField::Price, RequestedField::SalesRank]
                );
            }
            other => panic!("expected RetrievalStarted, got {other:?}"),
        }
        // Utterance was appended as a user turn before anything else.
        let last = d.session().last().unwrap();
        assert_eq!(last.sender, Sender::User);
    }

    #[test]
    fn test_utterance_with_no_fields_gets_field_menu() {
        let mut d = dispatcher();
        load_batch(&mut d);
        let outcome = d.dispatch(Trigger::ChatUtterance {
            text: "tell me everything interesting".to_string(),
        });
        assert!(matches!(outcome, DispatchOutcome::Replied));
        let last = d.session().last().unwrap();
        assert_eq!(last.sender, Sender::Agent);
        assert!(last.text.contains("title, brand, rating"));
    }

    #[test]
    fn test_blank_utterance_recovered() {
        let mut d = dispatcher();
        let outcome = d.dispatch(Trigger::ChatUtterance {
            text: "   ".to_string(),
        });
        assert!(matches!(outcome, DispatchOutcome::Replied));
        assert_eq!(d.session().last().unwrap().sender, Sender::Agent);
    }

    #[test]
    fn test_stale_result_flagged_but_kept() {
        let mut d = dispatcher();
        load_batch(&mut d);

        let first = match d.dispatch(Trigger::ExplicitAction) {
            DispatchOutcome::RetrievalStarted { generation, .. } => generation,
            other => panic!("expected RetrievalStarted, got {other:?}"),
        };
        let second = match d.dispatch(Trigger::ExplicitAction) {
            DispatchOutcome::RetrievalStarted { generation, .. } => generation,
            other => panic!("expected RetrievalStarted, got {other:?}"),
        };
        assert!(second > first);

        let response = RetrievalResponse {
            records: vec![],
            tokens_left: None,
        };
        let turn = d.complete_retrieval(first, Ok(response.clone()));
        assert!(turn.stale);

        let turn = d.complete_retrieval(second, Ok(response));
        assert!(!turn.stale);
    }

    #[test]
    fn test_provider_error_surfaced_as_agent_turn() {
        let mut d = dispatcher();
        load_batch(&mut d);
        let generation = match d.dispatch(Trigger::ExplicitAction) {
            DispatchOutcome::RetrievalStarted { generation, .. } => generation,
            other => panic!("expected RetrievalStarted, got {other:?}"),
        };

        let turn = d.complete_retrieval(generation, Err(ProviderError::AuthenticationFailed));
        assert_eq!(turn.sender, Sender::Agent);
        assert!(turn.text.contains("KEEPA_API_KEY"));
    }

    #[test]
    fn test_parse_requested_fields_order_and_dedup() {
        let fields = parse_requested_fields("Rating, price, rating and the Title please");
        assert_eq!(
            fields,
            vec![
                RequestedField::Rating,
                RequestedField::Price,
                RequestedField::Title
            ]
        );
        assert!(parse_requested_fields("nothing relevant here").is_empty());
    }

    #[test]
    fn test_summarize_response() {
        let mut values = BTreeMap::new();
        values.insert(
            RequestedField::Title,
            serde_json::Value::String("Widget Pro".to_string()),
        );
        values.insert(RequestedField::Rating, serde_json::json!(4.5));
        let response = RetrievalResponse {
            records: vec![ProductRecord {
                asin: "B00NLLUMOE".parse().unwrap(),
                values,
            }],
            tokens_left: Some(280),
        };

        let summary = summarize_response(&response);
        assert!(summary.contains("B00NLLUMOE"));
        assert!(summary.contains("Title: Widget Pro"));
        assert!(summary.contains("Rating: 4.5"));
        assert!(summary.contains("tokens left: 280"));
    }
}
