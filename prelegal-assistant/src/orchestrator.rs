use std::sync::Arc;

use prelegal_core::schema::{parse_model_reply, response_schema, RESPONSE_SCHEMA_NAME};
use prelegal_core::{ChatResult, ChatTurn, DocType, DocumentConfig, DocumentRegistry, FieldSet};

use crate::error::AssistantError;
use crate::provider::{CompletionModel, CompletionRequest};

/// Field the classifier fills with the document type it recognised.
pub const DETECTED_DOC_TYPE_FIELD: &str = "detectedDocType";

/// Runs one assistant turn: prompt assembly, the model call, reply validation.
#[derive(Clone)]
pub struct Assistant {
    registry: Arc<DocumentRegistry>,
    model: Arc<dyn CompletionModel>,
}

impl Assistant {
    pub fn new(registry: Arc<DocumentRegistry>, model: Arc<dyn CompletionModel>) -> Self {
        Self { registry, model }
    }

    pub fn registry(&self) -> &DocumentRegistry {
        &self.registry
    }

    /// System prompt for `config`, with any filled `known` fields appended.
    pub fn system_prompt(config: &DocumentConfig, known: &FieldSet) -> String {
        let filled = known.filled();
        if filled.is_empty() {
            return config.prompt.clone();
        }
        // FieldSet serializes as a string map; this cannot fail.
        let collected = serde_json::to_string(&filled).unwrap_or_default();
        format!("{}\n\nFields already collected: {collected}", config.prompt)
    }

    /// Resolve `doc_type` and assemble the request sent to the model.
    pub fn build_request(
        &self,
        history: &[ChatTurn],
        known: &FieldSet,
        doc_type: &str,
    ) -> (&DocumentConfig, CompletionRequest) {
        let config = self.registry.lookup(doc_type);
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(ChatTurn::system(Self::system_prompt(config, known)));
        messages.extend_from_slice(history);
        let request = CompletionRequest {
            messages,
            schema_name: RESPONSE_SCHEMA_NAME.to_string(),
            schema: response_schema(config),
        };
        (config, request)
    }

    /// One blocking turn. The returned fields hold only values the model
    /// newly asserted; anything equal to `known` is dropped. Detection is
    /// decided from the full reply, so a `detectedDocType` the client already
    /// holds still switches the document.
    pub fn chat(
        &self,
        history: &[ChatTurn],
        known: &FieldSet,
        doc_type: &str,
    ) -> Result<ChatResult, AssistantError> {
        let (config, request) = self.build_request(history, known, doc_type);
        if config.id.as_str() != doc_type {
            tracing::debug!(
                requested = doc_type,
                using = %config.id,
                "unrecognised doc type, using fallback"
            );
        }

        let raw = self.model.complete(&request)?;
        let parsed = parse_model_reply(config, &raw)?;
        let detected_doc_type = self.detect(config, &parsed.fields);
        let fields = parsed.fields.changed_from(known);
        tracing::info!(
            doc_type = %config.id,
            history = history.len(),
            updated = fields.len(),
            detected = detected_doc_type.as_ref().map(DocType::as_str),
            "assistant turn complete"
        );
        Ok(ChatResult {
            reply: parsed.reply,
            fields,
            detected_doc_type,
        })
    }

    /// Registered draftable document named by `fields`, when `config` is the
    /// classifier.
    fn detect(&self, config: &DocumentConfig, fields: &FieldSet) -> Option<DocType> {
        if !self.registry.is_fallback(config) {
            return None;
        }
        let target = self.registry.get(fields.get(DETECTED_DOC_TYPE_FIELD)?)?;
        if self.registry.is_fallback(target) {
            return None;
        }
        Some(target.id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Canned {
        reply: String,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl CompletionModel for Canned {
        fn complete(&self, request: &CompletionRequest) -> Result<String, AssistantError> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(self.reply.clone())
        }
    }

    fn assistant(reply: &str) -> (Assistant, Arc<Canned>) {
        let model = Arc::new(Canned {
            reply: reply.to_string(),
            seen: Mutex::new(vec![]),
        });
        let registry = Arc::new(DocumentRegistry::builtin().unwrap());
        (Assistant::new(registry, model.clone()), model)
    }

    #[test]
    fn prompt_without_known_fields_is_unchanged() {
        let registry = DocumentRegistry::builtin().unwrap();
        let config = registry.lookup("pilot");
        let known: FieldSet = [("providerName", "")].into_iter().collect();
        assert_eq!(Assistant::system_prompt(config, &known), config.prompt);
    }

    #[test]
    fn prompt_lists_filled_fields_as_json() {
        let registry = DocumentRegistry::builtin().unwrap();
        let config = registry.lookup("pilot");
        let known: FieldSet =
            [("providerName", "Acme"), ("customerName", "")].into_iter().collect();
        let prompt = Assistant::system_prompt(config, &known);
        assert!(prompt.starts_with(&config.prompt));
        assert!(prompt.ends_with("\n\nFields already collected: {\"providerName\":\"Acme\"}"));
    }

    #[test]
    fn request_is_system_prompt_then_history() {
        let (assistant, _) = assistant("{}");
        let history = vec![
            ChatTurn::user("hi"),
            ChatTurn::assistant("hello"),
            ChatTurn::user("go"),
        ];
        let (config, request) = assistant.build_request(&history, &FieldSet::new(), "sla");
        assert_eq!(config.id.as_str(), "sla");
        assert_eq!(request.messages.len(), 4);
        assert_eq!(request.messages[0], ChatTurn::system(config.prompt.clone()));
        assert_eq!(&request.messages[1..], history.as_slice());
        assert_eq!(request.schema_name, "ChatResponse");
    }

    #[test]
    fn unrecognised_doc_type_uses_classifier() {
        let (assistant, _) = assistant("{}");
        let (config, request) = assistant.build_request(&[], &FieldSet::new(), "lease");
        assert_eq!(config.id, DocType::unknown());
        let required = &request.schema["properties"]["fields"]["required"];
        assert_eq!(required[0], DETECTED_DOC_TYPE_FIELD);
    }

    #[test]
    fn chat_drops_values_already_known() {
        let (assistant, model) = assistant(
            r#"{"reply":"Got it.","fields":{"providerName":"Acme","customerName":"Beta"}}"#,
        );
        let known: FieldSet = [("providerName", "Acme")].into_iter().collect();
        let history = [ChatTurn::user("Beta is the customer")];
        let result = assistant.chat(&history, &known, "pilot").unwrap();
        assert_eq!(result.reply, "Got it.");
        let expected: FieldSet = [("customerName", "Beta")].into_iter().collect();
        assert_eq!(result.fields, expected);
        assert_eq!(model.seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn detection_only_from_the_classifier() {
        let history = [ChatTurn::user("SaaS terms")];
        let known = FieldSet::new();
        let (csa, _) = assistant(r#"{"reply":"A CSA.","fields":{"detectedDocType":"csa"}}"#);
        let detected =
            |doc_type: &str| csa.chat(&history, &known, doc_type).unwrap().detected_doc_type;
        assert_eq!(detected("unknown"), Some(DocType::from("csa")));
        assert_eq!(detected("lease"), Some(DocType::from("csa")));
        assert_eq!(detected("pilot"), None);

        let (itself, _) = assistant(r#"{"reply":"?","fields":{"detectedDocType":"unknown"}}"#);
        let result = itself.chat(&history, &known, "unknown").unwrap();
        assert_eq!(result.detected_doc_type, None);
    }

    #[test]
    fn detection_survives_a_known_detected_doc_type() {
        let reply = r#"{"reply":"Still a CSA.","fields":{"detectedDocType":"csa"}}"#;
        let (assistant, _) = assistant(reply);
        let known: FieldSet = [(DETECTED_DOC_TYPE_FIELD, "csa")].into_iter().collect();
        let result = assistant.chat(&[ChatTurn::user("yes")], &known, "unknown").unwrap();
        assert!(result.fields.is_empty());
        assert_eq!(result.detected_doc_type, Some(DocType::from("csa")));
    }
}
