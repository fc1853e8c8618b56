//! Chat stream events.
//!
//! Each event is sent as one `data: <json>` line. A turn is always
//! `text*`, `fields`, an optional `doc_type`, then `done`.

use serde::{Deserialize, Serialize};

use prelegal_core::{ChatResult, DocType, FieldSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    Text { delta: String },
    Fields { data: FieldSet },
    DocType { data: DocType },
    Done,
}

/// Split `reply` on single spaces; every chunk but the last keeps its
/// trailing space, so the chunks concatenate back to `reply`.
pub fn word_chunks(reply: &str) -> Vec<String> {
    let words: Vec<&str> = reply.split(' ').collect();
    let last = words.len() - 1;
    words
        .into_iter()
        .enumerate()
        .map(|(i, word)| {
            if i == last {
                word.to_string()
            } else {
                format!("{word} ")
            }
        })
        .collect()
}

/// Full event sequence for one completed turn.
pub fn chat_events(result: &ChatResult) -> Vec<ChatEvent> {
    let mut events: Vec<ChatEvent> = word_chunks(&result.reply)
        .into_iter()
        .map(|delta| ChatEvent::Text { delta })
        .collect();
    events.push(ChatEvent::Fields {
        data: result.fields.clone(),
    });
    if let Some(doc_type) = &result.detected_doc_type {
        events.push(ChatEvent::DocType {
            data: doc_type.clone(),
        });
    }
    events.push(ChatEvent::Done);
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn chunks_keep_trailing_spaces_except_last() {
        assert_eq!(word_chunks("Hello there friend"), vec!["Hello ", "there ", "friend"]);
        assert_eq!(word_chunks("one"), vec!["one"]);
        assert_eq!(word_chunks(""), vec![""]);
    }

    #[test]
    fn chunks_reassemble_irregular_spacing() {
        let reply = "  Two  spaces\nand a newline ";
        assert_eq!(word_chunks(reply).concat(), reply);
    }

    #[test]
    fn wire_shapes() {
        let text = ChatEvent::Text {
            delta: "Hi ".into(),
        };
        let text = serde_json::to_value(text).unwrap();
        assert_eq!(text, json!({ "type": "text", "delta": "Hi " }));

        let fields: FieldSet = [("providerName", "Acme")].into_iter().collect();
        let fields = serde_json::to_value(ChatEvent::Fields { data: fields }).unwrap();
        assert_eq!(fields, json!({ "type": "fields", "data": { "providerName": "Acme" } }));

        let doc = ChatEvent::DocType {
            data: DocType::from("csa"),
        };
        let doc = serde_json::to_value(doc).unwrap();
        assert_eq!(doc, json!({ "type": "doc_type", "data": "csa" }));

        assert_eq!(serde_json::to_value(ChatEvent::Done).unwrap(), json!({ "type": "done" }));
    }

    #[test]
    fn event_order() {
        let mut result = ChatResult {
            reply: "a b".into(),
            fields: FieldSet::new(),
            detected_doc_type: Some(DocType::from("sla")),
        };
        let events = chat_events(&result);
        assert_eq!(
            events,
            vec![
                ChatEvent::Text { delta: "a ".into() },
                ChatEvent::Text { delta: "b".into() },
                ChatEvent::Fields {
                    data: FieldSet::new()
                },
                ChatEvent::DocType {
                    data: DocType::from("sla")
                },
                ChatEvent::Done,
            ]
        );
        result.detected_doc_type = None;
        assert_eq!(chat_events(&result).len(), 4);
    }
}
