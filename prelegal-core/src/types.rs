//! Domain types for documents and chat turns.
//!
//! All types are serializable/deserializable via serde; the wire names match
//! the JSON the browser client sends (`role`, `content`, camelCase field keys).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed document-type identifier (`mnda`, `csa`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocType(pub String);

impl DocType {
    /// Id of the classifier document that handles unrecognised types.
    pub const UNKNOWN: &'static str = "unknown";

    pub fn unknown() -> Self {
        Self::from(Self::UNKNOWN)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for DocType {
    fn default() -> Self {
        Self::unknown()
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for DocType {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DocType {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

/// Field name → optional value, accumulated over a conversation.
///
/// Keys are kept sorted so prompts and event payloads are deterministic.
/// An empty string is treated the same as a missing value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSet(BTreeMap<String, Option<String>>);

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-empty value for `name`, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(name)
            .and_then(|v| v.as_deref())
            .filter(|v| !v.is_empty())
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), Some(value.into()));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over entries that carry a non-empty value.
    pub fn iter_filled(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().filter_map(|(k, v)| match v.as_deref() {
            Some(v) if !v.is_empty() => Some((k.as_str(), v)),
            _ => None,
        })
    }

    /// Copy holding only the non-empty entries.
    pub fn filled(&self) -> FieldSet {
        self.iter_filled()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect()
    }

    /// Overlay `updates` onto `self`: non-empty values replace old ones,
    /// empty or null updates leave the existing value alone.
    pub fn overlay(&mut self, updates: &FieldSet) {
        for (name, value) in updates.iter_filled() {
            self.insert(name, value);
        }
    }

    /// Entries of `self` whose value differs from the one already in `known`.
    pub fn changed_from(&self, known: &FieldSet) -> FieldSet {
        self.iter_filled()
            .filter(|(k, v)| known.get(k) != Some(*v))
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect()
    }
}

impl FromIterator<(String, String)> for FieldSet {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k, Some(v))).collect())
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for FieldSet {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

/// Author of a chat turn.
///
/// Roles other than the three the assistant produces are kept verbatim and
/// forwarded to the provider unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ChatRole {
    System,
    User,
    Assistant,
    Other(String),
}

impl ChatRole {
    pub fn as_str(&self) -> &str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
            ChatRole::Other(role) => role,
        }
    }
}

impl From<String> for ChatRole {
    fn from(role: String) -> Self {
        match role.as_str() {
            "system" => ChatRole::System,
            "user" => ChatRole::User,
            "assistant" => ChatRole::Assistant,
            _ => ChatRole::Other(role),
        }
    }
}

impl From<ChatRole> for String {
    fn from(role: ChatRole) -> Self {
        role.as_str().to_owned()
    }
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message of the conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ChatRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }
}

/// Outcome of one assistant turn: the reply plus newly asserted fields.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChatResult {
    pub reply: String,
    pub fields: FieldSet,
    /// Document the classifier recognised this turn, whether or not the
    /// client already knew it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_doc_type: Option<DocType>,
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

/// Static description of one supported document type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentConfig {
    pub id: DocType,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Field schema: every field is an optional string.
    #[serde(default)]
    pub fields: Vec<String>,
    /// System prompt steering the conversation for this document.
    pub prompt: String,
}

impl DocumentConfig {
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f == name)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
