//! Document registry: the static catalog of supported document types.
//!
//! # Catalog layout
//!
//! ```text
//! version: 1
//! fallback: unknown          (classifier entry for unrecognised types)
//! documents:
//!   - id: mnda
//!     name: Mutual Non-Disclosure Agreement
//!     description: ...
//!     fields: [purpose, effectiveDate, ...]
//!     prompt: |-
//!       ...
//! ```
//!
//! # API pattern
//!
//! - [`DocumentRegistry::builtin`]: catalog baked into the binary via `include_str!`
//! - [`DocumentRegistry::load_at`]: operator-supplied catalog file
//!
//! The registry is built once at startup and never mutated afterwards.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::RegistryError;
use crate::types::{DocType, DocumentConfig};

const BUILTIN_CATALOG: &str = include_str!("catalog.yaml");
const BUILTIN_ORIGIN: &str = "<builtin>/catalog.yaml";

// ---------------------------------------------------------------------------
// 1. Catalog file shape
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[allow(dead_code)]
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default = "DocType::unknown")]
    fallback: DocType,
    documents: Vec<DocumentConfig>,
}

fn default_version() -> u32 {
    1
}

// ---------------------------------------------------------------------------
// 2. Registry
// ---------------------------------------------------------------------------

/// Immutable lookup table from [`DocType`] to [`DocumentConfig`].
#[derive(Debug, Clone)]
pub struct DocumentRegistry {
    documents: Vec<DocumentConfig>,
    index: HashMap<DocType, usize>,
    fallback: usize,
}

impl DocumentRegistry {
    /// Registry backed by the embedded catalog.
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::from_yaml(BUILTIN_CATALOG, Path::new(BUILTIN_ORIGIN))
    }

    /// Load a catalog from `path`.
    ///
    /// Returns `RegistryError::CatalogNotFound` if absent,
    /// `RegistryError::Parse` (with path + line context) if malformed YAML.
    pub fn load_at(path: &Path) -> Result<Self, RegistryError> {
        if !path.exists() {
            return Err(RegistryError::CatalogNotFound {
                path: path.to_path_buf(),
            });
        }
        let contents = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&contents, path)
    }

    /// Parse and validate catalog YAML. `origin` is only used in error messages.
    pub fn from_yaml(contents: &str, origin: &Path) -> Result<Self, RegistryError> {
        let catalog: CatalogFile =
            serde_yaml::from_str(contents).map_err(|source| RegistryError::Parse {
                path: PathBuf::from(origin),
                source,
            })?;
        Self::from_documents(catalog.documents, &catalog.fallback)
    }

    /// Build from already-parsed configs; `fallback` must be one of them.
    pub fn from_documents(
        documents: Vec<DocumentConfig>,
        fallback: &DocType,
    ) -> Result<Self, RegistryError> {
        let mut index = HashMap::with_capacity(documents.len());
        for (pos, doc) in documents.iter().enumerate() {
            validate_fields(doc)?;
            if index.insert(doc.id.clone(), pos).is_some() {
                return Err(RegistryError::DuplicateDocType(doc.id.0.clone()));
            }
        }
        let fallback = *index
            .get(fallback)
            .ok_or_else(|| RegistryError::MissingFallback(fallback.0.clone()))?;
        Ok(Self {
            documents,
            index,
            fallback,
        })
    }

    /// Exact lookup; `None` for unregistered types.
    pub fn get(&self, doc_type: &str) -> Option<&DocumentConfig> {
        self.index
            .get(&DocType::from(doc_type))
            .map(|&pos| &self.documents[pos])
    }

    /// Lookup that falls back to the classifier config for unregistered types.
    pub fn lookup(&self, doc_type: &str) -> &DocumentConfig {
        self.get(doc_type).unwrap_or_else(|| self.fallback())
    }

    /// The classifier config used for unrecognised document types.
    pub fn fallback(&self) -> &DocumentConfig {
        &self.documents[self.fallback]
    }

    pub fn is_fallback(&self, config: &DocumentConfig) -> bool {
        config.id == self.fallback().id
    }

    /// All configs in catalog order, fallback included.
    pub fn documents(&self) -> &[DocumentConfig] {
        &self.documents
    }

    /// Configs a user can actually draft (everything but the fallback).
    pub fn drafts(&self) -> impl Iterator<Item = &DocumentConfig> {
        let fallback = self.fallback;
        self.documents
            .iter()
            .enumerate()
            .filter(move |(pos, _)| *pos != fallback)
            .map(|(_, doc)| doc)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn validate_fields(doc: &DocumentConfig) -> Result<(), RegistryError> {
    let invalid = |field: &str, reason| RegistryError::InvalidField {
        doc_type: doc.id.0.clone(),
        field: field.to_owned(),
        reason,
    };

    let mut seen = HashSet::new();
    for field in &doc.fields {
        if field.is_empty() {
            return Err(invalid(field.as_str(), "field name is empty"));
        }
        if !field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(invalid(field.as_str(), "field names may only contain [A-Za-z0-9_]"));
        }
        if !seen.insert(field.as_str()) {
            return Err(invalid(field.as_str(), "field is listed twice"));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
