//! Prelegal core library: document registry, field schemas, chat data model.
//!
//! Public API surface:
//! - [`types`]: newtypes and domain structs
//! - [`error`]: [`RegistryError`], [`SchemaError`]
//! - [`registry`]: built-in catalog, load / lookup
//! - [`schema`]: structured-response schema and validation

pub mod error;
pub mod registry;
pub mod schema;
pub mod types;

pub use error::{RegistryError, SchemaError};
pub use registry::DocumentRegistry;
pub use types::{ChatResult, ChatRole, ChatTurn, DocType, DocumentConfig, FieldSet};
