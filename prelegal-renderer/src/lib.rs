//! # prelegal-renderer
//!
//! Renders document cover pages: `{{fieldName}}` tokens in a markdown template
//! are substituted through Tera, then the markdown is converted to HTML.
//! Fields without a value show up as `<em>[fieldName]</em>`.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use prelegal_core::FieldSet;
//! use prelegal_renderer::Renderer;
//!
//! fn preview(fields: &FieldSet) {
//!     if let Ok(renderer) = Renderer::new() {
//!         if let Ok(html) = renderer.render("pilot", fields) {
//!             println!("{html}");
//!         }
//!     }
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;

pub use context::{placeholder, CoverPageContext};
pub use engine::{markdown_to_html, missing_template_html, Renderer, TemplateEngine};
pub use error::RenderError;
