//! Tera + markdown rendering engine: [`TemplateEngine`] and [`Renderer`].
//!
//! # Template lookup
//!
//! | Source              | Name                                   |
//! |---------------------|----------------------------------------|
//! | Embedded            | `cover-pages/<doc_type>.md`            |
//! | Override directory  | `<dir>/<doc_type>.md` (wins over embedded) |

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use pulldown_cmark::{html, Options, Parser};
use regex::Regex;
use tera::Tera;

use prelegal_core::FieldSet;

use crate::context::CoverPageContext;
use crate::error::RenderError;

// ---------------------------------------------------------------------------
// Embedded templates: baked into the binary at compile time via include_str!
// ---------------------------------------------------------------------------

const COVER_PAGES: &[(&str, &str)] = &[
    ("mnda", include_str!("templates/cover-pages/mnda.md")),
    ("csa", include_str!("templates/cover-pages/csa.md")),
    ("sla", include_str!("templates/cover-pages/sla.md")),
    ("design_partner", include_str!("templates/cover-pages/design_partner.md")),
    ("psa", include_str!("templates/cover-pages/psa.md")),
    ("dpa", include_str!("templates/cover-pages/dpa.md")),
    ("partnership", include_str!("templates/cover-pages/partnership.md")),
    ("software_license", include_str!("templates/cover-pages/software_license.md")),
    ("pilot", include_str!("templates/cover-pages/pilot.md")),
    ("baa", include_str!("templates/cover-pages/baa.md")),
    ("ai_addendum", include_str!("templates/cover-pages/ai_addendum.md")),
];

/// Only exact `{{fieldName}}` is a token; any other brace text is literal.
const TOKEN_PATTERN: &str = r"\{\{(\w+)\}\}";

/// Tera's raw-block terminator, in any spacing or whitespace-control form.
const RAW_END_PATTERN: &str = r"\{%-?\s*endraw\s*-?%\}";

// ---------------------------------------------------------------------------
// Template loading helpers
// ---------------------------------------------------------------------------

fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io {
        path: path.into(),
        source,
    }
}

fn template_name(doc_type: &str) -> String {
    format!("cover-pages/{doc_type}.md")
}

fn normalize_line_endings(source: &str) -> String {
    source.replace("\r\n", "\n")
}

/// Load `*.md` files from `dir`; the lowercase file stem is the doc type.
fn load_override_templates(dir: &Path) -> Result<Vec<(String, String)>, RenderError> {
    if !dir.exists() {
        return Ok(vec![]);
    }
    let mut templates = Vec::new();
    let entries = std::fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("md") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        templates.push((stem.to_lowercase(), contents));
    }
    Ok(templates)
}

/// Append `text` so Tera emits it verbatim.
fn push_literal(out: &mut String, raw_end: &Regex, text: &str) {
    let mut last = 0;
    for found in raw_end.find_iter(text) {
        push_raw(out, &text[last..found.start()]);
        out.push_str(&format!("{{{{ \"{}\" }}}}", found.as_str()));
        last = found.end();
    }
    push_raw(out, &text[last..]);
}

fn push_raw(out: &mut String, text: &str) {
    if !text.is_empty() {
        out.push_str("{% raw %}");
        out.push_str(text);
        out.push_str("{% endraw %}");
    }
}

/// Tera source for a cover page: each token becomes a lookup in the `fields`
/// map and all other text is wrapped in raw blocks.
fn to_tera_source(token: &Regex, raw_end: &Regex, markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len() + 64);
    let mut last = 0;
    for cap in token.captures_iter(markdown) {
        let (Some(whole), Some(name)) = (cap.get(0), cap.get(1)) else {
            continue;
        };
        push_literal(&mut out, raw_end, &markdown[last..whole.start()]);
        out.push_str(&format!("{{{{ fields[\"{}\"] }}}}", name.as_str()));
        last = whole.end();
    }
    push_literal(&mut out, raw_end, &markdown[last..]);
    out
}

/// Distinct `{{token}}` names in order of first appearance.
fn scan_tokens(pattern: &Regex, source: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for cap in pattern.captures_iter(source) {
        let token = &cap[1];
        if !tokens.iter().any(|t| t == token) {
            tokens.push(token.to_owned());
        }
    }
    tokens
}

// ---------------------------------------------------------------------------
// TemplateEngine
// ---------------------------------------------------------------------------

/// Tera-based substitution engine over the cover-page templates.
///
/// `override_dir` may contain `<doc_type>.md` files that replace or extend the
/// embedded defaults.
pub struct TemplateEngine {
    tera: Tera,
    tokens: HashMap<String, Vec<String>>,
}

impl TemplateEngine {
    pub fn new(override_dir: Option<&Path>) -> Result<Self, RenderError> {
        let mut sources: HashMap<String, String> = COVER_PAGES
            .iter()
            .map(|(doc_type, source)| ((*doc_type).to_string(), (*source).to_string()))
            .collect();
        if let Some(dir) = override_dir {
            for (doc_type, source) in load_override_templates(dir)? {
                sources.insert(doc_type, source);
            }
        }

        let pattern = Regex::new(TOKEN_PATTERN)?;
        let raw_end = Regex::new(RAW_END_PATTERN)?;
        let mut tokens = HashMap::with_capacity(sources.len());
        let mut raw = Vec::with_capacity(sources.len());
        for (doc_type, source) in sources {
            let source = normalize_line_endings(&source);
            tokens.insert(doc_type.clone(), scan_tokens(&pattern, &source));
            let compiled = to_tera_source(&pattern, &raw_end, &source);
            raw.push((template_name(&doc_type), compiled));
        }

        let mut tera = Tera::default();
        tera.add_raw_templates(raw)?;
        Ok(TemplateEngine { tera, tokens })
    }

    pub fn has_template(&self, doc_type: &str) -> bool {
        self.tokens.contains_key(doc_type)
    }

    /// Doc types with a template, sorted.
    pub fn doc_types(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tokens.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Tokens referenced by `doc_type`'s template, in template order.
    pub fn tokens(&self, doc_type: &str) -> Option<&[String]> {
        self.tokens.get(doc_type).map(Vec::as_slice)
    }

    /// Context for `doc_type` built from `fields`; `None` without a template.
    pub fn context(&self, doc_type: &str, fields: &FieldSet) -> Option<CoverPageContext> {
        self.tokens(doc_type)
            .map(|tokens| CoverPageContext::build(tokens, fields))
    }

    /// Substituted markdown for `doc_type`; `None` when no template exists.
    pub fn substitute(
        &self,
        doc_type: &str,
        fields: &FieldSet,
    ) -> Result<Option<String>, RenderError> {
        let Some(ctx) = self.context(doc_type, fields) else {
            return Ok(None);
        };
        let markdown = self
            .tera
            .render(&template_name(doc_type), &ctx.to_tera_context())?;
        Ok(Some(markdown))
    }
}

// ---------------------------------------------------------------------------
// Markdown
// ---------------------------------------------------------------------------

/// Convert markdown to HTML with table support. Inline HTML passes through.
pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::ENABLE_TABLES);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Fragment returned when a document type has no cover page.
pub fn missing_template_html(doc_type: &str) -> String {
    format!(
        "<p><em>Template not available for document type: {}</em></p>",
        tera::escape_html(doc_type)
    )
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Cover-page renderer. Create once at startup and share.
pub struct Renderer {
    engine: TemplateEngine,
}

impl Renderer {
    /// Construct a new [`Renderer`] with embedded templates only.
    pub fn new() -> Result<Self, RenderError> {
        Self::with_template_dir(None)
    }

    /// Embedded templates plus overrides from `dir`.
    pub fn with_template_dir(dir: Option<&Path>) -> Result<Self, RenderError> {
        Ok(Renderer {
            engine: TemplateEngine::new(dir)?,
        })
    }

    pub fn engine(&self) -> &TemplateEngine {
        &self.engine
    }

    /// Render `doc_type`'s cover page as HTML.
    ///
    /// A missing template is not an error: the result is an explanatory
    /// fragment (see [`missing_template_html`]).
    pub fn render(&self, doc_type: &str, fields: &FieldSet) -> Result<String, RenderError> {
        match self.engine.substitute(doc_type, fields)? {
            Some(markdown) => Ok(markdown_to_html(&markdown)),
            None => Ok(missing_template_html(doc_type)),
        }
    }

    /// Template tokens that would render as placeholders.
    pub fn missing_fields(&self, doc_type: &str, fields: &FieldSet) -> Vec<String> {
        self.engine
            .context(doc_type, fields)
            .map(|ctx| ctx.missing().to_vec())
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
