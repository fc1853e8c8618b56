//! Template context: the value (or placeholder) bound to every token of a
//! cover page.

use std::collections::BTreeMap;

use prelegal_core::FieldSet;

/// Markup shown in place of a field that has no value yet.
pub fn placeholder(field: &str) -> String {
    format!("<em>[{field}]</em>")
}

/// Rendering payload for one cover page.
#[derive(Debug, Clone, Default)]
pub struct CoverPageContext {
    values: BTreeMap<String, String>,
    missing: Vec<String>,
}

impl CoverPageContext {
    /// Bind each of `tokens` to its value in `fields`, or to a placeholder when
    /// the field is absent or empty.
    pub fn build(tokens: &[String], fields: &FieldSet) -> Self {
        let mut ctx = Self::default();
        for token in tokens {
            let value = match fields.get(token) {
                Some(value) => value.to_owned(),
                None => {
                    ctx.missing.push(token.clone());
                    placeholder(token)
                }
            };
            ctx.values.insert(token.clone(), value);
        }
        ctx
    }

    /// Tokens rendered as placeholders, in template order.
    pub fn missing(&self) -> &[String] {
        &self.missing
    }

    pub fn value(&self, token: &str) -> Option<&str> {
        self.values.get(token).map(String::as_str)
    }

    /// Values under the `fields` map that compiled cover pages index into.
    pub fn to_tera_context(&self) -> tera::Context {
        let mut ctx = tera::Context::new();
        ctx.insert("fields", &self.values);
        ctx
    }
}
