//! Named templates with `{{ key }}` placeholders.

use std::collections::HashMap;

use serde_json::Value;

use crate::templates;
use crate::ViewError;

/// Turns a template name plus context into markup.
pub trait Renderer {
    fn render(&self, name: &str, context: &Value) -> Result<String, ViewError>;
}

/// In-memory template store.
///
/// `{{ key }}` inserts the HTML-escaped value, `{{{ key }}}` inserts it raw.
/// Keys may be dotted paths into nested objects. Null renders as nothing; a
/// key absent from the context is an error.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, String>,
}

impl TemplateRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the student account templates installed.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry
            .install(templates::PASSWORD_RESET, templates::PASSWORD_RESET_SOURCE)
            .install(templates::FORM_FIELD, templates::FORM_FIELD_SOURCE);
        registry
    }

    /// Install (or replace) a template.
    pub fn install(&mut self, name: impl Into<String>, source: impl Into<String>) -> &mut Self {
        self.templates.insert(name.into(), source.into());
        self
    }

    /// Check whether a template is installed.
    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }
}

impl Renderer for TemplateRegistry {
    fn render(&self, name: &str, context: &Value) -> Result<String, ViewError> {
        let source = self
            .templates
            .get(name)
            .ok_or_else(|| ViewError::TemplateNotFound(name.to_string()))?;
        substitute(name, source, context)
    }
}

fn substitute(name: &str, source: &str, context: &Value) -> Result<String, ViewError> {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let opening = &rest[start..];
        let (raw, open_len, close) = if opening.starts_with("{{{") {
            (true, 3, "}}}")
        } else {
            (false, 2, "}}")
        };

        let inner = &opening[open_len..];
        let end = inner.find(close).ok_or_else(|| ViewError::Unterminated {
            template: name.to_string(),
        })?;
        let key = inner[..end].trim();
        let value = lookup(context, key).ok_or_else(|| ViewError::MissingContext {
            template: name.to_string(),
            key: key.to_string(),
        })?;

        if raw {
            out.push_str(&value);
        } else {
            out.push_str(&escape_html(&value));
        }
        rest = &inner[end + close.len()..];
    }

    out.push_str(rest);
    Ok(out)
}

fn lookup(context: &Value, key: &str) -> Option<String> {
    let value = key
        .split('.')
        .try_fold(context, |value, part| value.get(part))?;

    Some(match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

/// Escape text for use in element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
