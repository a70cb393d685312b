//! Document seam and an in-memory document.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;

use crate::{Selector, ViewError};

/// Class that hides an element.
pub const HIDDEN_CLASS: &str = "hidden";

/// The operations a view performs on its document.
pub trait Dom {
    /// Replace the contents of `container` with `markup`.
    fn inject(&mut self, container: &Selector, markup: &str) -> Result<(), ViewError>;

    /// Current value of an input.
    fn value(&self, selector: &Selector) -> Result<String, ViewError>;

    fn set_value(&mut self, selector: &Selector, value: &str) -> Result<(), ViewError>;

    fn has_class(&self, selector: &Selector, class: &str) -> Result<bool, ViewError>;

    fn add_class(&mut self, selector: &Selector, class: &str) -> Result<(), ViewError>;

    fn remove_class(&mut self, selector: &Selector, class: &str) -> Result<(), ViewError>;

    fn text(&self, selector: &Selector) -> Result<String, ViewError>;

    fn set_text(&mut self, selector: &Selector, text: &str) -> Result<(), ViewError>;

    /// Add or remove [`HIDDEN_CLASS`].
    fn set_hidden(&mut self, selector: &Selector, hidden: bool) -> Result<(), ViewError> {
        if hidden {
            self.add_class(selector, HIDDEN_CLASS)
        } else {
            self.remove_class(selector, HIDDEN_CLASS)
        }
    }

    fn is_hidden(&self, selector: &Selector) -> Result<bool, ViewError> {
        self.has_class(selector, HIDDEN_CLASS)
    }
}

#[derive(Debug, Clone)]
struct Element {
    key: usize,
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    value: String,
    text: String,
    /// Container this element was injected into.
    owner: Option<usize>,
}

impl Element {
    fn matches(&self, selector: &Selector) -> bool {
        match selector {
            Selector::Id(id) => self.id.as_deref() == Some(id.as_str()),
            Selector::Class(class) => self.classes.iter().any(|c| c == class),
        }
    }
}

/// Flat in-memory document for fixtures and tests.
///
/// Elements are tracked in document order with their id, classes, value and
/// leading text. Nesting is only recorded for injected markup, so that
/// re-injecting into a container drops what was there before.
#[derive(Debug, Clone, Default)]
pub struct MemoryDom {
    elements: Vec<Element>,
    inner_html: HashMap<usize, String>,
    next_key: usize,
}

impl MemoryDom {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document from fixture markup, e.g.
    /// `<div id='password-reset-wrapper'></div>`.
    pub fn from_html(html: &str) -> Self {
        let mut dom = Self::new();
        let elements = dom.parse(html, None);
        dom.elements = elements;
        dom
    }

    /// Markup last injected into `container` (empty if none).
    pub fn inner_html(&self, container: &Selector) -> Result<&str, ViewError> {
        let key = self.find(container)?.key;
        Ok(self.inner_html.get(&key).map(String::as_str).unwrap_or(""))
    }

    /// Number of elements in the document.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Check whether any element matches `selector`.
    pub fn exists(&self, selector: &Selector) -> bool {
        self.elements.iter().any(|e| e.matches(selector))
    }

    /// Tag name of the matched element.
    pub fn tag(&self, selector: &Selector) -> Result<&str, ViewError> {
        Ok(self.find(selector)?.tag.as_str())
    }

    fn find(&self, selector: &Selector) -> Result<&Element, ViewError> {
        self.elements
            .iter()
            .find(|e| e.matches(selector))
            .ok_or_else(|| ViewError::ElementNotFound(selector.to_string()))
    }

    fn find_mut(&mut self, selector: &Selector) -> Result<&mut Element, ViewError> {
        self.elements
            .iter_mut()
            .find(|e| e.matches(selector))
            .ok_or_else(|| ViewError::ElementNotFound(selector.to_string()))
    }

    fn parse(&mut self, html: &str, owner: Option<usize>) -> Vec<Element> {
        let mut parsed = Vec::new();

        for caps in tag_pattern().captures_iter(html) {
            let mut element = Element {
                key: self.next_key,
                tag: caps[1].to_ascii_lowercase(),
                id: None,
                classes: Vec::new(),
                value: String::new(),
                text: unescape_html(caps.get(3).map_or("", |m| m.as_str()).trim()),
                owner,
            };
            self.next_key += 1;

            let attrs = caps.get(2).map_or("", |m| m.as_str());
            for attr in attr_pattern().captures_iter(attrs) {
                let raw = attr
                    .get(2)
                    .or_else(|| attr.get(3))
                    .map_or("", |m| m.as_str());
                let value = unescape_html(raw);
                match attr[1].to_ascii_lowercase().as_str() {
                    "id" => element.id = Some(value),
                    "class" => {
                        element.classes = value.split_whitespace().map(String::from).collect()
                    }
                    "value" => element.value = value,
                    _ => {}
                }
            }

            parsed.push(element);
        }

        parsed
    }

    /// Keys of every element injected, directly or transitively, under `root`.
    fn descendants(&self, root: usize) -> HashSet<usize> {
        let mut found = HashSet::new();
        let mut frontier = vec![root];
        while let Some(parent) = frontier.pop() {
            for element in &self.elements {
                if element.owner == Some(parent) && found.insert(element.key) {
                    frontier.push(element.key);
                }
            }
        }
        found
    }
}

impl Dom for MemoryDom {
    fn inject(&mut self, container: &Selector, markup: &str) -> Result<(), ViewError> {
        let key = self.find(container)?.key;

        let stale = self.descendants(key);
        self.elements.retain(|e| !stale.contains(&e.key));
        self.inner_html.retain(|k, _| !stale.contains(k));

        let parsed = self.parse(markup, Some(key));
        let position = self
            .elements
            .iter()
            .position(|e| e.key == key)
            .map_or(self.elements.len(), |i| i + 1);
        tracing::trace!(container = %container, elements = parsed.len(), "injecting markup");
        self.elements.splice(position..position, parsed);
        self.inner_html.insert(key, markup.to_string());
        Ok(())
    }

    fn value(&self, selector: &Selector) -> Result<String, ViewError> {
        Ok(self.find(selector)?.value.clone())
    }

    fn set_value(&mut self, selector: &Selector, value: &str) -> Result<(), ViewError> {
        self.find_mut(selector)?.value = value.to_string();
        Ok(())
    }

    fn has_class(&self, selector: &Selector, class: &str) -> Result<bool, ViewError> {
        Ok(self.find(selector)?.classes.iter().any(|c| c == class))
    }

    fn add_class(&mut self, selector: &Selector, class: &str) -> Result<(), ViewError> {
        let element = self.find_mut(selector)?;
        if !element.classes.iter().any(|c| c == class) {
            element.classes.push(class.to_string());
        }
        Ok(())
    }

    fn remove_class(&mut self, selector: &Selector, class: &str) -> Result<(), ViewError> {
        self.find_mut(selector)?.classes.retain(|c| c != class);
        Ok(())
    }

    fn text(&self, selector: &Selector) -> Result<String, ViewError> {
        Ok(self.find(selector)?.text.clone())
    }

    fn set_text(&mut self, selector: &Selector, text: &str) -> Result<(), ViewError> {
        self.find_mut(selector)?.text = text.to_string();
        Ok(())
    }
}

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"<([a-zA-Z][a-zA-Z0-9-]*)(\s[^<>]*)?/?>([^<]*)").expect("static tag pattern")
    })
}

fn attr_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"([a-zA-Z_:][-a-zA-Z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
            .expect("static attribute pattern")
    })
}

fn unescape_html(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
