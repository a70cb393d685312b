//! Element selectors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ViewError;

/// A single-element selector: `#id` or `.class`.
///
/// Class selectors resolve to the first match in document order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Selector {
    Id(String),
    Class(String),
}

impl Selector {
    pub fn id(id: impl Into<String>) -> Self {
        Selector::Id(id.into())
    }

    pub fn class(class: impl Into<String>) -> Self {
        Selector::Class(class.into())
    }
}

impl FromStr for Selector {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let kind = chars.next();
        let name = chars.as_str();
        let valid_name = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        match kind {
            Some('#') if valid_name => Ok(Selector::Id(name.to_string())),
            Some('.') if valid_name => Ok(Selector::Class(name.to_string())),
            _ => Err(ViewError::InvalidSelector(s.to_string())),
        }
    }
}

impl TryFrom<String> for Selector {
    type Error = ViewError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Selector> for String {
    fn from(selector: Selector) -> Self {
        selector.to_string()
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Id(id) => write!(f, "#{}", id),
            Selector::Class(class) => write!(f, ".{}", class),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_and_class() {
        assert_eq!(
            "#reset-password-email".parse::<Selector>().unwrap(),
            Selector::id("reset-password-email")
        );
        assert_eq!(
            ".js-reset-success".parse::<Selector>().unwrap(),
            Selector::class("js-reset-success")
        );
    }

    #[test]
    fn test_parse_rejects_compound_selectors() {
        assert!("div.hidden".parse::<Selector>().is_err());
        assert!("#a .b".parse::<Selector>().is_err());
        assert!("#".parse::<Selector>().is_err());
        assert!("".parse::<Selector>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_serde() {
        let selector = Selector::class("js-reset-fail");
        let json = serde_json::to_string(&selector).unwrap();
        assert_eq!(json, r#"".js-reset-fail""#);
        let back: Selector = serde_json::from_str(&json).unwrap();
        assert_eq!(back, selector);
    }
}
