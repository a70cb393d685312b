//! Email validation.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Decides whether the current email value may be submitted.
///
/// Called exactly once per submit with the field value read at that
/// moment, trimmed. That same string is what gets sent.
pub trait Validator {
    fn validate(&self, email: &str) -> bool;
}

impl<F> Validator for F
where
    F: Fn(&str) -> bool,
{
    fn validate(&self, email: &str) -> bool {
        self(email)
    }
}

/// Length bounds applied by [`EmailValidator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRules {
    #[serde(default = "default_min_length")]
    pub min_length: usize,
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

fn default_min_length() -> usize {
    3
}

fn default_max_length() -> usize {
    254
}

impl Default for EmailRules {
    fn default() -> Self {
        Self {
            min_length: default_min_length(),
            max_length: default_max_length(),
        }
    }
}

/// Format check: one `@`, a dot in the domain, no whitespace, and a
/// length within [`EmailRules`].
#[derive(Debug, Clone, Default)]
pub struct EmailValidator {
    rules: EmailRules,
}

impl EmailValidator {
    pub fn new(rules: EmailRules) -> Self {
        Self { rules }
    }

    /// Check `email`, returning the reason it was rejected.
    pub fn check(&self, email: &str) -> Result<(), String> {
        let len = email.chars().count();

        if len < self.rules.min_length {
            return Err(format!(
                "Email must be at least {} characters",
                self.rules.min_length
            ));
        }
        if len > self.rules.max_length {
            return Err(format!(
                "Email must be at most {} characters",
                self.rules.max_length
            ));
        }
        if !email_pattern().is_match(email) {
            return Err("Enter a valid email address".to_string());
        }
        Ok(())
    }
}

impl Validator for EmailValidator {
    fn validate(&self, email: &str) -> bool {
        match self.check(email) {
            Ok(()) => true,
            Err(reason) => {
                tracing::debug!(%reason, "email rejected");
                false
            }
        }
    }
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static email pattern"))
}
