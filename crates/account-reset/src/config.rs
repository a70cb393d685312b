//! Password reset form configuration.

use account_view::{templates, Selector};
use serde::{Deserialize, Serialize};

use crate::state::Banner;
use crate::validator::EmailRules;
use crate::ConfigError;

/// Configuration for a password reset form.
///
/// Every field has a default matching the built-in templates, so an empty
/// TOML document is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResetConfig {
    /// Endpoint the reset request is POSTed to.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Element the form shell is injected into.
    #[serde(default = "default_container")]
    pub container: Selector,

    /// `id` given to the rendered form element.
    #[serde(default = "default_form_id")]
    pub form_id: String,

    /// `id` given to the rendered email input.
    #[serde(default = "default_email_id")]
    pub email_id: String,

    /// Hide the form once the server accepts the request.
    #[serde(default = "default_true")]
    pub hide_form_on_success: bool,

    #[serde(default)]
    pub banners: BannerSelectors,

    #[serde(default)]
    pub templates: TemplateNames,

    #[serde(default)]
    pub copy: FormCopy,

    #[serde(default)]
    pub email_rules: EmailRules,
}

fn default_endpoint() -> String {
    "/account/password".to_string()
}

fn default_container() -> Selector {
    Selector::id("password-reset-wrapper")
}

fn default_form_id() -> String {
    "password-reset-form".to_string()
}

fn default_email_id() -> String {
    "reset-password-email".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ResetConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            container: default_container(),
            form_id: default_form_id(),
            email_id: default_email_id(),
            hide_form_on_success: true,
            banners: BannerSelectors::default(),
            templates: TemplateNames::default(),
            copy: FormCopy::default(),
            email_rules: EmailRules::default(),
        }
    }
}

impl ResetConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Load config from a file; `.json` files are parsed as JSON, anything
    /// else as TOML.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;

        if path.ends_with(".json") {
            Ok(serde_json::from_str(&content)?)
        } else {
            Self::from_toml_str(&content)
        }
    }

    /// Selector for the rendered form element.
    pub fn form(&self) -> Selector {
        Selector::id(self.form_id.as_str())
    }

    /// Selector for the rendered email input.
    pub fn email_input(&self) -> Selector {
        Selector::id(self.email_id.as_str())
    }
}

/// Where each banner lives in the rendered form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannerSelectors {
    #[serde(default = "default_success")]
    pub success: Selector,
    #[serde(default = "default_validation_error")]
    pub validation_error: Selector,
    #[serde(default = "default_server_error")]
    pub server_error: Selector,
}

fn default_success() -> Selector {
    Selector::class("js-reset-success")
}

fn default_validation_error() -> Selector {
    Selector::class("js-reset-errors")
}

fn default_server_error() -> Selector {
    Selector::class("js-reset-fail")
}

impl Default for BannerSelectors {
    fn default() -> Self {
        Self {
            success: default_success(),
            validation_error: default_validation_error(),
            server_error: default_server_error(),
        }
    }
}

impl BannerSelectors {
    pub fn selector(&self, banner: Banner) -> &Selector {
        match banner {
            Banner::Success => &self.success,
            Banner::ValidationError => &self.validation_error,
            Banner::ServerError => &self.server_error,
        }
    }
}

/// Template names resolved through the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateNames {
    #[serde(default = "default_form_template")]
    pub form: String,
    #[serde(default = "default_field_template")]
    pub field: String,
}

fn default_form_template() -> String {
    templates::PASSWORD_RESET.to_string()
}

fn default_field_template() -> String {
    templates::FORM_FIELD.to_string()
}

impl Default for TemplateNames {
    fn default() -> Self {
        Self {
            form: default_form_template(),
            field: default_field_template(),
        }
    }
}

/// User-facing text rendered into the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormCopy {
    pub email_label: String,
    pub email_instructions: String,
    pub submit_label: String,
    pub success_message: String,
    pub validation_message: String,
    pub server_error_message: String,
}

impl Default for FormCopy {
    fn default() -> Self {
        Self {
            email_label: "Email".to_string(),
            email_instructions: "The email address you used to register with this site"
                .to_string(),
            submit_label: "Reset my password".to_string(),
            success_message: "Check your email for a password reset link.".to_string(),
            validation_message: "Please enter a valid email address.".to_string(),
            server_error_message:
                "We couldn't send the password reset email. Please try again.".to_string(),
        }
    }
}
