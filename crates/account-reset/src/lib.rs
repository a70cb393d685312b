//! Password reset form for student account pages.
//!
//! A [`PasswordResetView`] renders the reset form into a container, reads
//! the email field when the user submits, validates it, POSTs it to the
//! reset endpoint, and shows exactly one of three banners for the outcome.
//!
//! # Example
//!
//! ```rust,ignore
//! use account_fetch::RecordingTransport;
//! use account_reset::prelude::*;
//! use account_view::{MemoryDom, TemplateRegistry};
//!
//! let transport = RecordingTransport::new();
//! transport.respond_with_json(200, serde_json::json!({}));
//!
//! let mut view = PasswordResetView::new(
//!     ResetConfig::default(),
//!     &TemplateRegistry::with_defaults(),
//!     MemoryDom::from_html("<div id='password-reset-wrapper'></div>"),
//!     transport,
//! )?;
//!
//! let state = view.submit(&mut SubmitEvent::click()).await?;
//! ```

mod config;
mod error;
mod event;
mod state;
mod validator;
mod view;

pub use config::{BannerSelectors, FormCopy, ResetConfig, TemplateNames};
pub use error::{ConfigError, ResetError};
pub use event::{SubmitEvent, SubmitTrigger};
pub use state::{Banner, BannerSet, FormState, SubmissionResult};
pub use validator::{EmailRules, EmailValidator, Validator};
pub use view::{PasswordResetView, Submission, SubmitOutcome, Ticket};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        Banner, FormState, PasswordResetView, ResetConfig, ResetError, SubmitEvent,
        SubmitOutcome, Validator,
    };
}
