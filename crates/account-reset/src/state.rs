//! Form state machine and banner projection.

use serde::{Deserialize, Serialize};

/// State of the password reset form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FormState {
    /// Nothing submitted yet.
    #[default]
    Idle,
    /// A validated request is in flight.
    AwaitingResponse,
    /// The server accepted the reset request.
    Succeeded,
    /// The email failed local validation.
    ValidationFailed,
    /// The request failed in transport or with a non-2xx status.
    RequestFailed,
}

impl FormState {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormState::Idle => "idle",
            FormState::AwaitingResponse => "awaiting_response",
            FormState::Succeeded => "succeeded",
            FormState::ValidationFailed => "validation_failed",
            FormState::RequestFailed => "request_failed",
        }
    }

    /// Terminal states each show exactly one banner.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            FormState::Succeeded | FormState::ValidationFailed | FormState::RequestFailed
        )
    }

    /// State after a submit with the given validation result.
    ///
    /// Returns `None` while a request is in flight: the submit is ignored.
    pub fn after_submit(&self, valid: bool) -> Option<FormState> {
        match (self, valid) {
            (FormState::AwaitingResponse, _) => None,
            (_, true) => Some(FormState::AwaitingResponse),
            (_, false) => Some(FormState::ValidationFailed),
        }
    }

    /// State after the in-flight request settles.
    ///
    /// Returns `None` if nothing was in flight.
    pub fn after_settle(&self, result: SubmissionResult) -> Option<FormState> {
        match (self, result) {
            (FormState::AwaitingResponse, SubmissionResult::Ok) => Some(FormState::Succeeded),
            (FormState::AwaitingResponse, SubmissionResult::Failed) => {
                Some(FormState::RequestFailed)
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for FormState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one outbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionResult {
    /// Any 2xx status.
    Ok,
    /// Transport error or non-2xx status.
    Failed,
}

/// The three outcome banners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Banner {
    Success,
    ValidationError,
    ServerError,
}

impl Banner {
    pub const ALL: [Banner; 3] = [Banner::Success, Banner::ValidationError, Banner::ServerError];
}

/// Which banners are visible for a state.
///
/// This is a pure function of [`FormState`]; the view re-applies it to the
/// document on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BannerSet {
    visible: Option<Banner>,
}

impl BannerSet {
    pub fn for_state(state: FormState) -> Self {
        let visible = match state {
            FormState::Idle | FormState::AwaitingResponse => None,
            FormState::Succeeded => Some(Banner::Success),
            FormState::ValidationFailed => Some(Banner::ValidationError),
            FormState::RequestFailed => Some(Banner::ServerError),
        };
        Self { visible }
    }

    /// The visible banner, if any.
    pub fn visible(&self) -> Option<Banner> {
        self.visible
    }

    pub fn is_visible(&self, banner: Banner) -> bool {
        self.visible == Some(banner)
    }
}
