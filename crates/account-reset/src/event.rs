//! UI events that trigger a submission.

/// What the user did to submit the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitTrigger {
    /// Button activation.
    Click,
    /// Native form submission (e.g. Enter in the email field).
    Submit,
}

/// A submission event from the host page.
///
/// The form always suppresses the default action so the page does not
/// navigate away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitEvent {
    trigger: SubmitTrigger,
    default_prevented: bool,
}

impl SubmitEvent {
    pub fn new(trigger: SubmitTrigger) -> Self {
        Self {
            trigger,
            default_prevented: false,
        }
    }

    pub fn click() -> Self {
        Self::new(SubmitTrigger::Click)
    }

    pub fn submit() -> Self {
        Self::new(SubmitTrigger::Submit)
    }

    pub fn trigger(&self) -> SubmitTrigger {
        self.trigger
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}
