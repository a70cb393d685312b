//! The password reset view: validate, request, reflect the outcome.

use account_fetch::{FetchClient, FetchError, HttpTransport, Request, Response};
use account_view::{Dom, Renderer};
use serde::Serialize;
use serde_json::json;

use crate::config::ResetConfig;
use crate::event::SubmitEvent;
use crate::state::{Banner, BannerSet, FormState, SubmissionResult};
use crate::validator::{EmailValidator, Validator};
use crate::ResetError;

/// Body of the reset request.
#[derive(Serialize)]
struct ResetForm<'a> {
    email: &'a str,
}

/// Ties a settlement to the submission that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

/// A validated submission whose request has not settled yet.
#[derive(Debug, Clone)]
pub struct Submission {
    ticket: Ticket,
    request: Request,
}

impl Submission {
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn into_parts(self) -> (Ticket, Request) {
        (self.ticket, self.request)
    }
}

/// Result of the synchronous half of a submit.
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// Validation passed; the request must be sent and then resolved.
    Sent(Submission),
    /// Validation failed; nothing was sent.
    Rejected,
    /// A request is already in flight; the submit was dropped.
    Ignored,
}

/// Password reset form controller.
///
/// Owns the form state and the document it rendered into. Banner visibility
/// is recomputed from [`FormState`] on every transition.
pub struct PasswordResetView<D: Dom, T: HttpTransport> {
    config: ResetConfig,
    dom: D,
    client: FetchClient<T>,
    validator: Box<dyn Validator>,
    state: FormState,
    last_error: Option<ResetError>,
    pending: Option<Ticket>,
    next_ticket: u64,
}

impl<D: Dom, T: HttpTransport> PasswordResetView<D, T> {
    /// Render the form into `config.container` with the default email validator.
    pub fn new(
        config: ResetConfig,
        renderer: &dyn Renderer,
        dom: D,
        transport: T,
    ) -> Result<Self, ResetError> {
        let validator = EmailValidator::new(config.email_rules);
        Self::with_validator(config, renderer, dom, transport, validator)
    }

    /// Render the form into `config.container` with a custom validator.
    pub fn with_validator(
        config: ResetConfig,
        renderer: &dyn Renderer,
        mut dom: D,
        transport: T,
        validator: impl Validator + 'static,
    ) -> Result<Self, ResetError> {
        let markup = render_form(&config, renderer)?;
        dom.inject(&config.container, &markup)?;

        let mut view = Self {
            config,
            dom,
            client: FetchClient::new(transport),
            validator: Box::new(validator),
            state: FormState::Idle,
            last_error: None,
            pending: None,
            next_ticket: 0,
        };
        view.apply(FormState::Idle)?;
        Ok(view)
    }

    /// Add a header sent with every reset request (e.g. a CSRF token).
    pub fn with_default_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.client = self.client.with_default_header(key, value);
        self
    }

    /// Replace the validator used by subsequent submits.
    pub fn set_validator(&mut self, validator: impl Validator + 'static) {
        self.validator = Box::new(validator);
    }

    /// Go back to the configured [`EmailValidator`].
    pub fn use_default_validator(&mut self) {
        self.validator = Box::new(EmailValidator::new(self.config.email_rules));
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    /// Error behind the current state, if it is an error state.
    pub fn last_error(&self) -> Option<&ResetError> {
        self.last_error.as_ref()
    }

    /// Ticket of the request in flight, if any.
    pub fn pending(&self) -> Option<Ticket> {
        self.pending
    }

    pub fn config(&self) -> &ResetConfig {
        &self.config
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    pub fn transport(&self) -> &T {
        self.client.transport()
    }

    /// Banners the current state calls for.
    pub fn banners(&self) -> BannerSet {
        BannerSet::for_state(self.state)
    }

    /// Whether `banner` is visible in the document.
    pub fn is_banner_visible(&self, banner: Banner) -> Result<bool, ResetError> {
        let hidden = self.dom.is_hidden(self.config.banners.selector(banner))?;
        Ok(!hidden)
    }

    /// Validate the email field and, if it passes, build the reset request.
    ///
    /// The caller sends the returned request and hands the result to
    /// [`resolve`](Self::resolve). [`submit`](Self::submit) does both.
    pub fn begin_submit(&mut self, event: &mut SubmitEvent) -> Result<SubmitOutcome, ResetError> {
        event.prevent_default();

        if self.pending.is_some() {
            tracing::debug!(
                trigger = ?event.trigger(),
                "submit ignored while a request is in flight"
            );
            return Ok(SubmitOutcome::Ignored);
        }

        // The trimmed value is both validated and sent.
        let raw = self.dom.value(&self.config.email_input())?;
        let email = raw.trim();
        let valid = self.validator.validate(email);

        let Some(next) = self.state.after_submit(valid) else {
            return Ok(SubmitOutcome::Ignored);
        };

        if !valid {
            self.apply(next)?;
            self.last_error = Some(ResetError::Validation);
            return Ok(SubmitOutcome::Rejected);
        }

        let request = self
            .client
            .post(self.config.endpoint.as_str())
            .form(&ResetForm { email })?
            .build();

        self.apply(next)?;
        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        self.pending = Some(ticket);
        self.last_error = None;

        tracing::info!(
            trigger = ?event.trigger(),
            endpoint = %self.config.endpoint,
            "password reset requested"
        );
        Ok(SubmitOutcome::Sent(Submission { ticket, request }))
    }

    /// Apply the settlement of the request issued under `ticket`.
    ///
    /// Settlements for anything but the pending ticket are ignored.
    pub fn resolve(
        &mut self,
        ticket: Ticket,
        result: Result<Response, FetchError>,
    ) -> Result<FormState, ResetError> {
        if self.pending != Some(ticket) {
            tracing::debug!(?ticket, "ignoring settlement for a request that is not pending");
            return Ok(self.state);
        }
        self.pending = None;

        let (outcome, error) = match result.and_then(Response::error_for_status) {
            Ok(response) => {
                tracing::info!(status = response.status, "password reset accepted");
                (SubmissionResult::Ok, None)
            }
            Err(err) => {
                tracing::warn!(error = %err, "password reset request failed");
                (SubmissionResult::Failed, Some(ResetError::Request(err)))
            }
        };

        let Some(next) = self.state.after_settle(outcome) else {
            return Ok(self.state);
        };
        // A settlement cannot be replayed, so the state advances even when
        // the document rejects the update.
        self.last_error = error;
        let projected = self.project(next);
        self.enter(next);
        projected?;
        Ok(self.state)
    }

    /// Run one full submission cycle: validate, send, resolve.
    pub async fn submit(&mut self, event: &mut SubmitEvent) -> Result<FormState, ResetError> {
        match self.begin_submit(event)? {
            SubmitOutcome::Sent(submission) => {
                let (ticket, request) = submission.into_parts();
                let result = self.client.send(request).await;
                self.resolve(ticket, result)
            }
            SubmitOutcome::Rejected | SubmitOutcome::Ignored => Ok(self.state),
        }
    }

    /// Project `state` onto the document, then enter it.
    ///
    /// The state is left unchanged if any document write fails.
    fn apply(&mut self, state: FormState) -> Result<(), ResetError> {
        self.project(state)?;
        self.enter(state);
        Ok(())
    }

    fn enter(&mut self, state: FormState) {
        let previous = std::mem::replace(&mut self.state, state);
        tracing::debug!(from = %previous, to = %state, "form state transition");
    }

    /// Show the banners and form that `state` calls for.
    ///
    /// Every target is looked up before the first write, so a missing
    /// element leaves the document untouched.
    fn project(&mut self, state: FormState) -> Result<(), ResetError> {
        let form = self.config.form();
        for banner in Banner::ALL {
            self.dom.is_hidden(self.config.banners.selector(banner))?;
        }
        self.dom.is_hidden(&form)?;

        let banners = BannerSet::for_state(state);
        for banner in Banner::ALL {
            let selector = self.config.banners.selector(banner);
            self.dom.set_hidden(selector, !banners.is_visible(banner))?;
        }

        if state == FormState::ValidationFailed {
            self.dom.set_text(
                &self.config.banners.validation_error,
                &self.config.copy.validation_message,
            )?;
        }

        let hide_form = state == FormState::Succeeded && self.config.hide_form_on_success;
        self.dom.set_hidden(&form, hide_form)?;
        Ok(())
    }
}

fn render_form(config: &ResetConfig, renderer: &dyn Renderer) -> Result<String, ResetError> {
    let email_field = renderer.render(
        &config.templates.field,
        &json!({
            "id": config.email_id,
            "name": "email",
            "type": "email",
            "label": config.copy.email_label,
            "instructions": config.copy.email_instructions,
            "required": "required",
        }),
    )?;

    let form = renderer.render(
        &config.templates.form,
        &json!({
            "form_id": config.form_id,
            "fields": email_field,
            "submit_label": config.copy.submit_label,
            "success_message": config.copy.success_message,
            "validation_message": config.copy.validation_message,
            "server_error_message": config.copy.server_error_message,
        }),
    )?;

    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use account_fetch::{Method, RecordingTransport};
    use account_view::{MemoryDom, Selector, TemplateRegistry, ViewError};
    use futures::executor::block_on;
    use std::cell::RefCell;
    use std::rc::Rc;

    type TestView = PasswordResetView<MemoryDom, RecordingTransport>;

    fn fixture() -> MemoryDom {
        MemoryDom::from_html("<div id='password-reset-wrapper'></div>")
    }

    fn make_view(transport: &RecordingTransport) -> TestView {
        PasswordResetView::new(
            ResetConfig::default(),
            &TemplateRegistry::with_defaults(),
            fixture(),
            transport.clone(),
        )
        .unwrap()
    }

    fn enter_email(view: &mut TestView, email: &str) {
        let input = view.config().email_input();
        view.dom_mut().set_value(&input, email).unwrap();
    }

    fn visible(view: &TestView) -> Vec<Banner> {
        Banner::ALL
            .into_iter()
            .filter(|b| view.is_banner_visible(*b).unwrap())
            .collect()
    }

    fn form_hidden(view: &TestView) -> bool {
        view.dom().is_hidden(&view.config().form()).unwrap()
    }

    /// Replace the rendered form with a bare email input.
    fn strip_to_email_input(view: &mut TestView) {
        let container = view.config().container.clone();
        view.dom_mut()
            .inject(&container, "<input id='reset-password-email' type='email'>")
            .unwrap();
    }

    fn restore_form(view: &mut TestView) {
        let markup = render_form(view.config(), &TemplateRegistry::with_defaults()).unwrap();
        let container = view.config().container.clone();
        view.dom_mut().inject(&container, &markup).unwrap();
    }

    #[test]
    fn test_renders_idle_form() {
        let view = make_view(&RecordingTransport::new());

        assert_eq!(view.state(), FormState::Idle);
        for banner in Banner::ALL {
            assert!(!view.is_banner_visible(banner).unwrap());
        }
        assert!(!form_hidden(&view));
        assert_eq!(
            view.dom().tag(&Selector::id("reset-password-email")).unwrap(),
            "input"
        );
        assert_eq!(
            view.dom().text(&Selector::class("js-reset")).unwrap(),
            "Reset my password"
        );
    }

    #[test]
    fn test_submit_prevents_default() {
        let transport = RecordingTransport::new();
        let mut view = make_view(&transport);
        let mut event = SubmitEvent::click();

        block_on(view.submit(&mut event)).unwrap();

        assert!(event.default_prevented());
    }

    #[test]
    fn test_resubmit_while_pending_is_ignored() {
        let transport = RecordingTransport::new();
        let mut view = make_view(&transport);
        enter_email(&mut view, "foo@bar.baz");

        let first = view.begin_submit(&mut SubmitEvent::click()).unwrap();
        let second = view.begin_submit(&mut SubmitEvent::click()).unwrap();

        assert!(matches!(first, SubmitOutcome::Sent(_)));
        assert!(matches!(second, SubmitOutcome::Ignored));
        assert_eq!(view.state(), FormState::AwaitingResponse);
    }

    #[test]
    fn test_ignored_submit_still_prevents_default() {
        let transport = RecordingTransport::new();
        let mut view = make_view(&transport);
        enter_email(&mut view, "foo@bar.baz");
        view.begin_submit(&mut SubmitEvent::click()).unwrap();

        let mut event = SubmitEvent::submit();
        let outcome = view.begin_submit(&mut event).unwrap();

        assert!(matches!(outcome, SubmitOutcome::Ignored));
        assert!(event.default_prevented());
    }

    #[test]
    fn test_email_is_trimmed_before_validation_and_send() {
        let transport = RecordingTransport::new();
        transport.respond_with_json(200, serde_json::json!({}));
        let mut view = make_view(&transport);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        view.set_validator(move |email: &str| {
            log.borrow_mut().push(email.to_string());
            true
        });
        enter_email(&mut view, "  foo@bar.baz \n");

        let state = block_on(view.submit(&mut SubmitEvent::click())).unwrap();

        assert_eq!(state, FormState::Succeeded);
        assert_eq!(*seen.borrow(), vec!["foo@bar.baz".to_string()]);
        assert_eq!(
            transport.last_request().unwrap().body_text(),
            Some("email=foo%40bar.baz")
        );
    }

    #[test]
    fn test_whitespace_only_email_is_rejected() {
        let transport = RecordingTransport::new();
        let mut view = make_view(&transport);
        enter_email(&mut view, " \t\n");

        let state = block_on(view.submit(&mut SubmitEvent::click())).unwrap();

        assert_eq!(state, FormState::ValidationFailed);
        assert_eq!(transport.request_count(), 0);
    }

    #[test]
    fn test_failed_projection_does_not_lock_the_form() {
        let transport = RecordingTransport::new();
        let mut view = make_view(&transport);
        strip_to_email_input(&mut view);
        enter_email(&mut view, "foo@bar.baz");

        let result = view.begin_submit(&mut SubmitEvent::click());

        assert!(matches!(
            result,
            Err(ResetError::View(ViewError::ElementNotFound(_)))
        ));
        assert_eq!(view.pending(), None);
        assert_eq!(view.state(), FormState::Idle);
        assert_eq!(view.last_error(), None);

        restore_form(&mut view);
        enter_email(&mut view, "foo@bar.baz");
        let outcome = view.begin_submit(&mut SubmitEvent::click()).unwrap();

        assert!(matches!(outcome, SubmitOutcome::Sent(_)));
        assert_eq!(view.state(), FormState::AwaitingResponse);
        assert!(!form_hidden(&view));
    }

    #[test]
    fn test_failed_projection_leaves_banners_untouched() {
        let transport = RecordingTransport::new();
        let mut view = make_view(&transport);
        enter_email(&mut view, "nope");
        block_on(view.submit(&mut SubmitEvent::click())).unwrap();

        // Banners and input survive, the form element does not.
        let container = view.config().container.clone();
        let without_form = "<div class='js-reset-success hidden'></div>\
                            <div class='js-reset-errors'></div>\
                            <div class='js-reset-fail hidden'></div>\
                            <input id='reset-password-email' type='email'>";
        view.dom_mut().inject(&container, without_form).unwrap();
        enter_email(&mut view, "foo@bar.baz");

        let result = view.begin_submit(&mut SubmitEvent::click());

        assert!(result.is_err());
        assert_eq!(view.state(), FormState::ValidationFailed);
        assert_eq!(view.pending(), None);
        assert_eq!(visible(&view), vec![Banner::ValidationError]);
    }

    #[test]
    fn test_settlement_advances_state_when_document_update_fails() {
        let transport = RecordingTransport::new();
        let mut view = make_view(&transport);
        enter_email(&mut view, "foo@bar.baz");
        let SubmitOutcome::Sent(submission) = view.begin_submit(&mut SubmitEvent::click()).unwrap()
        else {
            panic!("expected a request");
        };
        strip_to_email_input(&mut view);

        let result = view.resolve(submission.ticket(), Ok(Response::with_status(200)));

        assert!(result.is_err());
        assert_eq!(view.pending(), None);
        assert_eq!(view.state(), FormState::Succeeded);

        restore_form(&mut view);
        enter_email(&mut view, "foo@bar.baz");
        let outcome = view.begin_submit(&mut SubmitEvent::click()).unwrap();
        assert!(matches!(outcome, SubmitOutcome::Sent(_)));
    }

    #[test]
    fn test_stale_ticket_is_ignored() {
        let transport = RecordingTransport::new();
        let mut view = make_view(&transport);
        enter_email(&mut view, "foo@bar.baz");

        let SubmitOutcome::Sent(first) = view.begin_submit(&mut SubmitEvent::click()).unwrap()
        else {
            panic!("expected a request");
        };
        view.resolve(first.ticket(), Ok(Response::with_status(500))).unwrap();
        let SubmitOutcome::Sent(second) = view.begin_submit(&mut SubmitEvent::click()).unwrap()
        else {
            panic!("expected a request");
        };

        let state = view
            .resolve(first.ticket(), Ok(Response::with_status(200)))
            .unwrap();

        assert_eq!(state, FormState::AwaitingResponse);
        assert_eq!(view.pending(), Some(second.ticket()));
    }

    #[test]
    fn test_transport_failure_is_request_error() {
        let transport = RecordingTransport::new();
        transport.fail_with("connection refused");
        let mut view = make_view(&transport);
        enter_email(&mut view, "foo@bar.baz");

        let state = block_on(view.submit(&mut SubmitEvent::click())).unwrap();

        assert_eq!(state, FormState::RequestFailed);
        assert!(view.is_banner_visible(Banner::ServerError).unwrap());
        let error = view.last_error().unwrap();
        assert!(matches!(error, ResetError::Request(FetchError::RequestError(_))));
        assert!(error.is_recoverable());
    }

    #[test]
    fn test_client_error_status_is_request_error() {
        let transport = RecordingTransport::new();
        transport.respond_with_status(403);
        let mut view = make_view(&transport);
        enter_email(&mut view, "foo@bar.baz");

        block_on(view.submit(&mut SubmitEvent::click())).unwrap();

        assert_eq!(view.state(), FormState::RequestFailed);
        assert_eq!(
            view.last_error().and_then(|e| match e {
                ResetError::Request(err) => err.status(),
                _ => None,
            }),
            Some(403)
        );
    }

    #[test]
    fn test_validation_failure_sets_banner_text() {
        let transport = RecordingTransport::new();
        let mut view = make_view(&transport);
        enter_email(&mut view, "not-an-email");

        let state = block_on(view.submit(&mut SubmitEvent::submit())).unwrap();

        assert_eq!(state, FormState::ValidationFailed);
        assert_eq!(view.last_error(), Some(&ResetError::Validation));
        assert_eq!(
            view.dom()
                .text(view.config().banners.selector(Banner::ValidationError))
                .unwrap(),
            "Please enter a valid email address."
        );
        assert_eq!(transport.request_count(), 0);
    }

    #[test]
    fn test_form_hidden_on_success_and_shown_on_resubmit() {
        let transport = RecordingTransport::new();
        transport.respond_with_json(200, serde_json::json!({}));
        let mut view = make_view(&transport);
        enter_email(&mut view, "foo@bar.baz");

        block_on(view.submit(&mut SubmitEvent::click())).unwrap();
        assert!(form_hidden(&view));

        view.begin_submit(&mut SubmitEvent::click()).unwrap();
        assert!(!form_hidden(&view));
        assert_eq!(view.state(), FormState::AwaitingResponse);
    }

    #[test]
    fn test_form_kept_on_success_when_configured() {
        let transport = RecordingTransport::new();
        transport.respond_with_json(200, serde_json::json!({}));
        let config = ResetConfig {
            hide_form_on_success: false,
            ..ResetConfig::default()
        };
        let mut view = PasswordResetView::new(
            config,
            &TemplateRegistry::with_defaults(),
            fixture(),
            transport.clone(),
        )
        .unwrap();
        enter_email(&mut view, "foo@bar.baz");

        block_on(view.submit(&mut SubmitEvent::click())).unwrap();

        assert_eq!(view.state(), FormState::Succeeded);
        assert!(!form_hidden(&view));
    }

    #[test]
    fn test_default_header_and_endpoint() {
        let transport = RecordingTransport::new();
        transport.respond_with_json(200, serde_json::json!({}));
        let config = ResetConfig {
            endpoint: "/api/reset".to_string(),
            ..ResetConfig::default()
        };
        let mut view = PasswordResetView::new(
            config,
            &TemplateRegistry::with_defaults(),
            fixture(),
            transport.clone(),
        )
        .unwrap()
        .with_default_header("X-CSRFToken", "abc");
        enter_email(&mut view, "foo@bar.baz");

        block_on(view.submit(&mut SubmitEvent::click())).unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.url, "/api/reset");
        assert_eq!(request.header("X-CSRFToken"), Some("abc"));
    }

    #[test]
    fn test_missing_container_is_view_error() {
        let result = PasswordResetView::new(
            ResetConfig::default(),
            &TemplateRegistry::with_defaults(),
            MemoryDom::from_html("<div id='elsewhere'></div>"),
            RecordingTransport::new(),
        );

        assert!(matches!(
            result,
            Err(ResetError::View(ViewError::ElementNotFound(_)))
        ));
    }

    #[test]
    fn test_missing_template_is_view_error() {
        let result = PasswordResetView::new(
            ResetConfig::default(),
            &TemplateRegistry::new(),
            fixture(),
            RecordingTransport::new(),
        );

        let Err(error) = result else {
            panic!("expected an error");
        };
        assert!(!error.is_recoverable());
        assert_eq!(
            error,
            ResetError::View(ViewError::TemplateNotFound(
                "student_account/form_field".to_string()
            ))
        );
    }
}
