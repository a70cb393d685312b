//! Built-in student account templates.

/// Password reset form shell.
pub const PASSWORD_RESET: &str = "student_account/password_reset";

/// Reusable labelled input.
pub const FORM_FIELD: &str = "student_account/form_field";

/// Context keys: `form_id`, `success_message`, `validation_message`,
/// `server_error_message`, `submit_label`, `fields` (raw markup).
pub const PASSWORD_RESET_SOURCE: &str = r#"<section id="password-reset-anchor" class="form-type">
  <div class="js-reset-success status submission-success hidden" aria-live="polite">{{ success_message }}</div>
  <div class="js-reset-errors status submission-error hidden" aria-live="polite">{{ validation_message }}</div>
  <div class="js-reset-fail status submission-error hidden" aria-live="polite">{{ server_error_message }}</div>
  <form id="{{ form_id }}" class="js-reset-form" method="post" novalidate>
    {{{ fields }}}
    <button type="submit" class="action action-primary js-reset">{{ submit_label }}</button>
  </form>
</section>
"#;

/// Context keys: `id`, `name`, `type`, `label`, `instructions`, `required`
/// (raw attribute text, empty or `required`).
pub const FORM_FIELD_SOURCE: &str = r#"<div class="form-field {{ type }}-{{ name }}">
  <label for="{{ id }}">{{ label }}</label>
  <input id="{{ id }}" type="{{ type }}" name="{{ name }}" class="input-block" value="" aria-describedby="{{ id }}-desc" {{{ required }}}>
  <span class="tip tip-input" id="{{ id }}-desc">{{ instructions }}</span>
</div>
"#;
