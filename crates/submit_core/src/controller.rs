use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    sync::Arc,
};

use shared::{
    domain::Method,
    error::ConfigurationError,
    protocol::{OutcomeKind, RequestDescriptor},
};
use tracing::{debug, error, warn};

use crate::{
    classifier::{classify, Outcome},
    config::{FormHook, SendDecision, SubmitConfig, SubmitOptions},
    document::Document,
    form::{describe, FormElement, SubmitEvent},
    selector::Selector,
    session::FormSession,
    transport::{HttpTransport, Transport},
    validator::{NoopValidator, Validator},
};

pub const UNRECOGNIZED_RESPONSE_WARNING: &str =
    "No valid callback detected. Ensure your response type matches the expected async handling!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitReport {
    /// Another submission of the same form was in flight; nothing happened.
    Ignored,
    /// The form was left to submit natively. The in-flight flag stays set
    /// because the page is expected to unload.
    NativeSubmission,
    Completed(OutcomeKind),
}

pub struct FormHandler {
    selector: Selector,
    config: Arc<SubmitConfig>,
    validator: Arc<dyn Validator>,
    transport: Arc<dyn Transport>,
}

impl FormHandler {
    /// Fails immediately on an empty or malformed selector, before anything
    /// is wired. Uses [`HttpTransport`] and no validation engine.
    pub fn init(selector: &str, options: SubmitOptions) -> Result<Self, ConfigurationError> {
        let selector = Selector::parse(selector)?;
        let transport = HttpTransport::new()?;
        Ok(Self {
            selector,
            config: Arc::new(SubmitConfig::resolve(options)),
            validator: Arc::new(NoopValidator),
            transport: Arc::new(transport),
        })
    }

    pub fn with_collaborators(
        selector: &str,
        options: SubmitOptions,
        validator: Arc<dyn Validator>,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ConfigurationError> {
        Ok(Self {
            selector: Selector::parse(selector)?,
            config: Arc::new(SubmitConfig::resolve(options)),
            validator,
            transport,
        })
    }

    pub fn with_validator(mut self, validator: Arc<dyn Validator>) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub fn config(&self) -> &SubmitConfig {
        &self.config
    }

    /// Waits for the document, then binds every form matching at that
    /// moment. Forms added afterwards are not picked up.
    pub async fn attach(&self, document: &dyn Document) -> Vec<Arc<FormBinding>> {
        document.ready().await;

        let forms = document.query_selector_all(&self.selector);
        if forms.is_empty() {
            warn!(selector = %self.selector, "selector does not match any element");
        }
        debug!(selector = %self.selector, count = forms.len(), "binding forms");

        forms
            .into_iter()
            .map(|form| Arc::new(self.bind(form)))
            .collect()
    }

    pub fn bind(&self, form: Arc<dyn FormElement>) -> FormBinding {
        FormBinding {
            form,
            session: FormSession::new(),
            config: self.config.clone(),
            validator: self.validator.clone(),
            transport: self.transport.clone(),
        }
    }
}

pub struct FormBinding {
    form: Arc<dyn FormElement>,
    session: FormSession,
    config: Arc<SubmitConfig>,
    validator: Arc<dyn Validator>,
    transport: Arc<dyn Transport>,
}

impl FormBinding {
    pub fn form(&self) -> &Arc<dyn FormElement> {
        &self.form
    }

    pub fn is_in_flight(&self) -> bool {
        self.session.is_in_flight()
    }

    pub fn last_outcome_succeeded(&self) -> bool {
        self.session.outcome_succeeded()
    }

    /// Runs one submission attempt for `event`. The network request is the
    /// only await point.
    pub async fn submit(&self, event: &mut SubmitEvent) -> SubmitReport {
        let label = describe(self.form.as_ref());

        if self.session.is_in_flight() {
            event.prevent_default();
            warn!(form = %label, "submission already in progress; ignoring duplicate");
            return SubmitReport::Ignored;
        }
        event.stop_propagation();

        if self.config.enable_validation() && !self.passes_validation(&label) {
            event.prevent_default();
            debug!(form = %label, "validation failed; submission aborted");
            return SubmitReport::Completed(OutcomeKind::ValidationFailure);
        }

        // Only reachable when two tasks race past the check above.
        if !self.session.try_begin() {
            event.prevent_default();
            warn!(form = %label, "submission already in progress; ignoring duplicate");
            return SubmitReport::Ignored;
        }
        self.call_form_hook(&label, "set_loading_state", &self.config.hooks().set_loading_state);

        if self.config.hands_off_to_native() {
            debug!(form = %label, "no async handling configured; submitting natively");
            return SubmitReport::NativeSubmission;
        }
        event.prevent_default();

        let mut cleanup = Cleanup::new(self, &label);

        let fields = self.form.fields();
        let method = Method::from_declared(self.form.declared_method().as_deref());
        let mut request = RequestDescriptor::new(self.form.action(), method, fields.clone());

        if let Some(before_send) = &self.config.hooks().before_send {
            let decision = isolate(&label, "before_send", || {
                before_send(self.form.as_ref(), &fields, &mut request)
            });
            // A panicking gate cannot vouch for the request either.
            if decision.unwrap_or(SendDecision::Cancel) == SendDecision::Cancel {
                debug!(form = %label, "before_send cancelled the submission");
                return SubmitReport::Completed(OutcomeKind::CancelledByHook);
            }
        }

        debug!(
            form = %label,
            method = %request.method,
            url = %request.url,
            "sending form"
        );
        let outcome = match self.transport.send(request).await {
            Ok(response) => classify(response).await,
            Err(err) => Outcome::TransportFailure(err.into()),
        };

        let kind = outcome.kind();
        debug!(form = %label, outcome = ?kind, "response classified");
        self.dispatch(&label, outcome);
        cleanup.settle(kind.is_success());
        SubmitReport::Completed(kind)
    }

    fn passes_validation(&self, label: &str) -> bool {
        if !self.validator.is_available() {
            warn!(form = %label, "validator not available; validation skipped");
            return true;
        }
        self.validator.parse_declarative_rules(self.form.as_ref());
        self.validator.is_valid(self.form.as_ref())
    }

    fn dispatch(&self, label: &str, outcome: Outcome) {
        let hooks = self.config.hooks();
        let form = self.form.as_ref();

        match outcome {
            Outcome::Json(payload) => {
                match &hooks.on_json_response {
                    Some(hook) => {
                        isolate(label, "on_json_response", || hook(form, &payload));
                    }
                    None => warn!(form = %label, "JSON response has no on_json_response hook"),
                }
            }
            Outcome::Markup(html) => {
                match &hooks.on_partial_view_response {
                    Some(hook) => {
                        isolate(label, "on_partial_view_response", || hook(form, &html));
                    }
                    None => warn!(
                        form = %label,
                        "partial view response has no on_partial_view_response hook"
                    ),
                }
            }
            Outcome::Unrecognized => {
                isolate(label, "notifier.warning", || {
                    self.config.notifier().warning(UNRECOGNIZED_RESPONSE_WARNING)
                });
            }
            Outcome::TransportFailure(reason) => {
                warn!(form = %label, reason = %reason, "submission failed");
                match &hooks.on_error_response {
                    Some(hook) => {
                        isolate(label, "on_error_response", || hook(form, &reason));
                    }
                    None => {
                        isolate(label, "notifier.error", || {
                            self.config.notifier().error(&reason.message)
                        });
                    }
                }
            }
            Outcome::ValidationFailure | Outcome::CancelledByHook => {}
        }
    }

    fn call_form_hook(&self, label: &str, name: &'static str, hook: &Option<FormHook>) {
        if let Some(hook) = hook {
            isolate(label, name, || hook(self.form.as_ref()));
        }
    }
}

/// Restores the form when a submission ends, on every path out of the async
/// branch, including the submit future being dropped mid-request. Runs
/// exactly once.
struct Cleanup<'a> {
    binding: &'a FormBinding,
    label: &'a str,
    succeeded: Option<bool>,
}

impl<'a> Cleanup<'a> {
    fn new(binding: &'a FormBinding, label: &'a str) -> Self {
        Self {
            binding,
            label,
            succeeded: None,
        }
    }

    fn settle(&mut self, succeeded: bool) {
        self.binding.session.record_outcome(succeeded);
        self.succeeded = Some(succeeded);
    }
}

impl Drop for Cleanup<'_> {
    fn drop(&mut self) {
        let binding = self.binding;
        binding.call_form_hook(
            self.label,
            "reset_loading_state",
            &binding.config.hooks().reset_loading_state,
        );
        binding.session.release();

        // No outcome means cancelled before a response; fields stay as typed.
        if let Some(succeeded) = self.succeeded {
            if binding.config.resets_after(succeeded) {
                binding.form.reset();
            }
        }
        debug!(form = %self.label, succeeded = ?self.succeeded, "submission cleaned up");
    }
}

/// Runs a caller hook so that a panic inside it is logged instead of
/// unwinding through the lifecycle.
fn isolate<R>(label: &str, hook: &'static str, call: impl FnOnce() -> R) -> Option<R> {
    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(value) => Some(value),
        Err(payload) => {
            error!(form = %label, hook, panic = %panic_message(payload.as_ref()), "hook panicked");
            None
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
