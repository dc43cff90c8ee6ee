use std::{fmt, sync::Arc};

use serde_json::Value;
use shared::{domain::FormFields, error::FailureReason, protocol::RequestDescriptor};

use crate::{
    form::FormElement,
    notifier::{ConsoleNotifier, Notifier},
};

pub type FormHook = Arc<dyn Fn(&dyn FormElement) + Send + Sync>;
pub type JsonResponseHook = Arc<dyn Fn(&dyn FormElement, &Value) + Send + Sync>;
pub type PartialViewHook = Arc<dyn Fn(&dyn FormElement, &str) + Send + Sync>;
pub type ErrorResponseHook = Arc<dyn Fn(&dyn FormElement, &FailureReason) + Send + Sync>;
pub type BeforeSendHook = Arc<
    dyn Fn(&dyn FormElement, &FormFields, &mut RequestDescriptor) -> SendDecision + Send + Sync,
>;

/// What `before_send` wants done with the prepared request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SendDecision {
    #[default]
    Proceed,
    Cancel,
}

impl From<bool> for SendDecision {
    fn from(proceed: bool) -> Self {
        if proceed {
            Self::Proceed
        } else {
            Self::Cancel
        }
    }
}

impl From<()> for SendDecision {
    fn from(_: ()) -> Self {
        Self::Proceed
    }
}

#[derive(Clone, Default)]
pub struct Hooks {
    pub on_json_response: Option<JsonResponseHook>,
    pub on_partial_view_response: Option<PartialViewHook>,
    pub on_error_response: Option<ErrorResponseHook>,
    pub before_send: Option<BeforeSendHook>,
    pub set_loading_state: Option<FormHook>,
    pub reset_loading_state: Option<FormHook>,
}

impl Hooks {
    fn merged_over(self, defaults: Hooks) -> Hooks {
        Hooks {
            on_json_response: self.on_json_response.or(defaults.on_json_response),
            on_partial_view_response: self
                .on_partial_view_response
                .or(defaults.on_partial_view_response),
            on_error_response: self.on_error_response.or(defaults.on_error_response),
            before_send: self.before_send.or(defaults.before_send),
            set_loading_state: self.set_loading_state.or(defaults.set_loading_state),
            reset_loading_state: self.reset_loading_state.or(defaults.reset_loading_state),
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("on_json_response", &self.on_json_response.is_some())
            .field(
                "on_partial_view_response",
                &self.on_partial_view_response.is_some(),
            )
            .field("on_error_response", &self.on_error_response.is_some())
            .field("before_send", &self.before_send.is_some())
            .field("set_loading_state", &self.set_loading_state.is_some())
            .field("reset_loading_state", &self.reset_loading_state.is_some())
            .finish()
    }
}

#[derive(Clone, Default)]
pub struct SubmitOptions {
    pub async_response: Option<bool>,
    pub enable_validation: Option<bool>,
    pub reset_on_success: Option<bool>,
    pub reset_on_error: Option<bool>,
    pub hooks: Hooks,
    pub notifier: Option<Arc<dyn Notifier>>,
}

impl SubmitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn async_response(mut self, enabled: bool) -> Self {
        self.async_response = Some(enabled);
        self
    }

    pub fn enable_validation(mut self, enabled: bool) -> Self {
        self.enable_validation = Some(enabled);
        self
    }

    pub fn reset_on_success(mut self, reset: bool) -> Self {
        self.reset_on_success = Some(reset);
        self
    }

    pub fn reset_on_error(mut self, reset: bool) -> Self {
        self.reset_on_error = Some(reset);
        self
    }

    pub fn on_json_response<F>(mut self, hook: F) -> Self
    where
        F: Fn(&dyn FormElement, &Value) + Send + Sync + 'static,
    {
        self.hooks.on_json_response = Some(Arc::new(hook));
        self
    }

    pub fn on_partial_view_response<F>(mut self, hook: F) -> Self
    where
        F: Fn(&dyn FormElement, &str) + Send + Sync + 'static,
    {
        self.hooks.on_partial_view_response = Some(Arc::new(hook));
        self
    }

    pub fn on_error_response<F>(mut self, hook: F) -> Self
    where
        F: Fn(&dyn FormElement, &FailureReason) + Send + Sync + 'static,
    {
        self.hooks.on_error_response = Some(Arc::new(hook));
        self
    }

    /// Returning `false` (or [`SendDecision::Cancel`]) cancels the submission.
    pub fn before_send<F, R>(mut self, hook: F) -> Self
    where
        F: Fn(&dyn FormElement, &FormFields, &mut RequestDescriptor) -> R + Send + Sync + 'static,
        R: Into<SendDecision>,
    {
        self.hooks.before_send = Some(Arc::new(
            move |form: &dyn FormElement,
                  fields: &FormFields,
                  request: &mut RequestDescriptor|
                  -> SendDecision { hook(form, fields, request).into() },
        ));
        self
    }

    pub fn set_loading_state<F>(mut self, hook: F) -> Self
    where
        F: Fn(&dyn FormElement) + Send + Sync + 'static,
    {
        self.hooks.set_loading_state = Some(Arc::new(hook));
        self
    }

    pub fn reset_loading_state<F>(mut self, hook: F) -> Self
    where
        F: Fn(&dyn FormElement) + Send + Sync + 'static,
    {
        self.hooks.reset_loading_state = Some(Arc::new(hook));
        self
    }

    pub fn notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Some(Arc::new(notifier));
        self
    }
}

/// Resolved configuration. Built once per controller and shared read-only
/// by every form it binds.
#[derive(Clone)]
pub struct SubmitConfig {
    async_response: bool,
    enable_validation: bool,
    reset_on_success: bool,
    reset_on_error: bool,
    hooks: Hooks,
    notifier: Arc<dyn Notifier>,
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            async_response: false,
            enable_validation: true,
            reset_on_success: true,
            reset_on_error: true,
            hooks: Hooks::default(),
            notifier: Arc::new(ConsoleNotifier),
        }
    }
}

impl SubmitConfig {
    pub fn resolve(options: SubmitOptions) -> Self {
        let defaults = Self::default();
        Self {
            async_response: options.async_response.unwrap_or(defaults.async_response),
            enable_validation: options
                .enable_validation
                .unwrap_or(defaults.enable_validation),
            reset_on_success: options.reset_on_success.unwrap_or(defaults.reset_on_success),
            reset_on_error: options.reset_on_error.unwrap_or(defaults.reset_on_error),
            hooks: options.hooks.merged_over(defaults.hooks),
            notifier: options.notifier.unwrap_or(defaults.notifier),
        }
    }

    pub fn async_response(&self) -> bool {
        self.async_response
    }

    pub fn enable_validation(&self) -> bool {
        self.enable_validation
    }

    pub fn reset_on_success(&self) -> bool {
        self.reset_on_success
    }

    pub fn reset_on_error(&self) -> bool {
        self.reset_on_error
    }

    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    /// True when the controller must let the browser submit natively:
    /// async handling is off, or no success hook could consume a response.
    pub fn hands_off_to_native(&self) -> bool {
        !self.async_response
            || (self.hooks.on_json_response.is_none()
                && self.hooks.on_partial_view_response.is_none())
    }

    pub fn resets_after(&self, succeeded: bool) -> bool {
        if succeeded {
            self.reset_on_success
        } else {
            self.reset_on_error
        }
    }
}

impl fmt::Debug for SubmitConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmitConfig")
            .field("async_response", &self.async_response)
            .field("enable_validation", &self.enable_validation)
            .field("reset_on_success", &self.reset_on_success)
            .field("reset_on_error", &self.reset_on_error)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
