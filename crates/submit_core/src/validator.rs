use crate::form::{FieldRule, FormElement, RuleKind};

/// Client-side validation engine consumed by the controller.
pub trait Validator: Send + Sync {
    fn is_available(&self) -> bool;

    /// Reads the form's declarative rules. Idempotent: later calls for an
    /// already parsed form do nothing.
    fn parse_declarative_rules(&self, form: &dyn FormElement);

    /// Checks the form, rendering visible error state as a side effect.
    fn is_valid(&self, form: &dyn FormElement) -> bool;
}

/// Stand-in when no validation engine is installed. Reports itself as
/// unavailable, so the controller skips validation with a warning.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopValidator;

impl Validator for NoopValidator {
    fn is_available(&self) -> bool {
        false
    }

    fn parse_declarative_rules(&self, _form: &dyn FormElement) {}

    fn is_valid(&self, _form: &dyn FormElement) -> bool {
        true
    }
}

/// Enforces `required` and `maxlength` rules declared on the form. Parsed
/// rules are stored on the form itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct RequiredFieldsValidator;

impl RequiredFieldsValidator {
    pub fn new() -> Self {
        Self
    }
}

impl Validator for RequiredFieldsValidator {
    fn is_available(&self) -> bool {
        true
    }

    fn parse_declarative_rules(&self, form: &dyn FormElement) {
        if form.parsed_rules().is_none() {
            form.store_parsed_rules(form.declared_rules());
        }
    }

    fn is_valid(&self, form: &dyn FormElement) -> bool {
        self.parse_declarative_rules(form);
        let rules = form
            .parsed_rules()
            .unwrap_or_else(|| form.declared_rules());
        let fields = form.fields();
        form.clear_field_errors();

        let mut valid = true;
        for rule in &rules {
            let value = fields
                .get(&rule.field)
                .and_then(|v| v.as_text())
                .unwrap_or_default();
            let violation = match rule.kind {
                RuleKind::Required if value.trim().is_empty() => {
                    Some("This field is required.".to_string())
                }
                RuleKind::MaxLength(max) if value.chars().count() > max => {
                    Some(format!("Please enter no more than {max} characters."))
                }
                _ => None,
            };
            if let Some(message) = violation {
                form.show_field_error(&rule.field, &message);
                valid = false;
            }
        }
        valid
    }
}

#[cfg(test)]
#[path = "tests/validator_tests.rs"]
mod tests;
