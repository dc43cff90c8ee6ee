use super::*;
use crate::form::{MemoryField, MemoryForm};

use std::sync::atomic::{AtomicUsize, Ordering};

fn signup_form() -> MemoryForm {
    MemoryForm::new("http://localhost/signup")
        .with_field(MemoryField::text("email", "").required())
        .with_field(MemoryField::text("nickname", "").max_length(4))
}

#[test]
fn noop_validator_is_unavailable() {
    let form = signup_form();
    assert!(!NoopValidator.is_available());
    assert!(NoopValidator.is_valid(&form));
}

#[test]
fn required_field_must_not_be_blank() {
    let validator = RequiredFieldsValidator::new();
    let form = signup_form();
    form.set_value("email", "   ");

    assert!(!validator.is_valid(&form));
    assert_eq!(
        form.errors(),
        vec![("email".to_string(), "This field is required.".to_string())]
    );

    form.set_value("email", "a@example.com");
    assert!(validator.is_valid(&form));
    assert!(form.errors().is_empty());
}

#[test]
fn max_length_counts_characters() {
    let validator = RequiredFieldsValidator::new();
    let form = signup_form();
    form.set_value("email", "a@example.com");

    form.set_value("nickname", "ñañá");
    assert!(validator.is_valid(&form));

    form.set_value("nickname", "ñañáa");
    assert!(!validator.is_valid(&form));
    assert_eq!(form.errors()[0].0, "nickname");
}

struct CountingForm {
    inner: MemoryForm,
    rule_reads: AtomicUsize,
}

impl FormElement for CountingForm {
    fn id(&self) -> Option<String> {
        self.inner.id()
    }
    fn class_list(&self) -> Vec<String> {
        self.inner.class_list()
    }
    fn attribute(&self, name: &str) -> Option<String> {
        self.inner.attribute(name)
    }
    fn action(&self) -> String {
        self.inner.action()
    }
    fn declared_method(&self) -> Option<String> {
        self.inner.declared_method()
    }
    fn fields(&self) -> shared::domain::FormFields {
        self.inner.fields()
    }
    fn reset(&self) {
        self.inner.reset()
    }
    fn declared_rules(&self) -> Vec<FieldRule> {
        self.rule_reads.fetch_add(1, Ordering::SeqCst);
        self.inner.declared_rules()
    }
    fn parsed_rules(&self) -> Option<Vec<FieldRule>> {
        self.inner.parsed_rules()
    }
    fn store_parsed_rules(&self, rules: Vec<FieldRule>) {
        self.inner.store_parsed_rules(rules)
    }
}

#[test]
fn declarative_rules_are_parsed_once_per_form() {
    let validator = RequiredFieldsValidator::new();
    let form = CountingForm {
        inner: signup_form(),
        rule_reads: AtomicUsize::new(0),
    };

    validator.parse_declarative_rules(&form);
    validator.parse_declarative_rules(&form);
    validator.is_valid(&form);
    validator.is_valid(&form);

    assert_eq!(form.rule_reads.load(Ordering::SeqCst), 1);
}

#[test]
fn parsed_rules_stay_with_their_form() {
    let validator = RequiredFieldsValidator::new();

    // Dropping a form and allocating another of the same size tends to reuse
    // the address; the second form must not see the first form's rules.
    for _ in 0..16 {
        let strict = Box::new(signup_form());
        assert!(!validator.is_valid(strict.as_ref()));
        drop(strict);

        let free = Box::new(MemoryForm::new("http://localhost/free"));
        assert!(validator.is_valid(free.as_ref()));
        assert!(free.errors().is_empty());
    }
}

#[test]
fn forms_without_stored_rules_are_validated_from_declarations() {
    struct Stateless(MemoryForm);

    impl FormElement for Stateless {
        fn id(&self) -> Option<String> {
            self.0.id()
        }
        fn class_list(&self) -> Vec<String> {
            self.0.class_list()
        }
        fn attribute(&self, name: &str) -> Option<String> {
            self.0.attribute(name)
        }
        fn action(&self) -> String {
            self.0.action()
        }
        fn declared_method(&self) -> Option<String> {
            self.0.declared_method()
        }
        fn fields(&self) -> shared::domain::FormFields {
            self.0.fields()
        }
        fn reset(&self) {
            self.0.reset()
        }
        fn declared_rules(&self) -> Vec<FieldRule> {
            self.0.declared_rules()
        }
    }

    let form = Stateless(signup_form());
    assert!(!RequiredFieldsValidator::new().is_valid(&form));
    form.0.set_value("email", "a@example.com");
    assert!(RequiredFieldsValidator::new().is_valid(&form));
}
