use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex, OnceLock,
    },
};

use shared::domain::FormFields;

/// A declarative constraint carried by the form markup
/// (`required`, `maxlength`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    pub field: String,
    pub kind: RuleKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Required,
    MaxLength(usize),
}

/// What the controller needs from a bound form. Implementations own the
/// actual element; the controller never keeps field values past a submission.
pub trait FormElement: Send + Sync {
    fn id(&self) -> Option<String>;

    fn class_list(&self) -> Vec<String>;

    fn attribute(&self, name: &str) -> Option<String>;

    /// Absolute submission target, already resolved against the page.
    fn action(&self) -> String;

    fn declared_method(&self) -> Option<String>;

    fn fields(&self) -> FormFields;

    fn reset(&self);

    fn declared_rules(&self) -> Vec<FieldRule> {
        Vec::new()
    }

    fn parsed_rules(&self) -> Option<Vec<FieldRule>> {
        None
    }

    fn store_parsed_rules(&self, _rules: Vec<FieldRule>) {}

    fn show_field_error(&self, _field: &str, _message: &str) {}

    fn clear_field_errors(&self) {}
}

pub fn describe(form: &dyn FormElement) -> String {
    match form.id() {
        Some(id) => format!("#{id}"),
        None => form.action(),
    }
}

/// The submit event being intercepted.
///
/// `default_prevented` means the browser's native submission does not
/// happen; `propagation_stopped` means no other submit handler sees it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmitEvent {
    default_prevented: bool,
    propagation_stopped: bool,
}

impl SubmitEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

#[derive(Debug, Clone)]
pub struct MemoryField {
    name: String,
    initial: String,
    value: String,
    required: bool,
    max_length: Option<usize>,
}

impl MemoryField {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            name: name.into(),
            initial: value.clone(),
            value,
            required: false,
            max_length: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }
}

#[derive(Debug)]
pub struct MemoryForm {
    id: Option<String>,
    classes: Vec<String>,
    attributes: HashMap<String, String>,
    action: String,
    method: Option<String>,
    fields: Mutex<Vec<MemoryField>>,
    errors: Mutex<Vec<(String, String)>>,
    parsed_rules: OnceLock<Vec<FieldRule>>,
    resets: AtomicUsize,
}

impl MemoryForm {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            id: None,
            classes: Vec::new(),
            attributes: HashMap::new(),
            action: action.into(),
            method: None,
            fields: Mutex::new(Vec::new()),
            errors: Mutex::new(Vec::new()),
            parsed_rules: OnceLock::new(),
            resets: AtomicUsize::new(0),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn with_field(self, field: MemoryField) -> Self {
        self.lock_fields().push(field);
        self
    }

    /// Simulates user input. Returns false when no such field exists.
    pub fn set_value(&self, name: &str, value: impl Into<String>) -> bool {
        let mut fields = self.lock_fields();
        match fields.iter_mut().find(|f| f.name == name) {
            Some(field) => {
                field.value = value.into();
                true
            }
            None => false,
        }
    }

    pub fn value(&self, name: &str) -> Option<String> {
        self.lock_fields()
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.clone())
    }

    pub fn errors(&self) -> Vec<(String, String)> {
        self.errors
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn reset_count(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }

    fn lock_fields(&self) -> std::sync::MutexGuard<'_, Vec<MemoryField>> {
        self.fields
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl FormElement for MemoryForm {
    fn id(&self) -> Option<String> {
        self.id.clone()
    }

    fn class_list(&self) -> Vec<String> {
        self.classes.clone()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        match name {
            "id" => self.id.clone(),
            "class" => (!self.classes.is_empty()).then(|| self.classes.join(" ")),
            "action" => Some(self.action.clone()),
            "method" => self.method.clone(),
            other => self.attributes.get(other).cloned(),
        }
    }

    fn action(&self) -> String {
        self.action.clone()
    }

    fn declared_method(&self) -> Option<String> {
        self.method.clone()
    }

    fn fields(&self) -> FormFields {
        let mut fields = FormFields::new();
        for field in self.lock_fields().iter() {
            fields.push_text(field.name.clone(), field.value.clone());
        }
        fields
    }

    fn reset(&self) {
        for field in self.lock_fields().iter_mut() {
            field.value = field.initial.clone();
        }
        self.clear_field_errors();
        self.resets.fetch_add(1, Ordering::SeqCst);
    }

    fn declared_rules(&self) -> Vec<FieldRule> {
        let mut rules = Vec::new();
        for field in self.lock_fields().iter() {
            if field.required {
                rules.push(FieldRule {
                    field: field.name.clone(),
                    kind: RuleKind::Required,
                });
            }
            if let Some(max) = field.max_length {
                rules.push(FieldRule {
                    field: field.name.clone(),
                    kind: RuleKind::MaxLength(max),
                });
            }
        }
        rules
    }

    fn parsed_rules(&self) -> Option<Vec<FieldRule>> {
        self.parsed_rules.get().cloned()
    }

    fn store_parsed_rules(&self, rules: Vec<FieldRule>) {
        let _ = self.parsed_rules.set(rules);
    }

    fn show_field_error(&self, field: &str, message: &str) {
        self.errors
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((field.to_string(), message.to_string()));
    }

    fn clear_field_errors(&self) {
        self.errors
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}
