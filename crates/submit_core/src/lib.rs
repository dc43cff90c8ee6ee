pub mod classifier;
pub mod config;
pub mod controller;
pub mod document;
pub mod form;
pub mod notifier;
pub mod selector;
pub mod session;
pub mod transport;
pub mod validator;

pub use classifier::{classify, Outcome};
pub use config::{Hooks, SendDecision, SubmitConfig, SubmitOptions};
pub use controller::{FormBinding, FormHandler, SubmitReport, UNRECOGNIZED_RESPONSE_WARNING};
pub use document::{Document, DocumentError, PageSpec, StaticDocument};
pub use form::{FieldRule, FormElement, MemoryField, MemoryForm, RuleKind, SubmitEvent};
pub use notifier::{ConsoleNotifier, Notifier, TracingNotifier};
pub use selector::Selector;
pub use session::FormSession;
pub use transport::{
    HttpTransport, ResponseHeaders, Transport, TransportError, TransportResponse,
};
pub use validator::{NoopValidator, RequiredFieldsValidator, Validator};
