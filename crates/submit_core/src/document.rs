use std::{collections::HashMap, fs, path::Path, sync::Arc};

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::watch;
use url::Url;

use crate::{
    form::{FormElement, MemoryField, MemoryForm},
    selector::Selector,
};

#[async_trait]
pub trait Document: Send + Sync {
    /// Resolves once the document has finished loading.
    async fn ready(&self);

    fn query_selector_all(&self, selector: &Selector) -> Vec<Arc<dyn FormElement>>;
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read page description {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid page description: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid url {url:?}: {source}")]
    Url {
        url: String,
        source: url::ParseError,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageSpec {
    pub base_url: String,
    #[serde(default)]
    pub forms: Vec<FormSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FormSpec {
    pub id: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
    #[serde(default)]
    pub action: String,
    pub method: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub required: bool,
    pub max_length: Option<usize>,
}

#[derive(Debug)]
pub struct StaticDocument {
    base_url: Url,
    forms: Vec<Arc<MemoryForm>>,
    ready: watch::Sender<bool>,
}

impl StaticDocument {
    pub fn new(base_url: Url) -> Self {
        let (ready, _) = watch::channel(false);
        Self {
            base_url,
            forms: Vec::new(),
            ready,
        }
    }

    pub fn from_page(page: PageSpec) -> Result<Self, DocumentError> {
        let base_url = Url::parse(&page.base_url).map_err(|source| DocumentError::Url {
            url: page.base_url.clone(),
            source,
        })?;
        let mut document = Self::new(base_url);

        for spec in page.forms {
            let action = document.resolve_action(&spec.action)?;
            let mut form = MemoryForm::new(action);
            if let Some(id) = spec.id {
                form = form.with_id(id);
            }
            for class in spec.classes {
                form = form.with_class(class);
            }
            for (name, value) in spec.attributes {
                form = form.with_attribute(name, value);
            }
            if let Some(method) = spec.method {
                form = form.with_method(method);
            }
            for field in spec.fields {
                let mut memory_field = MemoryField::text(field.name, field.value);
                if field.required {
                    memory_field = memory_field.required();
                }
                if let Some(max) = field.max_length {
                    memory_field = memory_field.max_length(max);
                }
                form = form.with_field(memory_field);
            }
            document.add_form(form);
        }

        document.mark_ready();
        Ok(document)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, DocumentError> {
        Self::from_page(toml::from_str(raw)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves a form action the way a browser does: relative to the page,
    /// with an empty action meaning the page itself.
    pub fn resolve_action(&self, action: &str) -> Result<String, DocumentError> {
        let action = action.trim();
        if action.is_empty() {
            return Ok(self.base_url.to_string());
        }
        self.base_url
            .join(action)
            .map(String::from)
            .map_err(|source| DocumentError::Url {
                url: action.to_string(),
                source,
            })
    }

    pub fn add_form(&mut self, form: MemoryForm) -> Arc<MemoryForm> {
        let form = Arc::new(form);
        self.forms.push(form.clone());
        form
    }

    pub fn forms(&self) -> &[Arc<MemoryForm>] {
        &self.forms
    }

    pub fn form_by_id(&self, id: &str) -> Option<Arc<MemoryForm>> {
        self.forms
            .iter()
            .find(|form| form.id().as_deref() == Some(id))
            .cloned()
    }

    pub fn mark_ready(&self) {
        self.ready.send_replace(true);
    }

    pub fn is_ready(&self) -> bool {
        *self.ready.borrow()
    }
}

#[async_trait]
impl Document for StaticDocument {
    async fn ready(&self) {
        let mut rx = self.ready.subscribe();
        // The sender lives as long as `self`, so this cannot close early.
        let _ = rx.wait_for(|ready| *ready).await;
    }

    fn query_selector_all(&self, selector: &Selector) -> Vec<Arc<dyn FormElement>> {
        self.forms
            .iter()
            .filter(|form| selector.matches(form.as_ref()))
            .map(|form| form.clone() as Arc<dyn FormElement>)
            .collect()
    }
}

#[cfg(test)]
#[path = "tests/document_tests.rs"]
mod tests;
