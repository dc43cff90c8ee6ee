use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Head,
    #[default]
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// Resolves a form's declared method. Missing, blank or unknown values
    /// fall back to POST.
    pub fn from_declared(declared: Option<&str>) -> Self {
        match declared.map(str::trim) {
            Some(raw) if !raw.is_empty() => raw.parse().unwrap_or_default(),
            _ => Self::default(),
        }
    }

    /// Methods whose fields travel in the query string instead of a body.
    pub fn encodes_fields_in_query(self) -> bool {
        matches!(self, Self::Get | Self::Head)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl std::str::FromStr for Method {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "HEAD" => Ok(Self::Head),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            _ => Err(UnknownMethod(s.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown form method: {0}")]
pub struct UnknownMethod(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldValue {
    Text {
        value: String,
    },
    File {
        filename: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mime_type: Option<String>,
        bytes: Vec<u8>,
    },
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text {
            value: value.into(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { value } => Some(value),
            Self::File { .. } => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text { value } => value.trim().is_empty(),
            Self::File { bytes, .. } => bytes.is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    pub value: FieldValue,
}

/// Snapshot of a form's successful controls, in document order.
///
/// Names may repeat (checkbox groups, multi-selects), so this is a list and
/// not a map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormFields(Vec<FormField>);

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push(FormField {
            name: name.into(),
            value: FieldValue::text(value),
        });
    }

    pub fn push(&mut self, field: FormField) {
        self.0.push(field);
    }

    /// First value submitted under `name`.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.iter().find(|f| f.name == name).map(|f| &f.value)
    }

    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a FieldValue> + 'a {
        self.0.iter().filter(move |f| f.name == name).map(|f| &f.value)
    }

    /// Text pairs for query-string encoding; file parts are skipped.
    pub fn text_pairs(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .filter_map(|f| f.value.as_text().map(|v| (f.name.clone(), v.to_string())))
            .collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FormField> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a FormFields {
    type Item = &'a FormField;
    type IntoIter = std::slice::Iter<'a, FormField>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<FormField> for FormFields {
    fn from_iter<T: IntoIterator<Item = FormField>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_method_defaults_to_post() {
        assert_eq!(Method::from_declared(None), Method::Post);
        assert_eq!(Method::from_declared(Some("  ")), Method::Post);
        assert_eq!(Method::from_declared(Some("dialog")), Method::Post);
    }

    #[test]
    fn declared_method_is_case_insensitive() {
        assert_eq!(Method::from_declared(Some("get")), Method::Get);
        assert_eq!(Method::from_declared(Some(" Put ")), Method::Put);
    }

    #[test]
    fn text_pairs_skip_file_parts() {
        let mut fields = FormFields::new();
        fields.push_text("tag", "a");
        fields.push(FormField {
            name: "avatar".into(),
            value: FieldValue::File {
                filename: "me.png".into(),
                mime_type: Some("image/png".into()),
                bytes: vec![1, 2, 3],
            },
        });
        fields.push_text("tag", "b");

        assert_eq!(
            fields.text_pairs(),
            vec![("tag".to_string(), "a".to_string()), ("tag".to_string(), "b".to_string())]
        );
        assert_eq!(fields.get_all("tag").count(), 2);
    }
}
