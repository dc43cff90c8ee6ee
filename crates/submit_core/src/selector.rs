use std::{fmt, iter::Peekable, str::Chars, str::FromStr};

use shared::error::ConfigurationError;

use crate::form::FormElement;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    alternatives: Vec<Compound>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<AttributeMatch>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttributeMatch {
    name: String,
    value: Option<String>,
}

impl Selector {
    pub fn parse(raw: &str) -> Result<Self, ConfigurationError> {
        let source = raw.trim();
        if source.is_empty() {
            return Err(ConfigurationError::EmptySelector);
        }

        let alternatives = split_list(source)
            .into_iter()
            .map(|part| parse_compound(source, part))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            source: source.to_string(),
            alternatives,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, form: &dyn FormElement) -> bool {
        self.alternatives.iter().any(|c| c.matches(form))
    }
}

impl FromStr for Selector {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl Compound {
    fn matches(&self, form: &dyn FormElement) -> bool {
        if self.tag.as_deref().is_some_and(|tag| tag != "form") {
            return false;
        }
        if let Some(id) = &self.id {
            if form.id().as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.is_empty() {
            let class_list = form.class_list();
            if !self.classes.iter().all(|c| class_list.contains(c)) {
                return false;
            }
        }
        self.attributes
            .iter()
            .all(|attr| match (form.attribute(&attr.name), &attr.value) {
                (Some(_), None) => true,
                (Some(actual), Some(expected)) => actual == *expected,
                (None, _) => false,
            })
    }
}

/// Splits on top-level commas; commas inside `[...]` belong to the value.
fn split_list(source: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, c) in source.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&source[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(&source[start..]);
    parts
}

fn parse_compound(source: &str, part: &str) -> Result<Compound, ConfigurationError> {
    let invalid = |reason: String| ConfigurationError::InvalidSelector {
        selector: source.to_string(),
        reason,
    };

    let part = part.trim();
    if part.is_empty() {
        return Err(invalid("empty entry in selector list".into()));
    }

    let mut compound = Compound::default();
    let mut chars = part.chars().peekable();

    match chars.peek() {
        Some('*') => {
            chars.next();
        }
        Some(c) if is_ident_char(*c) => {
            compound.tag = Some(take_ident(&mut chars).to_ascii_lowercase());
        }
        _ => {}
    }

    while let Some(c) = chars.next() {
        match c {
            '#' => {
                let id = take_ident(&mut chars);
                if id.is_empty() {
                    return Err(invalid("expected an id after '#'".into()));
                }
                if compound.id.replace(id).is_some() {
                    return Err(invalid("more than one id in a compound selector".into()));
                }
            }
            '.' => {
                let class = take_ident(&mut chars);
                if class.is_empty() {
                    return Err(invalid("expected a class name after '.'".into()));
                }
                compound.classes.push(class);
            }
            '[' => compound
                .attributes
                .push(parse_attribute(&mut chars).map_err(invalid)?),
            c if c.is_whitespace() || matches!(c, '>' | '+' | '~') => {
                return Err(invalid("combinators are not supported".into()));
            }
            other => return Err(invalid(format!("unexpected character {other:?}"))),
        }
    }

    Ok(compound)
}

fn parse_attribute(chars: &mut Peekable<Chars<'_>>) -> Result<AttributeMatch, String> {
    let mut inner = String::new();
    loop {
        match chars.next() {
            Some(']') => break,
            Some(c) => inner.push(c),
            None => return Err("unterminated attribute selector".into()),
        }
    }

    let (name, value) = match inner.split_once('=') {
        Some((name, value)) => (name.trim(), Some(unquote(value.trim()))),
        None => (inner.trim(), None),
    };
    if name.is_empty() || !name.chars().all(is_ident_char) {
        return Err(format!("invalid attribute name {name:?}"));
    }

    Ok(AttributeMatch {
        name: name.to_ascii_lowercase(),
        value: value.map(str::to_string),
    })
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

fn take_ident(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut ident = String::new();
    while let Some(&c) = chars.peek() {
        if !is_ident_char(c) {
            break;
        }
        ident.push(c);
        chars.next();
    }
    ident
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

#[cfg(test)]
#[path = "tests/selector_tests.rs"]
mod tests;
