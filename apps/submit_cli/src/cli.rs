use std::{path::PathBuf, str::FromStr};

use clap::Parser;

#[derive(Parser, Debug)]
#[command(about = "Submit the forms of a TOML page description")]
pub struct Args {
    /// Page description (base_url plus [[forms]]).
    #[arg(long)]
    pub page: PathBuf,
    /// Settings file; defaults to ./submit.toml when present.
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub selector: Option<String>,
    /// Only submit the forms with these ids.
    #[arg(long = "form")]
    pub forms: Vec<String>,
    /// Field input as `form.field=value`, applied before submitting.
    #[arg(long = "set")]
    pub assignments: Vec<Assignment>,
    #[arg(long)]
    pub sync: bool,
    #[arg(long)]
    pub no_validation: bool,
    /// Leave fields as typed after every outcome.
    #[arg(long)]
    pub keep_fields: bool,
    #[arg(long)]
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub form: String,
    pub field: String,
    pub value: String,
}

impl FromStr for Assignment {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (target, value) = raw
            .split_once('=')
            .ok_or_else(|| format!("expected form.field=value, got {raw:?}"))?;
        let (form, field) = target
            .split_once('.')
            .ok_or_else(|| format!("expected form.field before '=', got {target:?}"))?;
        if form.is_empty() || field.is_empty() {
            return Err(format!("form and field must be non-empty in {raw:?}"));
        }
        Ok(Self {
            form: form.to_string(),
            field: field.to_string(),
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
#[path = "tests/cli_tests.rs"]
mod tests;
