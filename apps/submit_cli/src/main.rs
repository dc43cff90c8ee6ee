mod cli;
mod settings;

use std::{sync::Arc, time::Duration};

use anyhow::{bail, Context, Result};
use clap::Parser;
use shared::protocol::RequestDescriptor;
use submit_core::{
    form::describe, FormHandler, RequiredFieldsValidator, StaticDocument, SubmitEvent,
    SubmitOptions, SubmitReport,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::{cli::Args, settings::Settings};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = settings::load_settings(args.config.as_deref())
        .context("failed to load settings")?;
    settings.apply(&args);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    debug!(?settings, "settings resolved");

    let document = StaticDocument::load(&args.page)
        .with_context(|| format!("failed to load page {}", args.page.display()))?;
    for assignment in &args.assignments {
        let form = document
            .form_by_id(&assignment.form)
            .with_context(|| format!("page has no form with id {:?}", assignment.form))?;
        if !form.set_value(&assignment.field, assignment.value.as_str()) {
            bail!(
                "form {:?} has no field {:?}",
                assignment.form,
                assignment.field
            );
        }
    }

    let handler = FormHandler::init(&settings.selector, submit_options(&settings))?
        .with_validator(Arc::new(RequiredFieldsValidator::new()));
    let bindings: Vec<_> = handler
        .attach(&document)
        .await
        .into_iter()
        .filter(|binding| {
            args.forms.is_empty()
                || binding
                    .form()
                    .id()
                    .is_some_and(|id| args.forms.contains(&id))
        })
        .collect();
    if bindings.is_empty() {
        bail!("no bound form to submit (selector {:?})", settings.selector);
    }

    for binding in &bindings {
        let label = describe(binding.form().as_ref());
        let mut event = SubmitEvent::new();
        let report = binding.submit(&mut event).await;
        println!("{label}: {}", render(report));
    }

    Ok(())
}

fn submit_options(settings: &Settings) -> SubmitOptions {
    let mut options = SubmitOptions::new()
        .async_response(settings.async_response)
        .enable_validation(settings.enable_validation)
        .reset_on_success(settings.reset_on_success)
        .reset_on_error(settings.reset_on_error)
        .on_json_response(|form, payload| {
            println!("{} -> JSON\n{payload:#}", describe(form));
        })
        .on_partial_view_response(|form, html| {
            println!("{} -> partial view\n{html}", describe(form));
        })
        .on_error_response(|form, reason| {
            eprintln!("{} -> {reason}", describe(form));
        })
        .set_loading_state(|form| info!(form = %describe(form), "submitting"))
        .reset_loading_state(|form| debug!(form = %describe(form), "done"));

    if let Some(timeout_ms) = settings.timeout_ms {
        let timeout = Duration::from_millis(timeout_ms);
        options = options.before_send(
            move |_, _, request: &mut RequestDescriptor| {
                request.timeout = Some(timeout);
            },
        );
    }
    options
}

fn render(report: SubmitReport) -> String {
    match report {
        SubmitReport::Ignored => "ignored (already submitting)".to_string(),
        SubmitReport::NativeSubmission => "left to native submission".to_string(),
        SubmitReport::Completed(kind) => format!("{kind:?}"),
    }
}
