use super::*;

use std::{
    env, fs,
    time::{SystemTime, UNIX_EPOCH},
};

use clap::Parser;

fn isolated_env(tag: &str) -> (String, Environment) {
    let prefix = format!("SUBMIT_CLI_TEST_{tag}");
    let env = Environment::with_prefix(&prefix).separator("__");
    (prefix, env)
}

#[test]
fn defaults_apply_without_file_or_env() {
    let (_, env) = isolated_env("DEFAULTS");
    let settings = build_settings(None, env).expect("settings");

    assert_eq!(settings.selector, "form");
    assert!(settings.async_response);
    assert!(settings.enable_validation);
    assert!(settings.reset_on_success);
    assert!(settings.reset_on_error);
    assert_eq!(settings.timeout_ms, None);
    assert_eq!(settings.log_filter, "info");
}

#[test]
fn file_then_env_override_defaults() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("submit_cli_settings_{suffix}.toml"));
    fs::write(
        &path,
        "selector = \"form.ajax\"\nreset_on_error = false\ntimeout_ms = 2500\n",
    )
    .expect("write settings");

    let (prefix, env) = isolated_env("LAYERS");
    env::set_var(format!("{prefix}__SELECTOR"), "#checkout");
    env::set_var(format!("{prefix}__ENABLE_VALIDATION"), "false");
    let settings = build_settings(Some(path.as_path()), env);
    env::remove_var(format!("{prefix}__SELECTOR"));
    env::remove_var(format!("{prefix}__ENABLE_VALIDATION"));
    fs::remove_file(&path).expect("cleanup");

    let settings = settings.expect("settings");
    assert_eq!(settings.selector, "#checkout");
    assert!(!settings.enable_validation);
    assert!(!settings.reset_on_error);
    assert!(settings.reset_on_success);
    assert_eq!(settings.timeout_ms, Some(2500));
}

#[test]
fn explicit_missing_file_is_an_error() {
    let (_, env) = isolated_env("MISSING");
    let path = env::temp_dir().join("submit_cli_settings_does_not_exist.toml");
    assert!(build_settings(Some(path.as_path()), env).is_err());
}

#[test]
fn flags_win_over_loaded_settings() {
    let (_, env) = isolated_env("FLAGS");
    let mut settings = build_settings(None, env).expect("settings");
    let args = Args::try_parse_from([
        "submit_cli",
        "--page",
        "page.toml",
        "--selector",
        "#newsletter",
        "--sync",
        "--keep-fields",
        "--timeout-ms",
        "100",
    ])
    .expect("args");

    settings.apply(&args);

    assert_eq!(settings.selector, "#newsletter");
    assert!(!settings.async_response);
    assert!(settings.enable_validation);
    assert!(!settings.reset_on_success);
    assert!(!settings.reset_on_error);
    assert_eq!(settings.timeout_ms, Some(100));
}
