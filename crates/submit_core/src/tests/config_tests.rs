use super::*;
use crate::form::MemoryForm;

#[test]
fn defaults_match_documented_behaviour() {
    let config = SubmitConfig::default();
    assert!(!config.async_response());
    assert!(config.enable_validation());
    assert!(config.reset_on_success());
    assert!(config.reset_on_error());
    assert!(config.hooks().on_json_response.is_none());
    assert!(config.hands_off_to_native());
}

#[test]
fn overrides_win_and_unset_fields_keep_defaults() {
    let config = SubmitConfig::resolve(
        SubmitOptions::new()
            .async_response(true)
            .reset_on_error(false)
            .on_json_response(|_, _| {}),
    );

    assert!(config.async_response());
    assert!(config.enable_validation());
    assert!(config.reset_on_success());
    assert!(!config.reset_on_error());
    assert!(config.hooks().on_json_response.is_some());
    assert!(config.hooks().on_partial_view_response.is_none());
}

#[test]
fn async_without_success_hooks_still_hands_off_to_native() {
    let only_error = SubmitConfig::resolve(
        SubmitOptions::new()
            .async_response(true)
            .on_error_response(|_, _| {}),
    );
    assert!(only_error.hands_off_to_native());

    let with_markup = SubmitConfig::resolve(
        SubmitOptions::new()
            .async_response(true)
            .on_partial_view_response(|_, _| {}),
    );
    assert!(!with_markup.hands_off_to_native());

    let disabled = SubmitConfig::resolve(
        SubmitOptions::new()
            .async_response(false)
            .on_json_response(|_, _| {}),
    );
    assert!(disabled.hands_off_to_native());
}

#[test]
fn before_send_accepts_bool_and_unit_returns() {
    let form = MemoryForm::new("http://localhost/");
    let fields = FormFields::new();
    let mut request = RequestDescriptor::new("http://localhost/", Default::default(), FormFields::new());

    let cancelling = SubmitConfig::resolve(SubmitOptions::new().before_send(|_, _, _| false));
    let hook = cancelling.hooks().before_send.clone().expect("hook");
    assert_eq!(hook(&form, &fields, &mut request), SendDecision::Cancel);

    let mutating = SubmitConfig::resolve(SubmitOptions::new().before_send(
        |_, _, request: &mut RequestDescriptor| {
            request.headers.push(("X-Requested-With".into(), "XMLHttpRequest".into()));
        },
    ));
    let hook = mutating.hooks().before_send.clone().expect("hook");
    assert_eq!(hook(&form, &fields, &mut request), SendDecision::Proceed);
    assert_eq!(request.headers.len(), 1);
}

#[test]
fn resets_after_follows_outcome() {
    let config = SubmitConfig::resolve(
        SubmitOptions::new()
            .reset_on_success(false)
            .reset_on_error(true),
    );
    assert!(!config.resets_after(true));
    assert!(config.resets_after(false));
}

#[test]
fn debug_output_lists_configured_hooks() {
    let config = SubmitConfig::resolve(SubmitOptions::new().set_loading_state(|_| {}));
    let rendered = format!("{config:?}");
    assert!(rendered.contains("set_loading_state: true"), "{rendered}");
    assert!(rendered.contains("before_send: false"), "{rendered}");
}
