use serde_json::json;
use whisper_params::{
    DecodingStrategy, Error, ParameterSet, Registry, Value, resolve, validate,
};

fn raw(json: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
    json.as_object().expect("test input must be an object").clone()
}

fn defaults() -> anyhow::Result<ParameterSet> {
    Ok(validate(&serde_json::Map::new())?)
}

#[test]
fn empty_configuration_equals_the_registry_defaults() -> anyhow::Result<()> {
    let set = defaults()?;

    for spec in Registry::global().specs() {
        assert_eq!(set.get(spec.name), Some(&spec.default));
    }
    assert!(set.is_auto("n_threads"));
    Ok(())
}

#[test]
fn defaults_round_trip_through_their_own_json_form() -> anyhow::Result<()> {
    let set = defaults()?;
    let revalidated = validate(&set.to_map())?;
    assert_eq!(set, revalidated);
    Ok(())
}

#[test]
fn resolved_sets_round_trip_too() -> anyhow::Result<()> {
    let set = resolve(validate(&raw(json!({ "strategy": 1, "language": "" })))?);
    let revalidated = validate(&set.to_map())?;
    assert_eq!(set, revalidated);
    Ok(())
}

#[test]
fn beam_search_scenario_activates_the_requested_group() -> anyhow::Result<()> {
    let set = validate(&raw(json!({
        "strategy": 1,
        "beam_search": { "beam_size": 5, "patience": 0.5 },
    })))?;

    assert_eq!(
        set.decoding_strategy(),
        DecodingStrategy::BeamSearch { beam_size: 5, patience: 0.5 }
    );
    assert_eq!(set.group_field("greedy", "best_of"), Some(&Value::Integer(-1)));
    Ok(())
}

#[test]
fn out_of_range_strategy_is_rejected() {
    let err = validate(&raw(json!({ "strategy": 2 }))).unwrap_err();
    match err {
        Error::InvalidOption { name, value, .. } => {
            assert_eq!(name, "strategy");
            assert_eq!(value, Value::Integer(2));
        }
        other => panic!("expected InvalidOption, got {other}"),
    }
}

#[test]
fn mistyped_temperature_is_rejected() {
    let err = validate(&raw(json!({ "temperature": "hot" }))).unwrap_err();
    assert_eq!(
        err.to_string(),
        "parameter `temperature` expects float, got string"
    );
}

#[test]
fn unknown_keys_are_rejected_outright() {
    let err = validate(&raw(json!({ "translate": true, "temprature": 0.2 }))).unwrap_err();
    assert_eq!(err.to_string(), "unknown parameter `temprature`");
}

#[test]
fn overrides_do_not_disturb_other_defaults() -> anyhow::Result<()> {
    let set = validate(&raw(json!({ "translate": true, "max_len": 50 })))?;
    let base = defaults()?;

    assert_eq!(set.boolean("translate"), Some(true));
    assert_eq!(set.integer("max_len"), Some(50));
    for name in Registry::global().all_names() {
        if name == "translate" || name == "max_len" {
            continue;
        }
        assert_eq!(set.get(name), base.get(name));
    }
    Ok(())
}

#[test]
fn all_language_auto_forms_agree_after_resolve() -> anyhow::Result<()> {
    let canonical = resolve(validate(&raw(json!({ "language": "auto" })))?);
    for input in [json!({ "language": null }), json!({ "language": "" })] {
        let set = resolve(validate(&raw(input))?);
        assert_eq!(set.text("language"), canonical.text("language"));
    }
    assert_eq!(canonical.text("language"), Some("auto"));
    Ok(())
}

#[test]
fn resolve_is_idempotent_for_any_valid_set() -> anyhow::Result<()> {
    for input in [
        json!({}),
        json!({ "strategy": 1, "beam_search": { "beam_size": 3 } }),
        json!({ "language": "", "n_threads": 8, "prompt_tokens": [50257] }),
    ] {
        let once = resolve(validate(&raw(input))?);
        assert_eq!(resolve(once.clone()), once);
    }
    Ok(())
}

#[test]
fn two_runs_validate_independently() -> anyhow::Result<()> {
    // No shared mutable state: each run owns its set, and differing inputs
    // produce differing sets without affecting each other.
    let first = resolve(validate(&raw(json!({ "temperature": 0.8 })))?);
    let second = resolve(validate(&raw(json!({ "temperature": 0.2 })))?);

    assert_eq!(first.float("temperature"), Some(0.8));
    assert_eq!(second.float("temperature"), Some(0.2));
    Ok(())
}
