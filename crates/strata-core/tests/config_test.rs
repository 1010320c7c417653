use std::collections::HashMap;

use strata_core::config::*;
use strata_core::MemoryLayer;

#[test]
fn config_loads_from_empty_toml_with_all_defaults() {
    let config = StrataConfig::from_toml("").unwrap();

    // Storage defaults
    assert_eq!(config.storage.db_path, "strata.db");
    assert_eq!(config.storage.read_pool_size, 4);

    // Ingest defaults
    assert_eq!(config.ingest.window_chars, 850);
    assert_eq!(config.ingest.overlap_chars, 150);
    assert_eq!(config.ingest.step(), 700);
    assert_eq!(config.ingest.summary_threshold_chars, 4000);

    // Scoring defaults
    assert_eq!(config.scoring.weights.semantic, 0.46);
    assert_eq!(config.scoring.weights.decay, 0.17);
    assert_eq!(config.scoring.layer_weight(MemoryLayer::L0Hot), 1.15);
    assert_eq!(config.scoring.layer_weight(MemoryLayer::L5Cold), 0.6);

    // Admission defaults
    assert_eq!(config.admission.max_active_contexts, 8);
    assert_eq!(config.admission.layer_budget(MemoryLayer::L2Session), 4);

    // Graph / validation / maintenance defaults
    assert_eq!(config.graph.prune_weight_below, 0.18);
    assert_eq!(config.validation.contradiction_threshold, 0.55);
    assert_eq!(config.maintenance.promote_threshold, 0.68);
    assert_eq!(config.maintenance.demote_threshold, 0.22);

    // Worker defaults
    assert!(config.workers.urls.is_empty());
    assert_eq!(config.workers.timeout_secs, 12);
}

#[test]
fn config_loads_partial_toml_with_overrides() {
    let toml = r#"
[admission]
top_k = 3

[scoring.layer_weights]
L0_HOT = 1.4
L2_SESSION = 0.9
"#;
    let config = StrataConfig::from_toml(toml).unwrap();
    assert_eq!(config.admission.top_k, 3);
    // Non-overridden fields keep defaults
    assert_eq!(config.admission.max_active_contexts, 8);
    assert_eq!(config.scoring.layer_weight(MemoryLayer::L0Hot), 1.4);
    assert_eq!(config.scoring.layer_weight(MemoryLayer::L2Session), 0.9);
    // Layers missing from an explicit map fall back to 1.0
    assert_eq!(config.scoring.layer_weight(MemoryLayer::L5Cold), 1.0);
}

#[test]
fn malformed_layer_map_falls_back_instead_of_failing() {
    let toml = r#"
[admission]
max_active_contexts = 5

[admission.layer_budgets]
L0_HOT = "lots"
"#;
    let config = StrataConfig::from_toml(toml).unwrap();
    assert!(config.admission.layer_budgets.is_empty());
    // Unknown budgets default to the global cap.
    assert_eq!(config.admission.layer_budget(MemoryLayer::L0Hot), 5);
}

#[test]
fn unknown_layer_name_in_weights_falls_back() {
    let toml = r#"
[scoring.layer_weights]
L7_LUKEWARM = 2.0
"#;
    let config = StrataConfig::from_toml(toml).unwrap();
    assert_eq!(config.scoring.layer_weight(MemoryLayer::L0Hot), 1.0);
}

#[test]
fn malformed_toml_is_an_error_but_lenient_load_uses_defaults() {
    assert!(StrataConfig::from_toml("[admission\ntop_k = ").is_err());
    let config = StrataConfig::from_toml_lenient("[admission\ntop_k = ");
    assert_eq!(config.admission.top_k, 6);
}

#[test]
fn env_overrides_apply_and_ignore_garbage() {
    let mut env = HashMap::new();
    env.insert(ENV_LAYER_WEIGHTS, r#"{"L1_SHORT": 2.0}"#.to_string());
    env.insert(ENV_LAYER_BUDGETS, "{not json".to_string());
    env.insert(ENV_WORKER_URLS, "http://a:9000/, ,http://b:9000".to_string());

    let mut config = StrataConfig::default();
    config.apply_overrides_from(|key| env.get(key).cloned());

    assert_eq!(config.scoring.layer_weight(MemoryLayer::L1Short), 2.0);
    // Garbage budgets leave the defaults in place.
    assert_eq!(config.admission.layer_budget(MemoryLayer::L0Hot), 3);
    assert_eq!(config.workers.urls, vec!["http://a:9000", "http://b:9000"]);
}

#[test]
fn config_serde_roundtrip() {
    let config = StrataConfig::default();
    let json = serde_json::to_string(&config).unwrap();
    let roundtripped: StrataConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(roundtripped.storage.db_path, config.storage.db_path);
    assert_eq!(
        roundtripped.scoring.layer_weight(MemoryLayer::L3Durable),
        config.scoring.layer_weight(MemoryLayer::L3Durable)
    );
    assert_eq!(
        roundtripped.admission.layer_budget(MemoryLayer::L4Sparse),
        config.admission.layer_budget(MemoryLayer::L4Sparse)
    );
}
