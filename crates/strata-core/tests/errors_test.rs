use strata_core::errors::*;

#[test]
fn capsule_not_found_carries_id() {
    let err = StrataError::CapsuleNotFound { id: 4242 };
    assert!(err.to_string().contains("4242"));
}

#[test]
fn invalid_edge_carries_endpoints() {
    let err: StrataError = GraphError::InvalidEdge { from: 7, to: 7 }.into();
    let msg = err.to_string();
    assert!(msg.contains("7 -> 7"));
    assert!(msg.contains("self-edges"));
}

#[test]
fn embedding_failures_surface_as_unavailable() {
    let err: StrataError = EmbeddingError::ProviderUnavailable {
        provider: "ollama".into(),
    }
    .into();
    assert!(matches!(err, StrataError::EmbeddingUnavailable(_)));
    assert!(err.to_string().contains("ollama"));
}

#[test]
fn worker_errors_are_flagged_as_recoverable() {
    let timeout: StrataError = WorkerError::Timeout {
        url: "http://w1".into(),
        timeout_ms: 12_000,
    }
    .into();
    assert!(timeout.is_worker_failure());
    assert!(timeout.to_string().contains("12000ms"));

    let missing = StrataError::CapsuleNotFound { id: 1 };
    assert!(!missing.is_worker_failure());
}

#[test]
fn malformed_configuration_names_field() {
    let err: StrataError = ConfigError::Malformed {
        field: "layer_budgets".into(),
        reason: "expected integer".into(),
    }
    .into();
    assert!(err.to_string().contains("layer_budgets"));
}
