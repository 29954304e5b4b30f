//! Tests for error handling

use std::time::Duration;

use mfe_shell_sdk::{LoadError, OriginError};

#[test]
fn test_origin_error_converts_to_load_error() {
    let err: LoadError = OriginError::UntrustedOrigin {
        origin: "https://evil.example.com".into(),
        allowed: vec!["https://user.example.com".into()],
    }
    .into();

    assert_eq!(
        err,
        LoadError::UntrustedOrigin {
            origin: "https://evil.example.com".into(),
            allowed: vec!["https://user.example.com".into()],
        }
    );
    assert!(err.is_security());

    let err: LoadError = OriginError::InvalidUrl {
        url: "not a url".into(),
        reason: "relative URL without a base".into(),
    }
    .into();
    assert!(matches!(err, LoadError::InvalidUrl { .. }));
    assert!(err.is_security());
}

#[test]
fn test_untrusted_origin_message_lists_allow_list() {
    let err = LoadError::UntrustedOrigin {
        origin: "https://evil.example.com".into(),
        allowed: vec![
            "https://user.example.com".into(),
            "https://user-sit.example.com".into(),
        ],
    };

    assert_eq!(
        err.to_string(),
        "untrusted origin: https://evil.example.com \
         (allowed: https://user.example.com, https://user-sit.example.com)"
    );
}

#[test]
fn test_timeout_predicates() {
    let init = LoadError::InitializationTimeout {
        mount_function: "mountUserMFE".into(),
        waited: Duration::from_millis(2000),
    };
    assert!(init.is_timeout());
    assert!(!init.is_security());

    let script = LoadError::ScriptTimeout {
        script: "vendor.js".into(),
        waited: Duration::from_secs(30),
    };
    assert!(script.is_timeout());
    assert_eq!(script.failed_script(), Some("vendor.js"));
}

#[test]
fn test_contract_predicates() {
    let missing = LoadError::ContractViolation {
        module: "cartMFE/CartApp".into(),
        missing: "mount".into(),
    };
    assert!(missing.is_contract());

    let unavailable = LoadError::MountUnavailable {
        mount_function: "mountUserMFE".into(),
    };
    assert!(unavailable.is_contract());

    let failed = LoadError::MountFailed {
        reason: "boom".into(),
    };
    assert!(!failed.is_contract());
}

#[test]
fn test_failed_script_names_the_script() {
    let err = LoadError::ScriptLoad {
        script: "polyfills.js".into(),
        reason: "error event".into(),
    };
    assert_eq!(err.failed_script(), Some("polyfills.js"));
    assert_eq!(err.to_string(), "failed to load polyfills.js: error event");

    let import = LoadError::Import {
        module: "productsMFE/ProductsApp".into(),
        reason: "unreachable".into(),
    };
    assert_eq!(import.failed_script(), None);
}
