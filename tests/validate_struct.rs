//! Integration tests for derived validation.
//!
//! These tests exercise `#[derive(Validate)]` end to end: rule tags, field
//! naming, nested paths and the error aggregate.

use serde::Serialize;
use tagcheck::prelude::*;
use tagcheck::{ConfigError, registry};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn errors_of(result: Result<(), Error>) -> ValidationErrors {
    match result {
        Err(Error::Validation(errors)) => errors,
        other => panic!("expected validation errors, got {:?}", other),
    }
}

fn reasons(list: &[&str]) -> Vec<String> {
    list.iter().map(|reason| reason.to_string()).collect()
}

// =============================================================================
// Fixtures
// =============================================================================

#[derive(Debug, Clone, Serialize, Validate)]
struct Address {
    #[validate("required,alpha")]
    city: String,

    #[serde(rename = "geo")]
    #[validate("omitempty,coordinates")]
    location: String,
}

#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
struct Contact {
    #[validate("required,email")]
    email: String,

    #[validate("phone")]
    phone_number: String,

    #[validate("timezone")]
    time_zone: String,

    #[validate("max=3,dive,alphanum")]
    tags: Vec<String>,

    #[validate("dive,omitempty,email")]
    cc: Vec<String>,

    #[validate(nested)]
    addresses: Vec<Address>,

    #[validate("required", nested)]
    billing: Option<Address>,

    notes: String,
}

fn boston() -> Address {
    Address {
        city: "Boston".to_string(),
        location: "42.3601,-71.0589".to_string(),
    }
}

fn valid_contact() -> Contact {
    Contact {
        email: "jane@example.com".to_string(),
        phone_number: "(555) 123-4567".to_string(),
        time_zone: "America/New_York".to_string(),
        tags: vec!["vip".to_string()],
        cc: vec![],
        addresses: vec![boston()],
        billing: Some(boston()),
        notes: String::new(),
    }
}

#[derive(Debug, Validate)]
struct Account {
    #[validate("gte=18,lte=130")]
    age: u32,

    #[validate("oneof=admin user guest")]
    role: String,

    #[validate("omitempty,uuid")]
    id: Option<String>,

    #[validate("len=2")]
    country: String,
}

#[derive(Debug, Validate)]
struct Shouting {
    #[validate("required,shout")]
    name: String,
}

#[derive(Debug, Validate)]
struct Outer {
    #[validate(nested)]
    inner: Option<Shouting>,
}

#[derive(Debug, Validate)]
struct MissingParam {
    #[validate("min")]
    name: String,
}

#[derive(Debug, Validate)]
struct Typos {
    #[validate("omitempty,shuot")]
    nickname: String,

    #[validate("dive,emial")]
    cc: Vec<String>,
}

#[derive(Debug, Validate)]
struct ElementTypo {
    #[validate("dive,emial")]
    cc: Vec<String>,
}

#[derive(Debug, Validate)]
struct Shallow {
    #[validate("required")]
    address: Address,
}

#[derive(Debug, Validate)]
struct Category {
    #[validate("required")]
    name: String,

    #[validate(nested)]
    children: Vec<Category>,
}

// =============================================================================
// Basic Validation
// =============================================================================

#[test]
fn test_valid_instance() {
    init_tracing();

    assert!(validate_struct(&valid_contact()).is_ok());
    assert!(valid_contact().validate().is_ok());
}

#[test]
fn test_collects_all_failures() {
    init_tracing();

    let mut contact = valid_contact();
    contact.email = String::new();
    contact.phone_number = "555-1234".to_string();
    contact.time_zone = "America/Atlantis".to_string();

    let errors = errors_of(validate_struct(&contact));

    assert_eq!(errors.len(), 3);
    assert_eq!(errors.get("email"), Some(&reasons(&["required", "email"])[..]));
    assert_eq!(errors.get("phoneNumber"), Some(&reasons(&["phone"])[..]));
    assert_eq!(errors.get("timeZone"), Some(&reasons(&["timezone"])[..]));
    assert_eq!(
        errors.to_string(),
        "Validation error on fields: email, phoneNumber, timeZone"
    );
}

#[test]
fn test_multiple_rules_on_one_field_all_reported() {
    let mut address = boston();
    address.city = "   ".to_string();

    let errors = errors_of(validate_struct(&address));
    assert_eq!(errors.get("city"), Some(&reasons(&["alpha"])[..]));

    address.city = String::new();
    let errors = errors_of(validate_struct(&address));
    assert_eq!(errors.get("city"), Some(&reasons(&["required", "alpha"])[..]));
}

#[test]
fn test_numeric_and_parameterised_rules() {
    let account = Account {
        age: 42,
        role: "admin".to_string(),
        id: None,
        country: "DE".to_string(),
    };
    assert!(account.validate().is_ok());

    let account = Account {
        age: 12,
        role: "root".to_string(),
        id: Some("not-a-uuid".to_string()),
        country: "DEU".to_string(),
    };
    let errors = errors_of(account.validate());

    assert_eq!(errors.get("age"), Some(&reasons(&["gte"])[..]));
    assert_eq!(errors.get("role"), Some(&reasons(&["oneof"])[..]));
    assert_eq!(errors.get("id"), Some(&reasons(&["uuid"])[..]));
    assert_eq!(errors.get("country"), Some(&reasons(&["len"])[..]));
}

// =============================================================================
// Field Paths
// =============================================================================

#[test]
fn test_nested_collection_paths() {
    let mut contact = valid_contact();
    contact.addresses.push(Address {
        city: String::new(),
        location: "north".to_string(),
    });

    let errors = errors_of(validate_struct(&contact));
    let fields: Vec<&str> = errors.fields().collect();

    assert_eq!(fields, vec!["addresses[1].city", "addresses[1].geo"]);
    assert_eq!(
        errors.get("addresses[1].geo"),
        Some(&reasons(&["coordinates"])[..])
    );
}

#[test]
fn test_nested_option_paths() {
    let mut contact = valid_contact();
    contact.billing = Some(Address {
        city: "B0ston".to_string(),
        location: String::new(),
    });

    let errors = errors_of(validate_struct(&contact));
    assert_eq!(errors.get("billing.city"), Some(&reasons(&["alpha"])[..]));
}

#[test]
fn test_required_nested_value() {
    let mut contact = valid_contact();
    contact.billing = None;

    let errors = errors_of(validate_struct(&contact));
    assert_eq!(errors.get("billing"), Some(&reasons(&["required"])[..]));
    assert_eq!(errors.len(), 1);
}

#[test]
fn test_dive_paths() {
    let mut contact = valid_contact();
    contact.tags = vec![
        "ok".to_string(),
        "not ok".to_string(),
        "x".to_string(),
        "y".to_string(),
    ];
    contact.cc = vec![String::new(), "bad".to_string(), "team@example.com".to_string()];

    let errors = errors_of(validate_struct(&contact));
    let fields: Vec<&str> = errors.fields().collect();

    assert_eq!(fields, vec!["tags", "tags[1]", "cc[1]"]);
    assert_eq!(errors.get("tags"), Some(&reasons(&["max"])[..]));
    assert_eq!(errors.get("tags[1]"), Some(&reasons(&["alphanum"])[..]));
    assert_eq!(errors.get("cc[1]"), Some(&reasons(&["email"])[..]));
}

#[test]
fn test_nested_rules_are_opt_in() {
    let value = Shallow {
        address: Address {
            city: String::new(),
            location: "north".to_string(),
        },
    };

    // Without `nested` only the field's own rules run.
    assert!(validate_struct(&value).is_ok());
}

#[test]
fn test_recursive_types() {
    let tree = Category {
        name: "root".to_string(),
        children: vec![Category {
            name: "leaf".to_string(),
            children: vec![Category {
                name: String::new(),
                children: vec![],
            }],
        }],
    };

    let errors = errors_of(validate_struct(&tree));
    assert_eq!(
        errors.get("children[0].children[0].name"),
        Some(&reasons(&["required"])[..])
    );
    assert!(registry::global().check::<Category>().is_ok());
}

// =============================================================================
// Field Naming
// =============================================================================

#[test]
fn test_structural_names() {
    let registry = RuleRegistry::with_defaults(RegistryConfig {
        field_names: FieldNameSource::Structural,
    });

    let mut contact = valid_contact();
    contact.phone_number = "nope".to_string();
    contact.addresses[0].location = "nowhere".to_string();

    let errors = errors_of(validate_struct_with(&registry, &contact));

    assert!(errors.get("phone_number").is_some());
    assert!(errors.get("addresses[0].location").is_some());
    assert!(errors.get("phoneNumber").is_none());
}

// =============================================================================
// Configuration Errors
// =============================================================================

#[test]
fn test_unknown_rule_is_configuration_error() {
    let value = Shouting {
        name: "hey".to_string(),
    };

    let error = validate_struct(&value).unwrap_err();
    assert!(error.is_configuration());
    assert_eq!(
        error,
        Error::Configuration(ConfigError::UnknownRule {
            field: "name".to_string(),
            rule: "shout".to_string(),
        })
    );
}

#[test]
fn test_unknown_rule_reported_regardless_of_value() {
    let empty = Typos {
        nickname: String::new(),
        cc: vec![],
    };
    let filled = Typos {
        nickname: "jane".to_string(),
        cc: vec!["jane@example.com".to_string()],
    };

    let expected = Err(Error::Configuration(ConfigError::UnknownRule {
        field: "nickname".to_string(),
        rule: "shuot".to_string(),
    }));
    assert_eq!(validate_struct(&empty), expected);
    assert_eq!(validate_struct(&filled), expected);
}

#[test]
fn test_unknown_element_rule_on_empty_collection() {
    let value = ElementTypo { cc: vec![] };

    assert_eq!(
        validate_struct(&value),
        Err(Error::Configuration(ConfigError::UnknownRule {
            field: "cc".to_string(),
            rule: "emial".to_string(),
        }))
    );
}

#[test]
fn test_unknown_rule_in_absent_nested_value() {
    let value = Outer { inner: None };

    assert_eq!(
        validate_struct(&value),
        Err(Error::Configuration(ConfigError::UnknownRule {
            field: "inner.name".to_string(),
            rule: "shout".to_string(),
        }))
    );
}

#[test]
fn test_registry_check_reports_nested_paths() {
    let registry = registry::global();

    assert!(registry.check::<Contact>().is_ok());
    assert_eq!(
        registry.check::<Outer>(),
        Err(ConfigError::UnknownRule {
            field: "inner.name".to_string(),
            rule: "shout".to_string(),
        })
    );
}

#[test]
fn test_missing_parameter() {
    let value = MissingParam {
        name: "x".to_string(),
    };

    assert!(matches!(
        validate_struct(&value),
        Err(Error::Configuration(ConfigError::InvalidParameter { .. }))
    ));
    assert!(matches!(
        registry::global().check::<MissingParam>(),
        Err(ConfigError::InvalidParameter { .. })
    ));
}

#[test]
fn test_custom_registry() {
    let registry = RuleRegistry::builder(RegistryConfig::default())
        .defaults()
        .register("shout", |value| {
            value
                .as_str()
                .is_some_and(|s| !s.is_empty() && s == s.to_uppercase())
        })
        .unwrap()
        .build();

    assert!(registry.check::<Shouting>().is_ok());

    let loud = Shouting {
        name: "HEY".to_string(),
    };
    assert!(loud.validate_with(&registry).is_ok());

    let quiet = Shouting {
        name: "hey".to_string(),
    };
    let errors = errors_of(quiet.validate_with(&registry));
    assert_eq!(errors.get("name"), Some(&reasons(&["shout"])[..]));
}

// =============================================================================
// Error Aggregate
// =============================================================================

#[test]
fn test_errors_serialize_in_discovery_order() {
    let mut contact = valid_contact();
    contact.email = String::new();
    contact.phone_number = "nope".to_string();

    let errors = errors_of(validate_struct(&contact));
    let json = serde_json::to_string(&errors).unwrap();

    assert_eq!(
        json,
        r#"{"email":["required","email"],"phoneNumber":["phone"]}"#
    );

    let parsed: ValidationErrors = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, errors);
}

#[test]
fn test_idempotent_and_thread_safe() {
    let mut contact = valid_contact();
    contact.email = "broken".to_string();
    contact.tags.push("bad tag".to_string());

    let expected = validate_struct(&contact);
    assert_eq!(validate_struct(&contact), expected);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| validate_struct(&contact)))
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
