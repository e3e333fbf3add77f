// Built-in predicates

use crate::{ConfigError, FieldValue};
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;

// Common regex patterns
static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\(?([0-9]{3})\)?[ \-.●]?([0-9]{3})[ \-.●]?([0-9]{4})$").unwrap()
});

static COORDINATES_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(-?[0-9]+)(\.[0-9]+)?,(-?[0-9]+)(\.[0-9]+)?$").unwrap());

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$").unwrap()
});

static URL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").unwrap());

static UUID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .unwrap()
});

static ALPHA_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z]+$").unwrap());

static ALPHANUMERIC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9]+$").unwrap());

static NUMERIC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-+]?[0-9]+(?:\.[0-9]+)?$").unwrap());

// Domain predicates

/// Phone number shape: `(555) 123-4567`, `555 123.4567`, `555●123●4567`.
///
/// Each gap takes at most one separator (space, `-`, `.` or `●`). Match
/// only, the value is not normalized.
pub fn validates_phone(value: &str) -> bool {
    PHONE_REGEX.is_match(value)
}

/// Whether `value` names a zone in the IANA timezone database.
///
/// `""` and `"UTC"` resolve to UTC and `"Local"` to the local zone.
pub fn validates_timezone(value: &str) -> bool {
    matches!(value, "" | "UTC" | "Local") || value.parse::<chrono_tz::Tz>().is_ok()
}

/// Decimal `lat,long` pair such as `40.7128,-74.0060`. ASCII digits only.
///
/// Ranges are not checked: `200,40` passes.
pub fn validates_coordinates(value: &str) -> bool {
    COORDINATES_REGEX.is_match(value)
}

// Shape predicates

pub fn validates_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

pub fn validates_url(value: &str) -> bool {
    URL_REGEX.is_match(value)
}

pub fn validates_uuid(value: &str) -> bool {
    UUID_REGEX.is_match(value)
}

pub fn validates_alpha(value: &str) -> bool {
    ALPHA_REGEX.is_match(value)
}

pub fn validates_alphanumeric(value: &str) -> bool {
    ALPHANUMERIC_REGEX.is_match(value)
}

pub fn validates_numeric(value: &str) -> bool {
    NUMERIC_REGEX.is_match(value)
}

/// Wrap a string predicate so non-string values fail.
pub fn string_rule(predicate: fn(&str) -> bool) -> impl Fn(&FieldValue<'_>) -> bool {
    move |value: &FieldValue<'_>| value.as_str().is_some_and(predicate)
}

// Value predicates

/// The value is not its zero value
pub fn required(value: &FieldValue<'_>) -> bool {
    !value.is_zero()
}

/// Comparison used by the size rules (`len`, `min`, `max`, `gt`, ...).
///
/// Strings compare their character count, collections their length and
/// numbers their value. Returns `None` when the value has no size
/// (missing or boolean).
pub fn compare_size(
    value: &FieldValue<'_>,
    param: &str,
    rule: &str,
) -> Result<Option<Ordering>, ConfigError> {
    let ordering = match *value {
        FieldValue::Str(s) => Some(s.chars().count().cmp(&parse_count(param, rule)?)),
        FieldValue::Seq(len) => Some(len.cmp(&parse_count(param, rule)?)),
        FieldValue::Int(n) => match param.parse::<i64>() {
            Ok(bound) => Some(n.cmp(&bound)),
            Err(_) => (n as f64).partial_cmp(&parse_number(param, rule)?),
        },
        FieldValue::UInt(n) => match param.parse::<u64>() {
            Ok(bound) => Some(n.cmp(&bound)),
            Err(_) => (n as f64).partial_cmp(&parse_number(param, rule)?),
        },
        FieldValue::Float(n) => n.partial_cmp(&parse_number(param, rule)?),
        FieldValue::Bool(_) | FieldValue::Missing | FieldValue::Struct => None,
    };
    Ok(ordering)
}

fn parse_count(param: &str, rule: &str) -> Result<usize, ConfigError> {
    param
        .parse::<usize>()
        .map_err(|_| ConfigError::invalid_parameter(rule, Some(param), "expected a length"))
}

fn parse_number(param: &str, rule: &str) -> Result<f64, ConfigError> {
    param
        .parse::<f64>()
        .map_err(|_| ConfigError::invalid_parameter(rule, Some(param), "expected a number"))
}

/// Build a size rule accepting the orderings `accept` returns true for.
pub fn size_rule(
    rule: &'static str,
    accept: fn(Ordering) -> bool,
) -> impl Fn(&FieldValue<'_>, &str) -> Result<bool, ConfigError> {
    move |value: &FieldValue<'_>, param: &str| -> Result<bool, ConfigError> {
        Ok(compare_size(value, param, rule)?.is_some_and(accept))
    }
}

/// `eq`: strings compare their text, booleans their value, the rest their size.
pub fn equals(value: &FieldValue<'_>, param: &str) -> Result<bool, ConfigError> {
    match *value {
        FieldValue::Str(s) => Ok(s == param),
        FieldValue::Bool(b) => Ok(param.parse::<bool>().is_ok_and(|p| p == b)),
        _ => Ok(compare_size(value, param, "eq")? == Some(Ordering::Equal)),
    }
}

/// `ne`: negation of `eq`; a missing value is never "not equal".
pub fn not_equals(value: &FieldValue<'_>, param: &str) -> Result<bool, ConfigError> {
    if matches!(value, FieldValue::Missing) {
        return Ok(false);
    }
    Ok(!equals(value, param)?)
}

/// `oneof`: the value is one of the space separated words in `param`.
pub fn one_of(value: &FieldValue<'_>, param: &str) -> Result<bool, ConfigError> {
    let mut allowed = param.split_whitespace().peekable();
    if allowed.peek().is_none() {
        return Err(ConfigError::invalid_parameter(
            "oneof",
            Some(param),
            "expected at least one allowed value",
        ));
    }

    let found = match *value {
        FieldValue::Str(s) => allowed.any(|word| word == s),
        FieldValue::Int(n) => allowed.any(|word| word.parse::<i64>() == Ok(n)),
        FieldValue::UInt(n) => allowed.any(|word| word.parse::<u64>() == Ok(n)),
        _ => false,
    };
    Ok(found)
}
