// Rule tags: the per-field rule lists declared in `#[validate("...")]`

use crate::ConfigError;

/// Skip the remaining rules when the value is its zero value
pub const OMITEMPTY: &str = "omitempty";

/// Rules after this marker apply to each element of a collection
pub const DIVE: &str = "dive";

/// One entry of a rule tag: `name` or `name=param`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleSpec {
    pub name: &'static str,
    pub param: Option<&'static str>,
}

impl RuleSpec {
    pub const fn new(name: &'static str, param: Option<&'static str>) -> Self {
        Self { name, param }
    }
}

/// Rules checked against one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleSet {
    pub omitempty: bool,
    pub rules: &'static [RuleSpec],
}

impl RuleSet {
    pub const EMPTY: RuleSet = RuleSet {
        omitempty: false,
        rules: &[],
    };

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Everything declared on one field: rules for the field itself and,
/// after `dive`, rules for each of its elements.
///
/// Derived code emits these as `static` items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRules {
    pub field: RuleSet,
    pub elements: Option<RuleSet>,
}

impl FieldRules {
    /// All rule entries, field rules first
    pub fn specs(&self) -> impl Iterator<Item = &'static RuleSpec> + use<> {
        let field: &'static [RuleSpec] = self.field.rules;
        let elements: &'static [RuleSpec] = match self.elements {
            Some(set) => set.rules,
            None => &[],
        };
        field.iter().chain(elements.iter())
    }
}

/// Owned result of parsing a rule tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTag {
    pub field: ParsedRuleSet,
    pub elements: Option<ParsedRuleSet>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedRuleSet {
    pub omitempty: bool,
    pub rules: Vec<ParsedRule>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRule {
    pub name: String,
    pub param: Option<String>,
}

impl ParsedTag {
    /// Parse a comma separated rule tag such as `"required,min=3,dive,email"`.
    ///
    /// `omitempty` sets the flag of the set it appears in; `dive` starts the
    /// element set and may appear once, followed by at least one rule.
    pub fn parse(tag: &str) -> Result<Self, ConfigError> {
        let malformed = |reason: &str| ConfigError::MalformedTag {
            tag: tag.to_string(),
            reason: reason.to_string(),
        };

        let mut parsed = ParsedTag::default();
        if tag.trim().is_empty() {
            return Ok(parsed);
        }

        for entry in tag.split(',').map(str::trim) {
            if entry.is_empty() {
                return Err(malformed("empty rule name"));
            }

            if entry == DIVE {
                if parsed.elements.is_some() {
                    return Err(malformed("'dive' may appear only once"));
                }
                parsed.elements = Some(ParsedRuleSet::default());
                continue;
            }

            let set = match parsed.elements.as_mut() {
                Some(elements) => elements,
                None => &mut parsed.field,
            };

            if entry == OMITEMPTY {
                set.omitempty = true;
                continue;
            }

            let rule = match entry.split_once('=') {
                Some((name, param)) => ParsedRule {
                    name: name.trim().to_string(),
                    param: Some(param.trim().to_string()),
                },
                None => ParsedRule {
                    name: entry.to_string(),
                    param: None,
                },
            };
            if rule.name.is_empty() {
                return Err(malformed("empty rule name"));
            }
            set.rules.push(rule);
        }

        if parsed.elements.as_ref().is_some_and(|set| set.rules.is_empty()) {
            return Err(malformed("'dive' must be followed by at least one rule"));
        }

        Ok(parsed)
    }

    /// Rule names in declaration order, field rules first
    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.field
            .rules
            .iter()
            .chain(self.elements.iter().flat_map(|set| set.rules.iter()))
            .map(|rule| rule.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_rules() {
        let parsed = ParsedTag::parse("required,phone").unwrap();

        assert!(!parsed.field.omitempty);
        assert_eq!(parsed.rule_names().collect::<Vec<_>>(), vec!["required", "phone"]);
        assert!(parsed.elements.is_none());
    }

    #[test]
    fn test_parse_parameters() {
        let parsed = ParsedTag::parse("min=3, max=20, oneof=red green").unwrap();
        let params: Vec<_> = parsed
            .field
            .rules
            .iter()
            .map(|rule| rule.param.as_deref().unwrap())
            .collect();

        assert_eq!(params, vec!["3", "20", "red green"]);
    }

    #[test]
    fn test_parse_omitempty_and_dive() {
        let parsed = ParsedTag::parse("omitempty,max=5,dive,omitempty,email").unwrap();

        assert!(parsed.field.omitempty);
        assert_eq!(parsed.field.rules.len(), 1);

        let elements = parsed.elements.unwrap();
        assert!(elements.omitempty);
        assert_eq!(
            elements.rules,
            vec![ParsedRule {
                name: "email".to_string(),
                param: None
            }]
        );
    }

    #[test]
    fn test_parse_empty_tag() {
        let parsed = ParsedTag::parse("").unwrap();
        assert_eq!(parsed, ParsedTag::default());
    }

    #[test]
    fn test_parse_rejects_malformed_tags() {
        assert!(ParsedTag::parse("required,,email").is_err());
        assert!(ParsedTag::parse("=3").is_err());
        assert!(ParsedTag::parse("dive").is_err());
        assert!(ParsedTag::parse("dive,email,dive,url").is_err());
    }

    #[test]
    fn test_field_rules_specs() {
        static RULES: FieldRules = FieldRules {
            field: RuleSet {
                omitempty: false,
                rules: &[RuleSpec::new("max", Some("3"))],
            },
            elements: Some(RuleSet {
                omitempty: true,
                rules: &[RuleSpec::new("email", None)],
            }),
        };

        let names: Vec<_> = RULES.specs().map(|spec| spec.name).collect();
        assert_eq!(names, vec!["max", "email"]);
        assert!(RuleSet::EMPTY.is_empty());
    }
}
