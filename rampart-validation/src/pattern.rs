// Named regular expressions referenced by rules

use crate::RegistryError;
use once_cell::sync::OnceCell;
use rampart_config::PatternSettings;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

static BUILTIN: OnceCell<Arc<PatternCatalog>> = OnceCell::new();

/// Identifier of a catalog entry. Rules store the id, never the expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternId {
    /// Letters, digits and `~!@#$%^&*_`, at least one of each class, 8-18 long
    Password,
    /// Any characters with at least one digit, letter and symbol, 8-18 long
    PasswordSymbols,
    /// ASCII digits only
    Number,
    /// Optionally signed ASCII digits
    Integer,
    /// Whole number from 1 to 120
    Age,
    /// At least one character
    NotBlank,
}

impl PatternId {
    pub const ALL: [PatternId; 6] = [
        PatternId::Password,
        PatternId::PasswordSymbols,
        PatternId::Number,
        PatternId::Integer,
        PatternId::Age,
        PatternId::NotBlank,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PatternId::Password => "password",
            PatternId::PasswordSymbols => "password_symbols",
            PatternId::Number => "number",
            PatternId::Integer => "integer",
            PatternId::Age => "age",
            PatternId::NotBlank => "not_blank",
        }
    }

    fn builtin(&self) -> (&'static [&'static str], &'static str) {
        match self {
            PatternId::Password => (
                &[
                    r"^[a-zA-Z0-9~!@#$%^&*_]{8,18}$",
                    r"[a-zA-Z]",
                    r"[0-9]",
                    r"[~!@#$%^&*_]",
                ],
                "password must be 8-18 letters, digits or ~!@#$%^&*_ and contain at least one of each",
            ),
            PatternId::PasswordSymbols => (
                &[
                    r"^.{8,18}$",
                    r"[0-9]",
                    r"[a-zA-Z]",
                    r#"[!@#$%^&*()_+\-=\[\]{};':"\\|,.<>/?]"#,
                ],
                "password must be 8-18 characters with at least one digit, one letter and one symbol",
            ),
            PatternId::Number => (&[r"^[0-9]+$"], "value must be a non-negative whole number"),
            PatternId::Integer => (&[r"^-?[0-9]+$"], "value must be a whole number"),
            PatternId::Age => (
                &[r"^(?:[1-9][0-9]?|1[01][0-9]|120)$"],
                "age must be between 1 and 120",
            ),
            PatternId::NotBlank => (&[r"(?s)^.+$"], "value must not be blank"),
        }
    }
}

impl fmt::Display for PatternId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PatternId {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PatternId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| RegistryError::UnknownPattern(s.to_string()))
    }
}

/// A compiled catalog entry. A value matches when every expression matches.
#[derive(Debug, Clone)]
pub struct Pattern {
    compiled: Vec<Regex>,
    description: String,
}

impl Pattern {
    pub fn new<I, S>(expressions: I, description: impl Into<String>) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let compiled = expressions
            .into_iter()
            .map(|e| Regex::new(e.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            compiled,
            description: description.into(),
        })
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.compiled.iter().all(|re| re.is_match(value))
    }

    /// Human-readable explanation, used as the default failure message.
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn expressions(&self) -> impl Iterator<Item = &str> {
        self.compiled.iter().map(|re| re.as_str())
    }
}

/// All patterns, compiled once at startup and read-only afterwards.
#[derive(Debug, Clone)]
pub struct PatternCatalog {
    patterns: HashMap<PatternId, Pattern>,
}

impl PatternCatalog {
    /// Catalog with the built-in definitions.
    pub fn new() -> Result<Self, RegistryError> {
        let mut patterns = HashMap::with_capacity(PatternId::ALL.len());
        for id in PatternId::ALL {
            let (expressions, description) = id.builtin();
            let pattern = Pattern::new(expressions.iter(), description).map_err(|source| {
                RegistryError::InvalidPattern {
                    id: id.to_string(),
                    source,
                }
            })?;
            patterns.insert(id, pattern);
        }
        Ok(Self { patterns })
    }

    /// Shared built-in catalog, compiled on first use.
    pub fn builtin() -> Result<Arc<Self>, RegistryError> {
        BUILTIN.get_or_try_init(|| Self::new().map(Arc::new)).cloned()
    }

    /// Built-in catalog with configured entries replacing their defaults.
    pub fn from_settings(overrides: &BTreeMap<String, PatternSettings>) -> Result<Self, RegistryError> {
        let mut catalog = Self::new()?;
        for (name, settings) in overrides {
            let id: PatternId = name.parse()?;
            let pattern = Pattern::new(&settings.regex, settings.description.clone())
                .map_err(|source| RegistryError::InvalidPattern {
                    id: name.clone(),
                    source,
                })?;
            catalog.insert(id, pattern);
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, id: PatternId, pattern: Pattern) {
        self.patterns.insert(id, pattern);
    }

    pub fn get(&self, id: PatternId) -> Option<&Pattern> {
        self.patterns.get(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> PatternCatalog {
        PatternCatalog::new().unwrap()
    }

    #[test]
    fn test_every_id_has_builtin() {
        let catalog = catalog();
        for id in PatternId::ALL {
            assert!(catalog.get(id).is_some(), "missing {}", id);
        }
    }

    #[test]
    fn test_builtin_is_shared() {
        let a = PatternCatalog::builtin().unwrap();
        let b = PatternCatalog::builtin().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_id_round_trip_names() {
        assert_eq!("password_symbols".parse::<PatternId>().unwrap(), PatternId::PasswordSymbols);
        assert!(matches!(
            "email".parse::<PatternId>(),
            Err(RegistryError::UnknownPattern(_))
        ));
    }

    #[test]
    fn test_password_pattern() {
        let catalog = catalog();
        let password = catalog.get(PatternId::Password).unwrap();

        assert!(password.is_match("aAbc123@!4"));
        assert!(password.is_match("abDd1354699875645@"));
        assert!(!password.is_match("abcdefgh1"));
        assert!(!password.is_match("12345678@"));
        assert!(!password.is_match("abcdefgh@"));
        assert!(!password.is_match("abc 1234@"));
    }

    #[test]
    fn test_password_symbols_pattern() {
        let catalog = catalog();
        let pattern = catalog.get(PatternId::PasswordSymbols).unwrap();

        assert!(pattern.is_match("aAbc123@!4"));
        assert!(pattern.is_match("abc123(xy)"));
        assert!(!pattern.is_match("abc123xyz"));
    }

    #[test]
    fn test_number_patterns() {
        let catalog = catalog();
        let number = catalog.get(PatternId::Number).unwrap();
        let integer = catalog.get(PatternId::Integer).unwrap();

        assert!(number.is_match("0042"));
        assert!(!number.is_match("-1"));
        assert!(!number.is_match("1.5"));
        assert!(!number.is_match(""));
        assert!(integer.is_match("-17"));
        assert!(!integer.is_match("--1"));
    }

    #[test]
    fn test_age_pattern() {
        let catalog = catalog();
        let age = catalog.get(PatternId::Age).unwrap();

        for ok in ["1", "9", "18", "99", "100", "119", "120"] {
            assert!(age.is_match(ok), "{} should match", ok);
        }
        for bad in ["0", "121", "200", "-5", "07", "abc"] {
            assert!(!age.is_match(bad), "{} should not match", bad);
        }
    }

    #[test]
    fn test_not_blank_pattern() {
        let catalog = catalog();
        let pattern = catalog.get(PatternId::NotBlank).unwrap();

        assert!(pattern.is_match("x"));
        assert!(pattern.is_match("two\nlines"));
        assert!(!pattern.is_match(""));
    }

    #[test]
    fn test_override_from_settings() {
        let overrides = BTreeMap::from([(
            "number".to_string(),
            PatternSettings {
                regex: vec![r"^[0-9]{1,3}$".to_string()],
                description: "at most three digits".to_string(),
            },
        )]);

        let catalog = PatternCatalog::from_settings(&overrides).unwrap();
        let number = catalog.get(PatternId::Number).unwrap();
        assert!(number.is_match("123"));
        assert!(!number.is_match("1234"));
        assert_eq!(number.description(), "at most three digits");
    }

    #[test]
    fn test_invalid_override() {
        let overrides = BTreeMap::from([(
            "number".to_string(),
            PatternSettings {
                regex: vec!["[unclosed".to_string()],
                description: "broken".to_string(),
            },
        )]);

        assert!(matches!(
            PatternCatalog::from_settings(&overrides),
            Err(RegistryError::InvalidPattern { .. })
        ));
    }
}
