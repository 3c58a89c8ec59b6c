// src/scenario.rs
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

const BUILTIN_CATALOG: &str = include_str!("../data/scenarios.json");

/// One puzzle: the riddle shown to the player and the truth only the host knows.
///
/// Every field is optional on the wire; clients may post a partial game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub id: String,
    pub title: String,
    pub description: String,
    pub answer: String,
    /// Phrase that ends the game as soon as the player's question touches it.
    pub key: String,
    pub hints: Vec<String>,
}

impl Scenario {
    pub fn key_element(&self) -> Option<&str> {
        (!self.key.is_empty()).then_some(self.key.as_str())
    }

    // Difficulty shown in the list is the number of hints, capped to three dots.
    pub fn difficulty(&self) -> usize {
        self.hints.len().clamp(1, 3)
    }
}

/// Read-only list of scenarios, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    scenarios: Vec<Scenario>,
}

impl Catalog {
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let scenarios: Vec<Scenario> = serde_json::from_str(json)?;
        Self::new(scenarios)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    pub fn new(scenarios: Vec<Scenario>) -> Result<Self> {
        for (i, scenario) in scenarios.iter().enumerate() {
            if scenario.id.is_empty() {
                return Err(AppError::Catalog(format!(
                    "scenario '{}' has no id",
                    scenario.title
                )));
            }
            if scenarios[..i].iter().any(|other| other.id == scenario.id) {
                return Err(AppError::Catalog(format!(
                    "duplicate scenario id '{}'",
                    scenario.id
                )));
            }
        }
        Ok(Self { scenarios })
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub fn get(&self, id: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|scenario| scenario.id == id)
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_parses_with_unique_ids() {
        let catalog = Catalog::builtin().expect("builtin catalog should parse");
        assert!(!catalog.is_empty());
        for scenario in catalog.scenarios() {
            assert!(!scenario.title.is_empty());
            assert!(!scenario.answer.is_empty());
            assert_eq!(catalog.get(&scenario.id), Some(scenario));
        }
    }

    #[test]
    fn missing_key_and_hints_default_to_empty() {
        let catalog = Catalog::from_json(
            r#"[{"id":"1","title":"T","description":"D","answer":"A"}]"#,
        )
        .unwrap();
        let scenario = catalog.get("1").unwrap();
        assert_eq!(scenario.key_element(), None);
        assert!(scenario.hints.is_empty());
        assert_eq!(scenario.difficulty(), 1);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let result = Catalog::from_json(
            r#"[{"id":"1","title":"A","description":"","answer":""},
                {"id":"1","title":"B","description":"","answer":""}]"#,
        );
        assert!(matches!(result, Err(AppError::Catalog(_))));
    }

    #[test]
    fn catalog_entries_need_an_id() {
        let result = Catalog::from_json(r#"[{"title":"A","answer":"B"}]"#);
        assert!(matches!(result, Err(AppError::Catalog(_))));
    }

    #[test]
    fn partial_game_deserializes_with_defaults() {
        let scenario: Scenario = serde_json::from_str(
            r#"{"title":"X","answer":"the butler did it","key":"butler"}"#,
        )
        .unwrap();
        assert_eq!(scenario.id, "");
        assert_eq!(scenario.description, "");
        assert_eq!(scenario.key_element(), Some("butler"));
    }

    #[test]
    fn only_an_empty_key_counts_as_unset() {
        let mut scenario = Scenario::default();
        assert_eq!(scenario.key_element(), None);
        scenario.key = "  ".into();
        assert_eq!(scenario.key_element(), Some("  "));
    }
}
