//! Per-step selection payloads.

use super::step::WizardStep;
use serde::Serialize;
use strum::Display;

/// How an option reacts to being chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum SelectionKind {
    /// Replaces the current choice.
    Radio,
    /// Toggles membership in a list.
    Checkbox,
}

/// Which list of the features step a checkbox belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
pub enum SubKey {
    Features,
    Ports,
}

/// Choices made so far, one typed slot per question step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selections {
    /// Category id (step 1)
    pub category: Option<String>,
    /// Program ids (step 2)
    pub software: Vec<String>,
    /// Feature ids (step 3)
    pub features: Vec<String>,
    /// Port ids (step 3)
    pub ports: Vec<String>,
    /// Price range id (step 4)
    pub budget: Option<String>,
}

impl Selections {
    /// Whether the payload of a question step is non-empty.
    ///
    /// The features step counts as answered when either list has an entry.
    pub fn has_answer(&self, step: WizardStep) -> bool {
        match step {
            WizardStep::Category => self.category.is_some(),
            WizardStep::Software => !self.software.is_empty(),
            WizardStep::Features => !self.features.is_empty() || !self.ports.is_empty(),
            WizardStep::Budget => self.budget.is_some(),
            WizardStep::Results | WizardStep::Comparison | WizardStep::Details => false,
        }
    }

    pub fn is_selected(&self, step: WizardStep, id: &str, sub_key: Option<SubKey>) -> bool {
        match (step, sub_key) {
            (WizardStep::Category, _) => self.category.as_deref() == Some(id),
            (WizardStep::Software, _) => self.software.iter().any(|s| s == id),
            (WizardStep::Features, Some(SubKey::Ports)) => self.ports.iter().any(|s| s == id),
            (WizardStep::Features, _) => self.features.iter().any(|s| s == id),
            (WizardStep::Budget, _) => self.budget.as_deref() == Some(id),
            _ => false,
        }
    }
}

/// Add `id` when absent, remove it when present.
pub(crate) fn toggle(list: &mut Vec<String>, id: &str) {
    if let Some(pos) = list.iter().position(|item| item == id) {
        list.remove(pos);
    } else {
        list.push(id.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut list = vec!["a".to_string()];
        toggle(&mut list, "b");
        assert_eq!(list, vec!["a", "b"]);
        toggle(&mut list, "a");
        assert_eq!(list, vec!["b"]);
    }

    #[test]
    fn test_features_step_accepts_either_list() {
        let mut selections = Selections::default();
        assert!(!selections.has_answer(WizardStep::Features));
        selections.ports.push("3".into());
        assert!(selections.has_answer(WizardStep::Features));
    }

    #[test]
    fn test_is_selected_respects_sub_key() {
        let selections = Selections {
            features: vec!["1".into()],
            ports: vec!["2".into()],
            ..Default::default()
        };
        assert!(selections.is_selected(WizardStep::Features, "1", Some(SubKey::Features)));
        assert!(!selections.is_selected(WizardStep::Features, "1", Some(SubKey::Ports)));
        assert!(selections.is_selected(WizardStep::Features, "2", Some(SubKey::Ports)));
    }
}
