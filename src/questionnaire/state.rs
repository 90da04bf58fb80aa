//! Questionnaire state and its transitions.
//!
//! Every transition takes `&self` and returns the next state, so the caller
//! decides when (and whether) to commit it.

use super::selection::{SelectionKind, Selections, SubKey, toggle};
use super::step::WizardStep;
use crate::error::{PickerError, Result};
use serde::Serialize;

/// Minimum number of marked laptops before the comparison opens.
pub const MIN_COMPARE: usize = 2;

/// Direction of a step change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Back,
}

/// Data that must be re-fetched after a selection changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Refresh {
    /// The category changed; the program list depends on it.
    pub programs: bool,
    /// Any selection changed; the ranked list is recomputed.
    pub results: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QuestionnaireState {
    pub step: WizardStep,
    pub selections: Selections,
    /// Laptop ids marked for comparison, in marking order.
    pub compare: Vec<i64>,
    /// Laptop shown on the details step.
    pub active_laptop: Option<i64>,
}

impl QuestionnaireState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a selection event.
    ///
    /// Radio sets the value, checkbox toggles it. Choosing a category clears
    /// the software choices. The step must be a question step and the kind
    /// must match it; the features step needs a sub key.
    pub fn select(
        &self,
        step: WizardStep,
        id: &str,
        kind: SelectionKind,
        sub_key: Option<SubKey>,
    ) -> Result<(Self, Refresh)> {
        let mut next = self.clone();
        let selections = &mut next.selections;
        let mut refresh = Refresh {
            programs: false,
            results: true,
        };

        match (step, kind, sub_key) {
            (WizardStep::Category, SelectionKind::Radio, None) => {
                selections.category = Some(id.to_string());
                selections.software.clear();
                refresh.programs = true;
            }
            (WizardStep::Software, SelectionKind::Checkbox, None) => {
                toggle(&mut selections.software, id);
            }
            (WizardStep::Features, SelectionKind::Checkbox, Some(SubKey::Features)) => {
                toggle(&mut selections.features, id);
            }
            (WizardStep::Features, SelectionKind::Checkbox, Some(SubKey::Ports)) => {
                toggle(&mut selections.ports, id);
            }
            (WizardStep::Budget, SelectionKind::Radio, None) => {
                selections.budget = Some(id.to_string());
            }
            _ => {
                return Err(PickerError::state(format!(
                    "{} selection{} is not valid on step {}",
                    kind,
                    sub_key.map(|k| format!(" of {}", k)).unwrap_or_default(),
                    step.number()
                )));
            }
        }

        Ok((next, refresh))
    }

    /// Whether the forward action is enabled on the current step.
    ///
    /// The software step is optional; the other question steps need an answer.
    pub fn can_advance(&self) -> bool {
        match self.step {
            WizardStep::Software => true,
            step if step.is_question() => self.selections.has_answer(step),
            _ => false,
        }
    }

    /// Move the step pointer without checking [`Self::can_advance`].
    ///
    /// Forward stops at results; back from comparison or details lands on
    /// results; back from the first step stays put.
    pub fn advance(&self, direction: Direction) -> Self {
        let target = match direction {
            Direction::Forward => self.step.next(),
            Direction::Back => self.step.previous(),
        };
        Self {
            step: target.unwrap_or(self.step),
            ..self.clone()
        }
    }

    /// Jump from the budget step straight to results.
    pub fn finish(&self) -> Result<Self> {
        if self.step != WizardStep::Budget || !self.can_advance() {
            return Err(PickerError::validation("Choose a budget to see the results"));
        }
        Ok(Self {
            step: WizardStep::Results,
            ..self.clone()
        })
    }

    /// Clear everything back to step 1.
    pub fn reset(&self) -> Self {
        Self::default()
    }

    /// Mark or unmark a laptop for comparison.
    pub fn toggle_compare(&self, laptop_id: i64) -> Self {
        let mut next = self.clone();
        if let Some(pos) = next.compare.iter().position(|&id| id == laptop_id) {
            next.compare.remove(pos);
        } else {
            next.compare.push(laptop_id);
        }
        next
    }

    pub fn is_marked(&self, laptop_id: i64) -> bool {
        self.compare.contains(&laptop_id)
    }

    pub fn can_compare(&self) -> bool {
        self.compare.len() >= MIN_COMPARE
    }

    pub fn open_comparison(&self) -> Result<Self> {
        if !self.can_compare() {
            return Err(PickerError::validation(format!(
                "Mark at least {} laptops to compare",
                MIN_COMPARE
            )));
        }
        Ok(Self {
            step: WizardStep::Comparison,
            ..self.clone()
        })
    }

    pub fn show_details(&self, laptop_id: i64) -> Self {
        Self {
            step: WizardStep::Details,
            active_laptop: Some(laptop_id),
            ..self.clone()
        }
    }

    /// Drop comparison marks and the detail target for laptops no longer listed.
    ///
    /// A comparison left with fewer than two laptops, or details of a laptop
    /// that is gone, falls back to the results list.
    pub fn retain_laptops(&self, listed: impl Fn(i64) -> bool) -> Self {
        let mut next = self.clone();
        next.compare.retain(|&id| listed(id));
        next.active_laptop = next.active_laptop.filter(|&id| listed(id));

        let stranded = match next.step {
            WizardStep::Comparison => !next.can_compare(),
            WizardStep::Details => next.active_laptop.is_none(),
            _ => false,
        };
        if stranded {
            next.step = WizardStep::Results;
        }
        next
    }
}
