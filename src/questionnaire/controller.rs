//! Questionnaire controller.
//!
//! Owns the current [`QuestionnaireState`] together with the data fetched for
//! it, and performs the re-fetches a state change calls for. A failed fetch
//! is returned to the caller and leaves previously fetched data in place.

use super::selection::{SelectionKind, SubKey};
use super::state::{Direction, QuestionnaireState, Refresh};
use super::step::WizardStep;
use crate::engine::{LaptopResultItem, RankingInput, rank_laptops};
use crate::error::{PickerError, Result};
use crate::model::{CategoryRow, FeatureRow, PortRow, ProgramRow};
use crate::pricing::{bounds_for, find_price_range};
use crate::repository::Repository;
use tracing::{debug, info, warn};

/// A program as listed on the software step.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramItem {
    pub id: String,
    pub name: String,
    pub desc: String,
}

impl From<ProgramRow> for ProgramItem {
    fn from(row: ProgramRow) -> Self {
        Self {
            id: row.id.map(|id| id.to_string()).unwrap_or_default(),
            desc: row.requirement_summary(),
            name: row.name,
        }
    }
}

pub struct QuestionnaireController {
    repository: Repository,
    state: QuestionnaireState,
    categories: Vec<CategoryRow>,
    features: Vec<FeatureRow>,
    ports: Vec<PortRow>,
    programs: Vec<ProgramItem>,
    results: Vec<LaptopResultItem>,
}

impl QuestionnaireController {
    pub fn new(repository: Repository) -> Self {
        Self {
            repository,
            state: QuestionnaireState::new(),
            categories: Vec::new(),
            features: Vec::new(),
            ports: Vec::new(),
            programs: Vec::new(),
            results: Vec::new(),
        }
    }

    /// Fetch the reference lists and the initial result list.
    pub fn load(&mut self) -> Result<()> {
        let categories = self.repository.categories()?;
        let features = self.repository.features()?;
        let ports = self.repository.ports()?;
        info!(
            "Loaded {} categories, {} features, {} ports",
            categories.len(),
            features.len(),
            ports.len()
        );
        self.categories = categories;
        self.features = features;
        self.ports = ports;
        self.refresh_results()
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn state(&self) -> &QuestionnaireState {
        &self.state
    }

    pub fn step(&self) -> WizardStep {
        self.state.step
    }

    pub fn categories(&self) -> &[CategoryRow] {
        &self.categories
    }

    pub fn features(&self) -> &[FeatureRow] {
        &self.features
    }

    pub fn ports(&self) -> &[PortRow] {
        &self.ports
    }

    pub fn programs(&self) -> &[ProgramItem] {
        &self.programs
    }

    pub fn results(&self) -> &[LaptopResultItem] {
        &self.results
    }

    pub fn can_advance(&self) -> bool {
        self.state.can_advance()
    }

    pub fn selected_category(&self) -> Option<&CategoryRow> {
        let id = self.state.selections.category.as_deref()?;
        self.categories.iter().find(|c| c.id.to_string() == id)
    }

    /// Category by id or canonical name (case-insensitive).
    pub fn find_category(&self, key: &str) -> Option<&CategoryRow> {
        let key = key.trim();
        self.categories
            .iter()
            .find(|c| c.id.to_string() == key || c.name.eq_ignore_ascii_case(key))
    }

    /// Result items marked for comparison, in marking order.
    pub fn compared_items(&self) -> Vec<&LaptopResultItem> {
        self.state
            .compare
            .iter()
            .filter_map(|id| self.results.iter().find(|item| item.id == *id))
            .collect()
    }

    pub fn active_item(&self) -> Option<&LaptopResultItem> {
        let id = self.state.active_laptop?;
        self.results.iter().find(|item| item.id == id)
    }

    /// Summary bar text, shown on the question steps only.
    pub fn summary_text(&self) -> Option<String> {
        if !self.state.step.is_question() {
            return None;
        }
        let category = self
            .selected_category()
            .map(CategoryRow::label)
            .unwrap_or_else(|| "...".to_string());
        let budget = self
            .state
            .selections
            .budget
            .as_deref()
            .and_then(find_price_range)
            .map(|range| range.label)
            .unwrap_or("...");
        Some(format!("Usage: {}  |  Budget: {}", category, budget))
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    /// Apply a selection event and re-fetch what depends on it.
    ///
    /// The selection itself is always committed; a failed re-fetch keeps the
    /// previous program or result list and is returned.
    pub fn select(
        &mut self,
        step: WizardStep,
        id: &str,
        kind: SelectionKind,
        sub_key: Option<SubKey>,
    ) -> Result<()> {
        let (next, refresh) = self.state.select(step, id, kind, sub_key)?;
        debug!("select step={} id={} kind={}", step.number(), id, kind);
        self.state = next;
        self.apply_refresh(refresh)
    }

    fn apply_refresh(&mut self, refresh: Refresh) -> Result<()> {
        if refresh.programs {
            self.refresh_programs()?;
        }
        if refresh.results {
            self.refresh_results()?;
        }
        Ok(())
    }

    /// Go to the next question step if the current one is answered.
    pub fn next(&mut self) -> bool {
        if !self.state.step.is_question() || !self.state.can_advance() {
            return false;
        }
        self.state = self.state.advance(Direction::Forward);
        true
    }

    pub fn back(&mut self) {
        self.state = self.state.advance(Direction::Back);
    }

    pub fn finish(&mut self) -> Result<()> {
        self.state = self.state.finish()?;
        Ok(())
    }

    pub fn reset(&mut self) -> Result<()> {
        info!("Questionnaire reset");
        self.state = self.state.reset();
        self.programs.clear();
        self.refresh_results()
    }

    pub fn toggle_compare(&mut self, laptop_id: i64) {
        self.state = self.state.toggle_compare(laptop_id);
    }

    pub fn open_comparison(&mut self) -> Result<()> {
        self.state = self.state.open_comparison()?;
        Ok(())
    }

    pub fn show_details(&mut self, laptop_id: i64) -> Result<()> {
        if !self.results.iter().any(|item| item.id == laptop_id) {
            return Err(PickerError::state(format!("No laptop with id {}", laptop_id)));
        }
        self.state = self.state.show_details(laptop_id);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Fetching
    // ------------------------------------------------------------------

    /// Re-fetch the programs of the selected category; none without one.
    pub fn refresh_programs(&mut self) -> Result<()> {
        let Some(category) = self.selected_category().map(|c| c.name.clone()) else {
            self.programs.clear();
            return Ok(());
        };

        let rows = self
            .repository
            .programs_by_category(Some(&category))
            .inspect_err(|e| warn!("Failed to fetch programs for {}: {}", category, e))?;
        debug!("{} programs in {}", rows.len(), category);
        self.programs = rows.into_iter().map(ProgramItem::from).collect();
        Ok(())
    }

    /// Re-fetch scores, laptops and prices and recompute the ranking.
    pub fn refresh_results(&mut self) -> Result<()> {
        let fetch = || -> Result<RankingInput> {
            Ok(RankingInput::from_rows(
                self.repository.laptops_full()?,
                self.repository.component_scores()?,
                self.repository.min_prices()?,
            ))
        };
        let input = fetch().inspect_err(|e| warn!("Failed to fetch laptop data: {}", e))?;

        let bounds = self.state.selections.budget.as_deref().map(bounds_for);
        self.results = rank_laptops(&input, bounds);
        let results = &self.results;
        self.state = self
            .state
            .retain_laptops(|id| results.iter().any(|item| item.id == id));
        debug!("{} ranked laptops", self.results.len());
        Ok(())
    }
}
