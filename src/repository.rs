//! Typed accessors over a [`DataGateway`].
//!
//! One method per collection the questionnaire reads, plus passthrough
//! writes for the admin panel. Every read returns the rows it found (possibly
//! none) or the gateway's error; nothing is cached here.

use crate::error::Result;
use crate::gateway::{DataGateway, JsonRow, Query, RowPage, decode_row, decode_rows};
use crate::model::{
    CategoryRow, CpuRow, CpuScoreRow, FeatureRow, GpuRow, GpuScoreRow, LaptopComponentScoresRow,
    LaptopFullInfoRow, LaptopMinPriceRow, PortRow, ProgramRow,
};
use crate::types::Collection;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct Repository {
    gateway: Arc<dyn DataGateway>,
}

impl Repository {
    pub fn new(gateway: Arc<dyn DataGateway>) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &Arc<dyn DataGateway> {
        &self.gateway
    }

    /// Fetch and decode every row a query matches.
    pub fn fetch<T: DeserializeOwned>(&self, collection: Collection, query: &Query) -> Result<Vec<T>> {
        let page = self.gateway.select(collection, query)?;
        debug!("{} rows from {}", page.rows.len(), collection);
        decode_rows(collection, page.rows)
    }

    /// Raw page access for callers that decode themselves.
    pub fn select_page(&self, collection: Collection, query: &Query) -> Result<RowPage> {
        self.gateway.select(collection, query)
    }

    pub fn categories(&self) -> Result<Vec<CategoryRow>> {
        self.fetch(Collection::Categories, &Query::all().order_by("id", true))
    }

    /// Latest program versions in a category; every program when `category` is `None`.
    ///
    /// The `category` cell is either a name or a list of names, which no single
    /// PostgREST operator matches, so membership is checked after the fetch.
    pub fn programs_by_category(&self, category: Option<&str>) -> Result<Vec<ProgramRow>> {
        let programs: Vec<ProgramRow> =
            self.fetch(Collection::ProgramsLatest, &Query::all().order_by("id", true))?;
        let Some(name) = category else {
            return Ok(programs);
        };
        Ok(programs
            .into_iter()
            .filter(|p| p.category.as_ref().is_some_and(|c| c.contains(name)))
            .collect())
    }

    pub fn all_programs(&self) -> Result<Vec<ProgramRow>> {
        self.fetch(Collection::Programs, &Query::all().order_by("id", true))
    }

    pub fn features(&self) -> Result<Vec<FeatureRow>> {
        self.fetch(
            Collection::Features,
            &Query::all().select("id, name").order_by("id", true),
        )
    }

    pub fn ports(&self) -> Result<Vec<PortRow>> {
        self.fetch(
            Collection::Ports,
            &Query::all().select("id, name").order_by("id", true),
        )
    }

    pub fn laptops_full(&self) -> Result<Vec<LaptopFullInfoRow>> {
        self.fetch(Collection::LaptopFullInfo, &Query::all())
    }

    pub fn component_scores(&self) -> Result<Vec<LaptopComponentScoresRow>> {
        self.fetch(Collection::LaptopComponentScores, &Query::all())
    }

    pub fn min_prices(&self) -> Result<Vec<LaptopMinPriceRow>> {
        self.fetch(Collection::LaptopMinPrice, &Query::all())
    }

    pub fn cpu_scores(&self) -> Result<Vec<CpuScoreRow>> {
        self.fetch(
            Collection::CpuScores,
            &Query::all().select("id, score_robust"),
        )
    }

    pub fn gpu_scores(&self) -> Result<Vec<GpuScoreRow>> {
        self.fetch(
            Collection::GpuScores,
            &Query::all().select("id, score_robust"),
        )
    }

    /// Every CPU, used for select-field options in the admin panel.
    pub fn all_cpus(&self) -> Result<Vec<CpuRow>> {
        self.fetch(
            Collection::Cpus,
            &Query::all().select("id, name").order_by("name", true),
        )
    }

    /// Every GPU, used for select-field options in the admin panel.
    pub fn all_gpus(&self) -> Result<Vec<GpuRow>> {
        self.fetch(
            Collection::Gpus,
            &Query::all().select("id, name").order_by("name", true),
        )
    }

    pub fn insert<T: DeserializeOwned>(&self, collection: Collection, row: &JsonRow) -> Result<T> {
        let stored: Value = self.gateway.insert(collection, row)?;
        decode_row(collection, stored)
    }

    pub fn update<T: DeserializeOwned>(
        &self,
        collection: Collection,
        id: i64,
        patch: &JsonRow,
    ) -> Result<T> {
        let stored = self.gateway.update(collection, id, patch)?;
        decode_row(collection, stored)
    }

    pub fn delete(&self, collection: Collection, id: i64) -> Result<()> {
        self.gateway.delete(collection, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryGateway;
    use serde_json::json;

    fn repository() -> Repository {
        let gateway = MemoryGateway::from_snapshot(&json!({
            "categories": [
                {"id": 2, "name": "graphics"},
                {"id": 1, "name": "programming"}
            ],
            "programs_latest": [
                {"id": 1, "name": "Blender", "category": "graphics", "cpu_min": 4},
                {"id": 2, "name": "IntelliJ", "category": "programming", "cpu_min": 6},
                {"id": 5, "name": "Figma", "category": ["design", "graphics"]}
            ],
            "programs": [
                {"id": 4, "name": "Blender", "version": "4.2", "category": "graphics"},
                {"id": 3, "name": "Blender", "version": "3.6", "category": "graphics"}
            ],
            "cpus": [
                {"id": 1, "name": "Zen 4", "benchmark_cpu": 2500.0},
                {"id": 2, "name": "Alder Lake", "benchmark_cpu": 2100.0}
            ],
            "cpu_scores": [
                {"id": 1, "score_robust": 100.0, "benchmark_cpu": 2500.0},
                {"id": 2, "score_robust": null}
            ]
        }))
        .unwrap();
        Repository::new(Arc::new(gateway))
    }

    #[test]
    fn test_categories_are_ordered_by_id() {
        let names: Vec<_> = repository()
            .categories()
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["programming", "graphics"]);
    }

    #[test]
    fn test_programs_filtered_by_category() {
        let repo = repository();
        let names: Vec<_> = repo
            .programs_by_category(Some("graphics"))
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Blender", "Figma"]);
        assert_eq!(repo.programs_by_category(Some("design")).unwrap().len(), 1);
        assert_eq!(repo.programs_by_category(None).unwrap().len(), 3);
    }

    #[test]
    fn test_empty_collection_is_not_an_error() {
        assert!(repository().features().unwrap().is_empty());
    }

    #[test]
    fn test_option_lists_are_projected_and_sorted() {
        let cpus = repository().all_cpus().unwrap();
        assert_eq!(cpus[0].name, "Alder Lake");
        assert_eq!(cpus[0].benchmark_cpu, None);
    }

    #[test]
    fn test_all_program_versions_by_id() {
        let versions: Vec<_> = repository()
            .all_programs()
            .unwrap()
            .into_iter()
            .filter_map(|p| p.version)
            .collect();
        assert_eq!(versions, vec!["3.6", "4.2"]);
    }

    #[test]
    fn test_benchmark_scores_keep_nulls() {
        let repo = repository();
        let scores = repo.cpu_scores().unwrap();
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].score_robust, Some(100.0));
        assert_eq!(scores[1].score_robust, None);
        assert!(repo.gpu_scores().unwrap().is_empty());
    }
}
