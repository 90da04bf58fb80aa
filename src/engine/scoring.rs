//! Scoring & Ranking Engine
//!
//! Turns the per-laptop component scores into a ranked result list.
//!
//! # Pipeline
//!
//! | Stage    | What happens |
//! |----------|--------------|
//! | Resolve  | Join each score row to its descriptive row and minimum price by laptop id; rows without an id are dropped |
//! | Score    | `round(min(100, cpu*0.4 + ram*0.3 + gpu*0.3))`, missing sub-scores count as 0 |
//! | Price    | Minor-unit price to whole millions, rounded; absent when there is no listing |
//! | Filter   | With a budget selected, keep unpriced laptops and those inside the inclusive bounds |
//! | Sort     | Descending by score, stable for ties |
//!
//! # Design
//!
//! - **Pure logic**: inputs are already-fetched rows, output is a plain `Vec`
//! - **Deterministic**: equal scores keep their input order
//! - **Total**: empty input yields empty output, never an error

use crate::model::{LaptopComponentScoresRow, LaptopFullInfoRow, LaptopMinPriceRow};
use crate::pricing::PriceBounds;
use serde::Serialize;
use std::collections::HashMap;

// ============================================================================
// Weights
// ============================================================================

pub const CPU_WEIGHT: f64 = 0.4;
pub const RAM_WEIGHT: f64 = 0.3;
pub const GPU_WEIGHT: f64 = 0.3;

/// Name shown for a scored laptop that has no descriptive row.
pub const UNKNOWN_LAPTOP_NAME: &str = "Unknown";

const MINOR_UNITS_PER_MILLION: i64 = 1_000_000;

/// Weighted compatibility score clamped to `0..=100`.
pub fn compatibility_score(cpu: Option<f64>, ram: Option<f64>, gpu: Option<f64>) -> u8 {
    let weighted = cpu.unwrap_or(0.0) * CPU_WEIGHT
        + ram.unwrap_or(0.0) * RAM_WEIGHT
        + gpu.unwrap_or(0.0) * GPU_WEIGHT;
    // NaN casts to 0
    weighted.clamp(0.0, 100.0).round() as u8
}

/// Whole-million display price, rounded half up.
///
/// A missing or non-positive price means "no listing".
pub fn display_price_million(min_price: Option<i64>) -> Option<i64> {
    min_price
        .filter(|&price| price > 0)
        .map(|price| {
            price
                .saturating_add(MINOR_UNITS_PER_MILLION / 2)
                .div_euclid(MINOR_UNITS_PER_MILLION)
        })
}

// ============================================================================
// Result Types
// ============================================================================

/// Hardware summary shown on result cards, the comparison table and the details panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LaptopSpecs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ram_gb: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpu_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl LaptopSpecs {
    fn from_full_info(info: Option<&LaptopFullInfoRow>) -> Self {
        let Some(info) = info else {
            return Self::default();
        };
        Self {
            cpu_name: non_empty(info.cpu_name.as_deref()),
            ram_gb: info.ram_size_gb.filter(|&gb| gb > 0),
            gpu_name: non_empty(info.gpu_name.as_deref()),
            storage: info.storage_summary(),
            display: info.display_summary(),
        }
    }
}

/// One ranked laptop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaptopResultItem {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_million: Option<i64>,
    pub specs: LaptopSpecs,
    pub ports: Vec<String>,
    pub features: Vec<String>,
    pub score: u8,
}

impl LaptopResultItem {
    pub fn band(&self) -> ScoreBand {
        ScoreBand::of(self.score)
    }
}

/// Colour band of a score badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    /// Above 85
    Good,
    /// Above 60
    Fair,
    Poor,
}

impl ScoreBand {
    pub fn of(score: u8) -> Self {
        match score {
            86.. => Self::Good,
            61..=85 => Self::Fair,
            _ => Self::Poor,
        }
    }
}

// ============================================================================
// Ranking
// ============================================================================

/// Everything the ranking needs, indexed by laptop id.
#[derive(Debug, Clone, Default)]
pub struct RankingInput {
    pub scores: Vec<LaptopComponentScoresRow>,
    pub laptops: HashMap<i64, LaptopFullInfoRow>,
    pub prices: HashMap<i64, i64>,
}

impl RankingInput {
    /// Index the raw rows; rows without an id (or without a price) are skipped.
    pub fn from_rows(
        laptops: Vec<LaptopFullInfoRow>,
        scores: Vec<LaptopComponentScoresRow>,
        prices: Vec<LaptopMinPriceRow>,
    ) -> Self {
        let laptops = laptops
            .into_iter()
            .filter_map(|row| row.id.map(|id| (id, row)))
            .collect();
        let prices = prices
            .into_iter()
            .filter_map(|row| Some((row.laptop_id?, row.min_price?)))
            .collect();
        Self {
            scores,
            laptops,
            prices,
        }
    }
}

/// Score, filter and sort every laptop with component scores.
///
/// `bounds == None` means no budget was chosen and nothing is filtered.
pub fn rank_laptops(input: &RankingInput, bounds: Option<PriceBounds>) -> Vec<LaptopResultItem> {
    let mut results: Vec<LaptopResultItem> = input
        .scores
        .iter()
        .filter_map(|row| {
            let id = row.laptop_id?;
            let info = input.laptops.get(&id);
            Some(LaptopResultItem {
                id,
                name: info
                    .and_then(|info| non_empty(info.laptop_name.as_deref()))
                    .unwrap_or_else(|| UNKNOWN_LAPTOP_NAME.to_string()),
                desc: None,
                image: None,
                price_million: display_price_million(input.prices.get(&id).copied()),
                specs: LaptopSpecs::from_full_info(info),
                ports: info.and_then(|i| i.ports.clone()).unwrap_or_default(),
                features: info.and_then(|i| i.features.clone()).unwrap_or_default(),
                score: compatibility_score(row.cpu_score, row.ram_score, row.gpu_score),
            })
        })
        .filter(|item| match (bounds, item.price_million) {
            (Some(bounds), Some(price)) => bounds.contains(price),
            _ => true,
        })
        .collect();

    // sort_by is stable
    results.sort_by(|a, b| b.score.cmp(&a.score));
    results
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
