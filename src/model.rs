//! Row types for the backend collections.
//!
//! Each struct mirrors one table or view exactly as the backend returns it.
//! Nullable columns are `Option`s and unknown columns are ignored, so a view
//! growing a column never breaks decoding.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A usage category ("programming", "video_editing", ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRow {
    pub id: i64,
    pub name: String,
    #[serde(default, alias = "fa_name", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<CategoryDesc>,
}

impl CategoryRow {
    /// Label shown to the user: the stored display name, else the mapped canonical name.
    pub fn label(&self) -> String {
        match self.display_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => category_display_name(&self.name),
        }
    }

    /// Description lines, whatever shape the backend stored them in.
    pub fn desc_lines(&self) -> Vec<String> {
        self.desc.as_ref().map(CategoryDesc::lines).unwrap_or_default()
    }
}

/// Category descriptions arrive as a list, an object of strings, or a single string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryDesc {
    Lines(Vec<String>),
    Keyed(BTreeMap<String, String>),
    Text(String),
}

impl CategoryDesc {
    pub fn lines(&self) -> Vec<String> {
        match self {
            Self::Lines(lines) => lines.clone(),
            Self::Keyed(map) => map.values().cloned().collect(),
            Self::Text(text) if text.is_empty() => Vec::new(),
            Self::Text(text) => vec![text.clone()],
        }
    }
}

/// Map a canonical category name to its display name.
///
/// Unknown names are shown as stored.
pub fn category_display_name(name: &str) -> String {
    match name {
        "Design" | "design" => "Design",
        "video_editing" => "Video Editing",
        "engineering" => "Engineering",
        "graphics" => "Graphics",
        "programming" => "Programming",
        "music_production" => "Music Production",
        other => other,
    }
    .to_string()
}

/// A program belongs to one category or to several.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryMembership {
    One(String),
    Many(Vec<String>),
}

impl CategoryMembership {
    pub fn contains(&self, category: &str) -> bool {
        match self {
            Self::One(name) => name == category,
            Self::Many(names) => names.iter().any(|n| n == category),
        }
    }
}

/// Software requirements row from `programs` / `programs_latest`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProgramRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub category: Option<CategoryMembership>,
    #[serde(default)]
    pub cpu_min: Option<i64>,
    #[serde(default)]
    pub cpu_rec: Option<i64>,
    #[serde(default)]
    pub gpu_min: Option<i64>,
    #[serde(default)]
    pub gpu_rec: Option<i64>,
    #[serde(default)]
    pub ram_min_gb: Option<f64>,
    #[serde(default)]
    pub ram_rec_gb: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ProgramRow {
    /// One-line requirement summary shown under the program name.
    pub fn requirement_summary(&self) -> String {
        let version = self
            .version
            .as_deref()
            .filter(|v| !v.is_empty())
            .map(|v| format!("Version: {}", v))
            .unwrap_or_default();
        format!(
            "{} - Min CPU: {} - Min GPU: {} - Min RAM: {} GB",
            version,
            display_opt(self.cpu_min),
            display_opt(self.gpu_min),
            display_opt(self.ram_min_gb),
        )
    }
}

fn display_opt<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Flat reference row used by both `features` and `ports`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRow {
    pub id: i64,
    pub name: String,
}

pub type FeatureRow = NamedRow;
pub type PortRow = NamedRow;

/// Denormalised laptop description from the `laptop_full_info` view.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LaptopFullInfoRow {
    pub id: Option<i64>,
    pub laptop_name: Option<String>,
    pub cpu_name: Option<String>,
    pub gpu_name: Option<String>,
    pub ram_size_gb: Option<i64>,
    pub ram_type: Option<String>,
    pub ram_speed_mhz: Option<i64>,
    pub storage_kind: Option<String>,
    pub storage_interface: Option<String>,
    pub storage_size_gb: Option<i64>,
    pub display_size_inch: Option<f64>,
    pub display_quality: Option<String>,
    pub display_refresh_hz: Option<i64>,
    pub display_panel: Option<String>,
    pub os_name: Option<String>,
    pub os_version: Option<String>,
    pub ports: Option<Vec<String>>,
    pub features: Option<Vec<String>>,
}

impl LaptopFullInfoRow {
    /// "512GB NVMe SSD" style summary, `None` when nothing is known.
    pub fn storage_summary(&self) -> Option<String> {
        let parts: Vec<String> = [
            self.storage_size_gb.map(|gb| format!("{}GB", gb)),
            self.storage_interface.clone(),
            self.storage_kind.clone(),
        ]
        .into_iter()
        .flatten()
        .filter(|p| !p.is_empty())
        .collect();
        (!parts.is_empty()).then(|| parts.join(" "))
    }

    /// "15.6\" FHD 144Hz IPS" style summary, `None` when nothing is known.
    pub fn display_summary(&self) -> Option<String> {
        let parts: Vec<String> = [
            self.display_size_inch.map(|inch| format!("{}\"", inch)),
            self.display_quality.clone(),
            self.display_refresh_hz.map(|hz| format!("{}Hz", hz)),
            self.display_panel.clone(),
        ]
        .into_iter()
        .flatten()
        .filter(|p| !p.is_empty())
        .collect();
        (!parts.is_empty()).then(|| parts.join(" "))
    }
}

/// Per-laptop component sub-scores (0–100) from `laptop_component_scores`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LaptopComponentScoresRow {
    pub laptop_id: Option<i64>,
    pub cpu_score: Option<f64>,
    pub gpu_score: Option<f64>,
    pub ram_score: Option<f64>,
}

/// Cheapest observed listing, in the currency's minor unit, from `laptop_min_price`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LaptopMinPriceRow {
    pub laptop_id: Option<i64>,
    #[serde(alias = "min_price_toman")]
    pub min_price: Option<i64>,
}

/// Robust benchmark score from `cpu_scores` / `gpu_scores`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkScoreRow {
    pub id: i64,
    #[serde(default)]
    pub score_robust: Option<f64>,
}

pub type CpuScoreRow = BenchmarkScoreRow;
pub type GpuScoreRow = BenchmarkScoreRow;

/// Admin row for the `cpus` table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CpuRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub benchmark_cpu: Option<f64>,
    #[serde(default)]
    pub integrated_gpu_id: Option<i64>,
    #[serde(default)]
    pub rank_cpu: Option<i64>,
}

/// Admin row for the `gpus` table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GpuRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub benchmark_gpu: Option<f64>,
    #[serde(default)]
    pub rank_gpu: Option<i64>,
}

/// Admin row for the `laptops` table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LaptopRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub cpu_min: Option<i64>,
    #[serde(default)]
    pub gpu_min: Option<i64>,
}
