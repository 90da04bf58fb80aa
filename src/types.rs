//! Type-safe identifiers shared across the crate
//!
//! Backend collection names, admin tabs and sort directions are proper enums
//! rather than strings, so a typo in a table name is a compile error.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// A table or view exposed by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Categories,
    Programs,
    /// Latest version of every program, used by the questionnaire.
    ProgramsLatest,
    Features,
    Ports,
    LaptopFullInfo,
    LaptopComponentScores,
    LaptopMinPrice,
    CpuScores,
    GpuScores,
    Cpus,
    Gpus,
    Laptops,
}

impl Collection {
    /// Whether rows in this collection can be written through the admin panel.
    pub fn is_writable(&self) -> bool {
        matches!(
            self,
            Self::Programs | Self::Cpus | Self::Gpus | Self::Laptops
        )
    }
}

/// Where an admin table pages and searches its rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PagingMode {
    /// `range` + `ilike` are sent to the backend.
    Server,
    /// All rows are fetched once and paged locally.
    #[default]
    Client,
}

/// Admin panel tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[derive(Display, EnumString, EnumIter)]
pub enum AdminTab {
    #[default]
    #[strum(serialize = "CPU")]
    Cpus,
    #[strum(serialize = "GPU")]
    Gpus,
    #[strum(serialize = "Programs")]
    Programs,
    #[strum(serialize = "Laptops")]
    Laptops,
}

impl AdminTab {
    /// Tab order as shown in the tab bar.
    pub const ALL: [AdminTab; 4] = [Self::Cpus, Self::Gpus, Self::Programs, Self::Laptops];

    pub fn index(&self) -> usize {
        match self {
            Self::Cpus => 0,
            Self::Gpus => 1,
            Self::Programs => 2,
            Self::Laptops => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// The CPU and GPU catalogs are large enough to page on the backend.
    pub fn default_paging(&self) -> PagingMode {
        match self {
            Self::Cpus | Self::Gpus => PagingMode::Server,
            Self::Programs | Self::Laptops => PagingMode::Client,
        }
    }
}

/// Column sort direction in the admin table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(Display)]
pub enum SortDirection {
    #[strum(serialize = "asc")]
    Ascending,
    #[strum(serialize = "desc")]
    Descending,
}

impl SortDirection {
    pub fn arrow(&self) -> &'static str {
        match self {
            Self::Ascending => "▲",
            Self::Descending => "▼",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_collection_names_match_backend() {
        assert_eq!(Collection::LaptopFullInfo.to_string(), "laptop_full_info");
        assert_eq!(Collection::ProgramsLatest.as_ref(), "programs_latest");
        assert_eq!(
            Collection::from_str("laptop_min_price").unwrap(),
            Collection::LaptopMinPrice
        );
    }

    #[test]
    fn test_collection_serde_matches_display() {
        for collection in Collection::iter() {
            let json = serde_json::to_string(&collection).unwrap();
            assert_eq!(json, format!("\"{}\"", collection));
        }
    }

    #[test]
    fn test_only_admin_tables_are_writable() {
        assert!(Collection::Cpus.is_writable());
        assert!(!Collection::LaptopComponentScores.is_writable());
        assert!(!Collection::ProgramsLatest.is_writable());
    }

    #[test]
    fn test_admin_tab_cycle() {
        assert_eq!(AdminTab::Cpus.next(), AdminTab::Gpus);
        assert_eq!(AdminTab::Laptops.next(), AdminTab::Cpus);
        assert_eq!(AdminTab::Cpus.previous(), AdminTab::Laptops);
        assert_eq!(AdminTab::from_index(2), Some(AdminTab::Programs));
        assert_eq!(AdminTab::from_index(9), None);
    }

    #[test]
    fn test_admin_tab_paging_defaults() {
        assert_eq!(AdminTab::Cpus.default_paging(), PagingMode::Server);
        assert_eq!(AdminTab::Programs.default_paging(), PagingMode::Client);
    }
}
