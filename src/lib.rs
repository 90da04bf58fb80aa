//! Laptop Picker Library
//!
//! A questionnaire that ranks laptops against the user's workload, and an
//! admin console for the catalog behind it, both served from a PostgREST
//! backend or an in-memory snapshot.

pub mod admin;
pub mod app;
pub mod cli;
pub mod components;
pub mod config;
pub mod datasource;
pub mod engine;
pub mod error;
pub mod gateway;
pub mod model;
pub mod pricing;
pub mod questionnaire;
pub mod repository;
pub mod theme;
pub mod types;
pub mod ui;

// Re-export main types for convenience
pub use admin::{AdminPanel, AdminSettings, TableView};
pub use app::{App, AppMode};
pub use config::AppConfig;
pub use engine::{LaptopResultItem, RankingInput, compatibility_score, rank_laptops};
pub use error::{PickerError, Result};
pub use gateway::{DataGateway, MemoryGateway, RestGateway, RestGatewayConfig};
pub use pricing::{PRICE_RANGES, PriceBounds, PriceRange};
pub use questionnaire::{QuestionnaireController, QuestionnaireState, WizardStep};
pub use repository::Repository;
pub use types::{AdminTab, Collection, PagingMode};
