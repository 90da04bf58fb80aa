//! Engine modules: the part that turns fetched rows into answers.
//!
//! The engine layer sits between the repository (what the backend has) and
//! the presentation layer (what the user sees). It is pure: no I/O, no
//! logging, no shared state.

pub mod scoring;

pub use scoring::{
    CPU_WEIGHT, GPU_WEIGHT, LaptopResultItem, LaptopSpecs, RAM_WEIGHT, RankingInput, ScoreBand,
    compatibility_score, display_price_million, rank_laptops,
};
