//! Static price bands offered on the budget step.
//!
//! Bounds are in millions of the local currency and inclusive on both ends.

use serde::Serialize;

/// Inclusive price bounds in millions; `high == None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceBounds {
    pub low: i64,
    pub high: Option<i64>,
}

impl PriceBounds {
    /// The widest possible range.
    pub const ANY: PriceBounds = PriceBounds {
        low: 0,
        high: None,
    };

    pub fn contains(&self, price_million: i64) -> bool {
        price_million >= self.low && self.high.is_none_or(|high| price_million <= high)
    }
}

/// A named budget band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceRange {
    pub id: &'static str,
    pub label: &'static str,
    pub bounds: PriceBounds,
}

pub const PRICE_RANGES: [PriceRange; 5] = [
    PriceRange {
        id: "p1",
        label: "Up to 30 million",
        bounds: PriceBounds {
            low: 0,
            high: Some(30),
        },
    },
    PriceRange {
        id: "p2",
        label: "30 to 50 million",
        bounds: PriceBounds {
            low: 30,
            high: Some(50),
        },
    },
    PriceRange {
        id: "p3",
        label: "50 to 80 million",
        bounds: PriceBounds {
            low: 50,
            high: Some(80),
        },
    },
    PriceRange {
        id: "p4",
        label: "Over 80 million",
        bounds: PriceBounds {
            low: 80,
            high: None,
        },
    },
    PriceRange {
        id: "p5",
        label: "Doesn't matter",
        bounds: PriceBounds::ANY,
    },
];

/// Look up a band by id.
pub fn find_price_range(id: &str) -> Option<&'static PriceRange> {
    PRICE_RANGES.iter().find(|range| range.id == id)
}

/// Bounds for a band id; unknown ids fall back to [`PriceBounds::ANY`].
pub fn bounds_for(id: &str) -> PriceBounds {
    find_price_range(id)
        .map(|range| range.bounds)
        .unwrap_or(PriceBounds::ANY)
}
