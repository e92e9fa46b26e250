// Copyright 2026 Hypermesh Foundation. All rights reserved.
// VISION 2060 Survey Engine - Model Parameters and 2020 Baseline

//! Immutable configuration handed to the calculator, validator and session.
//!
//! [`ModelParams`] holds the fixed constants of the wood-flow model.
//! [`Baseline`] holds the documented 2020 state of New England forests, used
//! as the initial scenario for new respondents and as the target of the two
//! reset actions.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::adapter::{from_decimal, to_decimal};
use crate::calculator::round_to;
use crate::types::{AssortmentShares, EndUseDemand, LandCover, ScenarioInput};

/// Volumes for the five steps of the logging-intensity scale.
pub const LOGGING_INTENSITY_LEVELS: [f64; 5] = [10.0, 17.0, 27.0, 35.0, 45.0];

/// Map a 1-based logging-intensity level to its harvest intensity.
pub fn intensity_for_level(level: u8) -> Option<f64> {
    let idx = usize::from(level).checked_sub(1)?;
    LOGGING_INTENSITY_LEVELS.get(idx).copied()
}

// ---------------------------------------------------------------------------
// ModelParams
// ---------------------------------------------------------------------------

/// Fixed constants of the wood-flow model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParams {
    /// Area scaling basis of the harvest formula.
    #[serde(with = "rust_decimal::serde::float")]
    pub area_basis: Decimal,
    /// Fraction of lumber volume diverted to pulp as residue.
    #[serde(with = "rust_decimal::serde::float")]
    pub residue_fraction: Decimal,
    /// Allowed deviation from 100 for the land-cover and share sums.
    #[serde(with = "rust_decimal::serde::float")]
    pub sum_epsilon: Decimal,
    /// Absolute lumber supply/demand tolerance in mcf.
    #[serde(with = "rust_decimal::serde::float")]
    pub supply_tolerance: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub lumber_resolution: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub pulp_resolution: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub fuel_resolution: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub demand_resolution: Decimal,
    /// Interval between client activity heartbeats.
    pub heartbeat_secs: u64,
    /// Inactivity after which heartbeats stop accruing active time.
    pub inactivity_threshold_secs: u64,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            area_basis: dec!(40000),
            residue_fraction: dec!(0.333),
            sum_epsilon: dec!(0.01),
            supply_tolerance: dec!(5000),
            lumber_resolution: dec!(100),
            pulp_resolution: dec!(1000),
            fuel_resolution: dec!(1000),
            demand_resolution: dec!(100),
            heartbeat_secs: 30,
            inactivity_threshold_secs: 10 * 60,
        }
    }
}

// ---------------------------------------------------------------------------
// Baseline
// ---------------------------------------------------------------------------

/// The 2020 reference scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Baseline {
    pub land_cover: LandCover,
    pub logging_intensity: f64,
    pub shares: AssortmentShares,
    pub import_lumber: f64,
    pub import_pulp: f64,
    pub recovered_timber: f64,
    /// Total lumber end-use demand in 2020, in mcf.
    pub total_demand: f64,
    /// Split of `total_demand` across end uses, in percent.
    pub demand_split: EndUseDemand,
}

impl Default for Baseline {
    fn default() -> Self {
        Self {
            land_cover: LandCover {
                protected_woodlands: 21.0,
                unprotected_forest: 57.0,
                wildlands: 2.0,
                farmland: 5.0,
                developed: 10.0,
                water_and_wetlands: 5.0,
            },
            logging_intensity: 27.0,
            shares: AssortmentShares {
                lumber: 40.0,
                pulp: 40.0,
                fuel: 20.0,
            },
            import_lumber: 150_000.0,
            import_pulp: 115_000.0,
            recovered_timber: 8_000.0,
            total_demand: 382_452.3,
            demand_split: EndUseDemand {
                construction_multistory: 5.0,
                construction_single: 26.0,
                manufacturing: 12.0,
                packaging: 13.0,
                other: 9.0,
                other_construction: 28.0,
                non_res_construction: 7.0,
            },
        }
    }
}

impl Baseline {
    /// Per-category demand: the total split by percentage, rounded to the
    /// demand resolution.
    pub fn demand(&self, params: &ModelParams) -> EndUseDemand {
        let total = to_decimal(self.total_demand);
        let mut demand = EndUseDemand::default();
        for category in crate::types::DemandCategory::ALL {
            let pct = to_decimal(self.demand_split.get(category));
            let value = round_to(total.saturating_mul(pct) / dec!(100), params.demand_resolution);
            *demand.slot(category) = from_decimal(value);
        }
        demand
    }

    /// The baseline as a complete scenario.
    pub fn scenario(&self, params: &ModelParams) -> ScenarioInput {
        ScenarioInput {
            land_cover: self.land_cover,
            logging_intensity: self.logging_intensity,
            shares: self.shares,
            import_lumber: self.import_lumber,
            import_pulp: self.import_pulp,
            demand: self.demand(params),
            recovered_timber: self.recovered_timber,
        }
        .sanitized()
    }
}
