// Copyright 2026 Hypermesh Foundation. All rights reserved.
// VISION 2060 Survey Engine - Derived Flow Calculator

//! Derived-value calculator.
//!
//! Turns a [`ScenarioInput`] into volumetric wood flows (mcf):
//!
//! ```text
//! total_harvest    = intensity * (protected + unprotected) / 100 * area_basis
//! lumber           = total_harvest * lumber_share / 100
//! pulp_from_lumber = residue_fraction * lumber
//! lumber_supply    = round_100(lumber + import_lumber - pulp_from_lumber + recovered)
//! pulp_supply      = round_1000(pulp + import_pulp + pulp_from_lumber)
//! fuel_supply      = round_1000(fuelwood)
//! ```
//!
//! All arithmetic is carried out in `Decimal`, so the same input always
//! produces bit-identical flows.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::adapter::{from_decimal, saturating_sum, to_decimal};
use crate::params::ModelParams;
use crate::types::{DemandCategory, DerivedFlows, EndUseDemand, ScenarioInput};

const HUNDRED: Decimal = dec!(100);

/// Round `value` to the nearest multiple of `resolution`, ties away from zero.
///
/// A non-positive resolution leaves the value untouched.
pub fn round_to(value: Decimal, resolution: Decimal) -> Decimal {
    if resolution <= Decimal::ZERO {
        return value;
    }
    match value.checked_div(resolution) {
        Some(steps) => steps
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .saturating_mul(resolution),
        None => value,
    }
}

fn pct(value: f64) -> Decimal {
    to_decimal(value) / HUNDRED
}

/// Compute every derived flow of `input`. Total, pure and deterministic.
///
/// Arithmetic saturates at the Decimal range, so oversized inputs yield
/// `Decimal::MAX`-sized flows rather than a panic.
pub fn compute_derived(input: &ScenarioInput, params: &ModelParams) -> DerivedFlows {
    let harvestable = pct(input.land_cover.protected_woodlands)
        .saturating_add(pct(input.land_cover.unprotected_forest));
    let total_harvest = to_decimal(input.logging_intensity)
        .saturating_mul(harvestable)
        .saturating_mul(params.area_basis);

    let lumber = total_harvest.saturating_mul(pct(input.shares.lumber));
    let pulp_from_lumber = params.residue_fraction.saturating_mul(lumber);
    let pulp = total_harvest.saturating_mul(pct(input.shares.pulp));
    let fuelwood = total_harvest.saturating_mul(pct(input.shares.fuel));

    let import_lumber = to_decimal(input.import_lumber);
    let import_pulp = to_decimal(input.import_pulp);

    let lumber_supply = round_to(
        saturating_sum([
            lumber.saturating_sub(pulp_from_lumber),
            import_lumber,
            to_decimal(input.recovered_timber),
        ]),
        params.lumber_resolution,
    );
    let pulp_supply = round_to(
        saturating_sum([pulp, import_pulp, pulp_from_lumber]),
        params.pulp_resolution,
    );
    let fuel_supply = round_to(fuelwood, params.fuel_resolution);

    let demand_sum = saturating_sum(input.demand.values().iter().map(|v| to_decimal(*v)));
    let land_cover_total = saturating_sum(input.land_cover.values().iter().map(|v| to_decimal(*v)));

    DerivedFlows {
        total_harvest,
        lumber,
        pulp_from_lumber,
        pulp,
        fuelwood,
        lumber_supply,
        pulp_supply,
        fuel_supply,
        total_enduse_demand: round_to(demand_sum, params.demand_resolution),
        land_cover_total,
        roundwood_market: saturating_sum([total_harvest, import_lumber, import_pulp]),
    }
}

// ---------------------------------------------------------------------------
// Demand change indicator
// ---------------------------------------------------------------------------

/// Trend arrow shown next to each end-use demand field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    pub fn arrow(&self) -> &'static str {
        match self {
            Self::Up => "▲",
            Self::Down => "▼",
            Self::Flat => "■",
        }
    }
}

/// Change of one end-use demand relative to the 2020 baseline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DemandChange {
    pub category: DemandCategory,
    /// Percent change versus baseline.
    pub percent: f64,
    pub trend: Trend,
}

impl DemandChange {
    /// `Demand change in % from 2020: ▲ +4.7%`
    pub fn label(&self) -> String {
        format!(
            "Demand change in % from 2020: {} {:+.1}%",
            self.trend.arrow(),
            self.percent
        )
    }
}

/// Percent change from `baseline` to `current`. Increases below 0.1 % count
/// as flat; any decrease counts as down.
pub fn demand_change(category: DemandCategory, current: f64, baseline: f64) -> DemandChange {
    if baseline == 0.0 {
        return DemandChange { category, percent: 0.0, trend: Trend::Flat };
    }
    let base = to_decimal(baseline);
    let percent = to_decimal(current)
        .saturating_sub(base)
        .checked_div(base)
        .map(|ratio| from_decimal(ratio.saturating_mul(HUNDRED)))
        .unwrap_or(0.0);
    let trend = if percent > 0.1 {
        Trend::Up
    } else if percent < 0.0 {
        Trend::Down
    } else {
        Trend::Flat
    };
    DemandChange { category, percent, trend }
}

/// Demand change for all seven end uses, in display order.
pub fn demand_changes(current: &EndUseDemand, baseline: &EndUseDemand) -> Vec<DemandChange> {
    DemandCategory::ALL
        .iter()
        .map(|c| demand_change(*c, current.get(*c), baseline.get(*c)))
        .collect()
}
