// Copyright 2026 Hypermesh Foundation. All rights reserved.
// VISION 2060 Survey Engine - Balance Validation

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::adapter::{format_mcf, saturating_sum, to_decimal};
use crate::calculator::compute_derived;
use crate::params::ModelParams;
use crate::types::{
    BalanceCheck, BalanceVerdict, DerivedFlows, Direction, Evaluation, ScenarioInput,
    SupplyDemandCheck,
};

const FULL: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Individual checks
// ---------------------------------------------------------------------------

/// Sum of `values` must equal 100 to within `sum_epsilon`, exclusive, so a
/// sum of 100.01 fails at the default epsilon.
fn check_sum(values: &[f64], params: &ModelParams, subject: &str) -> BalanceCheck {
    let sum = saturating_sum(values.iter().map(|v| to_decimal(*v)));
    let ok = sum.saturating_sub(FULL).abs() < params.sum_epsilon;
    let message = if ok {
        format!("{subject} sum to 100%")
    } else {
        format!("{subject} must sum to 100% (now {}%)", sum.normalize())
    };
    BalanceCheck { ok, message, sum }
}

/// The six land-cover percentages.
pub fn check_land_cover(input: &ScenarioInput, params: &ModelParams) -> BalanceCheck {
    check_sum(&input.land_cover.values(), params, "Land cover shares")
}

/// Lumber, pulp and fuel shares.
pub fn check_shares(input: &ScenarioInput, params: &ModelParams) -> BalanceCheck {
    check_sum(&input.shares.values(), params, "Lumber, pulp and fuelwood shares")
}

/// Lumber supply and end-use demand must agree within `supply_tolerance`.
pub fn check_supply_demand(derived: &DerivedFlows, params: &ModelParams) -> SupplyDemandCheck {
    let supply = derived.lumber_supply;
    let demand = derived.total_enduse_demand;
    let difference = demand.saturating_sub(supply);

    let direction = if difference.abs() <= params.supply_tolerance {
        Direction::Balanced
    } else if difference > Decimal::ZERO {
        Direction::DemandHigher
    } else {
        Direction::SupplyHigher
    };

    let message = match direction {
        Direction::Balanced => format!(
            "Lumber supply ({} mcf) and demand ({} mcf) are in balance",
            format_mcf(supply),
            format_mcf(demand)
        ),
        Direction::DemandHigher => format!(
            "Lumber demand ({} mcf) is higher than supply ({} mcf) by {} mcf",
            format_mcf(demand),
            format_mcf(supply),
            format_mcf(difference)
        ),
        Direction::SupplyHigher => format!(
            "Lumber supply ({} mcf) is higher than demand ({} mcf) by {} mcf",
            format_mcf(supply),
            format_mcf(demand),
            format_mcf(difference.abs())
        ),
    };

    SupplyDemandCheck {
        ok: direction == Direction::Balanced,
        message,
        direction,
        difference,
    }
}

// ---------------------------------------------------------------------------
// Validator
// ---------------------------------------------------------------------------

/// Run all three balance checks. Never short-circuits: every check is
/// evaluated even when an earlier one fails.
pub fn validate(input: &ScenarioInput, derived: &DerivedFlows, params: &ModelParams) -> BalanceVerdict {
    BalanceVerdict {
        land_cover: check_land_cover(input, params),
        shares: check_shares(input, params),
        supply_demand: check_supply_demand(derived, params),
    }
}

/// Calculator followed by validator, returned as one record.
pub fn evaluate(input: &ScenarioInput, params: &ModelParams) -> Evaluation {
    let derived = compute_derived(input, params);
    let verdict = validate(input, &derived, params);
    tracing::debug!(
        lumber_supply = %derived.lumber_supply,
        demand = %derived.total_enduse_demand,
        balanced = verdict.all_ok(),
        "scenario evaluated"
    );
    Evaluation { derived, verdict }
}
