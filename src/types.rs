// Copyright 2026 Hypermesh Foundation. All rights reserved.
// VISION 2060 Survey Engine - Type Definitions

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::adapter::sanitize;

// ─── Land Cover ──────────────────────────────────────────────────────────────

/// Land-cover split of New England in 2060, in percent of total land area.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LandCover {
    pub protected_woodlands: f64,
    pub unprotected_forest: f64,
    pub wildlands: f64,
    pub farmland: f64,
    pub developed: f64,
    pub water_and_wetlands: f64,
}

impl LandCover {
    pub fn values(&self) -> [f64; 6] {
        [
            self.protected_woodlands,
            self.unprotected_forest,
            self.wildlands,
            self.farmland,
            self.developed,
            self.water_and_wetlands,
        ]
    }

    /// Share of land open to harvesting (protected woodlands + unprotected forest).
    pub fn harvestable(&self) -> f64 {
        self.protected_woodlands + self.unprotected_forest
    }
}

// ─── Assortment Shares ───────────────────────────────────────────────────────

/// Split of harvested volume into product assortments, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AssortmentShares {
    pub lumber: f64,
    pub pulp: f64,
    pub fuel: f64,
}

impl AssortmentShares {
    pub fn values(&self) -> [f64; 3] {
        [self.lumber, self.pulp, self.fuel]
    }
}

// ─── End-Use Demand ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DemandCategory {
    ConstructionMultistory = 0,
    ConstructionSingle = 1,
    Manufacturing = 2,
    Packaging = 3,
    Other = 4,
    OtherConstruction = 5,
    NonResConstruction = 6,
}

impl DemandCategory {
    pub const ALL: [DemandCategory; 7] = [
        Self::ConstructionMultistory,
        Self::ConstructionSingle,
        Self::Manufacturing,
        Self::Packaging,
        Self::Other,
        Self::OtherConstruction,
        Self::NonResConstruction,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::ConstructionMultistory => "Construction multistory",
            Self::ConstructionSingle => "Construction single family",
            Self::Manufacturing => "Manufacturing",
            Self::Packaging => "Packaging",
            Self::Other => "Other uses",
            Self::OtherConstruction => "Residential repair and remodeling",
            Self::NonResConstruction => "Nonresidential construction",
        }
    }
}

/// Lumber end-use demand per category, in mcf.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EndUseDemand {
    pub construction_multistory: f64,
    pub construction_single: f64,
    pub manufacturing: f64,
    pub packaging: f64,
    pub other: f64,
    pub other_construction: f64,
    pub non_res_construction: f64,
}

impl EndUseDemand {
    pub fn get(&self, category: DemandCategory) -> f64 {
        match category {
            DemandCategory::ConstructionMultistory => self.construction_multistory,
            DemandCategory::ConstructionSingle => self.construction_single,
            DemandCategory::Manufacturing => self.manufacturing,
            DemandCategory::Packaging => self.packaging,
            DemandCategory::Other => self.other,
            DemandCategory::OtherConstruction => self.other_construction,
            DemandCategory::NonResConstruction => self.non_res_construction,
        }
    }

    pub fn slot(&mut self, category: DemandCategory) -> &mut f64 {
        match category {
            DemandCategory::ConstructionMultistory => &mut self.construction_multistory,
            DemandCategory::ConstructionSingle => &mut self.construction_single,
            DemandCategory::Manufacturing => &mut self.manufacturing,
            DemandCategory::Packaging => &mut self.packaging,
            DemandCategory::Other => &mut self.other,
            DemandCategory::OtherConstruction => &mut self.other_construction,
            DemandCategory::NonResConstruction => &mut self.non_res_construction,
        }
    }

    pub fn values(&self) -> [f64; 7] {
        DemandCategory::ALL.map(|c| self.get(c))
    }
}

// ─── Form Field ──────────────────────────────────────────────────────────────

/// One user-editable input of the survey form.
///
/// Field ids are the ones used by the survey page (`protWoodlands`,
/// `lumbershare`, `import_paper`, ...); the snake_case Rust names are
/// accepted as aliases.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    ProtectedWoodlands,
    UnprotectedForest,
    Wildlands,
    Farmland,
    Developed,
    WaterAndWetlands,
    LoggingIntensity,
    LumberShare,
    PulpShare,
    FuelShare,
    ImportLumber,
    ImportPulp,
    RecoveredTimber,
    Demand(DemandCategory),
}

impl Field {
    pub const ALL: [Field; 20] = [
        Self::ProtectedWoodlands,
        Self::UnprotectedForest,
        Self::Wildlands,
        Self::Farmland,
        Self::Developed,
        Self::WaterAndWetlands,
        Self::LoggingIntensity,
        Self::LumberShare,
        Self::PulpShare,
        Self::FuelShare,
        Self::ImportLumber,
        Self::ImportPulp,
        Self::RecoveredTimber,
        Self::Demand(DemandCategory::ConstructionMultistory),
        Self::Demand(DemandCategory::ConstructionSingle),
        Self::Demand(DemandCategory::Manufacturing),
        Self::Demand(DemandCategory::Packaging),
        Self::Demand(DemandCategory::Other),
        Self::Demand(DemandCategory::OtherConstruction),
        Self::Demand(DemandCategory::NonResConstruction),
    ];

    /// Form id as used by the survey page and the response table.
    pub fn id(&self) -> &'static str {
        match self {
            Self::ProtectedWoodlands => "protWoodlands",
            Self::UnprotectedForest => "unprotectedForest",
            Self::Wildlands => "wildlands",
            Self::Farmland => "farmland",
            Self::Developed => "developed",
            Self::WaterAndWetlands => "waterAndWetlands",
            Self::LoggingIntensity => "logging_intensity",
            Self::LumberShare => "lumbershare",
            Self::PulpShare => "papershare",
            Self::FuelShare => "fuelshare",
            Self::ImportLumber => "import_lumber",
            Self::ImportPulp => "import_paper",
            Self::RecoveredTimber => "recovery_timber",
            Self::Demand(DemandCategory::ConstructionMultistory) => "construction_multistory_val",
            Self::Demand(DemandCategory::ConstructionSingle) => "construction_single_val",
            Self::Demand(DemandCategory::Manufacturing) => "manufacturing_val",
            Self::Demand(DemandCategory::Packaging) => "packaging_val",
            Self::Demand(DemandCategory::Other) => "other_val",
            Self::Demand(DemandCategory::OtherConstruction) => "other_construction_val",
            Self::Demand(DemandCategory::NonResConstruction) => "non_res_construction_val",
        }
    }

    fn alias(&self) -> &'static str {
        match self {
            Self::ProtectedWoodlands => "protected_woodlands",
            Self::UnprotectedForest => "unprotected_forest",
            Self::WaterAndWetlands => "water_and_wetlands",
            Self::LumberShare => "lumber_share",
            Self::PulpShare => "pulp_share",
            Self::FuelShare => "fuel_share",
            Self::ImportPulp => "import_pulp",
            Self::RecoveredTimber => "recovered_timber",
            Self::Demand(DemandCategory::ConstructionMultistory) => "construction_multistory",
            Self::Demand(DemandCategory::ConstructionSingle) => "construction_single",
            Self::Demand(DemandCategory::Manufacturing) => "manufacturing",
            Self::Demand(DemandCategory::Packaging) => "packaging",
            Self::Demand(DemandCategory::Other) => "other",
            Self::Demand(DemandCategory::OtherConstruction) => "other_construction",
            Self::Demand(DemandCategory::NonResConstruction) => "non_res_construction",
            field => field.id(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("unknown form field: {0}")]
    UnknownField(String),
}

impl FromStr for Field {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.id() == s || f.alias() == s)
            .ok_or_else(|| FieldError::UnknownField(s.to_string()))
    }
}

// ─── ScenarioInput ───────────────────────────────────────────────────────────

/// Nullable form values keyed by field id, as submitted by the page or held
/// in a response row.
pub type FieldValues = BTreeMap<String, Option<f64>>;

/// Raw user-adjustable scenario. Values are expected to be sanitized
/// (finite, non-negative) before reaching the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScenarioInput {
    pub land_cover: LandCover,
    /// Harvest volume per unit of harvestable area.
    pub logging_intensity: f64,
    pub shares: AssortmentShares,
    pub import_lumber: f64,
    pub import_pulp: f64,
    pub demand: EndUseDemand,
    pub recovered_timber: f64,
}

impl ScenarioInput {
    pub fn get(&self, field: Field) -> f64 {
        match field {
            Field::ProtectedWoodlands => self.land_cover.protected_woodlands,
            Field::UnprotectedForest => self.land_cover.unprotected_forest,
            Field::Wildlands => self.land_cover.wildlands,
            Field::Farmland => self.land_cover.farmland,
            Field::Developed => self.land_cover.developed,
            Field::WaterAndWetlands => self.land_cover.water_and_wetlands,
            Field::LoggingIntensity => self.logging_intensity,
            Field::LumberShare => self.shares.lumber,
            Field::PulpShare => self.shares.pulp,
            Field::FuelShare => self.shares.fuel,
            Field::ImportLumber => self.import_lumber,
            Field::ImportPulp => self.import_pulp,
            Field::RecoveredTimber => self.recovered_timber,
            Field::Demand(c) => self.demand.get(c),
        }
    }

    /// Set a field, coercing missing, negative or non-finite values to 0.
    pub fn set(&mut self, field: Field, value: Option<f64>) {
        let value = sanitize(value);
        let slot = match field {
            Field::ProtectedWoodlands => &mut self.land_cover.protected_woodlands,
            Field::UnprotectedForest => &mut self.land_cover.unprotected_forest,
            Field::Wildlands => &mut self.land_cover.wildlands,
            Field::Farmland => &mut self.land_cover.farmland,
            Field::Developed => &mut self.land_cover.developed,
            Field::WaterAndWetlands => &mut self.land_cover.water_and_wetlands,
            Field::LoggingIntensity => &mut self.logging_intensity,
            Field::LumberShare => &mut self.shares.lumber,
            Field::PulpShare => &mut self.shares.pulp,
            Field::FuelShare => &mut self.shares.fuel,
            Field::ImportLumber => &mut self.import_lumber,
            Field::ImportPulp => &mut self.import_pulp,
            Field::RecoveredTimber => &mut self.recovered_timber,
            Field::Demand(c) => self.demand.slot(c),
        };
        *slot = value;
    }

    /// Re-apply coercion to every field.
    pub fn sanitized(mut self) -> Self {
        for field in Field::ALL {
            let v = self.get(field);
            self.set(field, Some(v));
        }
        self
    }

    /// Build a scenario from form values keyed by field id.
    ///
    /// Absent fields take the value from `fallback`; fields present with a
    /// `null` value are coerced to 0.
    pub fn from_fields(values: &FieldValues, fallback: &ScenarioInput) -> Result<Self, FieldError> {
        let mut input = fallback.sanitized();
        for (id, value) in values {
            let field: Field = id.parse()?;
            input.set(field, *value);
        }
        Ok(input)
    }

    /// Rebuild a stored scenario. Absent and `null` fields both take the
    /// value from `fallback`, the default table.
    pub fn from_stored(values: &FieldValues, fallback: &ScenarioInput) -> Result<Self, FieldError> {
        let mut input = fallback.sanitized();
        for (id, value) in values {
            let field: Field = id.parse()?;
            if value.is_some() {
                input.set(field, *value);
            }
        }
        Ok(input)
    }

    /// Field id → value map, the layout of the response table.
    pub fn to_fields(&self) -> BTreeMap<String, f64> {
        Field::ALL
            .iter()
            .map(|f| (f.id().to_string(), self.get(*f)))
            .collect()
    }

    /// Same as [`to_fields`](Self::to_fields) with every value present.
    pub fn to_field_values(&self) -> FieldValues {
        Field::ALL
            .iter()
            .map(|f| (f.id().to_string(), Some(self.get(*f))))
            .collect()
    }
}

// ─── DerivedFlows ────────────────────────────────────────────────────────────

/// Volumetric wood flows derived from a [`ScenarioInput`], in mcf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DerivedFlows {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_harvest: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub lumber: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub pulp_from_lumber: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub pulp: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub fuelwood: Decimal,
    /// Rounded to the nearest hundred.
    #[serde(with = "rust_decimal::serde::float")]
    pub lumber_supply: Decimal,
    /// Rounded to the nearest thousand.
    #[serde(with = "rust_decimal::serde::float")]
    pub pulp_supply: Decimal,
    /// Rounded to the nearest thousand.
    #[serde(with = "rust_decimal::serde::float")]
    pub fuel_supply: Decimal,
    /// Rounded to the nearest hundred.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_enduse_demand: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub land_cover_total: Decimal,
    /// Harvest plus both imports, unrounded.
    #[serde(with = "rust_decimal::serde::float")]
    pub roundwood_market: Decimal,
}

// ─── Balance Verdict ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BalanceKind {
    LandCover,
    Shares,
    SupplyDemand,
}

impl BalanceKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::LandCover => "land cover",
            Self::Shares => "assortment shares",
            Self::SupplyDemand => "lumber supply and demand",
        }
    }
}

/// Which side of the lumber balance is ahead.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Direction {
    Balanced,
    DemandHigher,
    SupplyHigher,
}

/// Outcome of a sum-to-100 check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceCheck {
    pub ok: bool,
    pub message: String,
    /// The sum that was checked, in percent.
    #[serde(with = "rust_decimal::serde::float")]
    pub sum: Decimal,
}

/// Outcome of the lumber supply/demand tolerance check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyDemandCheck {
    pub ok: bool,
    pub message: String,
    pub direction: Direction,
    /// `total_enduse_demand - lumber_supply`, in mcf.
    #[serde(with = "rust_decimal::serde::float")]
    pub difference: Decimal,
}

/// The three independent balance checks, always computed together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceVerdict {
    pub land_cover: BalanceCheck,
    pub shares: BalanceCheck,
    pub supply_demand: SupplyDemandCheck,
}

impl BalanceVerdict {
    pub fn all_ok(&self) -> bool {
        self.land_cover.ok && self.shares.ok && self.supply_demand.ok
    }

    pub fn is_ok(&self, kind: BalanceKind) -> bool {
        match kind {
            BalanceKind::LandCover => self.land_cover.ok,
            BalanceKind::Shares => self.shares.ok,
            BalanceKind::SupplyDemand => self.supply_demand.ok,
        }
    }

    pub fn message(&self, kind: BalanceKind) -> &str {
        match kind {
            BalanceKind::LandCover => &self.land_cover.message,
            BalanceKind::Shares => &self.shares.message,
            BalanceKind::SupplyDemand => &self.supply_demand.message,
        }
    }

    pub fn failed(&self) -> Vec<BalanceKind> {
        [BalanceKind::LandCover, BalanceKind::Shares, BalanceKind::SupplyDemand]
            .into_iter()
            .filter(|k| !self.is_ok(*k))
            .collect()
    }

    /// Messages of every failing check, joined for display.
    pub fn failure_summary(&self) -> String {
        self.failed()
            .iter()
            .map(|k| self.message(*k))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

// ─── Evaluation ──────────────────────────────────────────────────────────────

/// One pass of the calculator and validator over a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub derived: DerivedFlows,
    pub verdict: BalanceVerdict,
}
