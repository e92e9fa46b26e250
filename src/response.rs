// Copyright 2026 Hypermesh Foundation. All rights reserved.
// VISION 2060 Survey Engine - Stored Respondent Record

use serde::{Deserialize, Serialize};

use crate::likert::LikertSheet;
use crate::types::{BalanceKind, FieldError, FieldValues, ScenarioInput};

/// Background questions about the respondent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RespondentProfile {
    /// New England states the respondent works in.
    pub states: Vec<String>,
    pub state_other: String,
    pub organization_size: Option<String>,
    pub organization_type: Vec<String>,
    pub organization_type_other: String,
    pub prof_position: Vec<String>,
    pub prof_position_other: String,
    pub years_experience: Option<u32>,
    pub general_comment: String,
}

/// Usage bookkeeping kept alongside the answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageCounters {
    pub logins: u32,
    /// Presses of "Set land cover variables to default".
    pub reset_land_cover: u32,
    /// Presses of "Set section 3 variables to default".
    pub reset_wood_flows: u32,
    pub submit_count: u32,
    pub logout_without_responding: u32,
    pub elapsed_time_seconds: u64,
    pub failed_attempts_land_cover: u32,
    pub failed_attempts_share: u32,
    pub failed_attempts_supply: u32,
}

impl UsageCounters {
    pub fn record_failure(&mut self, kind: BalanceKind) {
        match kind {
            BalanceKind::LandCover => self.failed_attempts_land_cover += 1,
            BalanceKind::Shares => self.failed_attempts_share += 1,
            BalanceKind::SupplyDemand => self.failed_attempts_supply += 1,
        }
    }

    pub fn failures(&self, kind: BalanceKind) -> u32 {
        match kind {
            BalanceKind::LandCover => self.failed_attempts_land_cover,
            BalanceKind::Shares => self.failed_attempts_share,
            BalanceKind::SupplyDemand => self.failed_attempts_supply,
        }
    }
}

/// One row per respondent, keyed by email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredResponse {
    pub email: String,
    /// Last accepted scenario by field id (the baseline until the first
    /// submit). Columns may be absent or null in older rows.
    #[serde(default)]
    pub scenario: FieldValues,
    #[serde(default)]
    pub likert: LikertSheet,
    #[serde(default)]
    pub profile: RespondentProfile,
    #[serde(default)]
    pub counters: UsageCounters,
}

impl StoredResponse {
    /// Fresh record: baseline scenario, default Likert answers, zero counters.
    pub fn new(email: impl Into<String>, baseline: ScenarioInput) -> Self {
        Self {
            email: email.into(),
            scenario: baseline.to_field_values(),
            likert: LikertSheet::default(),
            profile: RespondentProfile::default(),
            counters: UsageCounters::default(),
        }
    }

    /// The stored scenario with absent or null columns filled from
    /// `defaults`.
    pub fn scenario_input(&self, defaults: &ScenarioInput) -> Result<ScenarioInput, FieldError> {
        ScenarioInput::from_stored(&self.scenario, defaults)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_failure_targets_one_counter() {
        let mut counters = UsageCounters::default();
        counters.record_failure(BalanceKind::Shares);
        counters.record_failure(BalanceKind::Shares);
        counters.record_failure(BalanceKind::SupplyDemand);
        assert_eq!(counters.failures(BalanceKind::LandCover), 0);
        assert_eq!(counters.failures(BalanceKind::Shares), 2);
        assert_eq!(counters.failures(BalanceKind::SupplyDemand), 1);
    }

    #[test]
    fn partial_scenario_is_filled_from_defaults() {
        let mut baseline = ScenarioInput::default();
        baseline.shares.fuel = 20.0;
        baseline.import_pulp = 115_000.0;

        let json = r#"{"email":"p@example.com","scenario":{"lumbershare":45.0,"fuelshare":null}}"#;
        let record: StoredResponse = serde_json::from_str(json).expect("test: partial record");
        let input = record.scenario_input(&baseline).expect("test: known ids");
        assert_eq!(input.shares.lumber, 45.0);
        assert_eq!(input.shares.fuel, 20.0);
        assert_eq!(input.import_pulp, 115_000.0);
        assert_eq!(record.likert, LikertSheet::default());
    }

    #[test]
    fn unknown_stored_column_is_reported() {
        let json = r#"{"email":"p@example.com","scenario":{"stumpage":1.0}}"#;
        let record: StoredResponse = serde_json::from_str(json).expect("test: parses");
        assert_eq!(
            record.scenario_input(&ScenarioInput::default()),
            Err(FieldError::UnknownField("stumpage".into()))
        );
    }

    #[test]
    fn older_records_without_counters_deserialize() {
        let record = StoredResponse::new("a@example.com", ScenarioInput::default());
        let mut json = serde_json::to_value(&record).expect("test: serialize");
        let obj = json.as_object_mut().expect("test: object");
        obj.remove("counters");
        obj.remove("profile");
        let back: StoredResponse = serde_json::from_value(json).expect("test: deserialize");
        assert_eq!(back.counters, UsageCounters::default());
        assert_eq!(back, record);
    }
}
