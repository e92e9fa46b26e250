// Copyright 2026 Hypermesh Foundation. All rights reserved.
// VISION 2060 Survey Engine - Scenario Form

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::balance::evaluate;
use crate::calculator::{compute_derived, demand_changes, DemandChange};
use crate::params::{Baseline, ModelParams};
use crate::types::*;

// ─── Reset Scopes ────────────────────────────────────────────────────────────

/// The two reset buttons of the survey page. Each restores its own, disjoint
/// set of fields to the baseline. Water and wetlands belong to neither.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ResetScope {
    /// "Set land cover variables to default".
    LandCover,
    /// "Set section 3 variables to default": intensity, shares, imports,
    /// recovered timber and end-use demand.
    WoodFlows,
}

const LAND_COVER_FIELDS: [Field; 5] = [
    Field::ProtectedWoodlands,
    Field::UnprotectedForest,
    Field::Developed,
    Field::Farmland,
    Field::Wildlands,
];

const WOOD_FLOW_FIELDS: [Field; 14] = [
    Field::LoggingIntensity,
    Field::LumberShare,
    Field::PulpShare,
    Field::FuelShare,
    Field::ImportLumber,
    Field::ImportPulp,
    Field::RecoveredTimber,
    Field::Demand(DemandCategory::ConstructionMultistory),
    Field::Demand(DemandCategory::ConstructionSingle),
    Field::Demand(DemandCategory::Manufacturing),
    Field::Demand(DemandCategory::Packaging),
    Field::Demand(DemandCategory::Other),
    Field::Demand(DemandCategory::OtherConstruction),
    Field::Demand(DemandCategory::NonResConstruction),
];

impl ResetScope {
    pub fn fields(&self) -> &'static [Field] {
        match self {
            Self::LandCover => &LAND_COVER_FIELDS,
            Self::WoodFlows => &WOOD_FLOW_FIELDS,
        }
    }
}

// ─── ScenarioForm ────────────────────────────────────────────────────────────

/// Current state of one respondent's scenario editor.
///
/// Every edit is coerced and re-runs the calculator and validator, so the
/// returned [`Evaluation`] always reflects exactly the values held here.
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct ScenarioForm {
    pub(crate) params: ModelParams,
    pub(crate) baseline: Baseline,
    /// Cached baseline scenario; the reset target and the load fallback.
    pub(crate) defaults: ScenarioInput,
    pub(crate) input: ScenarioInput,
}

impl Default for ScenarioForm {
    fn default() -> Self {
        Self::with_config(ModelParams::default(), Baseline::default())
    }
}

impl ScenarioForm {
    /// A form showing the baseline scenario.
    pub fn with_config(params: ModelParams, baseline: Baseline) -> Self {
        let defaults = baseline.scenario(&params);
        Self {
            params,
            baseline,
            defaults,
            input: defaults,
        }
    }

    /// Replace the whole scenario, e.g. with a returning respondent's
    /// stored values.
    pub fn with_input(mut self, input: ScenarioInput) -> Self {
        self.input = input.sanitized();
        self
    }

    pub fn params(&self) -> &ModelParams {
        &self.params
    }

    pub fn baseline(&self) -> &Baseline {
        &self.baseline
    }

    pub fn input(&self) -> &ScenarioInput {
        &self.input
    }

    pub fn defaults(&self) -> &ScenarioInput {
        &self.defaults
    }

    pub fn value(&self, field: Field) -> f64 {
        self.input.get(field)
    }

    pub fn set_field(&mut self, field: Field, value: Option<f64>) -> Evaluation {
        self.input.set(field, value);
        self.evaluate()
    }

    pub fn set_field_by_id(&mut self, id: &str, value: Option<f64>) -> Result<Evaluation, FieldError> {
        let field: Field = id.parse()?;
        Ok(self.set_field(field, value))
    }

    /// Load form values keyed by field id. Absent ids keep the baseline
    /// value; `null` values become 0.
    pub fn load(&mut self, values: &BTreeMap<String, Option<f64>>) -> Result<Evaluation, FieldError> {
        self.input = ScenarioInput::from_fields(values, &self.defaults)?;
        Ok(self.evaluate())
    }

    pub fn evaluate(&self) -> Evaluation {
        evaluate(&self.input, &self.params)
    }

    /// Restore one scope to the baseline and refresh the flows. The
    /// validator is not run.
    pub fn reset(&mut self, scope: ResetScope) -> DerivedFlows {
        for field in scope.fields() {
            self.input.set(*field, Some(self.defaults.get(*field)));
        }
        compute_derived(&self.input, &self.params)
    }

    /// Change of each end-use demand versus the baseline.
    pub fn demand_changes(&self) -> Vec<DemandChange> {
        demand_changes(&self.input.demand, &self.defaults.demand)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn new_form_shows_balanced_baseline() {
        let form = ScenarioForm::default();
        let eval = form.evaluate();
        assert!(eval.verdict.all_ok());
        assert_eq!(eval.derived.lumber_supply, dec!(382800));
    }

    #[test]
    fn set_field_coerces_and_reevaluates() {
        let mut form = ScenarioForm::default();
        let eval = form.set_field(Field::FuelShare, Some(-20.0));
        assert_eq!(form.value(Field::FuelShare), 0.0);
        assert!(!eval.verdict.shares.ok);
        assert_eq!(eval.verdict.shares.sum, dec!(80));

        let eval = form.set_field(Field::FuelShare, None);
        assert_eq!(eval.derived.fuelwood, dec!(0));
    }

    #[test]
    fn set_field_by_id_accepts_page_ids_and_aliases() {
        let mut form = ScenarioForm::default();
        form.set_field_by_id("import_paper", Some(1.0)).expect("test: known id");
        assert_eq!(form.input().import_pulp, 1.0);
        form.set_field_by_id("import_pulp", Some(2.0)).expect("test: alias");
        assert_eq!(form.input().import_pulp, 2.0);
        assert_eq!(
            form.set_field_by_id("stumpage", Some(1.0)),
            Err(FieldError::UnknownField("stumpage".into()))
        );
    }

    #[test]
    fn reset_scopes_are_disjoint_and_skip_water() {
        let lc = ResetScope::LandCover.fields();
        let wf = ResetScope::WoodFlows.fields();
        assert!(lc.iter().all(|f| !wf.contains(f)));
        assert!(!lc.contains(&Field::WaterAndWetlands));
        assert!(!wf.contains(&Field::WaterAndWetlands));
        assert_eq!(lc.len() + wf.len() + 1, Field::ALL.len());
    }

    #[test]
    fn reset_restores_only_its_scope() {
        let mut form = ScenarioForm::default();
        form.set_field(Field::Wildlands, Some(30.0));
        form.set_field(Field::WaterAndWetlands, Some(1.0));
        form.set_field(Field::LumberShare, Some(60.0));

        let flows = form.reset(ResetScope::LandCover);
        assert_eq!(form.value(Field::Wildlands), 2.0);
        assert_eq!(form.value(Field::WaterAndWetlands), 1.0);
        assert_eq!(form.value(Field::LumberShare), 60.0);
        assert_eq!(flows, compute_derived(form.input(), form.params()));

        form.reset(ResetScope::WoodFlows);
        assert_eq!(form.value(Field::LumberShare), 40.0);
        assert_eq!(form.value(Field::WaterAndWetlands), 1.0);
    }

    #[test]
    fn load_keeps_baseline_for_absent_ids() {
        let mut form = ScenarioForm::default();
        let mut values = BTreeMap::new();
        values.insert("lumbershare".to_string(), Some(50.0));
        values.insert("papershare".to_string(), None);
        let eval = form.load(&values).expect("test: known ids");
        assert_eq!(form.value(Field::LumberShare), 50.0);
        assert_eq!(form.value(Field::PulpShare), 0.0);
        assert_eq!(form.value(Field::FuelShare), 20.0);
        assert_eq!(eval.verdict.shares.sum, dec!(70));
    }

    #[test]
    fn demand_changes_follow_edits() {
        let mut form = ScenarioForm::default();
        assert!(form.demand_changes().iter().all(|c| c.percent == 0.0));
        form.set_field(Field::Demand(DemandCategory::Packaging), Some(0.0));
        let packaging = form
            .demand_changes()
            .into_iter()
            .find(|c| c.category == DemandCategory::Packaging)
            .expect("test: packaging present");
        assert_eq!(packaging.percent, -100.0);
        assert_eq!(packaging.trend.arrow(), "▼");
    }
}
