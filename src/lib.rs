// Copyright 2026 Hypermesh Foundation. All rights reserved.
// VISION 2060 Survey Engine

pub mod types;
pub mod adapter;
pub mod params;
pub mod calculator;
pub mod balance;
pub mod likert;
pub mod form;

// Persistence and respondent bookkeeping
pub mod response;
pub mod store;
pub mod session;

pub use types::*;
pub use balance::{evaluate, validate};
pub use calculator::compute_derived;
pub use form::{ResetScope, ScenarioForm};
pub use params::{Baseline, ModelParams};
pub use session::{ScenarioSession, SessionError};
pub use store::{MemoryStore, ResponseStore, StoreError};

use std::collections::BTreeMap;
use wasm_bindgen::prelude::*;

fn to_js<T: serde::Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

// ─── WASM Interface ──────────────────────────────────────────────────────────

#[wasm_bindgen]
impl ScenarioForm {
    /// Form initialised with the 2020 baseline.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        #[cfg(target_arch = "wasm32")]
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));

        Self::default()
    }

    /// Set one field by its page id and return the fresh evaluation.
    /// `undefined` or `null` clears the field to 0.
    pub fn set_value(&mut self, id: &str, value: Option<f64>) -> Result<JsValue, JsValue> {
        self.set_field_by_id(id, value)
            .map(|eval| to_js(&eval))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = evaluate)]
    pub fn evaluate_js(&self) -> JsValue {
        to_js(&self.evaluate())
    }

    /// Load a `{ fieldId: number | null }` object.
    #[wasm_bindgen(js_name = load)]
    pub fn load_js(&mut self, values: JsValue) -> Result<JsValue, JsValue> {
        let values: BTreeMap<String, Option<f64>> = serde_wasm_bindgen::from_value(values)?;
        self.load(&values)
            .map(|eval| to_js(&eval))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn reset_land_cover(&mut self) -> JsValue {
        to_js(&self.reset(ResetScope::LandCover))
    }

    pub fn reset_wood_flows(&mut self) -> JsValue {
        to_js(&self.reset(ResetScope::WoodFlows))
    }

    /// Current values keyed by page id.
    #[wasm_bindgen(js_name = input)]
    pub fn input_js(&self) -> JsValue {
        to_js(&self.input().to_fields())
    }

    #[wasm_bindgen(js_name = demand_changes)]
    pub fn demand_changes_js(&self) -> JsValue {
        let labelled: Vec<_> = self
            .demand_changes()
            .into_iter()
            .map(|c| (c.category.label(), c.label(), c))
            .collect();
        to_js(&labelled)
    }

    /// Harvest intensity for a 1-5 slider level, or `undefined`.
    pub fn intensity_for_level(level: u8) -> Option<f64> {
        params::intensity_for_level(level)
    }
}
