// Copyright 2026 Hypermesh Foundation. All rights reserved.
// VISION 2060 Survey Engine - Scenario Session

//! Store-backed respondent session.
//!
//! A session wraps one [`ScenarioForm`] and mirrors the respondent's actions
//! into the [`ResponseStore`]: logins, resets, submissions, logouts and
//! active-time heartbeats. Only accepted submissions change the stored
//! scenario.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::form::{ResetScope, ScenarioForm};
use crate::likert::{LikertError, LikertSheet};
use crate::params::{Baseline, ModelParams};
use crate::response::{RespondentProfile, StoredResponse, UsageCounters};
use crate::store::{ResponseStore, StoreError};
use crate::types::{BalanceKind, DerivedFlows, Evaluation, Field, FieldError};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// One or more balance checks failed on the final re-evaluation.
    #[error("submission rejected: {message}")]
    Rejected {
        failed: Vec<BalanceKind>,
        message: String,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Likert(#[from] LikertError),

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error("respondent email is empty")]
    MissingEmail,
}

/// Returned by a successful [`ScenarioSession::submit`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmitReceipt {
    pub evaluation: Evaluation,
    pub counters: UsageCounters,
}

// ---------------------------------------------------------------------------
// ScenarioSession
// ---------------------------------------------------------------------------

pub struct ScenarioSession {
    store: Arc<dyn ResponseStore>,
    email: String,
    form: ScenarioForm,
}

impl ScenarioSession {
    /// Log a respondent in. First-time respondents get a record holding the
    /// baseline scenario; returning respondents see their stored scenario.
    pub fn open(
        store: Arc<dyn ResponseStore>,
        email: &str,
        params: ModelParams,
        baseline: Baseline,
    ) -> Result<Self, SessionError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(SessionError::MissingEmail);
        }

        let form = ScenarioForm::with_config(params, baseline);
        let defaults = *form.defaults();
        let seed = || StoredResponse::new(email, defaults);
        let record = store
            .upsert(email, &seed, &mut |r| r.counters.logins += 1)
            .map_err(|e| log_store_error(email, "login", e))?;

        let stored = record.scenario_input(&defaults)?;
        tracing::info!(email, logins = record.counters.logins, "respondent logged in");
        Ok(Self {
            store,
            email: email.to_string(),
            form: form.with_input(stored),
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn form(&self) -> &ScenarioForm {
        &self.form
    }

    pub fn set_field(&mut self, field: Field, value: Option<f64>) -> Evaluation {
        self.form.set_field(field, value)
    }

    pub fn set_field_by_id(&mut self, id: &str, value: Option<f64>) -> Result<Evaluation, SessionError> {
        Ok(self.form.set_field_by_id(id, value)?)
    }

    pub fn evaluate(&self) -> Evaluation {
        self.form.evaluate()
    }

    /// Restore one scope to the baseline and count the button press.
    pub fn reset(&mut self, scope: ResetScope) -> Result<DerivedFlows, SessionError> {
        let flows = self.form.reset(scope);
        self.store
            .update(&self.email, &mut |r| match scope {
                ResetScope::LandCover => r.counters.reset_land_cover += 1,
                ResetScope::WoodFlows => r.counters.reset_wood_flows += 1,
            })
            .map_err(|e| log_store_error(&self.email, "reset", e))?;
        tracing::info!(email = %self.email, ?scope, "scenario reset");
        Ok(flows)
    }

    /// Submit the scenario held by the form with the given answers.
    ///
    /// The scenario is re-evaluated here. If any balance check fails, each
    /// failing check's counter is incremented and the stored scenario is
    /// left as it was.
    pub fn submit(
        &mut self,
        likert: LikertSheet,
        profile: RespondentProfile,
    ) -> Result<SubmitReceipt, SessionError> {
        let evaluation = self.form.evaluate();

        if !evaluation.verdict.all_ok() {
            let failed = evaluation.verdict.failed();
            let message = evaluation.verdict.failure_summary();
            self.store
                .update(&self.email, &mut |r| {
                    for kind in &failed {
                        r.counters.record_failure(*kind);
                    }
                })
                .map_err(|e| log_store_error(&self.email, "submit", e))?;
            tracing::warn!(email = %self.email, ?failed, "submission rejected");
            return Err(SessionError::Rejected { failed, message });
        }

        likert.validate()?;

        let scenario = self.form.input().to_field_values();
        let defaults = *self.form.defaults();
        let email = self.email.as_str();
        let seed = || StoredResponse::new(email, defaults);
        let record = self
            .store
            .upsert(email, &seed, &mut |r| {
                r.scenario = scenario.clone();
                r.likert = likert.clone();
                r.profile = profile.clone();
                r.counters.submit_count += 1;
            })
            .map_err(|e| log_store_error(email, "submit", e))?;

        tracing::info!(email, submits = record.counters.submit_count, "response saved");
        Ok(SubmitReceipt {
            evaluation,
            counters: record.counters,
        })
    }

    /// Log out. Counted whether or not a response was submitted.
    pub fn logout(self) -> Result<(), SessionError> {
        self.store
            .update(&self.email, &mut |r| r.counters.logout_without_responding += 1)
            .map_err(|e| log_store_error(&self.email, "logout", e))?;
        tracing::info!(email = %self.email, "respondent logged out");
        Ok(())
    }

    /// Heartbeat from the client. Adds one heartbeat interval of active time
    /// unless the respondent has been idle past the inactivity threshold.
    /// Returns whether time was added.
    pub fn record_activity(&self, inactive_for: Duration) -> Result<bool, SessionError> {
        let params = self.form.params();
        let threshold = Duration::from_secs(params.inactivity_threshold_secs);
        if inactive_for >= threshold {
            tracing::warn!(
                email = %self.email,
                idle_min = inactive_for.as_secs() / 60,
                "respondent inactive"
            );
            return Ok(false);
        }
        let interval = params.heartbeat_secs;
        self.store
            .update(&self.email, &mut |r| r.counters.elapsed_time_seconds += interval)
            .map_err(|e| log_store_error(&self.email, "heartbeat", e))?;
        Ok(true)
    }
}

fn log_store_error(email: &str, action: &str, err: StoreError) -> SessionError {
    tracing::error!(email, action, error = %err, "response store failure");
    SessionError::Store(err)
}
