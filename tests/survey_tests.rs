#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use rust_decimal_macros::dec;
    use vision_engine::likert::LikertSheet;
    use vision_engine::response::RespondentProfile;
    use vision_engine::*;

    fn baseline_input() -> ScenarioInput {
        Baseline::default().scenario(&ModelParams::default())
    }

    fn open(store: &Arc<MemoryStore>, email: &str) -> ScenarioSession {
        let store: Arc<dyn ResponseStore> = store.clone();
        ScenarioSession::open(store, email, ModelParams::default(), Baseline::default())
            .expect("open session")
    }

    /// `n` values in hundredths of a percent that sum to exactly 100.
    fn random_split(rng: &mut ChaCha8Rng, n: usize) -> Vec<f64> {
        let mut cuts: Vec<u32> = (0..n - 1).map(|_| rng.gen_range(0..=10_000)).collect();
        cuts.push(0);
        cuts.push(10_000);
        cuts.sort_unstable();
        cuts.windows(2).map(|w| f64::from(w[1] - w[0]) / 100.0).collect()
    }

    // ========== Calculator ==========

    #[test]
    fn test_2020_baseline_harvest_and_lumber() {
        let mut input = ScenarioInput::default();
        input.logging_intensity = 27.0;
        input.land_cover.protected_woodlands = 21.0;
        input.land_cover.unprotected_forest = 57.0;
        input.shares.lumber = 40.0;
        let flows = compute_derived(&input, &ModelParams::default());
        assert_eq!(flows.total_harvest, dec!(842400));
        assert_eq!(flows.lumber, dec!(336960));
        assert_eq!(flows.pulp_from_lumber, dec!(112207.68));
    }

    #[test]
    fn test_baseline_flows_and_verdicts() {
        let eval = evaluate(&baseline_input(), &ModelParams::default());
        assert_eq!(eval.derived.lumber_supply, dec!(382800));
        assert_eq!(eval.derived.pulp_supply, dec!(564000));
        assert_eq!(eval.derived.fuel_supply, dec!(168000));
        assert_eq!(eval.derived.total_enduse_demand, dec!(382400));
        assert!(eval.verdict.all_ok());
    }

    #[test]
    fn test_compute_is_bit_identical_across_calls() {
        let params = ModelParams::default();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..50 {
            let mut input = baseline_input();
            input.logging_intensity = rng.gen_range(0.0..60.0);
            input.shares.lumber = rng.gen_range(0.0..100.0);
            input.import_lumber = rng.gen_range(0.0..300_000.0);
            let a = compute_derived(&input, &params);
            let b = compute_derived(&input, &params);
            assert_eq!(a, b);
        }
    }

    // ========== Validator ==========

    #[test]
    fn test_valid_sums_always_pass_sum_checks() {
        let params = ModelParams::default();
        let mut rng = ChaCha8Rng::seed_from_u64(2060);
        for _ in 0..200 {
            let lc = random_split(&mut rng, 6);
            let sh = random_split(&mut rng, 3);
            let mut input = baseline_input();
            input.land_cover = LandCover {
                protected_woodlands: lc[0],
                unprotected_forest: lc[1],
                wildlands: lc[2],
                farmland: lc[3],
                developed: lc[4],
                water_and_wetlands: lc[5],
            };
            input.shares = AssortmentShares { lumber: sh[0], pulp: sh[1], fuel: sh[2] };
            input.logging_intensity = rng.gen_range(0.0..60.0);

            let derived = compute_derived(&input, &params);
            let verdict = validate(&input, &derived, &params);
            assert!(verdict.land_cover.ok, "land cover {:?} -> {}", lc, verdict.land_cover.message);
            assert!(verdict.shares.ok, "shares {:?} -> {}", sh, verdict.shares.message);
        }
    }

    #[test]
    fn test_land_cover_plus_one_fails_with_sum_101() {
        let params = ModelParams::default();
        for field in [
            Field::ProtectedWoodlands,
            Field::UnprotectedForest,
            Field::Wildlands,
            Field::Farmland,
            Field::Developed,
            Field::WaterAndWetlands,
        ] {
            let mut input = baseline_input();
            input.set(field, Some(input.get(field) + 1.0));
            let eval = evaluate(&input, &params);
            assert!(!eval.verdict.land_cover.ok, "{} +1 should fail", field);
            assert_eq!(eval.verdict.land_cover.sum, dec!(101));
        }
    }

    #[test]
    fn test_sums_off_by_one_hundredth_fail() {
        let params = ModelParams::default();
        let mut input = baseline_input();
        input.land_cover.developed = 10.01;
        input.shares.fuel = 19.99;
        let eval = evaluate(&input, &params);
        assert!(!eval.verdict.land_cover.ok);
        assert!(!eval.verdict.shares.ok);
        assert!(eval.verdict.land_cover.message.contains("(now 100.01%)"));
        assert!(eval.verdict.shares.message.contains("(now 99.99%)"));
    }

    #[test]
    fn test_oversized_form_values_do_not_panic() {
        let mut form = ScenarioForm::default();
        form.set_field(Field::LoggingIntensity, Some(1e25));
        form.set_field(Field::Demand(DemandCategory::Packaging), Some(5e28));
        form.set_field(Field::Demand(DemandCategory::Manufacturing), Some(5e28));
        let eval = form.set_field(Field::ImportLumber, Some(1e30));
        assert!(eval.derived.lumber_supply > eval.derived.pulp_supply);
        assert!(eval.verdict.land_cover.ok);
    }

    #[test]
    fn test_supply_demand_tolerance_band() {
        let params = ModelParams::default();
        let flows = |demand| DerivedFlows {
            lumber_supply: dec!(400000),
            total_enduse_demand: demand,
            ..DerivedFlows::default()
        };
        let input = baseline_input();

        let ok = validate(&input, &flows(dec!(404999)), &params);
        assert!(ok.supply_demand.ok);
        assert_eq!(ok.supply_demand.direction, Direction::Balanced);

        let high = validate(&input, &flows(dec!(405001)), &params);
        assert!(!high.supply_demand.ok);
        assert_eq!(high.supply_demand.direction, Direction::DemandHigher);
    }

    // ========== Scenario Session ==========

    #[test]
    fn test_rejected_submit_keeps_stored_scenario() {
        let store = Arc::new(MemoryStore::new());
        let mut session = open(&store, "forester@example.com");
        let before = store.fetch("forester@example.com").expect("fetch").expect("present");

        session.set_field(Field::Wildlands, Some(12.0));
        let err = session
            .submit(LikertSheet::default(), RespondentProfile::default())
            .expect_err("unbalanced land cover must be rejected");
        match err {
            SessionError::Rejected { failed, message } => {
                assert_eq!(failed, vec![BalanceKind::LandCover]);
                assert!(message.contains("(now 110%)"), "{}", message);
            }
            other => panic!("unexpected error: {other}"),
        }

        let after = store.fetch("forester@example.com").expect("fetch").expect("present");
        assert_eq!(after.scenario, before.scenario);
        assert_eq!(after.counters.failed_attempts_land_cover, 1);
        assert_eq!(after.counters.failed_attempts_share, 0);
        assert_eq!(after.counters.submit_count, 0);
    }

    #[test]
    fn test_rejected_submit_counts_every_failing_check() {
        let store = Arc::new(MemoryStore::new());
        let mut session = open(&store, "mill@example.com");
        session.set_field(Field::Farmland, Some(0.0));
        session.set_field(Field::LumberShare, Some(80.0));

        let err = session.submit(LikertSheet::default(), RespondentProfile::default());
        assert!(matches!(err, Err(SessionError::Rejected { ref failed, .. }) if failed.len() == 3));

        let counters = store.fetch("mill@example.com").expect("fetch").expect("present").counters;
        assert_eq!(counters.failed_attempts_land_cover, 1);
        assert_eq!(counters.failed_attempts_share, 1);
        assert_eq!(counters.failed_attempts_supply, 1);
    }

    #[test]
    fn test_successful_submit_saves_scenario_and_leaves_reset_counters() {
        let store = Arc::new(MemoryStore::new());
        let mut session = open(&store, "owner@example.com");
        session.reset(ResetScope::LandCover).expect("reset");
        session.reset(ResetScope::WoodFlows).expect("reset");

        // 40/35/25 split with 2000 mcf more lumber imports still balances
        session.set_field(Field::PulpShare, Some(35.0));
        session.set_field(Field::FuelShare, Some(25.0));
        session.set_field(Field::ImportLumber, Some(152_000.0));

        let mut likert = LikertSheet::default();
        likert.answer("biodiversity", 8, false).expect("valid answer");
        let profile = RespondentProfile {
            states: vec!["Vermont".into(), "Maine".into()],
            years_experience: Some(12),
            ..RespondentProfile::default()
        };
        let receipt = session.submit(likert.clone(), profile.clone()).expect("balanced submit");
        assert_eq!(receipt.counters.submit_count, 1);
        assert_eq!(receipt.counters.reset_land_cover, 1);
        assert_eq!(receipt.counters.reset_wood_flows, 1);

        session.submit(likert.clone(), profile.clone()).expect("resubmit");
        let record = store.fetch("owner@example.com").expect("fetch").expect("present");
        assert_eq!(record.counters.submit_count, 2);
        assert_eq!(record.counters.reset_land_cover, 1);
        let saved = record.scenario_input(&baseline_input()).expect("known ids");
        assert_eq!(saved.import_lumber, 152_000.0);
        assert_eq!(saved.shares.pulp, 35.0);
        assert_eq!(record.likert, likert);
        assert_eq!(record.profile, profile);
    }

    #[test]
    fn test_returning_respondent_with_partial_row_gets_defaults() {
        let store = Arc::new(MemoryStore::new());
        let row = r#"{"email":"old@example.com","scenario":{"lumbershare":40.0,"import_lumber":null,"wildlands":7.0},"counters":{"logins":3}}"#;
        assert_eq!(store.import_jsonl(row.as_bytes()).expect("import partial row"), 1);

        let session = open(&store, "old@example.com");
        let input = session.form().input();
        assert_eq!(input.land_cover.wildlands, 7.0);
        assert_eq!(input.import_lumber, 150_000.0);
        assert_eq!(input.logging_intensity, 27.0);
        let record = store.fetch("old@example.com").expect("fetch").expect("present");
        assert_eq!(record.counters.logins, 4);
    }

    #[test]
    fn test_reset_refreshes_flows_without_validating() {
        let store = Arc::new(MemoryStore::new());
        let mut session = open(&store, "a@example.com");
        session.set_field(Field::WaterAndWetlands, Some(50.0));
        session.set_field(Field::LoggingIntensity, Some(45.0));

        let flows = session.reset(ResetScope::WoodFlows).expect("reset");
        assert_eq!(flows.lumber_supply, dec!(382800));
        // water is outside both scopes, so land cover still fails
        assert!(!session.evaluate().verdict.land_cover.ok);
    }

    #[test]
    fn test_activity_accrues_only_while_active() {
        let store = Arc::new(MemoryStore::new());
        let session = open(&store, "a@example.com");
        for idle in [0, 30, 300, 601, 3600] {
            session.record_activity(Duration::from_secs(idle)).expect("heartbeat");
        }
        let counters = store.fetch("a@example.com").expect("fetch").expect("present").counters;
        assert_eq!(counters.elapsed_time_seconds, 90);
    }

    #[test]
    fn test_independent_respondents_in_parallel() {
        let store = Arc::new(MemoryStore::new());
        let handles: Vec<_> = (0..6)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    let email = format!("r{i}@example.com");
                    let mut session = open(&store, &email);
                    for _ in 0..10 {
                        session.reset(ResetScope::LandCover).expect("reset");
                    }
                    session
                        .submit(LikertSheet::default(), RespondentProfile::default())
                        .expect("submit");
                })
            })
            .collect();
        for h in handles {
            h.join().expect("join");
        }

        let records = store.all().expect("all");
        assert_eq!(records.len(), 6);
        for r in records {
            assert_eq!(r.counters.reset_land_cover, 10);
            assert_eq!(r.counters.submit_count, 1);
        }
    }
}
