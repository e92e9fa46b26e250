// VISION 2060 Scenario Tool - Report Types and Table Output

use serde::Serialize;
use vision_engine::adapter::format_mcf;
use vision_engine::calculator::DemandChange;
use vision_engine::*;

// ─── Statistics ─────────────────────────────────────────────────────────────

/// Spread of one sampled flow, in mcf.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Stats {
    pub n: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl Stats {
    pub fn of(samples: &[f64]) -> Self {
        let Some(&first) = samples.first() else {
            return Self::default();
        };
        let n = samples.len();
        let mean = samples.iter().sum::<f64>() / n as f64;
        let sq_dev: f64 = samples.iter().map(|x| (x - mean).powi(2)).sum();
        let (min, max) = samples
            .iter()
            .fold((first, first), |(lo, hi), &x| (lo.min(x), hi.max(x)));
        Self {
            n,
            mean,
            std_dev: if n > 1 { (sq_dev / (n - 1) as f64).sqrt() } else { 0.0 },
            min,
            max,
        }
    }
}

// ─── Sample Summary ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct PassRate {
    pub check: BalanceKind,
    pub passed: usize,
    pub rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SampleSummary {
    pub runs: usize,
    pub seed: u64,
    pub spread_pct: f64,
    pub normalized: bool,
    pub all_ok: usize,
    pub pass_rates: Vec<PassRate>,
    pub lumber_supply: Stats,
    pub total_enduse_demand: Stats,
    /// Demand minus supply.
    pub difference: Stats,
}

// ─── Table Output ───────────────────────────────────────────────────────────

fn status(ok: bool) -> &'static str {
    if ok { "OK" } else { "FAIL" }
}

pub fn print_evaluation(title: &str, eval: &Evaluation, changes: &[DemandChange]) {
    let d = &eval.derived;
    println!("\n  {}", title);
    println!("  {}", "-".repeat(60));
    let rows = [
        ("Total harvest", d.total_harvest),
        ("Lumber", d.lumber),
        ("Pulp from lumber", d.pulp_from_lumber),
        ("Pulp", d.pulp),
        ("Fuelwood", d.fuelwood),
        ("Lumber supply", d.lumber_supply),
        ("Pulp supply", d.pulp_supply),
        ("Fuel supply", d.fuel_supply),
        ("End-use demand", d.total_enduse_demand),
        ("Roundwood market", d.roundwood_market),
    ];
    for (label, value) in rows {
        println!("  {:<28} {:>16} mcf", label, format_mcf(value));
    }
    println!("  {:<28} {:>16}%", "Land cover total", d.land_cover_total);

    if !changes.is_empty() {
        println!("\n  End-use demand vs 2020:");
        for c in changes {
            println!("    {:<36} {} {:+.1}%", c.category.label(), c.trend.arrow(), c.percent);
        }
    }

    let v = &eval.verdict;
    println!("\n  Balance checks:");
    for kind in [BalanceKind::LandCover, BalanceKind::Shares, BalanceKind::SupplyDemand] {
        println!("    {:<4} {:<26} {}", status(v.is_ok(kind)), kind.label(), v.message(kind));
    }
    println!();
}

pub fn print_summary(s: &SampleSummary) {
    println!("\n  VISION 2060 Scenario Sampler");
    println!(
        "  PRNG: ChaCha8Rng | Runs: {} | Base seed: {} | Spread: ±{}%{}",
        s.runs,
        s.seed,
        s.spread_pct,
        if s.normalized { " | sums normalized" } else { "" }
    );
    println!("  {}", "-".repeat(60));
    for r in &s.pass_rates {
        println!("  {:<28} {:>8} passed {:>7.1}%", r.check.label(), r.passed, r.rate * 100.0);
    }
    println!(
        "  {:<28} {:>8} passed {:>7.1}%",
        "all checks",
        s.all_ok,
        if s.runs > 0 { s.all_ok as f64 / s.runs as f64 * 100.0 } else { 0.0 }
    );
    println!("  {}", "-".repeat(60));
    for (label, stats) in [
        ("Lumber supply", &s.lumber_supply),
        ("End-use demand", &s.total_enduse_demand),
        ("Demand - supply", &s.difference),
    ] {
        println!(
            "  {:<20} mean {:>11.0} sd {:<8.0} [{:.0}, {:.0}]",
            label,
            stats.mean,
            stats.std_dev,
            stats.min,
            stats.max
        );
    }
    println!();
}
