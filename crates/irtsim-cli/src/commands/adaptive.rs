//! The `irtsim adaptive` command.

use std::path::PathBuf;

use anyhow::Result;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use irtsim_core::adaptive::{run_adaptive_test, AdaptiveResult, AdministeredItem, StepReporter};
use irtsim_core::config::load_config_from;
use irtsim_core::model::ItemPool;
use irtsim_core::statistics::AdaptiveSummary;
use irtsim_report::json::write_json_summary;
use irtsim_report::{CsvDirectorySink, SvgDirectorySink};

pub const SUMMARY_FILE: &str = "adaptive_summary.json";

/// Console progress reporter.
struct ConsoleReporter;

impl StepReporter for ConsoleReporter {
    fn on_item_administered(&self, step: &AdministeredItem) {
        let outcome = if step.response == 1 {
            "correct"
        } else {
            "incorrect"
        };
        eprintln!(
            "  Item {:>2}: item_{} (b = {:.2}, info = {:.3}) {} -> estimate {:.3}",
            step.item_number, step.item_id, step.difficulty, step.information, outcome, step.estimate_after
        );
    }

    fn on_session_complete(&self, result: &AdaptiveResult) {
        eprintln!(
            "\nComplete: {} items administered, final estimate {:.3}",
            result.history.len(),
            result.final_estimate()
        );
    }
}

pub fn execute(
    true_ability: Option<f64>,
    max_items: Option<usize>,
    pool_size: Option<usize>,
    seed: Option<u64>,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let mut config = load_config_from(config_path.as_deref())?;
    if let Some(theta) = true_ability {
        config.adaptive.true_ability = theta;
    }
    if let Some(n) = max_items {
        config.adaptive.max_items = n;
    }
    if let Some(n) = pool_size {
        config.adaptive.pool_size = n;
    }
    if let Some(s) = seed {
        config.adaptive.seed = Some(s);
    }
    if let Some(dir) = output {
        config.output_dir = dir;
    }
    config.validate_adaptive()?;

    let settings = &config.adaptive;
    if settings.true_ability.abs() > 3.0 {
        tracing::warn!(
            true_ability = settings.true_ability,
            "true ability lies outside the pool's difficulty range [-3, 3]"
        );
    }
    if settings.max_items == settings.pool_size {
        tracing::warn!(
            max_items = settings.max_items,
            "session administers the whole pool; selection order is the only difference between runs"
        );
    }

    let seed = config.adaptive_seed();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let pool = ItemPool::demonstration(settings.pool_size, &mut rng)?;

    eprintln!(
        "irtsim v{}: adaptive session of {} items from a pool of {} (true ability {}, seed {})",
        env!("CARGO_PKG_VERSION"),
        settings.max_items,
        pool.len(),
        settings.true_ability,
        seed
    );
    eprintln!();

    let result = run_adaptive_test(
        &pool,
        settings.true_ability,
        settings.max_items,
        &mut rng,
        &ConsoleReporter,
    )?;

    let mut tables = CsvDirectorySink::new(&config.output_dir).with_delimiter(config.delimiter);
    let mut plots = SvgDirectorySink::new(&config.output_dir);
    result.export(&mut tables, &mut plots)?;
    let summary = AdaptiveSummary::compute(&result);
    let summary_path = config.output_dir.join(SUMMARY_FILE);
    write_json_summary(&summary, &summary_path)?;

    print_results(&result);
    println!(
        "True ability {:.3}, final estimate {:.3}, absolute error {:.3} ({}/{} correct)",
        summary.true_ability,
        summary.final_estimate,
        summary.absolute_error,
        summary.correct,
        summary.items_administered
    );

    for path in tables.written().iter().chain(plots.written()) {
        println!("Wrote {}", path.display());
    }
    println!("Wrote {}", summary_path.display());
    Ok(())
}

fn print_results(result: &AdaptiveResult) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["#", "Item", "Difficulty", "Information", "Response", "Estimate"]);

    for step in &result.history {
        table.add_row(vec![
            Cell::new(step.item_number),
            Cell::new(format!("item_{}", step.item_id)),
            Cell::new(format!("{:.3}", step.difficulty)),
            Cell::new(format!("{:.3}", step.information)),
            Cell::new(step.response),
            Cell::new(format!("{:.3}", step.estimate_after)),
        ]);
    }

    println!("{table}");
}
