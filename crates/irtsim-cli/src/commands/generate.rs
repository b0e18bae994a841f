//! The `irtsim generate` command.

use std::path::PathBuf;

use anyhow::Result;

use irtsim_core::config::load_config_from;
use irtsim_core::generator::generate;
use irtsim_core::statistics::GenerationSummary;
use irtsim_report::json::write_json_summary;
use irtsim_report::CsvDirectorySink;

pub const SUMMARY_FILE: &str = "generation_summary.json";

pub fn execute(
    n_students: Option<usize>,
    n_items: Option<usize>,
    model: Option<String>,
    seed: Option<u64>,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let mut config = load_config_from(config_path.as_deref())?;
    if let Some(n) = n_students {
        config.generate.n_students = n;
    }
    if let Some(n) = n_items {
        config.generate.n_items = n;
    }
    if let Some(m) = model {
        config.generate.model = m;
    }
    if let Some(s) = seed {
        config.generate.seed = s;
    }
    if let Some(dir) = output {
        config.output_dir = dir;
    }
    config.validate_generate()?;

    let generator = config.generator_config()?;
    if generator.n_students < generator.n_items {
        tracing::warn!(
            n_students = generator.n_students,
            n_items = generator.n_items,
            "fewer students than items; proportions will be noisy"
        );
    }

    let data = generate(&generator)?;

    let mut sink = CsvDirectorySink::new(&config.output_dir).with_delimiter(config.delimiter);
    data.export(&mut sink)?;
    let summary = GenerationSummary::compute(&data);
    let summary_path = config.output_dir.join(SUMMARY_FILE);
    write_json_summary(&summary, &summary_path)?;

    println!(
        "Generated {} x {} response matrix ({} model, seed {})",
        summary.n_students, summary.n_items, generator.model, generator.seed
    );
    println!(
        "Ability mean {:.3}, sd {:.3}; mean raw score {:.2}",
        summary.ability_mean, summary.ability_std_dev, summary.mean_raw_score
    );
    print_summary(&summary);

    for path in sink.written() {
        println!("Wrote {}", path.display());
    }
    println!("Wrote {}", summary_path.display());
    Ok(())
}

fn print_summary(summary: &GenerationSummary) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Item", "Difficulty", "Discrimination", "Guessing", "P(correct)"]);

    for item in &summary.items {
        table.add_row(vec![
            Cell::new(format!("item_{}", item.item_id)),
            Cell::new(format!("{:.3}", item.difficulty)),
            Cell::new(format!("{:.3}", item.discrimination)),
            Cell::new(format!("{:.3}", item.guessing)),
            Cell::new(format!("{:.1}%", item.proportion_correct * 100.0)),
        ]);
    }

    println!("\n{table}");
}
