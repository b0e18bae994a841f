//! The `irtsim curves` command.

use std::path::PathBuf;

use anyhow::Result;

use irtsim_core::config::load_config_from;
use irtsim_core::curves::characteristic_curves;
use irtsim_core::traits::PlotSink;
use irtsim_report::SvgDirectorySink;

pub fn execute(output: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let output = match output {
        Some(dir) => dir,
        None => load_config_from(config_path.as_deref())?.output_dir,
    };

    let mut sink = SvgDirectorySink::new(&output);
    for plot in characteristic_curves() {
        sink.render(&plot)?;
    }

    for path in sink.written() {
        println!("Wrote {}", path.display());
    }
    Ok(())
}
