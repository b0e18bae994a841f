//! The `irtsim init` command.

use anyhow::Result;

pub const CONFIG_FILE: &str = "irtsim.toml";

pub fn execute() -> Result<()> {
    if std::path::Path::new(CONFIG_FILE).exists() {
        println!("{CONFIG_FILE} already exists, skipping.");
    } else {
        std::fs::write(CONFIG_FILE, SAMPLE_CONFIG)?;
        println!("Created {CONFIG_FILE}");
    }

    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_FILE} to size the simulation");
    println!("  2. Run: irtsim generate");
    println!("  3. Run: irtsim adaptive");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# irtsim configuration

output_dir = "./irtsim-output"
delimiter = ","

[generate]
n_students = 500
n_items = 20
# 1PL, 2PL or 3PL
model = "3PL"
seed = 42

[adaptive]
pool_size = 20
max_items = 10
true_ability = 1.2
# Falls back to [generate].seed when unset
# seed = 42
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use irtsim_core::config::parse_config;

    #[test]
    fn sample_config_is_valid() {
        let config = parse_config(SAMPLE_CONFIG).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.generate.n_students, 500);
        assert_eq!(config.adaptive.seed, None);
    }
}
