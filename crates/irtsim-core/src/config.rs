//! Simulation configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::IrtError;
use crate::generator::GeneratorConfig;
use crate::model::ModelKind;

/// Environment variable that overrides every configured seed.
pub const SEED_ENV_VAR: &str = "IRTSIM_SEED";

/// `[generate]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateSection {
    #[serde(default = "default_n_students")]
    pub n_students: usize,
    #[serde(default = "default_n_items")]
    pub n_items: usize,
    /// Model tag, validated into a [`ModelKind`] by [`SimConfig::validate`].
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_n_students() -> usize {
    500
}
fn default_n_items() -> usize {
    20
}
fn default_model() -> String {
    "3PL".to_string()
}
fn default_seed() -> u64 {
    42
}

impl Default for GenerateSection {
    fn default() -> Self {
        Self {
            n_students: default_n_students(),
            n_items: default_n_items(),
            model: default_model(),
            seed: default_seed(),
        }
    }
}

/// `[adaptive]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveSection {
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
    #[serde(default = "default_max_items")]
    pub max_items: usize,
    #[serde(default = "default_true_ability")]
    pub true_ability: f64,
    /// Unseeded sessions fall back to the `[generate]` seed.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_pool_size() -> usize {
    20
}
fn default_max_items() -> usize {
    10
}
fn default_true_ability() -> f64 {
    1.2
}

impl Default for AdaptiveSection {
    fn default() -> Self {
        Self {
            pool_size: default_pool_size(),
            max_items: default_max_items(),
            true_ability: default_true_ability(),
            seed: None,
        }
    }
}

/// Top-level irtsim configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(default)]
    pub generate: GenerateSection,
    #[serde(default)]
    pub adaptive: AdaptiveSection,
    /// Directory the CLI writes exports into.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Field delimiter of exported tables.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./irtsim-output")
}
fn default_delimiter() -> char {
    ','
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            generate: GenerateSection::default(),
            adaptive: AdaptiveSection::default(),
            output_dir: default_output_dir(),
            delimiter: default_delimiter(),
        }
    }
}

impl SimConfig {
    /// The generator inputs described by `[generate]`.
    pub fn generator_config(&self) -> Result<GeneratorConfig, IrtError> {
        let config = GeneratorConfig {
            n_students: self.generate.n_students,
            n_items: self.generate.n_items,
            model: self.generate.model.parse::<ModelKind>()?,
            seed: self.generate.seed,
        };
        config.validate()?;
        Ok(config)
    }

    /// Seed of adaptive sessions.
    pub fn adaptive_seed(&self) -> u64 {
        self.adaptive.seed.unwrap_or(self.generate.seed)
    }

    /// Check `[generate]` and the shared output options.
    pub fn validate_generate(&self) -> Result<(), IrtError> {
        self.generator_config()?;
        self.validate_delimiter()
    }

    /// Check `[adaptive]` and the shared output options.
    pub fn validate_adaptive(&self) -> Result<(), IrtError> {
        let adaptive = &self.adaptive;
        if adaptive.pool_size == 0 {
            return Err(IrtError::invalid("pool_size", "must be greater than zero"));
        }
        if adaptive.max_items == 0 {
            return Err(IrtError::invalid("max_items", "must be greater than zero"));
        }
        if adaptive.max_items > adaptive.pool_size {
            return Err(IrtError::invalid(
                "max_items",
                format!(
                    "must not exceed pool_size ({} > {})",
                    adaptive.max_items, adaptive.pool_size
                ),
            ));
        }
        if !adaptive.true_ability.is_finite() {
            return Err(IrtError::invalid("true_ability", "must be finite"));
        }
        self.validate_delimiter()
    }

    /// Check every section.
    pub fn validate(&self) -> Result<(), IrtError> {
        self.validate_generate()?;
        self.validate_adaptive()
    }

    fn validate_delimiter(&self) -> Result<(), IrtError> {
        if matches!(self.delimiter, '"' | '\n' | '\r') {
            return Err(IrtError::invalid(
                "delimiter",
                format!("{:?} cannot delimit fields", self.delimiter),
            ));
        }
        Ok(())
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order when `path` is `None`:
/// 1. `irtsim.toml` in the current directory
/// 2. `~/.config/irtsim/config.toml`
///
/// Environment variable override: `IRTSIM_SEED`.
pub fn load_config_from(path: Option<&Path>) -> Result<SimConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("irtsim.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match &config_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => SimConfig::default(),
    };

    if let Ok(raw) = std::env::var(SEED_ENV_VAR) {
        let seed: u64 = raw
            .trim()
            .parse()
            .with_context(|| format!("{SEED_ENV_VAR} must be an unsigned integer, got '{raw}'"))?;
        config.generate.seed = seed;
        config.adaptive.seed = Some(seed);
    }

    tracing::debug!(source = ?config_path, "loaded configuration");
    Ok(config)
}

/// Parse a TOML string into a [`SimConfig`] without validating ranges.
pub fn parse_config(content: &str) -> Result<SimConfig> {
    toml::from_str(content).context("invalid irtsim configuration")
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("irtsim"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = SimConfig::default();
        assert_eq!(config.generate.n_students, 500);
        assert_eq!(config.generate.n_items, 20);
        assert_eq!(config.generate.model, "3PL");
        assert_eq!(config.generate.seed, 42);
        assert_eq!(config.adaptive.max_items, 10);
        assert_eq!(config.adaptive.true_ability, 1.2);
        assert_eq!(config.adaptive_seed(), 42);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_partial_config() {
        let config = parse_config(
            r#"
output_dir = "out"
delimiter = ";"

[generate]
n_students = 50
model = "1PL"

[adaptive]
max_items = 5
seed = 7
"#,
        )
        .unwrap();
        assert_eq!(config.generate.n_students, 50);
        assert_eq!(config.generate.n_items, 20);
        assert_eq!(config.adaptive.max_items, 5);
        assert_eq!(config.adaptive_seed(), 7);
        assert_eq!(config.delimiter, ';');
        assert_eq!(config.output_dir, PathBuf::from("out"));
        let generator = config.generator_config().unwrap();
        assert_eq!(generator.model, ModelKind::OnePL);
    }

    #[test]
    fn validate_rejects_out_of_range_options() {
        let mut config = SimConfig::default();
        config.generate.model = "Rasch".into();
        assert_eq!(
            config.validate(),
            Err(IrtError::InvalidModelKind("Rasch".into()))
        );

        let mut config = SimConfig::default();
        config.generate.n_items = 0;
        assert!(config.validate().is_err());

        let mut config = SimConfig::default();
        config.adaptive.max_items = 21;
        assert!(config.validate().is_err());

        let mut config = SimConfig::default();
        config.adaptive.max_items = 0;
        assert!(config.validate().is_err());

        let mut config = SimConfig::default();
        config.delimiter = '"';
        assert!(config.validate().is_err());
    }

    #[test]
    fn sections_validate_independently() {
        let mut config = SimConfig::default();
        config.adaptive.max_items = 30;
        assert!(config.validate_generate().is_ok());
        assert!(matches!(
            config.validate_adaptive(),
            Err(IrtError::InvalidParameter { ref name, .. }) if name == "max_items"
        ));

        let mut config = SimConfig::default();
        config.generate.model = "4PL".into();
        assert!(config.validate_adaptive().is_ok());
        assert!(config.validate_generate().is_err());

        let mut config = SimConfig::default();
        config.delimiter = '\n';
        assert!(config.validate_generate().is_err());
        assert!(config.validate_adaptive().is_err());
    }

    #[test]
    fn bad_types_fail_and_empty_config_uses_defaults() {
        assert!(parse_config("[generate]\nn_students = \"many\"").is_err());
        assert!(parse_config("").is_ok());
    }

    #[test]
    fn load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("irtsim.toml");
        std::fs::write(&path, "[generate]\nn_items = 12\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.generate.n_items, 12);

        let missing = dir.path().join("missing.toml");
        let err = load_config_from(Some(&missing)).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }
}
