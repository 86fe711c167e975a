use anyhow::{Context, Result};
use shared::{ParamName, SimParams};
use std::env;
use std::path::PathBuf;

const DEFAULT_LOG_FILE: &str = "foxes-rabbits.log";

/// Viewer settings, read from `LV_*` environment variables
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub params: SimParams,

    /// Fixed RNG seed for reproducible runs
    pub seed: Option<u64>,

    /// Run this many ticks without a terminal UI
    pub headless_ticks: Option<u64>,

    /// Where the TUI writes its log
    pub log_file: PathBuf,
}

/// Environment variable for a parameter, e.g. `LV_BREEDING_PREY`
pub fn env_key(name: ParamName) -> String {
    format!("LV_{}", name.key().to_uppercase())
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: ParamName| -> Result<Option<f64>> {
            let key = env_key(name);
            lookup(&key)
                .map(|raw| {
                    raw.trim()
                        .parse::<f64>()
                        .with_context(|| format!("{key} is not a number: {raw:?}"))
                })
                .transpose()
        };

        let defaults = SimParams::default();
        let mut params = defaults.clone();

        // The two densities are validated as a pair, so apply them from zero
        params.initial_prey = 0;
        params.initial_predator = 0;
        for name in [ParamName::InitialPrey, ParamName::InitialPredator] {
            let value = read(name)?.unwrap_or_else(|| defaults.get(name));
            params
                .set(name, value)
                .with_context(|| format!("invalid {}", env_key(name)))?;
        }

        for name in ParamName::ALL {
            if matches!(name, ParamName::InitialPrey | ParamName::InitialPredator) {
                continue;
            }
            if let Some(value) = read(name)? {
                params
                    .set(name, value)
                    .with_context(|| format!("invalid {}", env_key(name)))?;
            }
        }

        let seed = lookup("LV_SEED")
            .map(|raw| raw.trim().parse::<u64>())
            .transpose()
            .context("LV_SEED must be an unsigned integer")?;

        let headless_ticks = lookup("LV_HEADLESS_TICKS")
            .map(|raw| raw.trim().parse::<u64>())
            .transpose()
            .context("LV_HEADLESS_TICKS must be an unsigned integer")?;

        let log_file = lookup("LV_LOG_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));

        Ok(Self {
            params,
            seed,
            headless_ticks,
            log_file,
        })
    }
}
