use anyhow::{bail, Context};
use std::{env, path::PathBuf, str::FromStr};

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_SLOT_MINUTES: u32 = 60;
const MAX_SLOT_MINUTES: u32 = 12 * 60;

/// How doctor and staff identifiers are obtained on `add`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterIds {
    /// `max(existing) + 1`
    Generated,
    /// Typed in by the admin; collisions are rejected.
    Supplied,
}

impl FromStr for RosterIds {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "generated" => Ok(RosterIds::Generated),
            "supplied" => Ok(RosterIds::Supplied),
            other => bail!("unknown roster id policy `{}`", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub slot_minutes: u32,
    pub roster_ids: RosterIds,
    pub seed_defaults: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            slot_minutes: DEFAULT_SLOT_MINUTES,
            roster_ids: RosterIds::Generated,
            seed_defaults: true,
        }
    }
}

impl Config {
    /// Reads `HMS_*` variables; call after `dotenv::dotenv()`.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(dir) = lookup("HMS_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(minutes) = lookup("HMS_SLOT_MINUTES") {
            config.slot_minutes = minutes
                .trim()
                .parse()
                .context("HMS_SLOT_MINUTES must be a number of minutes")?;
        }
        if let Some(policy) = lookup("HMS_ROSTER_IDS") {
            config.roster_ids = policy.parse().context("HMS_ROSTER_IDS")?;
        }
        if let Some(seed) = lookup("HMS_SEED_DEFAULTS") {
            config.seed_defaults = seed
                .trim()
                .parse()
                .context("HMS_SEED_DEFAULTS must be true or false")?;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.slot_minutes == 0 || self.slot_minutes > MAX_SLOT_MINUTES {
            bail!(
                "HMS_SLOT_MINUTES must be between 1 and {}, got {}",
                MAX_SLOT_MINUTES,
                self.slot_minutes
            );
        }
        Ok(())
    }
}
