//! Layered CLI configuration: defaults, then a TOML file named by
//! `SABACC_CONFIG`, then individual `SABACC_*` environment variables.

use sabacc_engine::game::GameConfig;
use serde::{Deserialize, Serialize};
use std::fs;

pub const CONFIG_ENV: &str = "SABACC_CONFIG";
pub const SEED_ENV: &str = "SABACC_SEED";
pub const AI_VERSION_ENV: &str = "SABACC_AI_VERSION";
pub const SHIFT_PROBABILITY_ENV: &str = "SABACC_SHIFT_PROBABILITY";
pub const DEALER_CAP_ENV: &str = "SABACC_DEALER_CAP";
pub const PLAYER_THRESHOLD_ENV: &str = "SABACC_PLAYER_THRESHOLD";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub seed: Option<u64>,
    pub ai_version: String,
    pub shift_probability: f64,
    pub dealer_action_cap: usize,
    pub player_threshold: i32,
}

impl Default for Config {
    fn default() -> Self {
        let game = GameConfig::default();
        Self {
            seed: None,
            ai_version: "baseline".into(),
            shift_probability: game.shift_probability,
            dealer_action_cap: game.dealer_action_cap,
            player_threshold: sabacc_ai::autopilot::DEFAULT_THRESHOLD,
        }
    }
}

impl Config {
    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            shift_probability: self.shift_probability,
            dealer_action_cap: self.dealer_action_cap,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub seed: ValueSource,
    pub ai_version: ValueSource,
    pub shift_probability: ValueSource,
    pub dealer_action_cap: ValueSource,
    pub player_threshold: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            seed: ValueSource::Default,
            ai_version: ValueSource::Default,
            shift_probability: ValueSource::Default,
            dealer_action_cap: ValueSource::Default,
            player_threshold: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config file: {}", e),
            ConfigError::Invalid(msg) => f.write_str(msg),
        }
    }
}

pub fn load() -> Result<Config, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var(CONFIG_ENV)
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.ai_version {
            cfg.ai_version = v;
            sources.ai_version = ValueSource::File;
        }
        if let Some(v) = f.shift_probability {
            cfg.shift_probability = v;
            sources.shift_probability = ValueSource::File;
        }
        if let Some(v) = f.dealer_action_cap {
            cfg.dealer_action_cap = v;
            sources.dealer_action_cap = ValueSource::File;
        }
        if let Some(v) = f.player_threshold {
            cfg.player_threshold = v;
            sources.player_threshold = ValueSource::File;
        }
    }

    if let Some(seed) = env_value(SEED_ENV) {
        cfg.seed = Some(
            seed.parse()
                .map_err(|_| ConfigError::Invalid(format!("Invalid seed: {}", seed)))?,
        );
        sources.seed = ValueSource::Env;
    }
    if let Some(ver) = env_value(AI_VERSION_ENV) {
        cfg.ai_version = ver;
        sources.ai_version = ValueSource::Env;
    }
    if let Some(p) = env_value(SHIFT_PROBABILITY_ENV) {
        cfg.shift_probability = p
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("Invalid shift probability: {}", p)))?;
        sources.shift_probability = ValueSource::Env;
    }
    if let Some(cap) = env_value(DEALER_CAP_ENV) {
        cfg.dealer_action_cap = cap
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("Invalid dealer cap: {}", cap)))?;
        sources.dealer_action_cap = ValueSource::Env;
    }
    if let Some(t) = env_value(PLAYER_THRESHOLD_ENV) {
        cfg.player_threshold = t
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("Invalid player threshold: {}", t)))?;
        sources.player_threshold = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    ai_version: Option<String>,
    #[serde(default)]
    shift_probability: Option<f64>,
    #[serde(default)]
    dealer_action_cap: Option<usize>,
    #[serde(default)]
    player_threshold: Option<i32>,
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&cfg.shift_probability) {
        return Err(ConfigError::Invalid(
            "Invalid configuration: shift_probability must be within 0..=1".into(),
        ));
    }
    if cfg.dealer_action_cap == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: dealer_action_cap must be >=1".into(),
        ));
    }
    if !(1..=sabacc_engine::hand::SABACC_TARGET).contains(&cfg.player_threshold) {
        return Err(ConfigError::Invalid(
            "Invalid configuration: player_threshold must be within 1..=23".into(),
        ));
    }
    if !sabacc_ai::AVAILABLE_POLICIES.contains(&cfg.ai_version.as_str()) {
        return Err(ConfigError::Invalid(format!(
            "Invalid configuration: unknown ai_version '{}'",
            cfg.ai_version
        )));
    }
    Ok(())
}
