use anyhow::anyhow;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub reward: RewardConfig,
}

/// Where the two persisted documents live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub dir: String,
    #[serde(default = "default_rewards_file")]
    pub rewards_file: String,
    #[serde(default = "default_claims_file")]
    pub claims_file: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
            rewards_file: default_rewards_file(),
            claims_file: default_claims_file(),
        }
    }
}

/// What every grant delivers: a single item kind and variant, uniform for
/// all users. Amounts are per-user and live in the ledger, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardConfig {
    #[serde(default = "default_reward_item")]
    pub reward_item: String,
    #[serde(default)]
    pub reward_skin_id: u64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self { reward_item: default_reward_item(), reward_skin_id: 0 }
    }
}

fn default_data_dir() -> String { "data".to_string() }
fn default_rewards_file() -> String { "pending_rewards.json".to_string() }
fn default_claims_file() -> String { "claimed_rewards.json".to_string() }
fn default_reward_item() -> String { "blood".to_string() }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

/// Load the config at `path`, writing a well-formed default file first when
/// it is missing or empty. Malformed content is an error, not a rewrite.
pub fn load_or_init(path: &str) -> Result<AppConfig> {
    let existing = match std::fs::read_to_string(path) {
        Ok(content) if !content.trim().is_empty() => Some(content),
        Ok(_) => None,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => return Err(e.into()),
    };
    let mut cfg = match existing {
        Some(content) => toml::from_str(&content)?,
        None => {
            let cfg = AppConfig::default();
            let rendered = toml::to_string_pretty(&cfg)?;
            std::fs::write(path, rendered)?;
            cfg
        }
    };
    cfg.normalize_and_validate()?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.data.normalize();
        self.reward.validate()?;
        Ok(())
    }

    /// Absolute/relative path of the pending-rewards ledger file.
    pub fn rewards_path(&self) -> PathBuf {
        PathBuf::from(&self.data.dir).join(&self.data.rewards_file)
    }

    /// Absolute/relative path of the claim-log file.
    pub fn claims_path(&self) -> PathBuf {
        PathBuf::from(&self.data.dir).join(&self.data.claims_file)
    }
}

impl DataConfig {
    fn normalize(&mut self) {
        if self.dir.trim().is_empty() {
            self.dir = default_data_dir();
        }
        if self.rewards_file.trim().is_empty() {
            self.rewards_file = default_rewards_file();
        }
        if self.claims_file.trim().is_empty() {
            self.claims_file = default_claims_file();
        }
    }
}

impl RewardConfig {
    pub fn validate(&self) -> Result<()> {
        if self.reward_item.trim().is_empty() {
            return Err(anyhow!("reward.reward_item must not be empty"));
        }
        Ok(())
    }
}
