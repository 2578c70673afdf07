//! # Engine Configuration
//! Ranking-policy constants with compiled-in defaults, optional TOML
//! overrides, and an env override for the contrast threshold.
//!
//! The defaults are the canonical policy values; loading a config file is
//! only needed when an installation wants to tune them.

use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_TOP_K: usize = 5;
pub const DEFAULT_CONTRAST_THRESHOLD: f64 = 0.50;
pub const DEFAULT_PEER_POOL_SIZE: usize = 5;
pub const DEFAULT_PEER_WEIGHT: f64 = 0.7;
pub const DEFAULT_GLOBAL_WEIGHT: f64 = 0.3;
pub const DEFAULT_MIN_PEER_RATING: u8 = 4;
pub const DEFAULT_REVIEW_FETCH_LIMIT: usize = 500;

pub const DEFAULT_ENGINE_CONFIG_PATH: &str = "config/engine.toml";
pub const ENV_ENGINE_CONFIG_PATH: &str = "MOOD_ENGINE_CONFIG_PATH";
pub const ENV_CONTRAST_THRESHOLD: &str = "MOOD_CONTRAST_THRESHOLD";

/// Recommendation policy knobs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum results per recommendation call.
    pub top_k: usize,
    /// Contrast mode engages when the base similarity is strictly above this.
    pub contrast_threshold: f64,
    /// How many most-similar users feed collaborative filtering.
    pub peer_pool_size: usize,
    /// Collaborative score weight of the peer-user average rating.
    pub peer_weight: f64,
    /// Collaborative score weight of the global average rating.
    pub global_weight: f64,
    /// Peer reviews below this rating do not nominate candidates.
    pub min_peer_rating: u8,
    /// Upper bound on reviews fetched per book.
    pub review_fetch_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            contrast_threshold: DEFAULT_CONTRAST_THRESHOLD,
            peer_pool_size: DEFAULT_PEER_POOL_SIZE,
            peer_weight: DEFAULT_PEER_WEIGHT,
            global_weight: DEFAULT_GLOBAL_WEIGHT,
            min_peer_rating: DEFAULT_MIN_PEER_RATING,
            review_fetch_limit: DEFAULT_REVIEW_FETCH_LIMIT,
        }
    }
}

impl EngineConfig {
    /// Parse from a TOML string. Missing keys keep their defaults.
    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        let cfg: EngineConfig = toml::from_str(toml_str)?;
        Ok(cfg)
    }

    /// Load from the configured path (`MOOD_ENGINE_CONFIG_PATH`, defaulting
    /// to `config/engine.toml`), then apply env overrides. A missing file is
    /// not an error — defaults apply; a present-but-invalid file is.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var(ENV_ENGINE_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_ENGINE_CONFIG_PATH));

        let mut cfg = match fs::read_to_string(&path) {
            Ok(content) => Self::from_toml_str(&content)?,
            Err(_) => Self::default(),
        };

        if let Some(t) = parse_threshold_env(std::env::var(ENV_CONTRAST_THRESHOLD).ok()) {
            cfg.contrast_threshold = t;
        }
        Ok(cfg)
    }
}

/// Parse an optional float env value and clamp it to [0.0, 1.0].
fn parse_threshold_env(raw: Option<String>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .map(|v| v.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_the_policy_constants() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.top_k, 5);
        assert!((cfg.contrast_threshold - 0.50).abs() < 1e-12);
        assert_eq!(cfg.peer_pool_size, 5);
        assert!((cfg.peer_weight - 0.7).abs() < 1e-12);
        assert!((cfg.global_weight - 0.3).abs() < 1e-12);
        assert_eq!(cfg.min_peer_rating, 4);
        assert_eq!(cfg.review_fetch_limit, 500);
    }

    #[test]
    fn toml_overrides_only_named_keys() {
        let cfg = EngineConfig::from_toml_str(
            r#"
top_k = 10
contrast_threshold = 0.6
"#,
        )
        .unwrap();
        assert_eq!(cfg.top_k, 10);
        assert!((cfg.contrast_threshold - 0.6).abs() < 1e-12);
        // Everything else keeps its default.
        assert_eq!(cfg.peer_pool_size, DEFAULT_PEER_POOL_SIZE);
        assert_eq!(cfg.review_fetch_limit, DEFAULT_REVIEW_FETCH_LIMIT);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(EngineConfig::from_toml_str("top_k = \"lots\"").is_err());
    }

    #[test]
    fn env_threshold_parses_and_clamps() {
        assert_eq!(parse_threshold_env(None), None);
        assert_eq!(parse_threshold_env(Some("nope".into())), None);
        assert_eq!(parse_threshold_env(Some(" 0.65 ".into())), Some(0.65));
        assert_eq!(parse_threshold_env(Some("7".into())), Some(1.0));
        assert_eq!(parse_threshold_env(Some("-1".into())), Some(0.0));
    }
}
