//! Runtime configuration from environment variables.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::highscores::{normalize_name, JsonFileStore, ANONYMOUS};

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// RNG seed for the piece sequence.
    pub seed: u32,
    /// Name stored with highscores.
    pub player: String,
    /// Highscore file; `None` keeps scores in memory only.
    pub scores_path: Option<PathBuf>,
    /// JSON-lines event log; `None` disables logging.
    pub log_path: Option<PathBuf>,
    /// Capacity of the command queue between input and the game loop.
    pub max_pending_commands: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            player: ANONYMOUS.to_string(),
            scores_path: None,
            log_path: None,
            max_pending_commands: 32,
        }
    }
}

impl RuntimeConfig {
    /// Create from `BLOCKTRIS_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`RuntimeConfig::from_env`] with a custom variable source.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| {
            var(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let seed = non_empty("BLOCKTRIS_SEED")
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(time_seed);

        let player = normalize_name(
            &non_empty("BLOCKTRIS_PLAYER")
                .or_else(|| non_empty("USER"))
                .unwrap_or_default(),
        );

        let scores_disabled = non_empty("BLOCKTRIS_NO_SCORES")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        let scores_path = if scores_disabled {
            None
        } else {
            Some(
                non_empty("BLOCKTRIS_SCORES_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(JsonFileStore::default_path),
            )
        };

        let log_path = non_empty("BLOCKTRIS_LOG_PATH").map(PathBuf::from);

        let max_pending_commands = non_empty("BLOCKTRIS_MAX_PENDING")
            .and_then(|s| s.parse().ok())
            .unwrap_or(32usize)
            .max(1);

        Self {
            seed,
            player,
            scores_path,
            log_path,
            max_pending_commands,
        }
    }
}

fn time_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> RuntimeConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RuntimeConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_without_variables() {
        let cfg = config(&[]);
        assert_eq!(cfg.player, ANONYMOUS);
        assert_eq!(cfg.scores_path, Some(JsonFileStore::default_path()));
        assert_eq!(cfg.log_path, None);
        assert_eq!(cfg.max_pending_commands, 32);
    }

    #[test]
    fn test_explicit_values() {
        let cfg = config(&[
            ("BLOCKTRIS_SEED", "42"),
            ("BLOCKTRIS_PLAYER", "  ada "),
            ("BLOCKTRIS_SCORES_PATH", "/tmp/scores.json"),
            ("BLOCKTRIS_LOG_PATH", "/tmp/events.jsonl"),
            ("BLOCKTRIS_MAX_PENDING", "4"),
        ]);
        assert_eq!(cfg.seed, 42);
        assert_eq!(cfg.player, "ada");
        assert_eq!(cfg.scores_path, Some(PathBuf::from("/tmp/scores.json")));
        assert_eq!(cfg.log_path, Some(PathBuf::from("/tmp/events.jsonl")));
        assert_eq!(cfg.max_pending_commands, 4);
    }

    #[test]
    fn test_player_falls_back_to_user() {
        assert_eq!(config(&[("USER", "grace")]).player, "grace");
        assert_eq!(
            config(&[("USER", "grace"), ("BLOCKTRIS_PLAYER", "ada")]).player,
            "ada"
        );
        assert_eq!(config(&[("BLOCKTRIS_PLAYER", "   ")]).player, ANONYMOUS);
    }

    #[test]
    fn test_scores_can_be_disabled() {
        assert_eq!(config(&[("BLOCKTRIS_NO_SCORES", "1")]).scores_path, None);
        assert_eq!(config(&[("BLOCKTRIS_NO_SCORES", "TRUE")]).scores_path, None);
        assert!(config(&[("BLOCKTRIS_NO_SCORES", "0")]).scores_path.is_some());
    }

    #[test]
    fn test_bad_numbers_fall_back() {
        let cfg = config(&[("BLOCKTRIS_MAX_PENDING", "lots"), ("BLOCKTRIS_SEED", "-3")]);
        assert_eq!(cfg.max_pending_commands, 32);
        assert_eq!(config(&[("BLOCKTRIS_MAX_PENDING", "0")]).max_pending_commands, 1);
    }

    #[test]
    fn test_from_env_does_not_panic() {
        let _config = RuntimeConfig::from_env();
    }
}
