//! CLI command implementations

mod config;
mod judge;
mod play;
mod referee;
mod solve;

pub use config::{config_get, config_init, config_set, config_show};
pub use judge::judge_command;
pub use play::play_command;
pub use referee::referee_command;
pub use solve::solve_command;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

use hl_core::config::{self as core_config, HiloConfig};
use hl_core::referee::parse_test_input;
use hl_core::Secret;

/// Load the configuration for a command
///
/// An explicit path must exist and parse. The default path is optional and
/// falls back to defaults with a warning when broken.
pub fn load_settings(config_path: Option<&PathBuf>) -> Result<HiloConfig> {
    let settings: HiloConfig = if let Some(path) = config_path {
        core_config::load_config(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?
    } else {
        let default_path = core_config::default_config_path();
        if default_path.exists() {
            core_config::load_config(&default_path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {:?}: {}", default_path, e);
                HiloConfig::default()
            })
        } else {
            tracing::debug!("Using default configuration");
            HiloConfig::default()
        }
    };

    settings.validate().context("Invalid configuration")?;
    Ok(settings)
}

/// Collect the secrets for a batch of sessions
///
/// Explicit values come first, then the test file, then `random` drawn
/// secrets. With no source at all, a single random secret is used.
pub fn select_secrets(
    explicit: &[i64],
    tests: Option<&Path>,
    random: Option<usize>,
    seed: Option<u64>,
) -> Result<Vec<Secret>> {
    let mut secrets = explicit
        .iter()
        .map(|v| Secret::new(*v))
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(path) = tests {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read test input: {:?}", path))?;
        secrets.extend(parse_test_input(&content)?);
    }

    let random = match random {
        Some(n) => n,
        None if secrets.is_empty() => 1,
        None => 0,
    };
    if random > 0 {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        secrets.extend((0..random).map(|_| Secret::random(&mut rng)));
    }

    Ok(secrets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_explicit_only() {
        let secrets = select_secrets(&[1, 1000], None, None, None).unwrap();
        let values: Vec<i64> = secrets.iter().map(Secret::value).collect();
        assert_eq!(values, vec![1, 1000]);
    }

    #[test]
    fn test_select_defaults_to_one_random() {
        let secrets = select_secrets(&[], None, None, Some(1)).unwrap();
        assert_eq!(secrets.len(), 1);
    }

    #[test]
    fn test_select_seeded_random_is_stable() {
        let a = select_secrets(&[], None, Some(5), Some(99)).unwrap();
        let b = select_secrets(&[], None, Some(5), Some(99)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 5);
    }

    #[test]
    fn test_select_from_test_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cases.txt");
        std::fs::write(&path, "2\n10\n20\n").unwrap();

        let secrets = select_secrets(&[5], Some(&path), None, None).unwrap();
        let values: Vec<i64> = secrets.iter().map(Secret::value).collect();
        assert_eq!(values, vec![5, 10, 20]);
    }

    #[test]
    fn test_load_settings_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hilo.toml");
        std::fs::write(&path, "[referee]\nforward_verdict = true\n").unwrap();

        let settings = load_settings(Some(&path)).unwrap();
        assert!(settings.referee.forward_verdict);
        assert_eq!(settings.judge.max_queries, 10);

        assert!(load_settings(Some(&dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn test_select_rejects_out_of_range() {
        assert!(select_secrets(&[0], None, None, None).is_err());
    }
}
