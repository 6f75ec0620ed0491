//! Configuration loading for Scout

mod schema;

pub use schema::{
    default_queries, Config, EngagementConfig, QuerySpec, RetryConfig, Thresholds,
};

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = ".scoutrc.json";

/// Find and load config file with extends resolution. Searches current directory then parents.
pub fn load_config(work_dir: &Path, custom_path: Option<&Path>) -> Result<Config> {
    let path = if let Some(p) = custom_path {
        let path = if p.is_absolute() {
            p.to_path_buf()
        } else {
            work_dir.join(p)
        };
        if path.exists() {
            Some(path)
        } else {
            anyhow::bail!("Config file not found: {}", path.display());
        }
    } else {
        find_config_in_parents(work_dir)
    };

    match path {
        Some(path) => load_config_with_extends(&path, &mut HashSet::new()),
        None => Ok(Config::default()),
    }
}

/// Load a config file and resolve extends chain
fn load_config_with_extends(config_path: &Path, visited: &mut HashSet<PathBuf>) -> Result<Config> {
    // Prevent circular extends
    let canonical = config_path
        .canonicalize()
        .unwrap_or_else(|_| config_path.to_path_buf());
    if visited.contains(&canonical) {
        anyhow::bail!(
            "Circular extends detected in config: {}",
            config_path.display()
        );
    }
    visited.insert(canonical);

    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
    let mut config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in config: {}", config_path.display()))?;

    if let Some(extends) = config.extends.take() {
        let base_config = resolve_extends(config_path, &extends, visited)?;
        config.merge_from(base_config);
    }

    // Relative output dirs are relative to the config file
    if let Some(dir) = config.output_dir.take() {
        let config_dir = config_path.parent().unwrap_or(Path::new("."));
        config.output_dir = Some(if dir.is_absolute() {
            dir
        } else {
            config_dir.join(dir)
        });
    }

    Ok(config)
}

/// Resolve an extends reference to a config
fn resolve_extends(
    config_path: &Path,
    extends: &str,
    visited: &mut HashSet<PathBuf>,
) -> Result<Config> {
    let config_dir = config_path.parent().unwrap_or(Path::new("."));
    let extends_path = if Path::new(extends).is_absolute() {
        PathBuf::from(extends)
    } else {
        config_dir.join(extends)
    };

    // Ensure it has .json extension
    let extends_path = if extends_path.extension().is_none() {
        extends_path.with_extension("json")
    } else {
        extends_path
    };

    if !extends_path.exists() {
        anyhow::bail!(
            "Extended config not found: {} (referenced from {})",
            extends_path.display(),
            config_path.display()
        );
    }

    load_config_with_extends(&extends_path, visited)
}

/// Search for .scoutrc.json in directory and its parents
fn find_config_in_parents(mut dir: &Path) -> Option<PathBuf> {
    loop {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}

/// Render the config written by `scout init`
pub fn default_config_json(max_pages: Option<u32>) -> Result<String> {
    let config = Config {
        queries: default_queries(),
        max_results: Some(Config::DEFAULT_MAX_RESULTS),
        max_pages: Some(max_pages.unwrap_or(Config::DEFAULT_MAX_PAGES)),
        sample_limit: Some(Config::DEFAULT_SAMPLE_LIMIT),
        page_delay_ms: Some(1_000),
        query_delay_ms: Some(2_000),
        ..Config::default()
    };
    let mut json = serde_json::to_string_pretty(&config).context("Failed to render config")?;
    json.push('\n');
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config(dir.path(), None).unwrap();
        assert_eq!(config.effective_queries(), default_queries());
        assert_eq!(config.effective_max_pages(), 5);
        assert_eq!(config.effective_max_results(), 100);
    }

    #[test]
    fn test_custom_path_not_found() {
        let dir = TempDir::new().unwrap();
        let err = load_config(dir.path(), Some(Path::new("nope.json"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_config_found_in_parent() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILENAME),
            r#"{ "maxPages": 2, "queries": [{ "label": "rust", "query": "rustlang" }] }"#,
        )
        .unwrap();
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        let config = load_config(&nested, None).unwrap();
        assert_eq!(config.effective_max_pages(), 2);
        assert_eq!(config.effective_queries()[0].label, "rust");
    }

    #[test]
    fn test_config_extends() {
        let dir = TempDir::new().unwrap();

        let base_path = dir.path().join("base.json");
        let mut base_file = fs::File::create(&base_path).unwrap();
        writeln!(
            base_file,
            r#"{{
                "maxPages": 3,
                "queries": [{{ "label": "base", "query": "base query" }}],
                "thresholds": {{ "minFollowersStrong": 8000 }}
            }}"#
        )
        .unwrap();

        let child_path = dir.path().join(CONFIG_FILENAME);
        let mut child_file = fs::File::create(&child_path).unwrap();
        writeln!(
            child_file,
            r#"{{
                "extends": "./base",
                "maxPages": 7
            }}"#
        )
        .unwrap();

        let config = load_config(dir.path(), None).unwrap();

        // Child value overrides base
        assert_eq!(config.max_pages, Some(7));
        // Base values are inherited
        assert_eq!(config.queries[0].label, "base");
        assert_eq!(config.thresholds.min_followers_strong, 8000);
        // Untouched threshold keeps its default
        assert_eq!(config.thresholds.max_following_ratio, 50.0);
    }

    #[test]
    fn test_circular_extends_detected() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.json"), r#"{ "extends": "./b.json" }"#).unwrap();
        fs::write(dir.path().join("b.json"), r#"{ "extends": "./a.json" }"#).unwrap();

        let err = load_config(dir.path(), Some(Path::new("a.json"))).unwrap_err();
        assert!(format!("{:#}", err).contains("Circular extends"));
    }

    #[test]
    fn test_output_dir_relative_to_config() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), r#"{ "outputDir": "reports" }"#).unwrap();
        let config = load_config(dir.path(), None).unwrap();
        assert_eq!(config.output_dir(), dir.path().join("reports"));
    }

    #[test]
    fn test_merge_with_cli() {
        let config = Config {
            max_pages: Some(3),
            ..Config::default()
        }
        .merge_with_cli(Some(9), Some(PathBuf::from("out")));
        assert_eq!(config.effective_max_pages(), 9);
        assert_eq!(config.output_dir(), PathBuf::from("out"));

        let untouched = Config {
            max_pages: Some(3),
            ..Config::default()
        }
        .merge_with_cli(None, None);
        assert_eq!(untouched.effective_max_pages(), 3);
    }

    #[test]
    fn test_max_results_clamped() {
        let config = Config {
            max_results: Some(500),
            ..Config::default()
        };
        assert_eq!(config.effective_max_results(), 100);
        let config = Config {
            max_results: Some(1),
            ..Config::default()
        };
        assert_eq!(config.effective_max_results(), 10);
    }

    #[test]
    fn test_default_config_json_parses_back() {
        let json = default_config_json(Some(4)).unwrap();
        let config: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config.max_pages, Some(4));
        assert_eq!(config.queries.len(), 2);
        assert_eq!(config.thresholds, Thresholds::default());
    }

    #[test]
    fn test_retry_delays() {
        let retry = RetryConfig {
            backoff_secs: 2,
            max_wait_secs: 10,
            ..RetryConfig::default()
        };
        assert_eq!(retry.backoff_delay(0).as_secs(), 2);
        assert_eq!(retry.backoff_delay(1).as_secs(), 4);
        assert_eq!(retry.backoff_delay(5).as_secs(), 10);
        assert_eq!(retry.backoff_delay(200).as_secs(), 10);
        assert_eq!(retry.rate_limit_delay(None).as_secs(), 10);
        assert_eq!(
            retry
                .rate_limit_delay(Some(std::time::Duration::from_secs(3)))
                .as_secs(),
            3
        );
    }
}
