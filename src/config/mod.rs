/// Configuration system for wave.
///
/// Layers, lowest to highest precedence:
///
/// 1. **Built-in defaults**: [`schema::WaveConfig::default()`]
/// 2. **User global config**: `~/.wave/config.toml`
/// 3. **Project local config**: `.wave.toml` in the current directory
/// 4. **Environment variables**: `WAVE_*`
///
/// File layers are merged key by key: a project file that sets only
/// `simulator.tick_ms` keeps every other value from the global file.
pub mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub use schema::WaveConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration.
pub fn load() -> WaveConfig {
    let files = [global_config_path(), project_config_path()];
    let mut config = load_layers(files.iter().flatten().map(PathBuf::as_path));
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    config
}

/// Merge the given TOML files over the defaults, in order.
///
/// Missing files are skipped. Malformed files are ignored as a whole so a
/// bad edit never stops the dashboard from starting.
pub fn load_layers<'a>(paths: impl IntoIterator<Item = &'a Path>) -> WaveConfig {
    let Ok(mut merged) = toml::Value::try_from(WaveConfig::default()) else {
        return WaveConfig::default();
    };

    for path in paths {
        let Ok(content) = fs::read_to_string(path) else {
            continue;
        };
        let Ok(overlay) = toml::from_str::<toml::Value>(&content) else {
            continue;
        };
        // reject layers whose values have the wrong types or are out of range
        let mut candidate = merged.clone();
        merge_values(&mut candidate, overlay);
        let valid = candidate
            .clone()
            .try_into::<WaveConfig>()
            .is_ok_and(|cfg| cfg.validate().is_ok());
        if valid {
            merged = candidate;
        }
    }

    merged.try_into().unwrap_or_default()
}

/// Recursively overlay `overlay` onto `base`; tables merge, other values replace.
fn merge_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// `~/.wave/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".wave").join("config.toml"))
}

/// `.wave.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".wave.toml"))
}

pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply `WAVE_*` overrides read through `get`.
///
/// Supported variables:
/// - `WAVE_ADDR`: server bind address
/// - `WAVE_TICK_MS`: milliseconds between ticks
/// - `WAVE_SEED`: fixed RNG seed
/// - `WAVE_AI_URL`: remote copy endpoint
/// - `WAVE_AI_KEY`: key sent to the remote copy endpoint
/// - `WAVE_LOG`: request log on/off
/// - `WAVE_LOG_PATH`: request log file
///
/// Values that fail to parse are ignored.
pub fn apply_env_overrides(config: &mut WaveConfig, get: impl Fn(&str) -> Option<String>) {
    if let Some(val) = get("WAVE_ADDR")
        && !val.is_empty()
    {
        config.server.addr = val;
    }
    if let Some(val) = get("WAVE_TICK_MS")
        && let Ok(ms) = val.parse::<u64>()
        && ms > 0
    {
        config.simulator.tick_ms = ms;
    }
    if let Some(val) = get("WAVE_SEED")
        && let Ok(seed) = val.parse::<u64>()
    {
        config.simulator.seed = Some(seed);
    }
    if let Some(val) = get("WAVE_AI_URL")
        && !val.is_empty()
    {
        config.client.edge_url = val;
    }
    if let Some(val) = get("WAVE_AI_KEY") {
        config.client.api_key = val;
    }
    if let Some(val) = get("WAVE_LOG") {
        config.logging.enabled = is_truthy(&val);
    }
    if let Some(val) = get("WAVE_LOG_PATH")
        && !val.is_empty()
    {
        config.logging.path = Some(PathBuf::from(val));
    }
}

fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the annotated default config to `~/.wave/config.toml`.
///
/// Fails if the file exists, unless `force` is set.
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;
    init_config_at(&path, force)?;
    Ok(path)
}

pub fn init_config_at(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }
    write_file(path, &WaveConfig::default_toml())
}

/// Set a dotted key (e.g. `simulator.tick_ms`) in the global config file.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;
    set_config_value_at(&path, key, value)
}

/// Set a dotted key in the config file at `path`, creating it from the
/// defaults when missing. The result must still be a valid config.
pub fn set_config_value_at(path: &Path, key: &str, value: &str) -> Result<()> {
    let mut root: toml::Value = if path.exists() {
        let content = fs::read_to_string(path).context("failed to read config file")?;
        toml::from_str(&content).context("failed to parse config as TOML value")?
    } else {
        toml::Value::try_from(WaveConfig::default())
            .context("failed to serialize default config")?
    };

    set_toml_value(&mut root, key, value)?;

    let mut check = toml::Value::try_from(WaveConfig::default())
        .context("failed to serialize default config")?;
    merge_values(&mut check, root.clone());
    check
        .try_into::<WaveConfig>()
        .with_context(|| format!("'{value}' is not a valid value for '{key}'"))?
        .validate()
        .with_context(|| format!("'{value}' is not a valid value for '{key}'"))?;

    let text = toml::to_string_pretty(&root).context("failed to serialize config")?;
    write_file(path, &text)
}

/// Set a leaf in a TOML tree, parsing the raw value by the type of the
/// existing value (or the default's type for keys absent from the file).
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').filter(|p| !p.is_empty()).collect();
    let Some((leaf, sections)) = parts.split_last() else {
        anyhow::bail!("empty config key");
    };

    let defaults = toml::Value::try_from(WaveConfig::default())
        .context("failed to serialize default config")?;
    let mut template = Some(&defaults);
    let mut current = root;
    for &section in sections {
        template = template.and_then(|t| t.get(section));
        let table = current
            .as_table_mut()
            .with_context(|| format!("expected table above '{section}' in '{key}'"))?;
        if !table.contains_key(section) {
            if template.is_none() {
                anyhow::bail!("config key not found: section '{section}' in '{key}'");
            }
            table.insert(
                section.to_string(),
                toml::Value::Table(toml::map::Map::new()),
            );
        }
        current = table
            .get_mut(section)
            .with_context(|| format!("config key not found: section '{section}' in '{key}'"))?;
    }

    let table = current
        .as_table_mut()
        .with_context(|| format!("expected a section before '{leaf}' in '{key}'"))?;

    let default_leaf = template.and_then(|t| t.get(*leaf));
    let new_value = match table.get(*leaf).or(default_leaf) {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::Float(_)) => {
            let f: f64 = raw_value
                .parse()
                .with_context(|| format!("expected number for '{key}', got '{raw_value}'"))?;
            toml::Value::Float(f)
        }
        Some(toml::Value::String(_)) => toml::Value::String(raw_value.to_string()),
        Some(_) => anyhow::bail!("'{key}' is a section, not a value"),
        // optional keys (seed, path) are absent from the defaults
        None => match (*leaf, raw_value.parse::<i64>()) {
            ("seed", Ok(n)) => toml::Value::Integer(n),
            ("seed", Err(_)) => anyhow::bail!("expected integer for '{key}', got '{raw_value}'"),
            ("path", _) => toml::Value::String(raw_value.to_string()),
            _ => anyhow::bail!("unknown config key: '{key}'"),
        },
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Overwrite the global config with the defaults.
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// The effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    toml::to_string_pretty(&load()).context("failed to serialize effective config")
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(path, content).context("failed to write config file")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn is_truthy_accepts_variants() {
        for yes in ["1", "true", "TRUE", "yes", "on", "ON"] {
            assert!(is_truthy(yes), "{yes}");
        }
        for no in ["0", "false", "no", "off", ""] {
            assert!(!is_truthy(no), "{no}");
        }
    }

    #[test]
    fn no_files_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert_eq!(load_layers([missing.as_path()]), WaveConfig::default());
    }

    #[test]
    fn later_layers_override_per_key() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("global.toml");
        let project = dir.path().join("project.toml");
        fs::write(&global, "[simulator]\ntick_ms = 1000\nwindow = 12\n").unwrap();
        fs::write(&project, "[simulator]\ntick_ms = 250\n").unwrap();

        let cfg = load_layers([global.as_path(), project.as_path()]);
        assert_eq!(cfg.simulator.tick_ms, 250);
        assert_eq!(cfg.simulator.window, 12);
        assert_eq!(cfg.server, schema::ServerConfig::default());
    }

    #[test]
    fn malformed_layer_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.toml");
        let bad_syntax = dir.path().join("bad.toml");
        let bad_type = dir.path().join("type.toml");
        fs::write(&good, "[server]\naddr = \"0.0.0.0:80\"\n").unwrap();
        fs::write(&bad_syntax, "[server\naddr = ").unwrap();
        fs::write(&bad_type, "[simulator]\ntick_ms = \"fast\"\n").unwrap();

        let cfg = load_layers([good.as_path(), bad_syntax.as_path(), bad_type.as_path()]);
        assert_eq!(cfg.server.addr, "0.0.0.0:80");
        assert_eq!(cfg.simulator.tick_ms, 5000);
    }

    #[test]
    fn zero_tick_interval_layer_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("global.toml");
        let project = dir.path().join("project.toml");
        fs::write(&global, "[simulator]\ntick_ms = 800\n").unwrap();
        fs::write(&project, "[simulator]\ntick_ms = 0\n").unwrap();

        let cfg = load_layers([global.as_path(), project.as_path()]);
        assert_eq!(cfg.simulator.tick_ms, 800);
    }

    #[test]
    fn set_value_rejects_zero_tick_interval() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert!(set_config_value_at(&path, "simulator.tick_ms", "0").is_err());
        assert!(!path.exists());
    }

    #[test]
    fn env_overrides_apply() {
        let mut cfg = WaveConfig::default();
        apply_env_overrides(
            &mut cfg,
            env(&[
                ("WAVE_ADDR", "0.0.0.0:8080"),
                ("WAVE_TICK_MS", "100"),
                ("WAVE_SEED", "42"),
                ("WAVE_AI_URL", "https://edge.example/wave-ai"),
                ("WAVE_AI_KEY", "anon"),
                ("WAVE_LOG", "0"),
                ("WAVE_LOG_PATH", "/tmp/log.jsonl"),
            ]),
        );
        assert_eq!(cfg.server.addr, "0.0.0.0:8080");
        assert_eq!(cfg.simulator.tick_ms, 100);
        assert_eq!(cfg.simulator.seed, Some(42));
        assert_eq!(cfg.client.edge_url, "https://edge.example/wave-ai");
        assert_eq!(cfg.client.api_key, "anon");
        assert!(!cfg.logging.enabled);
        assert_eq!(cfg.logging.path, Some(PathBuf::from("/tmp/log.jsonl")));
    }

    #[test]
    fn invalid_env_values_are_ignored() {
        let mut cfg = WaveConfig::default();
        apply_env_overrides(
            &mut cfg,
            env(&[("WAVE_TICK_MS", "soon"), ("WAVE_SEED", "-"), ("WAVE_ADDR", "")]),
        );
        assert_eq!(cfg, WaveConfig::default());
    }

    #[test]
    fn set_value_creates_file_from_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg").join("config.toml");
        set_config_value_at(&path, "simulator.tick_ms", "750").unwrap();

        let cfg = load_layers([path.as_path()]);
        assert_eq!(cfg.simulator.tick_ms, 750);
        assert_eq!(cfg.simulator.window, 24);
    }

    #[test]
    fn set_value_types_follow_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[server]\naddr = \"127.0.0.1:1\"\n").unwrap();

        set_config_value_at(&path, "server.open_browser", "off").unwrap();
        set_config_value_at(&path, "simulator.sale_probability", "0.5").unwrap();
        set_config_value_at(&path, "simulator.seed", "9").unwrap();

        let cfg = load_layers([path.as_path()]);
        assert_eq!(cfg.server.addr, "127.0.0.1:1");
        assert!(!cfg.server.open_browser);
        assert_eq!(cfg.simulator.sale_probability, 0.5);
        assert_eq!(cfg.simulator.seed, Some(9));
    }

    #[test]
    fn set_value_rejects_bad_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert!(set_config_value_at(&path, "simulator.tick_ms", "soon").is_err());
        assert!(set_config_value_at(&path, "nonexistent.key", "1").is_err());
        assert!(set_config_value_at(&path, "server.colour", "red").is_err());
        assert!(set_config_value_at(&path, "server", "x").is_err());
        assert!(set_config_value_at(&path, "", "x").is_err());
        assert!(!path.exists());
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        init_config_at(&path, false).unwrap();
        assert!(init_config_at(&path, false).is_err());
        init_config_at(&path, true).unwrap();
        assert_eq!(load_layers([path.as_path()]), WaveConfig::default());
    }
}
