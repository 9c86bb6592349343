/// Configuration schema and defaults for wave.
///
/// Sections: `[server]`, `[simulator]`, `[client]` and `[logging]`. Every
/// field has a built-in default, so a config file only needs the keys it
/// changes.
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::metrics::generator::DEFAULT_SALE_PROBABILITY;
use crate::metrics::sales::DEFAULT_RECENT_SALES;
use crate::metrics::series::DEFAULT_WINDOW;

/// Default dashboard bind address.
pub const DEFAULT_ADDR: &str = "127.0.0.1:9747";

/// Top-level configuration, mapping to `~/.wave/config.toml` and `.wave.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    pub server: ServerConfig,
    pub simulator: SimulatorConfig,
    pub client: ClientConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [server]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// `host:port` the dashboard and `/wave-ai` listen on.
    pub addr: String,
    /// Open the dashboard in the default browser on `wave serve`.
    pub open_browser: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            open_browser: true,
        }
    }
}

// ---------------------------------------------------------------------------
// [simulator]
// ---------------------------------------------------------------------------

/// Live-feed simulation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Milliseconds between ticks.
    pub tick_ms: u64,
    /// Samples per chart series.
    pub window: usize,
    /// Sales kept in the recent-sales list.
    pub recent_sales_cap: usize,
    /// Chance per tick of a synthetic sale, in `[0, 1]`.
    pub sale_probability: f64,
    /// Fixed RNG seed for reproducible runs; random when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            tick_ms: 5000,
            window: DEFAULT_WINDOW,
            recent_sales_cap: DEFAULT_RECENT_SALES,
            sale_probability: DEFAULT_SALE_PROBABILITY,
            seed: None,
        }
    }
}

// ---------------------------------------------------------------------------
// [client]
// ---------------------------------------------------------------------------

/// Where `wave ai --remote` sends requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub edge_url: String,
    /// Sent as `Authorization: Bearer` and `Apikey` when non-empty.
    pub api_key: String,
    pub timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            edge_url: format!("http://{DEFAULT_ADDR}/wave-ai"),
            api_key: String::new(),
            timeout_ms: 10_000,
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Record `/wave-ai` requests to the JSONL log.
    pub enabled: bool,
    /// Log file; defaults to `~/.wave/ai-log.jsonl`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}

impl WaveConfig {
    /// Value checks beyond what the types enforce.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.simulator.tick_ms == 0 {
            anyhow::bail!("simulator.tick_ms must be greater than zero");
        }
        Ok(())
    }

    /// Annotated default config written by `wave config init`.
    pub fn default_toml() -> String {
        r#"# wave configuration
#
# Precedence (highest wins):
#   1. Environment variables (WAVE_*)
#   2. Project config (.wave.toml in current directory)
#   3. User global config (~/.wave/config.toml)
#   4. Built-in defaults

[server]
addr = "127.0.0.1:9747"
open_browser = true

[simulator]
tick_ms = 5000            # WAVE_TICK_MS
window = 24               # samples per chart series
recent_sales_cap = 10
sale_probability = 0.3
# seed = 42               # WAVE_SEED, fixed seed for reproducible runs

[client]
edge_url = "http://127.0.0.1:9747/wave-ai"   # WAVE_AI_URL
api_key = ""                                 # WAVE_AI_KEY
timeout_ms = 10000

[logging]
enabled = true            # WAVE_LOG=0 to disable
# path = "/tmp/wave-ai-log.jsonl"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_toml_parses_to_defaults() {
        let parsed: WaveConfig = toml::from_str(&WaveConfig::default_toml()).unwrap();
        assert_eq!(parsed, WaveConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let parsed: WaveConfig = toml::from_str("[simulator]\ntick_ms = 250\n").unwrap();
        assert_eq!(parsed.simulator.tick_ms, 250);
        assert_eq!(parsed.simulator.window, 24);
        assert_eq!(parsed.server.addr, DEFAULT_ADDR);
    }

    #[test]
    fn zero_tick_interval_is_invalid() {
        let mut cfg = WaveConfig::default();
        assert!(cfg.validate().is_ok());
        cfg.simulator.tick_ms = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn serializes_round_trip() {
        let mut cfg = WaveConfig::default();
        cfg.simulator.seed = Some(7);
        cfg.logging.path = Some(PathBuf::from("/tmp/x.jsonl"));
        let text = toml::to_string_pretty(&cfg).unwrap();
        let back: WaveConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, cfg);
    }
}
