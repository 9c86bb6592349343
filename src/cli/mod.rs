//! CLI command implementations for wave.
//!
//! Provides subcommand handlers for:
//! - `wave serve`: dashboard server with the live ticker
//! - `wave simulate --ticks N`: run the feed synchronously and print it
//! - `wave ai copy|strategy`: canned copy, in-process or from a remote endpoint
//! - `wave stats`: request log summary
//! - `wave config show|init|set|reset`: configuration management

use anyhow::{Context, Result};
use chrono::Utc;
use colored::Colorize;
use serde::Serialize;

use crate::ai::client::EdgeClient;
use crate::ai::{self, AiCategory, AiRequest, ProductContext};
use crate::analytics::reporter::{self, Stats};
use crate::config::{self, WaveConfig};
use crate::format;
use crate::metrics::{self, Dashboard};
use crate::web;

/// Output format for report commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            Some("csv") => Self::Csv,
            _ => Self::Table,
        }
    }
}

// ---------------------------------------------------------------------------
// wave serve
// ---------------------------------------------------------------------------

pub fn run_serve(addr: Option<String>, no_browser: bool) -> Result<()> {
    let mut cfg = config::load();
    if let Some(addr) = addr {
        cfg.server.addr = addr;
    }
    if no_browser {
        cfg.server.open_browser = false;
    }
    web::serve(&cfg)
}

// ---------------------------------------------------------------------------
// wave simulate
// ---------------------------------------------------------------------------

/// One simulated tick, as printed by `wave simulate`.
#[derive(Debug, Clone, Serialize)]
pub struct SimulatedTick {
    pub tick: u64,
    pub revenue: f64,
    pub sales_count: u64,
    pub sales_sample: f64,
    pub revenue_sample: f64,
    pub conversion_sample: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale: Option<String>,
}

/// Run `ticks` updates on a fresh dashboard without a timer thread.
///
/// Tick timestamps advance by the configured interval, so sale dates look
/// like a live run. Fails when a timestamp would leave chrono's range.
pub fn simulate(cfg: &WaveConfig, ticks: u64) -> Result<(Dashboard, Vec<SimulatedTick>)> {
    let start = Utc::now();
    let mut dashboard = Dashboard::new(&cfg.simulator, start);
    let mut rng = metrics::seeded_rng(cfg.simulator.seed);
    let interval = i64::try_from(cfg.simulator.tick_ms)
        .ok()
        .and_then(chrono::Duration::try_milliseconds)
        .with_context(|| format!("tick interval of {} ms is too large", cfg.simulator.tick_ms))?;

    let mut rows = Vec::new();
    for i in 1..=ticks {
        let at = i32::try_from(i)
            .ok()
            .and_then(|n| interval.checked_mul(n))
            .and_then(|offset| start.checked_add_signed(offset))
            .with_context(|| format!("tick {i} is past the last representable date"))?;
        let delta = dashboard.tick(&mut rng, at);
        let m = dashboard.metrics();
        rows.push(SimulatedTick {
            tick: dashboard.ticks(),
            revenue: m.revenue,
            sales_count: m.sales_count,
            sales_sample: delta.next_sales_sample,
            revenue_sample: delta.next_revenue_sample,
            conversion_sample: delta.next_conversion_sample,
            sale: delta.sale.map(|s| {
                format!("{} / {} / {}", s.product, s.customer, format::format_currency(s.amount))
            }),
        });
    }
    Ok((dashboard, rows))
}

pub fn run_simulate(ticks: u64, seed: Option<u64>, format: OutputFormat) -> Result<()> {
    let mut cfg = config::load();
    if seed.is_some() {
        cfg.simulator.seed = seed;
    }
    let (dashboard, rows) = simulate(&cfg, ticks)?;

    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "ticks": rows,
                "metrics": dashboard.metrics(),
                "recent_sales": dashboard.recent_sales(),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Csv => {
            println!("tick,revenue,sales_count,sales_sample,revenue_sample,conversion_sample,sale");
            for r in &rows {
                println!(
                    "{},{:.2},{},{},{},{:.2},{}",
                    r.tick,
                    r.revenue,
                    r.sales_count,
                    r.sales_sample,
                    r.revenue_sample,
                    r.conversion_sample,
                    r.sale.as_deref().unwrap_or(""),
                );
            }
        }
        OutputFormat::Table => print_simulation_table(&dashboard, &rows),
    }

    Ok(())
}

fn print_simulation_table(dashboard: &Dashboard, rows: &[SimulatedTick]) {
    println!("{}", "Wave Simulated Feed".bold().cyan());
    println!("{}", "=".repeat(72));
    println!(
        "  {:>4} {:>16} {:>7} {:>8} {:>8} {:>6}  New sale",
        "Tick", "Revenue", "Sales", "S.samp", "R.samp", "Conv"
    );
    println!("  {}", "-".repeat(70));

    for (i, r) in rows.iter().enumerate() {
        let line = format!(
            "  {:>4} {:>16} {:>7} {:>8} {:>8} {:>6}  {}",
            r.tick,
            format::format_currency(r.revenue),
            format::format_integer(r.sales_count),
            r.sales_sample,
            r.revenue_sample,
            format::format_percent(r.conversion_sample),
            r.sale.as_deref().map(|s| truncate(s, 40)).unwrap_or_default(),
        );
        if i % 2 == 0 {
            println!("{line}");
        } else {
            println!("{}", line.dimmed());
        }
    }

    println!();
    println!("{}", "Recent Sales".bold().cyan());
    for sale in dashboard.recent_sales().iter() {
        println!(
            "  {:<10} {:<26} {:<14} {:>14} {}",
            sale.id,
            truncate(&sale.product, 26),
            sale.customer,
            format::format_currency(sale.amount),
            colorize_status(&sale.status.to_string()),
        );
    }
}

// ---------------------------------------------------------------------------
// wave ai
// ---------------------------------------------------------------------------

/// Inputs to `wave ai`.
#[derive(Debug, Clone, Default)]
pub struct AiArgs {
    pub category: String,
    pub copy_type: Option<String>,
    pub prompt: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub target: Option<String>,
    pub remote: bool,
}

impl AiArgs {
    pub fn to_request(&self) -> AiRequest {
        let context = ProductContext {
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.price.clone(),
            target: self.target.clone(),
        };
        AiRequest {
            prompt: self.prompt.clone(),
            kind: self.category.clone(),
            copy_type: self.copy_type.clone(),
            context: (context != ProductContext::default()).then_some(context),
        }
    }
}

pub fn run_ai(args: &AiArgs) -> Result<()> {
    let has_name = args.name.as_deref().is_some_and(|n| !n.is_empty());
    if args.prompt.trim().is_empty() && !has_name {
        anyhow::bail!("write a prompt (--prompt) or at least a product name (--name)");
    }

    let request = args.to_request();
    let cfg = config::load();

    let text = if args.remote {
        let client = EdgeClient::from_config(&cfg.client);
        eprintln!("{} {}", "→".dimmed(), client.url().dimmed());
        client.generate(&request)?
    } else {
        let mut rng = metrics::seeded_rng(cfg.simulator.seed);
        ai::respond(&request, &mut rng)
    };

    let label = match request.category() {
        AiCategory::Copy => format!(
            "copy / {}",
            ai::CopyType::parse(request.copy_type.as_deref())
        ),
        AiCategory::Strategy => "strategy".to_string(),
    };
    println!("{}", label.bold().cyan());
    println!("{}", "=".repeat(50));
    println!("{text}");
    Ok(())
}

// ---------------------------------------------------------------------------
// wave stats
// ---------------------------------------------------------------------------

/// Show the `/wave-ai` request log summary.
pub fn run_stats(format: OutputFormat, days: Option<u32>) -> Result<()> {
    let cfg = config::load();
    let stats = reporter::compute_stats(&cfg.logging, days);

    if stats.total_requests == 0 {
        println!(
            "{}",
            "No data yet. Requests to /wave-ai are logged while `wave serve` runs.".yellow()
        );
        return Ok(());
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Csv => print_stats_csv(&stats),
        OutputFormat::Table => print_stats_table(&stats),
    }

    Ok(())
}

fn print_stats_table(stats: &Stats) {
    println!("{}", "Wave IA Request Report".bold().cyan());
    println!("{}", "=".repeat(60));
    println!();

    println!("  {} {}", "Requests:   ".bold(), stats.total_requests);
    println!(
        "  {} {} ok, {} failed ({:.1}% success)",
        "Outcome:    ".bold(),
        stats.succeeded.to_string().green(),
        stats.failed.to_string().red(),
        stats.success_pct
    );
    println!("  {} {:.1} ms", "Avg latency:".bold(), stats.avg_latency_ms);
    println!(
        "  {} {}",
        "Text served:".bold(),
        format::format_integer(stats.total_response_chars as u64)
    );
    println!();

    if !stats.kind_stats.is_empty() {
        println!("{}", "By Request Kind".bold().cyan());
        println!(
            "  {:<20} {:>6} {:>8} {:>10} {:>10}",
            "Kind", "Count", "Failed", "Latency", "Avg chars"
        );
        println!("  {}", "-".repeat(58));
        for (i, k) in stats.kind_stats.iter().enumerate() {
            let line = format!(
                "  {:<20} {:>6} {:>8} {:>8.1}ms {:>10.0}",
                truncate(&k.kind, 20),
                k.count,
                k.failures,
                k.avg_latency_ms,
                k.avg_response_chars,
            );
            if i % 2 == 0 {
                println!("{line}");
            } else {
                println!("{}", line.dimmed());
            }
        }
        println!();
    }

    if !stats.daily.is_empty() {
        println!("{}", "By Day".bold().cyan());
        for d in &stats.daily {
            println!("  {:<12} {:>6} requests {:>4} failed", d.date, d.requests, d.failures);
        }
    }
}

fn print_stats_csv(stats: &Stats) {
    println!("kind,count,failures,avg_latency_ms,avg_response_chars");
    for k in &stats.kind_stats {
        println!(
            "{},{},{},{:.1},{:.0}",
            k.kind, k.count, k.failures, k.avg_latency_ms, k.avg_response_chars,
        );
    }
}

// ---------------------------------------------------------------------------
// wave config
// ---------------------------------------------------------------------------

pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective Wave Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let exists = |p: Option<std::path::PathBuf>| p.map(|p| p.exists()).unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    for (found, label) in [
        (exists(config::global_config_file()), "~/.wave/config.toml"),
        (exists(config::project_config_file()), ".wave.toml"),
    ] {
        if found {
            println!("  {} {}", "✓".green(), label.dimmed());
        } else {
            println!("  {} {}", "·".dimmed(), format!("{label} (not found)").dimmed());
        }
    }
    println!("  {} {}", "·".dimmed(), "WAVE_* environment variables".dimmed());

    Ok(())
}

pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!("{} Config written to {}", "✓".green().bold(), path.display());
    println!("  {}", "Edit the file to tune the simulator and server.".dimmed());
    Ok(())
}

pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Shorten to `max_len` characters, ending in `…` when cut.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}

fn colorize_status(status: &str) -> colored::ColoredString {
    match status {
        "approved" => status.green(),
        "pending" => status.yellow(),
        _ => status.red(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> WaveConfig {
        let mut cfg = WaveConfig::default();
        cfg.simulator.seed = Some(seed);
        cfg
    }

    #[test]
    fn output_format_parses() {
        assert_eq!(OutputFormat::from_str_opt(Some("json")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str_opt(Some("csv")), OutputFormat::Csv);
        assert_eq!(OutputFormat::from_str_opt(Some("xml")), OutputFormat::Table);
        assert_eq!(OutputFormat::from_str_opt(None), OutputFormat::Table);
    }

    #[test]
    fn simulate_is_reproducible_with_a_seed() {
        let (a, rows_a) = simulate(&seeded(42), 20).unwrap();
        let (b, rows_b) = simulate(&seeded(42), 20).unwrap();
        assert_eq!(a.metrics(), b.metrics());
        assert_eq!(rows_a.len(), 20);
        let samples = |rows: &[SimulatedTick]| rows.iter().map(|r| r.revenue_sample).collect::<Vec<_>>();
        assert_eq!(samples(&rows_a), samples(&rows_b));
        assert_eq!(a.ticks(), 20);
    }

    #[test]
    fn simulate_revenue_never_decreases() {
        let (_, rows) = simulate(&seeded(3), 50).unwrap();
        for pair in rows.windows(2) {
            assert!(pair[1].revenue >= pair[0].revenue);
            assert!(pair[1].sales_count >= pair[0].sales_count);
        }
    }

    #[test]
    fn simulate_rejects_out_of_range_timestamps() {
        let mut cfg = seeded(1);
        cfg.simulator.tick_ms = 10_000_000_000_000_000;
        assert!(simulate(&cfg, 1).is_err());

        cfg.simulator.tick_ms = u64::MAX;
        assert!(simulate(&cfg, 1).is_err());

        let mut cfg = seeded(1);
        cfg.simulator.tick_ms = 100_000_000_000_000;
        assert!(simulate(&cfg, 1).is_ok());
        assert!(simulate(&cfg, 1_000).is_err());
    }

    #[test]
    fn ai_args_build_request() {
        let args = AiArgs {
            category: "copy".to_string(),
            copy_type: Some("ads".to_string()),
            name: Some("Kit".to_string()),
            ..AiArgs::default()
        };
        let req = args.to_request();
        assert_eq!(req.category(), AiCategory::Copy);
        assert_eq!(req.context.unwrap().name.as_deref(), Some("Kit"));

        let bare = AiArgs {
            category: "strategy".to_string(),
            ..AiArgs::default()
        };
        assert!(bare.to_request().context.is_none());
    }

    #[test]
    fn run_ai_requires_prompt_or_name() {
        let args = AiArgs {
            category: "copy".to_string(),
            prompt: "   ".to_string(),
            ..AiArgs::default()
        };
        assert!(run_ai(&args).is_err());
    }

    #[test]
    fn truncate_is_char_safe() {
        assert_eq!(truncate("Página de Obrigado", 6), "Págin…");
        assert_eq!(truncate("curto", 10), "curto");
    }
}
