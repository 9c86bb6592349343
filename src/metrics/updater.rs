//! The dashboard controller and the timer that drives it.
//!
//! [`Dashboard`] owns every piece of live-feed state and is only changed
//! through [`Dashboard::tick`] / [`Dashboard::apply`]. [`Ticker`] calls
//! `tick` on a background thread at a fixed interval until it is stopped or
//! dropped; once it is gone the dashboard receives no further updates.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use serde::Serialize;

use super::generator::{Generator, SeriesTails, TickDelta};
use super::sales::{RecentSales, SaleRecord, SaleStatus, seed_sales};
use super::series::RollingSeries;
use super::snapshot::MetricSnapshot;
use crate::config::schema::SimulatorConfig;

/// Opening values of the three hourly charts.
pub const SEED_SALES_SERIES: [f64; 24] = [
    45.0, 52.0, 48.0, 61.0, 55.0, 67.0, 59.0, 73.0, 69.0, 81.0, 76.0, 89.0, 85.0, 92.0, 88.0,
    95.0, 91.0, 98.0, 94.0, 102.0, 99.0, 105.0, 101.0, 127.0,
];
pub const SEED_REVENUE_SERIES: [f64; 24] = [
    2100.0, 2450.0, 2200.0, 2890.0, 2650.0, 3200.0, 2950.0, 3500.0, 3300.0, 3850.0, 3600.0,
    4200.0, 4000.0, 4350.0, 4150.0, 4500.0, 4300.0, 4650.0, 4400.0, 4800.0, 4600.0, 4950.0,
    4750.0, 5200.0,
];
pub const SEED_CONVERSION_SERIES: [f64; 24] = [
    6.2, 6.5, 6.1, 6.8, 6.4, 7.1, 6.9, 7.3, 7.0, 7.5, 7.2, 7.8, 7.4, 7.9, 7.6, 8.1, 7.8, 8.3, 8.0,
    8.4, 8.1, 8.6, 8.3, 7.2,
];

/// The three charted series.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSeries {
    pub sales: RollingSeries,
    pub revenue: RollingSeries,
    pub conversion: RollingSeries,
}

impl ChartSeries {
    fn seeded(window: usize) -> Self {
        Self {
            sales: RollingSeries::fitted(&SEED_SALES_SERIES, window),
            revenue: RollingSeries::fitted(&SEED_REVENUE_SERIES, window),
            conversion: RollingSeries::fitted(&SEED_CONVERSION_SERIES, window),
        }
    }

    fn tails(&self) -> SeriesTails {
        SeriesTails {
            sales: self.sales.last().unwrap_or_default(),
            revenue: self.revenue.last().unwrap_or_default(),
            conversion: self.conversion.last().unwrap_or_default(),
        }
    }
}

/// Live-feed state for one dashboard view.
#[derive(Debug, Clone)]
pub struct Dashboard {
    metrics: MetricSnapshot,
    series: ChartSeries,
    recent_sales: RecentSales,
    generator: Generator,
    ticks: u64,
    next_sale_seq: u64,
}

impl Dashboard {
    /// A dashboard with the opening metrics, charts and sample sales.
    pub fn new(settings: &SimulatorConfig, now: DateTime<Utc>) -> Self {
        let mut recent_sales = RecentSales::new(settings.recent_sales_cap);
        let seed = seed_sales(now);
        let next_sale_seq = seed.len() as u64 + 1;
        for sale in seed.into_iter().rev() {
            recent_sales.prepend(sale);
        }

        Self {
            metrics: MetricSnapshot::default(),
            series: ChartSeries::seeded(settings.window),
            recent_sales,
            generator: Generator::new(settings.sale_probability),
            ticks: 0,
            next_sale_seq,
        }
    }

    /// Draw a delta from the generator and apply it. Returns the applied delta.
    pub fn tick<R: rand::Rng + ?Sized>(&mut self, rng: &mut R, now: DateTime<Utc>) -> TickDelta {
        let delta = self.generator.next_delta(rng, self.series.tails());
        self.apply(&delta, now);
        delta
    }

    /// Merge one delta into the state.
    pub fn apply(&mut self, delta: &TickDelta, now: DateTime<Utc>) {
        self.metrics.apply(delta.revenue, delta.sales_count);

        self.series.sales.push(delta.next_sales_sample);
        self.series.revenue.push(delta.next_revenue_sample);
        self.series.conversion.push(delta.next_conversion_sample);

        if let Some(draft) = &delta.sale {
            let sale = SaleRecord {
                id: format!("sale-{}", self.next_sale_seq),
                product: draft.product.to_string(),
                customer: draft.customer.to_string(),
                amount: draft.amount,
                status: SaleStatus::Approved,
                date: now,
                affiliate: draft.affiliate.map(str::to_string),
            };
            self.next_sale_seq += 1;
            self.recent_sales.prepend(sale);
        }

        self.ticks += 1;
    }

    pub fn metrics(&self) -> &MetricSnapshot {
        &self.metrics
    }

    pub fn series(&self) -> &ChartSeries {
        &self.series
    }

    pub fn recent_sales(&self) -> &RecentSales {
        &self.recent_sales
    }

    /// Number of deltas applied so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

/// Lock a shared dashboard, recovering from a poisoned lock.
///
/// `apply` has no fallible steps, so a poisoned lock still guards
/// consistent state.
pub fn lock(dashboard: &Mutex<Dashboard>) -> std::sync::MutexGuard<'_, Dashboard> {
    dashboard.lock().unwrap_or_else(PoisonError::into_inner)
}

// ---------------------------------------------------------------------------
// Ticker
// ---------------------------------------------------------------------------

/// Background timer applying one tick per interval to a shared dashboard.
///
/// Stopping is synchronous: after [`Ticker::stop`] returns (or the ticker is
/// dropped) the worker thread has exited and no tick is in flight.
#[derive(Debug)]
pub struct Ticker {
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn start(
        dashboard: Arc<Mutex<Dashboard>>,
        interval: Duration,
        mut rng: StdRng,
    ) -> Result<Self> {
        if interval.is_zero() {
            anyhow::bail!("tick interval must be greater than zero");
        }
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let handle = thread::Builder::new()
            .name("wave-ticker".to_string())
            .spawn(move || {
                loop {
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {
                            lock(&dashboard).tick(&mut rng, Utc::now());
                        }
                        // explicit stop, or the ticker handle is gone
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
            })
            .context("failed to spawn ticker thread")?;

        Ok(Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    /// Stop ticking and wait for the worker to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::generator::SaleDraft;
    use rand::SeedableRng;

    fn settings() -> SimulatorConfig {
        SimulatorConfig::default()
    }

    #[test]
    fn new_dashboard_has_seed_state() {
        let d = Dashboard::new(&settings(), Utc::now());
        assert_eq!(d.metrics().revenue, 24587.0);
        assert_eq!(d.series().sales.len(), 24);
        assert_eq!(d.series().conversion.last(), Some(7.2));
        assert_eq!(d.recent_sales().len(), 3);
        assert_eq!(d.recent_sales().first().unwrap().id, "1");
        assert_eq!(d.ticks(), 0);
    }

    #[test]
    fn apply_adds_deltas_and_prepends_sale() {
        let mut d = Dashboard::new(&settings(), Utc::now());
        let delta = TickDelta {
            revenue: 100.0,
            sales_count: 2,
            next_sales_sample: 130.0,
            next_revenue_sample: 5300.0,
            next_conversion_sample: 7.5,
            sale: Some(SaleDraft {
                product: "E-book Vendas",
                customer: "Pedro Costa",
                amount: 97.0,
                affiliate: None,
            }),
        };
        d.apply(&delta, Utc::now());

        assert_eq!(d.metrics().revenue, 24687.0);
        assert_eq!(d.metrics().sales_count, 129);
        assert_eq!(d.metrics().revenue_growth, 12.0);
        assert_eq!(d.series().revenue.last(), Some(5300.0));
        let newest = d.recent_sales().first().unwrap();
        assert_eq!(newest.id, "sale-4");
        assert_eq!(newest.status, SaleStatus::Approved);
        assert_eq!(d.recent_sales().len(), 4);
    }

    #[test]
    fn custom_window_is_respected() {
        let cfg = SimulatorConfig {
            window: 6,
            ..SimulatorConfig::default()
        };
        let mut d = Dashboard::new(&cfg, Utc::now());
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            d.tick(&mut rng, Utc::now());
        }
        assert_eq!(d.series().sales.len(), 6);
        assert_eq!(d.series().revenue.len(), 6);
    }

    #[test]
    fn ticker_stops_on_drop() {
        let dashboard = Arc::new(Mutex::new(Dashboard::new(&settings(), Utc::now())));
        let ticker = Ticker::start(
            Arc::clone(&dashboard),
            Duration::from_millis(5),
            StdRng::seed_from_u64(2),
        )
        .unwrap();
        thread::sleep(Duration::from_millis(60));
        drop(ticker);

        let after_stop = lock(&dashboard).ticks();
        assert!(after_stop > 0);
        thread::sleep(Duration::from_millis(40));
        assert_eq!(lock(&dashboard).ticks(), after_stop);
    }

    #[test]
    fn ticker_rejects_zero_interval() {
        let dashboard = Arc::new(Mutex::new(Dashboard::new(&settings(), Utc::now())));
        let started = Ticker::start(
            Arc::clone(&dashboard),
            Duration::ZERO,
            StdRng::seed_from_u64(3),
        );
        assert!(started.is_err());
        assert_eq!(lock(&dashboard).ticks(), 0);
    }
}
