//! Synthetic telemetry: random deltas standing in for a real metrics source.
//!
//! [`Generator::next_delta`] is total and side-effect free apart from drawing
//! from the supplied RNG, so a subscription to real telemetry could replace
//! it without touching the updater.

use rand::Rng;

/// Products a synthetic sale can be for.
pub const PRODUCTS: [&str; 3] = ["Curso Marketing Digital", "E-book Vendas", "Mentoria Premium"];

/// Customers a synthetic sale can be attributed to.
pub const CUSTOMERS: [&str; 3] = ["João Silva", "Maria Santos", "Pedro Costa"];

/// Price points a synthetic sale can have.
pub const PRICE_POINTS: [f64; 3] = [97.0, 497.0, 1997.0];

/// The single affiliate synthetic sales are credited to.
pub const AFFILIATE: &str = "Carlos Afiliado";

/// Bounds of the conversion-rate series, in percent.
pub const CONVERSION_MIN: f64 = 0.0;
pub const CONVERSION_MAX: f64 = 15.0;

/// Default chance that a tick produces a sale.
pub const DEFAULT_SALE_PROBABILITY: f64 = 0.3;

/// A sale produced by the generator, before the dashboard assigns an id.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleDraft {
    pub product: &'static str,
    pub customer: &'static str,
    pub amount: f64,
    pub affiliate: Option<&'static str>,
}

/// Newest sample of each tracked series, the input for the next perturbation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesTails {
    pub sales: f64,
    pub revenue: f64,
    pub conversion: f64,
}

/// Everything one tick changes.
#[derive(Debug, Clone, PartialEq)]
pub struct TickDelta {
    /// Added to the revenue total, in `[0, 500)`.
    pub revenue: f64,
    /// Added to the sales count, in `[0, 3)`.
    pub sales_count: u64,
    pub next_sales_sample: f64,
    pub next_revenue_sample: f64,
    pub next_conversion_sample: f64,
    pub sale: Option<SaleDraft>,
}

#[derive(Debug, Clone)]
pub struct Generator {
    sale_probability: f64,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(DEFAULT_SALE_PROBABILITY)
    }
}

impl Generator {
    /// Probabilities outside `[0, 1]` (and NaN) are clamped into range.
    pub fn new(sale_probability: f64) -> Self {
        let sale_probability = if sale_probability.is_nan() {
            DEFAULT_SALE_PROBABILITY
        } else {
            sale_probability.clamp(0.0, 1.0)
        };
        Self { sale_probability }
    }

    pub fn sale_probability(&self) -> f64 {
        self.sale_probability
    }

    /// Draw the delta for one tick.
    pub fn next_delta<R: Rng + ?Sized>(&self, rng: &mut R, tails: SeriesTails) -> TickDelta {
        let revenue = f64::from(rng.gen_range(0u32..500));
        let sales_count = rng.gen_range(0u64..3);

        let next_sales_sample = tails.sales + f64::from(rng.gen_range(-5i32..5));
        let next_revenue_sample = tails.revenue + f64::from(rng.gen_range(-250i32..250));
        let next_conversion_sample =
            clamp_conversion(tails.conversion + rng.gen_range(-1.0..1.0));

        let sale = if rng.gen_bool(self.sale_probability) {
            Some(self.draft_sale(rng))
        } else {
            None
        };

        TickDelta {
            revenue,
            sales_count,
            next_sales_sample,
            next_revenue_sample,
            next_conversion_sample,
            sale,
        }
    }

    fn draft_sale<R: Rng + ?Sized>(&self, rng: &mut R) -> SaleDraft {
        SaleDraft {
            product: PRODUCTS[rng.gen_range(0..PRODUCTS.len())],
            customer: CUSTOMERS[rng.gen_range(0..CUSTOMERS.len())],
            amount: PRICE_POINTS[rng.gen_range(0..PRICE_POINTS.len())],
            affiliate: rng.gen_bool(0.5).then_some(AFFILIATE),
        }
    }
}

/// Keep a conversion sample within `[0, 15]`. NaN collapses to the floor.
pub fn clamp_conversion(value: f64) -> f64 {
    if value.is_nan() {
        return CONVERSION_MIN;
    }
    value.clamp(CONVERSION_MIN, CONVERSION_MAX)
}
