use serde::Serialize;

/// Headline dashboard numbers shown on the metric cards.
///
/// `revenue` and `sales_count` move with every tick. The growth fields are
/// fixed at their initial values and are not derived from the deltas.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSnapshot {
    pub revenue: f64,
    pub sales_count: u64,
    pub active_affiliates: u64,
    pub conversion_rate: f64,
    pub revenue_growth: f64,
    pub sales_growth: f64,
    pub affiliates_growth: f64,
    pub conversion_growth: f64,
}

impl Default for MetricSnapshot {
    fn default() -> Self {
        Self {
            revenue: 24587.0,
            sales_count: 127,
            active_affiliates: 89,
            conversion_rate: 7.2,
            revenue_growth: 12.0,
            sales_growth: 8.0,
            affiliates_growth: 15.0,
            conversion_growth: 5.0,
        }
    }
}

impl MetricSnapshot {
    /// Add a tick's revenue and sales deltas.
    pub fn apply(&mut self, revenue_delta: f64, sales_delta: u64) {
        self.revenue += revenue_delta;
        self.sales_count += sales_delta;
    }
}
