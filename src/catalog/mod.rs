//! In-memory record lists managed from the dashboard: affiliates, products,
//! funnels and conversation flows.
//!
//! Nothing here is persisted; [`Catalogs::seeded`] rebuilds the opening
//! state on every start.

pub mod records;
pub mod store;

use chrono::{DateTime, Utc};
use serde::Serialize;

use records::{Affiliate, ConversationFlow, Funnel, Product};
pub use store::{Campaign, CatalogError, CatalogResult, Record, Store};

/// Sample affiliate rows shown on every product report: `(name, sales)`.
const REPORT_AFFILIATES: [(&str, u64); 3] =
    [("Carlos Silva", 15), ("Ana Santos", 12), ("Pedro Costa", 8)];

#[derive(Debug, Clone)]
pub struct Catalogs {
    pub affiliates: Store<Affiliate>,
    pub products: Store<Product>,
    pub funnels: Store<Funnel>,
    pub flows: Store<ConversationFlow>,
}

impl Catalogs {
    pub fn seeded(now: DateTime<Utc>) -> Self {
        Self {
            affiliates: Store::new(records::seed_affiliates()),
            products: Store::new(records::seed_products(now)),
            funnels: Store::new(records::seed_funnels(now)),
            flows: Store::new(records::seed_flows(now)),
        }
    }

    pub fn funnel_totals(&self) -> FunnelTotals {
        self.funnels
            .list()
            .iter()
            .fold(FunnelTotals::default(), |acc, f| FunnelTotals {
                visitors: acc.visitors + f.visitors,
                conversions: acc.conversions + f.conversions,
            })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FunnelTotals {
    pub visitors: u64,
    pub conversions: u64,
}

// ---------------------------------------------------------------------------
// Product report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductReport {
    pub product: Product,
    /// `price × sales`.
    pub revenue: f64,
    pub affiliates: Vec<AffiliateCommission>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AffiliateCommission {
    pub name: String,
    pub sales: u64,
    pub commission: f64,
}

impl ProductReport {
    pub fn for_product(product: &Product) -> Self {
        let affiliates = REPORT_AFFILIATES
            .iter()
            .map(|&(name, sales)| AffiliateCommission {
                name: name.to_string(),
                sales,
                commission: product.price * sales as f64 * product.commission / 100.0,
            })
            .collect();

        Self {
            revenue: product.price * product.sales as f64,
            product: product.clone(),
            affiliates,
        }
    }
}
