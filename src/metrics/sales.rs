//! Sale records and the capped recent-sales list.

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Entries kept in the recent-sales list.
pub const DEFAULT_RECENT_SALES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    Approved,
    Pending,
    Rejected,
}

impl std::fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Approved => write!(f, "approved"),
            Self::Pending => write!(f, "pending"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub id: String,
    pub product: String,
    pub customer: String,
    pub amount: f64,
    pub status: SaleStatus,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliate: Option<String>,
}

/// Newest-first list holding at most `cap` sales.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct RecentSales {
    #[serde(skip)]
    cap: usize,
    items: VecDeque<SaleRecord>,
}

impl RecentSales {
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            items: VecDeque::with_capacity(cap),
        }
    }

    /// Insert a sale at the front, dropping the oldest beyond the cap.
    pub fn prepend(&mut self, sale: SaleRecord) {
        self.items.push_front(sale);
        self.items.truncate(self.cap);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SaleRecord> {
        self.items.iter()
    }

    pub fn first(&self) -> Option<&SaleRecord> {
        self.items.front()
    }
}

/// The three sales the dashboard opens with, newest first.
pub fn seed_sales(now: DateTime<Utc>) -> Vec<SaleRecord> {
    vec![
        SaleRecord {
            id: "1".to_string(),
            product: "Curso Marketing Digital".to_string(),
            customer: "João Silva".to_string(),
            amount: 497.0,
            status: SaleStatus::Approved,
            date: now - Duration::minutes(5),
            affiliate: Some("Carlos Afiliado".to_string()),
        },
        SaleRecord {
            id: "2".to_string(),
            product: "E-book Vendas".to_string(),
            customer: "Maria Santos".to_string(),
            amount: 97.0,
            status: SaleStatus::Approved,
            date: now - Duration::minutes(15),
            affiliate: None,
        },
        SaleRecord {
            id: "3".to_string(),
            product: "Mentoria Premium".to_string(),
            customer: "Pedro Costa".to_string(),
            amount: 1997.0,
            status: SaleStatus::Pending,
            date: now - Duration::minutes(30),
            affiliate: Some("Ana Afiliada".to_string()),
        },
    ]
}
