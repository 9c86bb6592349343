//! Generic in-memory store behind each record list.
//!
//! Records keep insertion order. Ids are unique within a store: `create`
//! assigns the next free numeric id when the draft has none or a taken one,
//! and `update` keeps the id of the record it replaces.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::records::{Affiliate, CampaignStatus, ConversationFlow, Funnel, Product};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },
    #[error("invalid {kind}: {reason}")]
    Invalid { kind: &'static str, reason: String },
}

pub type CatalogResult<T> = Result<T, CatalogError>;

// ---------------------------------------------------------------------------
// Record traits
// ---------------------------------------------------------------------------

/// A record that can live in a [`Store`].
pub trait Record: Clone {
    /// Singular name used in error messages.
    const KIND: &'static str;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
    fn name(&self) -> &str;
    /// Second field matched by search, besides the name.
    fn search_field(&self) -> &str;
    fn status_str(&self) -> &str;

    /// Called on create, before the record is stored.
    fn stamp_created(&mut self, _now: DateTime<Utc>) {}

    /// Called on update with the record being replaced.
    fn carry_over(&mut self, previous: &Self) {
        self.set_id(previous.id().to_string());
    }
}

/// Funnels and flows: records that can be duplicated and paused.
pub trait Campaign: Record {
    fn status_mut(&mut self) -> &mut CampaignStatus;

    /// A fresh copy: ` (Cópia)` suffix, draft status, zeroed stats.
    fn duplicated(&self, id: String, now: DateTime<Utc>) -> Self;
}

impl Record for Affiliate {
    const KIND: &'static str = "affiliate";

    fn id(&self) -> &str {
        &self.id
    }
    fn set_id(&mut self, id: String) {
        self.id = id;
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn search_field(&self) -> &str {
        &self.email
    }
    fn status_str(&self) -> &str {
        self.status.as_str()
    }
}

impl Record for Product {
    const KIND: &'static str = "product";

    fn id(&self) -> &str {
        &self.id
    }
    fn set_id(&mut self, id: String) {
        self.id = id;
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn search_field(&self) -> &str {
        &self.description
    }
    fn status_str(&self) -> &str {
        self.status.as_str()
    }
    fn stamp_created(&mut self, now: DateTime<Utc>) {
        self.created_at = now;
        self.sales = 0;
    }
    fn carry_over(&mut self, previous: &Self) {
        self.id = previous.id.clone();
        self.created_at = previous.created_at;
        self.sales = previous.sales;
    }
}

impl Record for Funnel {
    const KIND: &'static str = "funnel";

    fn id(&self) -> &str {
        &self.id
    }
    fn set_id(&mut self, id: String) {
        self.id = id;
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn search_field(&self) -> &str {
        &self.description
    }
    fn status_str(&self) -> &str {
        self.status.as_str()
    }
    fn stamp_created(&mut self, now: DateTime<Utc>) {
        self.created_at = now;
    }
    fn carry_over(&mut self, previous: &Self) {
        self.id = previous.id.clone();
        self.created_at = previous.created_at;
    }
}

impl Campaign for Funnel {
    fn status_mut(&mut self) -> &mut CampaignStatus {
        &mut self.status
    }

    fn duplicated(&self, id: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: format!("{} (Cópia)", self.name),
            status: CampaignStatus::Draft,
            visitors: 0,
            conversions: 0,
            revenue: 0.0,
            conversion_rate: 0.0,
            created_at: now,
            ..self.clone()
        }
    }
}

impl Record for ConversationFlow {
    const KIND: &'static str = "flow";

    fn id(&self) -> &str {
        &self.id
    }
    fn set_id(&mut self, id: String) {
        self.id = id;
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn search_field(&self) -> &str {
        &self.description
    }
    fn status_str(&self) -> &str {
        self.status.as_str()
    }
    fn stamp_created(&mut self, now: DateTime<Utc>) {
        self.created_at = now;
    }
    fn carry_over(&mut self, previous: &Self) {
        self.id = previous.id.clone();
        self.created_at = previous.created_at;
    }
}

impl Campaign for ConversationFlow {
    fn status_mut(&mut self) -> &mut CampaignStatus {
        &mut self.status
    }

    fn duplicated(&self, id: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: format!("{} (Cópia)", self.name),
            status: CampaignStatus::Draft,
            messages: 0,
            conversions: 0,
            created_at: now,
            ..self.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Store<T> {
    items: Vec<T>,
}

impl<T: Record> Store<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn list(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|r| r.id() == id)
    }

    /// Case-insensitive search over name and the secondary field, combined
    /// with an exact status match. Empty `query` matches all; `status` of
    /// `""` or `"all"` matches all.
    pub fn filter(&self, query: &str, status: &str) -> Vec<&T> {
        let needle = query.trim().to_lowercase();
        self.items
            .iter()
            .filter(|r| {
                needle.is_empty()
                    || r.name().to_lowercase().contains(&needle)
                    || r.search_field().to_lowercase().contains(&needle)
            })
            .filter(|r| status.is_empty() || status == "all" || r.status_str() == status)
            .collect()
    }

    pub fn create(&mut self, mut record: T, now: DateTime<Utc>) -> CatalogResult<&T> {
        validate(&record)?;
        if record.id().is_empty() || self.get(record.id()).is_some() {
            record.set_id(self.next_id());
        }
        record.stamp_created(now);
        self.items.push(record);
        Ok(&self.items[self.items.len() - 1])
    }

    pub fn update(&mut self, id: &str, mut record: T) -> CatalogResult<&T> {
        validate(&record)?;
        let slot = self.position(id)?;
        record.carry_over(&self.items[slot]);
        self.items[slot] = record;
        Ok(&self.items[slot])
    }

    pub fn delete(&mut self, id: &str) -> CatalogResult<T> {
        let slot = self.position(id)?;
        Ok(self.items.remove(slot))
    }

    /// Apply `edit` to the record in place.
    pub fn modify<R>(&mut self, id: &str, edit: impl FnOnce(&mut T) -> R) -> CatalogResult<R> {
        let slot = self.position(id)?;
        Ok(edit(&mut self.items[slot]))
    }

    fn position(&self, id: &str) -> CatalogResult<usize> {
        self.items
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| CatalogError::NotFound {
                kind: T::KIND,
                id: id.to_string(),
            })
    }

    fn next_id(&self) -> String {
        next_numeric_id(self.items.iter().map(|r| r.id()))
    }
}

impl<T: Campaign> Store<T> {
    /// Append a draft copy of `id` and return it.
    pub fn duplicate(&mut self, id: &str, now: DateTime<Utc>) -> CatalogResult<&T> {
        let slot = self.position(id)?;
        let copy = self.items[slot].duplicated(self.next_id(), now);
        self.items.push(copy);
        Ok(&self.items[self.items.len() - 1])
    }

    /// Flip `active` to `paused`, anything else to `active`.
    pub fn toggle(&mut self, id: &str) -> CatalogResult<&T> {
        let slot = self.position(id)?;
        let status = self.items[slot].status_mut();
        *status = status.toggled();
        Ok(&self.items[slot])
    }
}

/// One past the highest numeric id in `ids`. When that would overflow, the
/// smallest unused positive id instead.
pub fn next_numeric_id<'a>(ids: impl IntoIterator<Item = &'a str>) -> String {
    let used: BTreeSet<u64> = ids.into_iter().filter_map(|id| id.parse().ok()).collect();
    let next = match used.last() {
        None => 1,
        Some(max) => match max.checked_add(1) {
            Some(next) => next,
            None => (1..).find(|n| !used.contains(n)).unwrap_or(0),
        },
    };
    next.to_string()
}

fn validate<T: Record>(record: &T) -> CatalogResult<()> {
    if record.name().trim().is_empty() {
        return Err(CatalogError::Invalid {
            kind: T::KIND,
            reason: "name is required".to_string(),
        });
    }
    Ok(())
}
