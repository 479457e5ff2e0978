use chrono::{DateTime, Utc};
use soldium_model::{PartnershipInquiry, PresaleEntry};

pub trait Created {
    fn created_at(&self) -> DateTime<Utc>;
}

impl Created for PresaleEntry {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Created for PartnershipInquiry {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Orders by `created_at` descending. Stable, so equal timestamps keep
/// storage order.
pub fn sort_newest_first<T: Created>(items: &mut [T]) {
    items.sort_by_key(|item| std::cmp::Reverse(item.created_at()));
}
