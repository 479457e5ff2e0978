// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use soldium_model::{InquiryForm, PartnershipInquiry};
use soldium_query::sort_newest_first;
use soldium_store::DocumentStore;
use tracing::{debug, info};

use super::{run_store, ServiceError, AUDIT_TARGET};

pub struct PartnershipDesk {
    store: Arc<dyn DocumentStore>,
}

impl PartnershipDesk {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn submit(&self, form: InquiryForm) -> Result<PartnershipInquiry, ServiceError> {
        let draft = form.validate().map_err(|e| {
            debug!(field = %e.field, "inquiry rejected");
            e
        })?;
        let inquiry = run_store(&self.store, move |store| store.insert_inquiry(draft)).await?;
        info!(
            target: AUDIT_TARGET,
            event = "inquiry_received",
            inquiry_id = %inquiry.id,
            "partnership inquiry received"
        );
        Ok(inquiry)
    }

    /// Every inquiry, newest first.
    pub async fn list(&self) -> Result<Vec<PartnershipInquiry>, ServiceError> {
        let mut inquiries = run_store(&self.store, |store| store.list_inquiries()).await?;
        sort_newest_first(&mut inquiries);
        Ok(inquiries)
    }
}
