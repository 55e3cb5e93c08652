//! Effective commission resolution for (product, affiliate) pairs.
//!
//! Every product carries a default per-sale commission; an affiliate may
//! hold an override for a specific product. The precedence chain is short:
//! active override wins, everything else (no affiliate, no row, inactive
//! row) falls back to the product default. Both values are fixed amounts
//! added to the base price; there is no percentage math.

use std::collections::HashMap;
use std::sync::Arc;

use metrics::counter;
use rust_decimal::Decimal;
use tracing::debug;

use crate::application::error::AppError;
use crate::application::repos::{
    CommissionsRepo, CommissionsWriteRepo, ProductsRepo, UpsertCommissionParams,
};
use crate::domain::entities::{CommissionOverrideRecord, LandingPageRecord, ProductRecord};
use crate::domain::error::DomainError;

pub(crate) const METRIC_OVERRIDE: &str = "vetrina_commission_override_total";
pub(crate) const METRIC_DEFAULT: &str = "vetrina_commission_default_total";

/// Normalized affiliate identity for a landing page.
///
/// Pages created natively carry the affiliate under `affiliate_id`; pages
/// synced from the marketplace carry it under `mercacio_user_id`.
/// `affiliate_id` wins when both are present.
pub fn effective_affiliate_id(page: &LandingPageRecord) -> Option<&str> {
    page.affiliate_id
        .as_deref()
        .or(page.mercacio_user_id.as_deref())
}

pub struct CommissionResolver {
    products: Arc<dyn ProductsRepo>,
    commissions: Arc<dyn CommissionsRepo>,
}

impl CommissionResolver {
    pub fn new(products: Arc<dyn ProductsRepo>, commissions: Arc<dyn CommissionsRepo>) -> Self {
        Self {
            products,
            commissions,
        }
    }

    /// Effective commission for one product, loading the product record.
    pub async fn resolve(
        &self,
        product_id: &str,
        affiliate_id: Option<&str>,
    ) -> Result<Decimal, AppError> {
        let product = self
            .products
            .find_by_id(product_id)
            .await?
            .ok_or(AppError::NotFound)?;

        self.effective_commission(&product, affiliate_id).await
    }

    /// Effective commission when the product record is already in hand:
    /// at most one override lookup, no product read.
    pub async fn effective_commission(
        &self,
        product: &ProductRecord,
        affiliate_id: Option<&str>,
    ) -> Result<Decimal, AppError> {
        let Some(affiliate_id) = affiliate_id else {
            counter!(METRIC_DEFAULT).increment(1);
            return Ok(product.commission_rate);
        };

        // One lookup covers both deletion styles: a hard-deleted row and a
        // row with is_active = false are equally absent here.
        match self
            .commissions
            .find_active_override(&product.id, affiliate_id)
            .await?
        {
            Some(override_row) => {
                counter!(METRIC_OVERRIDE).increment(1);
                debug!(
                    product_id = %product.id,
                    affiliate_id,
                    commission = %override_row.commission,
                    "using affiliate commission override"
                );
                Ok(override_row.commission)
            }
            None => {
                counter!(METRIC_DEFAULT).increment(1);
                Ok(product.commission_rate)
            }
        }
    }

    /// Batch variant for catalogue listings: one filtered query for all of
    /// the affiliate's active overrides across `product_ids`, defaults for
    /// the rest. Equivalent to calling [`resolve`](Self::resolve) per
    /// product, without the per-product round trips.
    pub async fn resolve_many(
        &self,
        product_ids: &[String],
        affiliate_id: Option<&str>,
    ) -> Result<HashMap<String, Decimal>, AppError> {
        let products = self.products.find_by_ids(product_ids).await?;
        self.effective_commissions(&products, affiliate_id).await
    }

    /// Batch variant over already-loaded product records.
    pub async fn effective_commissions(
        &self,
        products: &[ProductRecord],
        affiliate_id: Option<&str>,
    ) -> Result<HashMap<String, Decimal>, AppError> {
        let mut resolved: HashMap<String, Decimal> = products
            .iter()
            .map(|product| (product.id.clone(), product.commission_rate))
            .collect();

        if let Some(affiliate_id) = affiliate_id {
            if !products.is_empty() {
                let ids: Vec<String> = products.iter().map(|p| p.id.clone()).collect();
                for override_row in self
                    .commissions
                    .find_active_overrides(&ids, affiliate_id)
                    .await?
                {
                    if let Some(slot) = resolved.get_mut(&override_row.product_id) {
                        *slot = override_row.commission;
                    }
                }
            }
        }

        Ok(resolved)
    }
}

/// Write path for the commission sync API.
pub struct AdminCommissionService {
    products: Arc<dyn ProductsRepo>,
    commissions: Arc<dyn CommissionsWriteRepo>,
}

impl AdminCommissionService {
    pub fn new(
        products: Arc<dyn ProductsRepo>,
        commissions: Arc<dyn CommissionsWriteRepo>,
    ) -> Self {
        Self {
            products,
            commissions,
        }
    }

    /// Create or update the override for a `(product, affiliate)` pair.
    ///
    /// Setting `is_active = false` is the soft removal path; the resolver
    /// then treats the pair as having no override.
    pub async fn set_override(
        &self,
        product_id: &str,
        affiliate_id: &str,
        commission: Decimal,
        is_active: bool,
        external_sync: bool,
    ) -> Result<CommissionOverrideRecord, AppError> {
        if affiliate_id.trim().is_empty() {
            return Err(AppError::validation("affiliate id is required"));
        }
        if commission.is_sign_negative() {
            return Err(DomainError::NegativeCommission { amount: commission }.into());
        }

        self.products
            .find_by_id(product_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let record = self
            .commissions
            .upsert_override(UpsertCommissionParams {
                product_id: product_id.to_string(),
                affiliate_id: affiliate_id.to_string(),
                commission,
                is_active,
                external_sync,
            })
            .await?;

        Ok(record)
    }

    /// Remove the override outright, reverting the pair to the product
    /// default. Removing an absent override is not an error.
    pub async fn remove_override(
        &self,
        product_id: &str,
        affiliate_id: &str,
    ) -> Result<bool, AppError> {
        Ok(self
            .commissions
            .delete_override(product_id, affiliate_id)
            .await?)
    }

    /// Soft removal: keep the row, flip it inactive.
    pub async fn deactivate_override(
        &self,
        product_id: &str,
        affiliate_id: &str,
    ) -> Result<bool, AppError> {
        Ok(self
            .commissions
            .deactivate_override(product_id, affiliate_id)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::OffsetDateTime;

    use super::*;

    fn landing_page(affiliate: Option<&str>, mercacio_user: Option<&str>) -> LandingPageRecord {
        LandingPageRecord {
            id: "lp-1".to_string(),
            tracking_id: "trk-1".to_string(),
            product_id: "p-1".to_string(),
            affiliate_id: affiliate.map(str::to_string),
            mercacio_user_id: mercacio_user.map(str::to_string),
            template: "modern".to_string(),
            settings: json!({}),
            custom_data: json!({}),
            locale: "en".to_string(),
            is_active: true,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn affiliate_id_takes_precedence() {
        let page = landing_page(Some("aff-1"), Some("user-9"));
        assert_eq!(effective_affiliate_id(&page), Some("aff-1"));
    }

    #[test]
    fn falls_back_to_mercacio_user_id() {
        let page = landing_page(None, Some("user-9"));
        assert_eq!(effective_affiliate_id(&page), Some("user-9"));
    }

    #[test]
    fn absent_when_neither_is_set() {
        let page = landing_page(None, None);
        assert_eq!(effective_affiliate_id(&page), None);
    }
}
