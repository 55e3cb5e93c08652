//! Final price assembly: base price plus the effective commission.
//!
//! Deliberately thin. No discount stacking and no tax computation; VAT
//! fields on the product pass through untouched. Currency rounding happens
//! at display time, outside this crate.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::application::commissions::CommissionResolver;
use crate::application::error::AppError;
use crate::domain::entities::ProductRecord;

/// What a visitor pays: the shared base price plus the per-sale commission
/// effective for this affiliate.
pub fn total_price(base_price: Decimal, effective_commission: Decimal) -> Decimal {
    base_price + effective_commission
}

/// A product with its affiliate-effective amounts attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricedProduct {
    pub product: ProductRecord,
    pub effective_commission: Decimal,
    pub total_price: Decimal,
}

impl PricedProduct {
    pub fn assemble(product: ProductRecord, effective_commission: Decimal) -> Self {
        let total = total_price(product.base_price, effective_commission);
        Self {
            product,
            effective_commission,
            total_price: total,
        }
    }
}

/// Prices products for storefront rendering.
pub struct PricingService {
    resolver: Arc<CommissionResolver>,
}

impl PricingService {
    pub fn new(resolver: Arc<CommissionResolver>) -> Self {
        Self { resolver }
    }

    pub async fn price_product(
        &self,
        product: ProductRecord,
        affiliate_id: Option<&str>,
    ) -> Result<PricedProduct, AppError> {
        let commission = self
            .resolver
            .effective_commission(&product, affiliate_id)
            .await?;
        Ok(PricedProduct::assemble(product, commission))
    }

    /// Price a whole catalogue listing with a single override query.
    pub async fn price_listing(
        &self,
        products: Vec<ProductRecord>,
        affiliate_id: Option<&str>,
    ) -> Result<Vec<PricedProduct>, AppError> {
        let commissions = self
            .resolver
            .effective_commissions(&products, affiliate_id)
            .await?;

        Ok(products
            .into_iter()
            .map(|product| {
                let commission = commissions
                    .get(&product.id)
                    .copied()
                    .unwrap_or(product.commission_rate);
                PricedProduct::assemble(product, commission)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_is_base_plus_commission() {
        let base = Decimal::new(10000, 2);
        let commission = Decimal::new(1500, 2);
        assert_eq!(total_price(base, commission), Decimal::new(11500, 2));
    }

    #[test]
    fn zero_commission_leaves_base_untouched() {
        let base = Decimal::new(4999, 2);
        assert_eq!(total_price(base, Decimal::ZERO), base);
    }
}
