//! Landing-page resolution for affiliate tracking links.
//!
//! A tracking id maps to one active landing page; the page's affiliate
//! identity is normalized once at this boundary and the product arrives
//! already priced, so the rendering surface never repeats the fallback
//! chain. Template rendering itself happens outside this crate.

use std::sync::Arc;

use crate::application::commissions::{CommissionResolver, effective_affiliate_id};
use crate::application::error::AppError;
use crate::application::pricing::PricedProduct;
use crate::application::repos::{LandingPagesRepo, ProductsRepo};
use crate::domain::entities::LandingPageRecord;

/// Everything a rendering surface needs for one landing page visit.
#[derive(Debug, Clone, PartialEq)]
pub struct LandingPageView {
    pub page: LandingPageRecord,
    pub product: PricedProduct,
    /// The normalized affiliate identity the commission was resolved for.
    pub affiliate_id: Option<String>,
}

pub struct LandingPageService {
    pages: Arc<dyn LandingPagesRepo>,
    products: Arc<dyn ProductsRepo>,
    resolver: Arc<CommissionResolver>,
}

impl LandingPageService {
    pub fn new(
        pages: Arc<dyn LandingPagesRepo>,
        products: Arc<dyn ProductsRepo>,
        resolver: Arc<CommissionResolver>,
    ) -> Self {
        Self {
            pages,
            products,
            resolver,
        }
    }

    /// Resolve an active landing page by tracking id, with the effective
    /// commission already applied to its product.
    pub async fn resolve_by_tracking_id(
        &self,
        tracking_id: &str,
    ) -> Result<LandingPageView, AppError> {
        let page = self
            .pages
            .find_by_tracking_id(tracking_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let product = self
            .products
            .find_by_id(&page.product_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let affiliate_id = effective_affiliate_id(&page).map(str::to_string);
        let commission = self
            .resolver
            .effective_commission(&product, affiliate_id.as_deref())
            .await?;

        Ok(LandingPageView {
            product: PricedProduct::assemble(product, commission),
            affiliate_id,
            page,
        })
    }
}
