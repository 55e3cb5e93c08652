//! Domain entities mirrored from persistent storage.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

/// A storefront. The relational store owns these records; cache layers only
/// ever hold copies.
///
/// `id` is the durable, immutable primary key. `slug` is the human-chosen
/// URL handle; mutable in principle, treated as stable in practice, and
/// absent for stores that have not been published under a vanity URL yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreRecord {
    pub id: String,
    pub slug: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub logo: Option<String>,
    pub banner: Option<String>,
    pub theme: Option<String>,
    /// Opaque structured document: currency, language, UI sections, logo
    /// sizing. Merged shallowly on customization updates.
    pub settings: Value,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// A catalog product shared by every storefront.
///
/// `commission_rate` is the default per-sale commission: a fixed amount
/// added to `base_price`, not a percentage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub short_description: Option<String>,
    pub base_price: Decimal,
    pub commission_rate: Decimal,
    /// Pass-through only; no tax computation happens in this crate.
    pub vat_rate: Option<Decimal>,
    pub image_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub gallery_urls: Vec<String>,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// An affiliate-specific commission override, keyed by the unique
/// `(product_id, affiliate_id)` pair.
///
/// Inactive rows are soft deletes; the resolver treats them exactly like
/// absent rows. `external_sync` marks overrides pushed by the upstream
/// marketplace rather than set natively; informational only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommissionOverrideRecord {
    pub id: String,
    pub product_id: String,
    pub affiliate_id: String,
    pub commission: Decimal,
    pub is_active: bool,
    pub external_sync: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// An affiliate landing page addressed by its external tracking id.
///
/// The affiliate identity historically arrived under two field names
/// depending on which API created the page: `affiliate_id` for natively
/// created pages, `mercacio_user_id` for marketplace-synced ones.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LandingPageRecord {
    pub id: String,
    pub tracking_id: String,
    pub product_id: String,
    pub affiliate_id: Option<String>,
    pub mercacio_user_id: Option<String>,
    pub template: String,
    pub settings: Value,
    pub custom_data: Value,
    pub locale: String,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}
