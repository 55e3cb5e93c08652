//! Shared fakes for integration tests.
//!
//! The repos are in-memory stand-ins for the relational store; they count
//! reads so tests can assert which lookups hit the database and which were
//! served from cache.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::json;
use time::OffsetDateTime;
use uuid::Uuid;

use vetrina::application::repos::{
    CommissionsRepo, CommissionsWriteRepo, CreateStoreParams, LandingPagesRepo, ProductsRepo,
    RepoError, StoresRepo, StoresWriteRepo, UpdateStoreParams, UpsertCommissionParams,
};
use vetrina::cache::{CacheError, StoreCacheBackend, StoreCacheEntry};
use vetrina::domain::entities::{
    CommissionOverrideRecord, LandingPageRecord, ProductRecord, StoreRecord,
};
use vetrina::domain::types::{IdentifierKind, StoreRef};

pub fn money(value: &str) -> Decimal {
    value.parse().expect("decimal literal")
}

pub fn sample_store(id: &str, slug: Option<&str>) -> StoreRecord {
    StoreRecord {
        id: id.to_string(),
        slug: slug.map(str::to_string),
        name: format!("Store {id}"),
        description: Some("A storefront".to_string()),
        logo: None,
        banner: None,
        theme: Some("modern".to_string()),
        settings: json!({"currency": "EUR", "language": "en"}),
        is_active: true,
        created_at: OffsetDateTime::UNIX_EPOCH,
        updated_at: OffsetDateTime::UNIX_EPOCH,
    }
}

pub fn sample_product(id: &str, base_price: &str, commission_rate: &str) -> ProductRecord {
    ProductRecord {
        id: id.to_string(),
        title: format!("Product {id}"),
        description: "A catalog product".to_string(),
        short_description: None,
        base_price: money(base_price),
        commission_rate: money(commission_rate),
        vat_rate: None,
        image_url: None,
        thumbnail_url: None,
        gallery_urls: Vec::new(),
        is_active: true,
        created_at: OffsetDateTime::UNIX_EPOCH,
        updated_at: OffsetDateTime::UNIX_EPOCH,
    }
}

pub fn sample_landing_page(
    tracking_id: &str,
    product_id: &str,
    affiliate_id: Option<&str>,
    mercacio_user_id: Option<&str>,
) -> LandingPageRecord {
    LandingPageRecord {
        id: Uuid::new_v4().to_string(),
        tracking_id: tracking_id.to_string(),
        product_id: product_id.to_string(),
        affiliate_id: affiliate_id.map(str::to_string),
        mercacio_user_id: mercacio_user_id.map(str::to_string),
        template: "modern".to_string(),
        settings: json!({}),
        custom_data: json!({}),
        locale: "en".to_string(),
        is_active: true,
        created_at: OffsetDateTime::UNIX_EPOCH,
        updated_at: OffsetDateTime::UNIX_EPOCH,
    }
}

// ============================================================================
// Fake repositories
// ============================================================================

#[derive(Default)]
pub struct FakeStores {
    rows: Mutex<HashMap<String, StoreRecord>>,
    lookups: AtomicUsize,
}

impl FakeStores {
    pub fn with(stores: impl IntoIterator<Item = StoreRecord>) -> Self {
        Self {
            rows: Mutex::new(
                stores
                    .into_iter()
                    .map(|store| (store.id.clone(), store))
                    .collect(),
            ),
            lookups: AtomicUsize::new(0),
        }
    }

    pub fn upsert(&self, store: StoreRecord) {
        self.rows
            .lock()
            .expect("fake stores lock")
            .insert(store.id.clone(), store);
    }

    /// How many find-by-id/slug lookups have reached the "database".
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StoresRepo for FakeStores {
    async fn find_by_id(&self, id: &str) -> Result<Option<StoreRecord>, RepoError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.rows.lock().expect("fake stores lock").get(id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<StoreRecord>, RepoError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .rows
            .lock()
            .expect("fake stores lock")
            .values()
            .find(|store| store.slug.as_deref() == Some(slug))
            .cloned())
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, RepoError> {
        Ok(self
            .rows
            .lock()
            .expect("fake stores lock")
            .values()
            .any(|store| store.slug.as_deref() == Some(slug)))
    }
}

#[async_trait]
impl StoresWriteRepo for FakeStores {
    async fn create_store(&self, params: CreateStoreParams) -> Result<StoreRecord, RepoError> {
        let now = OffsetDateTime::now_utc();
        let store = StoreRecord {
            id: params.id,
            slug: params.slug,
            name: params.name,
            description: params.description,
            logo: None,
            banner: None,
            theme: params.theme,
            settings: params.settings,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.upsert(store.clone());
        Ok(store)
    }

    async fn update_store(&self, params: UpdateStoreParams) -> Result<StoreRecord, RepoError> {
        let mut rows = self.rows.lock().expect("fake stores lock");
        let store = rows.get_mut(&params.id).ok_or(RepoError::NotFound)?;

        if let Some(name) = params.name {
            store.name = name;
        }
        if let Some(description) = params.description {
            store.description = Some(description);
        }
        if let Some(logo) = params.logo {
            store.logo = Some(logo);
        }
        if let Some(banner) = params.banner {
            store.banner = Some(banner);
        }
        if let Some(theme) = params.theme {
            store.theme = Some(theme);
        }
        if let Some(settings) = params.settings {
            store.settings = settings;
        }
        store.updated_at = OffsetDateTime::now_utc();

        Ok(store.clone())
    }
}

#[derive(Default)]
pub struct FakeProducts {
    rows: HashMap<String, ProductRecord>,
}

impl FakeProducts {
    pub fn with(products: impl IntoIterator<Item = ProductRecord>) -> Self {
        Self {
            rows: products
                .into_iter()
                .map(|product| (product.id.clone(), product))
                .collect(),
        }
    }
}

#[async_trait]
impl ProductsRepo for FakeProducts {
    async fn find_by_id(&self, id: &str) -> Result<Option<ProductRecord>, RepoError> {
        Ok(self.rows.get(id).cloned())
    }

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<ProductRecord>, RepoError> {
        Ok(ids.iter().filter_map(|id| self.rows.get(id).cloned()).collect())
    }
}

#[derive(Default)]
pub struct FakeCommissions {
    rows: Mutex<Vec<CommissionOverrideRecord>>,
    queries: AtomicUsize,
}

impl FakeCommissions {
    pub fn with(rows: impl IntoIterator<Item = CommissionOverrideRecord>) -> Self {
        Self {
            rows: Mutex::new(rows.into_iter().collect()),
            queries: AtomicUsize::new(0),
        }
    }

    pub fn active_override(
        product_id: &str,
        affiliate_id: &str,
        commission: &str,
    ) -> CommissionOverrideRecord {
        CommissionOverrideRecord {
            id: Uuid::new_v4().to_string(),
            product_id: product_id.to_string(),
            affiliate_id: affiliate_id.to_string(),
            commission: money(commission),
            is_active: true,
            external_sync: false,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn row(&self, product_id: &str, affiliate_id: &str) -> Option<CommissionOverrideRecord> {
        self.rows
            .lock()
            .expect("fake commissions lock")
            .iter()
            .find(|row| row.product_id == product_id && row.affiliate_id == affiliate_id)
            .cloned()
    }
}

#[async_trait]
impl CommissionsRepo for FakeCommissions {
    async fn find_active_override(
        &self,
        product_id: &str,
        affiliate_id: &str,
    ) -> Result<Option<CommissionOverrideRecord>, RepoError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .rows
            .lock()
            .expect("fake commissions lock")
            .iter()
            .find(|row| {
                row.product_id == product_id && row.affiliate_id == affiliate_id && row.is_active
            })
            .cloned())
    }

    async fn find_active_overrides(
        &self,
        product_ids: &[String],
        affiliate_id: &str,
    ) -> Result<Vec<CommissionOverrideRecord>, RepoError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .rows
            .lock()
            .expect("fake commissions lock")
            .iter()
            .filter(|row| {
                row.affiliate_id == affiliate_id
                    && row.is_active
                    && product_ids.contains(&row.product_id)
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CommissionsWriteRepo for FakeCommissions {
    async fn upsert_override(
        &self,
        params: UpsertCommissionParams,
    ) -> Result<CommissionOverrideRecord, RepoError> {
        let mut rows = self.rows.lock().expect("fake commissions lock");
        let now = OffsetDateTime::now_utc();

        if let Some(row) = rows.iter_mut().find(|row| {
            row.product_id == params.product_id && row.affiliate_id == params.affiliate_id
        }) {
            row.commission = params.commission;
            row.is_active = params.is_active;
            row.external_sync = params.external_sync;
            row.updated_at = now;
            return Ok(row.clone());
        }

        let row = CommissionOverrideRecord {
            id: Uuid::new_v4().to_string(),
            product_id: params.product_id,
            affiliate_id: params.affiliate_id,
            commission: params.commission,
            is_active: params.is_active,
            external_sync: params.external_sync,
            created_at: now,
            updated_at: now,
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn deactivate_override(
        &self,
        product_id: &str,
        affiliate_id: &str,
    ) -> Result<bool, RepoError> {
        let mut rows = self.rows.lock().expect("fake commissions lock");
        match rows.iter_mut().find(|row| {
            row.product_id == product_id && row.affiliate_id == affiliate_id && row.is_active
        }) {
            Some(row) => {
                row.is_active = false;
                row.updated_at = OffsetDateTime::now_utc();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_override(
        &self,
        product_id: &str,
        affiliate_id: &str,
    ) -> Result<bool, RepoError> {
        let mut rows = self.rows.lock().expect("fake commissions lock");
        let before = rows.len();
        rows.retain(|row| !(row.product_id == product_id && row.affiliate_id == affiliate_id));
        Ok(rows.len() < before)
    }
}

#[derive(Default)]
pub struct FakeLandingPages {
    rows: Vec<LandingPageRecord>,
}

impl FakeLandingPages {
    pub fn with(rows: impl IntoIterator<Item = LandingPageRecord>) -> Self {
        Self {
            rows: rows.into_iter().collect(),
        }
    }
}

#[async_trait]
impl LandingPagesRepo for FakeLandingPages {
    async fn find_by_tracking_id(
        &self,
        tracking_id: &str,
    ) -> Result<Option<LandingPageRecord>, RepoError> {
        Ok(self
            .rows
            .iter()
            .find(|row| row.tracking_id == tracking_id && row.is_active)
            .cloned())
    }
}

// ============================================================================
// Scripted cache backends
// ============================================================================

/// A backend where every operation fails, simulating a total outage.
pub struct FailingCacheBackend;

#[async_trait]
impl StoreCacheBackend for FailingCacheBackend {
    async fn get(&self, _identifier: &str, _kind: IdentifierKind) -> Option<StoreCacheEntry> {
        None
    }

    async fn set(&self, _store: &StoreRecord) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("simulated outage".to_string()))
    }

    async fn invalidate(&self, _target: &StoreRef) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("simulated outage".to_string()))
    }

    async fn list_slugs(&self) -> Vec<String> {
        Vec::new()
    }
}
