//! Repository traits describing persistence adapters.
//!
//! The relational store is the source of truth for everything in this
//! crate; these traits are the only way the services reach it, so tests
//! can substitute in-memory fakes.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::Value;
use thiserror::Error;

use crate::domain::entities::{
    CommissionOverrideRecord, LandingPageRecord, ProductRecord, StoreRecord,
};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct CreateStoreParams {
    pub id: String,
    pub slug: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub theme: Option<String>,
    pub settings: Value,
}

/// Patch update: `None` fields keep their current value. `settings`
/// replaces the whole document; callers merge beforehand.
#[derive(Debug, Clone)]
pub struct UpdateStoreParams {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub logo: Option<String>,
    pub banner: Option<String>,
    pub theme: Option<String>,
    pub settings: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct UpsertCommissionParams {
    pub product_id: String,
    pub affiliate_id: String,
    pub commission: Decimal,
    pub is_active: bool,
    pub external_sync: bool,
}

#[async_trait]
pub trait StoresRepo: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<StoreRecord>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<StoreRecord>, RepoError>;

    async fn slug_exists(&self, slug: &str) -> Result<bool, RepoError>;
}

#[async_trait]
pub trait StoresWriteRepo: Send + Sync {
    async fn create_store(&self, params: CreateStoreParams) -> Result<StoreRecord, RepoError>;

    /// Applies the patch and returns the updated record, or
    /// `RepoError::NotFound` when the store does not exist.
    async fn update_store(&self, params: UpdateStoreParams) -> Result<StoreRecord, RepoError>;
}

#[async_trait]
pub trait ProductsRepo: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<ProductRecord>, RepoError>;

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<ProductRecord>, RepoError>;
}

#[async_trait]
pub trait CommissionsRepo: Send + Sync {
    /// The one lookup the resolver performs: an absent row and an inactive
    /// row are both `None`.
    async fn find_active_override(
        &self,
        product_id: &str,
        affiliate_id: &str,
    ) -> Result<Option<CommissionOverrideRecord>, RepoError>;

    /// All active overrides `affiliate_id` holds across `product_ids`,
    /// in one filtered query.
    async fn find_active_overrides(
        &self,
        product_ids: &[String],
        affiliate_id: &str,
    ) -> Result<Vec<CommissionOverrideRecord>, RepoError>;
}

#[async_trait]
pub trait CommissionsWriteRepo: Send + Sync {
    async fn upsert_override(
        &self,
        params: UpsertCommissionParams,
    ) -> Result<CommissionOverrideRecord, RepoError>;

    /// Soft delete: flips `is_active` off. Returns whether a row changed.
    async fn deactivate_override(
        &self,
        product_id: &str,
        affiliate_id: &str,
    ) -> Result<bool, RepoError>;

    /// Hard delete, used when the intent is "revert to default". Returns
    /// whether a row existed.
    async fn delete_override(
        &self,
        product_id: &str,
        affiliate_id: &str,
    ) -> Result<bool, RepoError>;
}

#[async_trait]
pub trait LandingPagesRepo: Send + Sync {
    /// Active pages only; a deactivated page is indistinguishable from a
    /// missing one.
    async fn find_by_tracking_id(
        &self,
        tracking_id: &str,
    ) -> Result<Option<LandingPageRecord>, RepoError>;
}
