use async_trait::async_trait;
use serde_json::Value;
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::application::repos::{
    CreateStoreParams, RepoError, StoresRepo, StoresWriteRepo, UpdateStoreParams,
};
use crate::domain::entities::StoreRecord;

use super::{PostgresRepositories, map_sqlx_error};

const STORE_COLUMNS: &str = "id, slug, name, description, logo, banner, theme, settings, \
     is_active, created_at, updated_at";

#[derive(FromRow)]
struct StoreRow {
    id: String,
    slug: Option<String>,
    name: String,
    description: Option<String>,
    logo: Option<String>,
    banner: Option<String>,
    theme: Option<String>,
    settings: Value,
    is_active: bool,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<StoreRow> for StoreRecord {
    fn from(row: StoreRow) -> Self {
        Self {
            id: row.id,
            slug: row.slug,
            name: row.name,
            description: row.description,
            logo: row.logo,
            banner: row.banner,
            theme: row.theme,
            settings: row.settings,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl StoresRepo for PostgresRepositories {
    async fn find_by_id(&self, id: &str) -> Result<Option<StoreRecord>, RepoError> {
        let row = sqlx::query_as::<_, StoreRow>(&format!(
            "SELECT {STORE_COLUMNS} FROM stores WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(StoreRecord::from))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<StoreRecord>, RepoError> {
        let row = sqlx::query_as::<_, StoreRow>(&format!(
            "SELECT {STORE_COLUMNS} FROM stores WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(StoreRecord::from))
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, RepoError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM stores WHERE slug = $1)",
        )
        .bind(slug)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(exists)
    }
}

#[async_trait]
impl StoresWriteRepo for PostgresRepositories {
    async fn create_store(&self, params: CreateStoreParams) -> Result<StoreRecord, RepoError> {
        let CreateStoreParams {
            id,
            slug,
            name,
            description,
            theme,
            settings,
        } = params;

        let row = sqlx::query_as::<_, StoreRow>(&format!(
            "INSERT INTO stores (id, slug, name, description, theme, settings) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {STORE_COLUMNS}"
        ))
        .bind(id)
        .bind(slug)
        .bind(name)
        .bind(description)
        .bind(theme)
        .bind(settings)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(StoreRecord::from(row))
    }

    async fn update_store(&self, params: UpdateStoreParams) -> Result<StoreRecord, RepoError> {
        let UpdateStoreParams {
            id,
            name,
            description,
            logo,
            banner,
            theme,
            settings,
        } = params;

        let row = sqlx::query_as::<_, StoreRow>(&format!(
            "UPDATE stores SET \
                 name = COALESCE($2, name), \
                 description = COALESCE($3, description), \
                 logo = COALESCE($4, logo), \
                 banner = COALESCE($5, banner), \
                 theme = COALESCE($6, theme), \
                 settings = COALESCE($7, settings), \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {STORE_COLUMNS}"
        ))
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(logo)
        .bind(banner)
        .bind(theme)
        .bind(settings)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.map(StoreRecord::from).ok_or(RepoError::NotFound)
    }
}
