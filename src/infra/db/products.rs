use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::application::repos::{ProductsRepo, RepoError};
use crate::domain::entities::ProductRecord;

use super::{PostgresRepositories, map_sqlx_error};

const PRODUCT_COLUMNS: &str = "id, title, description, short_description, base_price, \
     commission_rate, vat_rate, image_url, thumbnail_url, gallery_urls, is_active, \
     created_at, updated_at";

#[derive(FromRow)]
struct ProductRow {
    id: String,
    title: String,
    description: String,
    short_description: Option<String>,
    base_price: Decimal,
    commission_rate: Decimal,
    vat_rate: Option<Decimal>,
    image_url: Option<String>,
    thumbnail_url: Option<String>,
    gallery_urls: Vec<String>,
    is_active: bool,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<ProductRow> for ProductRecord {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            short_description: row.short_description,
            base_price: row.base_price,
            commission_rate: row.commission_rate,
            vat_rate: row.vat_rate,
            image_url: row.image_url,
            thumbnail_url: row.thumbnail_url,
            gallery_urls: row.gallery_urls,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl ProductsRepo for PostgresRepositories {
    async fn find_by_id(&self, id: &str) -> Result<Option<ProductRecord>, RepoError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(ProductRecord::from))
    }

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<ProductRecord>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ProductRecord::from).collect())
    }
}
