use async_trait::async_trait;
use serde_json::Value;
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::application::repos::{LandingPagesRepo, RepoError};
use crate::domain::entities::LandingPageRecord;

use super::{PostgresRepositories, map_sqlx_error};

#[derive(FromRow)]
struct LandingPageRow {
    id: String,
    tracking_id: String,
    product_id: String,
    affiliate_id: Option<String>,
    mercacio_user_id: Option<String>,
    template: String,
    settings: Value,
    custom_data: Value,
    locale: String,
    is_active: bool,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<LandingPageRow> for LandingPageRecord {
    fn from(row: LandingPageRow) -> Self {
        Self {
            id: row.id,
            tracking_id: row.tracking_id,
            product_id: row.product_id,
            affiliate_id: row.affiliate_id,
            mercacio_user_id: row.mercacio_user_id,
            template: row.template,
            settings: row.settings,
            custom_data: row.custom_data,
            locale: row.locale,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl LandingPagesRepo for PostgresRepositories {
    async fn find_by_tracking_id(
        &self,
        tracking_id: &str,
    ) -> Result<Option<LandingPageRecord>, RepoError> {
        let row = sqlx::query_as::<_, LandingPageRow>(
            "SELECT id, tracking_id, product_id, affiliate_id, mercacio_user_id, template, \
                    settings, custom_data, locale, is_active, created_at, updated_at \
             FROM landing_pages \
             WHERE tracking_id = $1 AND is_active",
        )
        .bind(tracking_id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(LandingPageRecord::from))
    }
}
