use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{
    CommissionsRepo, CommissionsWriteRepo, RepoError, UpsertCommissionParams,
};
use crate::domain::entities::CommissionOverrideRecord;

use super::{PostgresRepositories, map_sqlx_error};

const OVERRIDE_COLUMNS: &str = "id, product_id, affiliate_id, commission, is_active, \
     external_sync, created_at, updated_at";

#[derive(FromRow)]
struct OverrideRow {
    id: String,
    product_id: String,
    affiliate_id: String,
    commission: Decimal,
    is_active: bool,
    external_sync: bool,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<OverrideRow> for CommissionOverrideRecord {
    fn from(row: OverrideRow) -> Self {
        Self {
            id: row.id,
            product_id: row.product_id,
            affiliate_id: row.affiliate_id,
            commission: row.commission,
            is_active: row.is_active,
            external_sync: row.external_sync,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl CommissionsRepo for PostgresRepositories {
    async fn find_active_override(
        &self,
        product_id: &str,
        affiliate_id: &str,
    ) -> Result<Option<CommissionOverrideRecord>, RepoError> {
        let row = sqlx::query_as::<_, OverrideRow>(&format!(
            "SELECT {OVERRIDE_COLUMNS} FROM affiliate_product_commissions \
             WHERE product_id = $1 AND affiliate_id = $2 AND is_active"
        ))
        .bind(product_id)
        .bind(affiliate_id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(CommissionOverrideRecord::from))
    }

    async fn find_active_overrides(
        &self,
        product_ids: &[String],
        affiliate_id: &str,
    ) -> Result<Vec<CommissionOverrideRecord>, RepoError> {
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, OverrideRow>(&format!(
            "SELECT {OVERRIDE_COLUMNS} FROM affiliate_product_commissions \
             WHERE affiliate_id = $1 AND product_id = ANY($2) AND is_active"
        ))
        .bind(affiliate_id)
        .bind(product_ids)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(CommissionOverrideRecord::from).collect())
    }
}

#[async_trait]
impl CommissionsWriteRepo for PostgresRepositories {
    async fn upsert_override(
        &self,
        params: UpsertCommissionParams,
    ) -> Result<CommissionOverrideRecord, RepoError> {
        let UpsertCommissionParams {
            product_id,
            affiliate_id,
            commission,
            is_active,
            external_sync,
        } = params;

        let row = sqlx::query_as::<_, OverrideRow>(&format!(
            "INSERT INTO affiliate_product_commissions \
                 (id, product_id, affiliate_id, commission, is_active, external_sync) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (product_id, affiliate_id) DO UPDATE SET \
                 commission = EXCLUDED.commission, \
                 is_active = EXCLUDED.is_active, \
                 external_sync = EXCLUDED.external_sync, \
                 updated_at = now() \
             RETURNING {OVERRIDE_COLUMNS}"
        ))
        .bind(Uuid::new_v4().to_string())
        .bind(product_id)
        .bind(affiliate_id)
        .bind(commission)
        .bind(is_active)
        .bind(external_sync)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(CommissionOverrideRecord::from(row))
    }

    async fn deactivate_override(
        &self,
        product_id: &str,
        affiliate_id: &str,
    ) -> Result<bool, RepoError> {
        let result = sqlx::query(
            "UPDATE affiliate_product_commissions \
             SET is_active = FALSE, updated_at = now() \
             WHERE product_id = $1 AND affiliate_id = $2 AND is_active",
        )
        .bind(product_id)
        .bind(affiliate_id)
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_override(
        &self,
        product_id: &str,
        affiliate_id: &str,
    ) -> Result<bool, RepoError> {
        let result = sqlx::query(
            "DELETE FROM affiliate_product_commissions \
             WHERE product_id = $1 AND affiliate_id = $2",
        )
        .bind(product_id)
        .bind(affiliate_id)
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}
