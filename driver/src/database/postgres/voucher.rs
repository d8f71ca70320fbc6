use error_stack::Report;
use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::VoucherQuery;
use kernel::interface::update::VoucherModifier;
use kernel::prelude::entity::{
    DiscountType, DiscountValue, ExpiresAt, IsActive, RedeemCount, Revision, UsageLimit, UserId,
    ValidFrom, Voucher, VoucherCode, VoucherId, VoucherScope,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresVoucherRepository;

#[async_trait::async_trait]
impl VoucherQuery<PostgresTransaction> for PostgresVoucherRepository {
    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &VoucherId,
    ) -> error_stack::Result<Option<Voucher>, KernelError> {
        PgVoucherInternal::find_by_id(con.connection(), id).await
    }

    async fn find_available(
        &self,
        con: &mut PostgresTransaction,
        now: &OffsetDateTime,
    ) -> error_stack::Result<Vec<Voucher>, KernelError> {
        PgVoucherInternal::find_available(con.connection(), now).await
    }

    async fn find_by_claimer(
        &self,
        con: &mut PostgresTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<Voucher>, KernelError> {
        PgVoucherInternal::find_by_claimer(con.connection(), user_id).await
    }
}

#[async_trait::async_trait]
impl VoucherModifier<PostgresTransaction> for PostgresVoucherRepository {
    async fn create(
        &self,
        con: &mut PostgresTransaction,
        voucher: &Voucher,
    ) -> error_stack::Result<(), KernelError> {
        PgVoucherInternal::create(con.connection(), voucher).await
    }

    async fn update(
        &self,
        con: &mut PostgresTransaction,
        voucher: &Voucher,
    ) -> error_stack::Result<(), KernelError> {
        PgVoucherInternal::update(con.connection(), voucher).await
    }
}

#[derive(sqlx::FromRow)]
struct VoucherRow {
    id: Uuid,
    code: String,
    discount_type: String,
    discount_value: f64,
    scope: String,
    valid_from: OffsetDateTime,
    expires_at: OffsetDateTime,
    usage_limit: i32,
    redeemed_count: i32,
    redeemed_by: Vec<Uuid>,
    claimed_by: Option<Uuid>,
    is_active: bool,
    version: i64,
}

impl TryFrom<VoucherRow> for Voucher {
    type Error = Report<KernelError>;

    fn try_from(value: VoucherRow) -> Result<Self, Self::Error> {
        let discount_type = value
            .discount_type
            .parse::<DiscountType>()
            .map_err(|error| {
                Report::new(error)
                    .attach_printable(format!("unknown discount type {}", value.discount_type))
            })?;
        let scope = value.scope.parse::<VoucherScope>().map_err(|error| {
            Report::new(error).attach_printable(format!("unknown voucher scope {}", value.scope))
        })?;
        Ok(Voucher::new(
            VoucherId::new(value.id),
            VoucherCode::new(value.code),
            discount_type,
            DiscountValue::new(value.discount_value),
            scope,
            ValidFrom::new(value.valid_from),
            ExpiresAt::new(value.expires_at),
            UsageLimit::new(value.usage_limit),
            RedeemCount::new(value.redeemed_count),
            value.redeemed_by.into_iter().map(UserId::new).collect(),
            value.claimed_by.map(UserId::new),
            IsActive::new(value.is_active),
            Revision::new(value.version),
        ))
    }
}

pub(in crate::database) struct PgVoucherInternal;

impl PgVoucherInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &VoucherId,
    ) -> error_stack::Result<Option<Voucher>, KernelError> {
        let row = sqlx::query_as::<_, VoucherRow>(
            // language=postgresql
            r#"
            SELECT id, code, discount_type, discount_value, scope, valid_from,
                   expires_at, usage_limit, redeemed_count, redeemed_by,
                   claimed_by, is_active, version
            FROM vouchers
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        row.map(Voucher::try_from).transpose()
    }

    async fn find_available(
        con: &mut PgConnection,
        now: &OffsetDateTime,
    ) -> error_stack::Result<Vec<Voucher>, KernelError> {
        let rows = sqlx::query_as::<_, VoucherRow>(
            // language=postgresql
            r#"
            SELECT id, code, discount_type, discount_value, scope, valid_from,
                   expires_at, usage_limit, redeemed_count, redeemed_by,
                   claimed_by, is_active, version
            FROM vouchers
            WHERE is_active AND claimed_by IS NULL AND expires_at > $1
            "#,
        )
        .bind(now)
        .fetch_all(con)
        .await
        .convert_error()?;
        rows.into_iter().map(Voucher::try_from).collect()
    }

    async fn find_by_claimer(
        con: &mut PgConnection,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<Voucher>, KernelError> {
        let rows = sqlx::query_as::<_, VoucherRow>(
            // language=postgresql
            r#"
            SELECT id, code, discount_type, discount_value, scope, valid_from,
                   expires_at, usage_limit, redeemed_count, redeemed_by,
                   claimed_by, is_active, version
            FROM vouchers
            WHERE claimed_by = $1
            "#,
        )
        .bind(user_id.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        rows.into_iter().map(Voucher::try_from).collect()
    }

    async fn create(
        con: &mut PgConnection,
        voucher: &Voucher,
    ) -> error_stack::Result<(), KernelError> {
        let redeemed_by = redeemer_ids(voucher);
        // language=postgresql
        sqlx::query(
            r#"
            INSERT INTO vouchers (id, code, discount_type, discount_value,
                                  scope, valid_from, expires_at, usage_limit,
                                  redeemed_count, redeemed_by, claimed_by,
                                  is_active, version)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(voucher.id().as_ref())
        .bind(voucher.code().as_ref())
        .bind(voucher.discount_type().as_str())
        .bind(voucher.discount_value().as_ref())
        .bind(voucher.scope().as_str())
        .bind(voucher.valid_from().as_ref())
        .bind(voucher.expires_at().as_ref())
        .bind(voucher.usage_limit().as_ref())
        .bind(voucher.redeemed_count().as_ref())
        .bind(redeemed_by)
        .bind(voucher.claimed_by().map(|user| *user.as_ref()))
        .bind(voucher.is_active().as_ref())
        .bind(voucher.version().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    /// Guarded by the revision read alongside the rest of the row; a missed
    /// guard means a concurrent writer advanced the document.
    async fn update(
        con: &mut PgConnection,
        voucher: &Voucher,
    ) -> error_stack::Result<(), KernelError> {
        let redeemed_by = redeemer_ids(voucher);
        let next = voucher.version().next();
        // language=postgresql
        let result = sqlx::query(
            r#"
            UPDATE vouchers
            SET code = $2, discount_type = $3, discount_value = $4,
                scope = $5, valid_from = $6, expires_at = $7,
                usage_limit = $8, redeemed_count = $9, redeemed_by = $10,
                claimed_by = $11, is_active = $12, version = $13
            WHERE id = $1 AND version = $14
            "#,
        )
        .bind(voucher.id().as_ref())
        .bind(voucher.code().as_ref())
        .bind(voucher.discount_type().as_str())
        .bind(voucher.discount_value().as_ref())
        .bind(voucher.scope().as_str())
        .bind(voucher.valid_from().as_ref())
        .bind(voucher.expires_at().as_ref())
        .bind(voucher.usage_limit().as_ref())
        .bind(voucher.redeemed_count().as_ref())
        .bind(redeemed_by)
        .bind(voucher.claimed_by().map(|user| *user.as_ref()))
        .bind(voucher.is_active().as_ref())
        .bind(*next.as_ref())
        .bind(voucher.version().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        if result.rows_affected() == 0 {
            return Err(Report::new(KernelError::Conflict)
                .attach_printable("voucher revision advanced by a concurrent writer"));
        }
        Ok(())
    }
}

fn redeemer_ids(voucher: &Voucher) -> Vec<Uuid> {
    voucher
        .redeemed_by()
        .iter()
        .map(|user| *user.as_ref())
        .collect()
}
