use error_stack::Report;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{DependOnVoucherQuery, VoucherQuery};
use kernel::interface::update::{DependOnVoucherModifier, VoucherModifier};
use kernel::prelude::entity::{
    DiscountValue, ExpiresAt, IsActive, RedeemCount, Revision, UsageLimit, UserId, ValidFrom,
    Voucher, VoucherCode, VoucherId,
};
use kernel::KernelError;

use crate::service::{is_conflict, RETRY_ATTEMPTS};
use crate::transfer::{
    ClaimVoucherDto, CreateVoucherDto, DeactivateVoucherDto, GetUserVouchersDto, RedeemVoucherDto,
    VoucherDto,
};

#[async_trait::async_trait]
pub trait CreateVoucherService<Connection: Transaction + Send>:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection<Connection>
    + DependOnVoucherModifier<Connection>
{
    /// Writes a new voucher with lifecycle defaults: active, unclaimed,
    /// zero redemptions. Not safe to blindly retry on a transient failure;
    /// a second call writes a second voucher.
    async fn create_voucher(
        &self,
        dto: CreateVoucherDto,
    ) -> error_stack::Result<Uuid, KernelError> {
        if dto.discount_value < 0.0 {
            return Err(Report::new(KernelError::Validation)
                .attach_printable("discount_value must be non-negative"));
        }
        if dto.usage_limit < 0 {
            return Err(Report::new(KernelError::Validation)
                .attach_printable("usage_limit must be non-negative"));
        }
        if dto.expires_at <= dto.valid_from {
            return Err(Report::new(KernelError::Validation)
                .attach_printable("expires_at must lie after valid_from"));
        }

        let uuid = Uuid::new_v4();
        let voucher = Voucher::new(
            VoucherId::new(uuid),
            VoucherCode::new(dto.code),
            dto.discount_type,
            DiscountValue::new(dto.discount_value),
            dto.scope,
            ValidFrom::new(dto.valid_from),
            ExpiresAt::new(dto.expires_at),
            UsageLimit::new(dto.usage_limit),
            RedeemCount::new(0),
            Vec::new(),
            None,
            IsActive::new(true),
            Revision::new(0),
        );

        let mut connection = self.database_connection().transact().await?;
        self.voucher_modifier()
            .create(&mut connection, &voucher)
            .await?;
        connection.commit().await?;

        Ok(uuid)
    }
}

impl<Connection: Transaction + Send, T> CreateVoucherService<Connection> for T where
    T: DependOnDatabaseConnection<Connection> + DependOnVoucherModifier<Connection>
{
}

#[async_trait::async_trait]
pub trait GetVoucherService<Connection: Transaction + Send>:
    'static + Sync + Send + DependOnDatabaseConnection<Connection> + DependOnVoucherQuery<Connection>
{
    /// Availability snapshot: active, unexpired, unclaimed. A fresh query
    /// every call; callers must not depend on ordering.
    async fn available_vouchers(&self) -> error_stack::Result<Vec<VoucherDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let now = OffsetDateTime::now_utc();
        let vouchers = self
            .voucher_query()
            .find_available(&mut connection, &now)
            .await?;

        Ok(vouchers.into_iter().map(VoucherDto::from).collect())
    }

    /// Every voucher the user has claimed, including expired and used-up
    /// ones. Filtering those out stays with the caller, which knows the
    /// display context.
    async fn vouchers_claimed_by(
        &self,
        dto: GetUserVouchersDto,
    ) -> error_stack::Result<Vec<VoucherDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let user_id = UserId::new(dto.user_id);
        let vouchers = self
            .voucher_query()
            .find_by_claimer(&mut connection, &user_id)
            .await?;

        Ok(vouchers.into_iter().map(VoucherDto::from).collect())
    }
}

impl<Connection: Transaction + Send, T> GetVoucherService<Connection> for T where
    T: DependOnDatabaseConnection<Connection> + DependOnVoucherQuery<Connection>
{
}

#[async_trait::async_trait]
pub trait ClaimVoucherService<Connection: Transaction + Send>:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection<Connection>
    + DependOnVoucherQuery<Connection>
    + DependOnVoucherModifier<Connection>
{
    /// Reserves the voucher for exactly one user.
    ///
    /// Each attempt re-reads the voucher and writes `claimed_by` under the
    /// revision guard, so two concurrent claims can never both succeed: the
    /// loser retries, re-observes the winner and fails with
    /// [`KernelError::AlreadyClaimed`]. The error carries the current
    /// claimant; a caller retrying its own claim can compare it against its
    /// user id and treat the outcome as settled.
    async fn claim_voucher(&self, dto: ClaimVoucherDto) -> error_stack::Result<(), KernelError> {
        let voucher_id = VoucherId::new(dto.voucher_id);
        let user_id = UserId::new(dto.user_id);

        for _ in 0..RETRY_ATTEMPTS {
            let mut connection = self.database_connection().transact().await?;
            let voucher = self
                .voucher_query()
                .find_by_id(&mut connection, &voucher_id)
                .await?
                .ok_or_else(|| Report::new(KernelError::NotFound))?;

            if let Some(claimer) = voucher.claimed_by() {
                return Err(Report::new(KernelError::AlreadyClaimed {
                    claimed_by: *claimer.as_ref(),
                }));
            }

            let claimed = voucher.claim(user_id.clone());
            let written = self
                .voucher_modifier()
                .update(&mut connection, &claimed)
                .await;
            if is_conflict(&written) {
                tracing::debug!(voucher = %dto.voucher_id, "claim lost a revision race, retrying");
                connection.roll_back().await?;
                continue;
            }
            written?;

            let committed = connection.commit().await;
            if is_conflict(&committed) {
                tracing::debug!(voucher = %dto.voucher_id, "claim conflicted at commit, retrying");
                continue;
            }
            committed?;
            return Ok(());
        }

        tracing::warn!(voucher = %dto.voucher_id, "claim retry budget exhausted");
        Err(Report::new(KernelError::Transient).attach_printable("claim retry budget exhausted"))
    }
}

impl<Connection: Transaction + Send, T> ClaimVoucherService<Connection> for T where
    T: DependOnDatabaseConnection<Connection>
        + DependOnVoucherQuery<Connection>
        + DependOnVoucherModifier<Connection>
{
}

#[async_trait::async_trait]
pub trait RedeemVoucherService<Connection: Transaction + Send>:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection<Connection>
    + DependOnVoucherQuery<Connection>
    + DependOnVoucherModifier<Connection>
{
    /// Counts one application of the voucher's discount. Orthogonal to
    /// claiming: redemption never requires a prior claim.
    async fn redeem_voucher(&self, dto: RedeemVoucherDto) -> error_stack::Result<(), KernelError> {
        let voucher_id = VoucherId::new(dto.voucher_id);
        let user_id = UserId::new(dto.user_id);

        for _ in 0..RETRY_ATTEMPTS {
            let mut connection = self.database_connection().transact().await?;
            let voucher = self
                .voucher_query()
                .find_by_id(&mut connection, &voucher_id)
                .await?
                .ok_or_else(|| Report::new(KernelError::NotFound))?;

            if voucher.usage_limit().is_single_use() && voucher.redeemed_by().contains(&user_id) {
                return Err(Report::new(KernelError::AlreadyRedeemed));
            }
            if !voucher.usage_limit().is_unlimited()
                && voucher.redeemed_count().as_ref() >= voucher.usage_limit().as_ref()
            {
                return Err(Report::new(KernelError::LimitExceeded));
            }

            let redeemed = voucher.redeem(user_id.clone());
            let written = self
                .voucher_modifier()
                .update(&mut connection, &redeemed)
                .await;
            if is_conflict(&written) {
                tracing::debug!(voucher = %dto.voucher_id, "redeem lost a revision race, retrying");
                connection.roll_back().await?;
                continue;
            }
            written?;

            let committed = connection.commit().await;
            if is_conflict(&committed) {
                tracing::debug!(voucher = %dto.voucher_id, "redeem conflicted at commit, retrying");
                continue;
            }
            committed?;
            return Ok(());
        }

        tracing::warn!(voucher = %dto.voucher_id, "redeem retry budget exhausted");
        Err(Report::new(KernelError::Transient).attach_printable("redeem retry budget exhausted"))
    }
}

impl<Connection: Transaction + Send, T> RedeemVoucherService<Connection> for T where
    T: DependOnDatabaseConnection<Connection>
        + DependOnVoucherQuery<Connection>
        + DependOnVoucherModifier<Connection>
{
}

#[async_trait::async_trait]
pub trait DeactivateVoucherService<Connection: Transaction + Send>:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection<Connection>
    + DependOnVoucherQuery<Connection>
    + DependOnVoucherModifier<Connection>
{
    /// Administrative suspension, independent of expiry. Idempotent.
    async fn deactivate_voucher(
        &self,
        dto: DeactivateVoucherDto,
    ) -> error_stack::Result<(), KernelError> {
        let voucher_id = VoucherId::new(dto.voucher_id);

        for _ in 0..RETRY_ATTEMPTS {
            let mut connection = self.database_connection().transact().await?;
            let voucher = self
                .voucher_query()
                .find_by_id(&mut connection, &voucher_id)
                .await?
                .ok_or_else(|| Report::new(KernelError::NotFound))?;

            if !voucher.is_active().as_ref() {
                connection.roll_back().await?;
                return Ok(());
            }

            let deactivated = voucher.deactivate();
            let written = self
                .voucher_modifier()
                .update(&mut connection, &deactivated)
                .await;
            if is_conflict(&written) {
                connection.roll_back().await?;
                continue;
            }
            written?;

            let committed = connection.commit().await;
            if is_conflict(&committed) {
                continue;
            }
            committed?;
            return Ok(());
        }

        tracing::warn!(voucher = %dto.voucher_id, "deactivate retry budget exhausted");
        Err(Report::new(KernelError::Transient)
            .attach_printable("deactivate retry budget exhausted"))
    }
}

impl<Connection: Transaction + Send, T> DeactivateVoucherService<Connection> for T where
    T: DependOnDatabaseConnection<Connection>
        + DependOnVoucherQuery<Connection>
        + DependOnVoucherModifier<Connection>
{
}

#[cfg(test)]
mod test {
    use error_stack::Report;
    use time::{Duration, OffsetDateTime};
    use uuid::Uuid;

    use driver::database::MemoryVoucherRepository;
    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::VoucherQuery;
    use kernel::prelude::entity::{DiscountType, Voucher, VoucherId, VoucherScope};
    use kernel::KernelError;

    use crate::service::{
        ClaimVoucherService, CreateVoucherService, DeactivateVoucherService, GetVoucherService,
        RedeemVoucherService,
    };
    use crate::test_app::TestApp;
    use crate::transfer::{
        ClaimVoucherDto, CreateVoucherDto, DeactivateVoucherDto, GetUserVouchersDto,
        RedeemVoucherDto,
    };

    fn create_dto(usage_limit: i32) -> CreateVoucherDto {
        let now = OffsetDateTime::now_utc();
        CreateVoucherDto {
            code: "SPRING15".to_string(),
            discount_type: DiscountType::Percentage,
            discount_value: 15.0,
            scope: VoucherScope::AllRooms,
            valid_from: now - Duration::days(1),
            expires_at: now + Duration::days(7),
            usage_limit,
        }
    }

    async fn stored(app: &TestApp, id: Uuid) -> Voucher {
        let mut con = app.transact().await.expect("transact");
        MemoryVoucherRepository
            .find_by_id(&mut con, &VoucherId::new(id))
            .await
            .expect("query")
            .expect("voucher exists")
    }

    fn context<T: std::fmt::Debug>(result: Result<T, Report<KernelError>>) -> KernelError {
        result.expect_err("must fail").current_context().clone()
    }

    #[tokio::test]
    async fn create_rejects_invalid_input() {
        let app = TestApp::new();

        let mut dto = create_dto(0);
        dto.discount_value = -1.0;
        assert_eq!(context(app.create_voucher(dto).await), KernelError::Validation);

        let mut dto = create_dto(0);
        dto.usage_limit = -1;
        assert_eq!(context(app.create_voucher(dto).await), KernelError::Validation);

        let mut dto = create_dto(0);
        dto.expires_at = dto.valid_from;
        assert_eq!(context(app.create_voucher(dto).await), KernelError::Validation);

        let available = app.available_vouchers().await.expect("list");
        assert!(available.is_empty());
    }

    #[tokio::test]
    async fn created_voucher_starts_available() {
        let app = TestApp::new();
        let id = app.create_voucher(create_dto(0)).await.expect("create");

        let available = app.available_vouchers().await.expect("list");
        assert_eq!(available.len(), 1);
        let dto = &available[0];
        assert_eq!(dto.id, id);
        assert!(dto.is_active);
        assert_eq!(dto.claimed_by, None);
        assert_eq!(dto.redeemed_count, 0);
        assert_eq!(dto.version, 0);
    }

    #[tokio::test]
    async fn expired_voucher_is_not_listed() {
        let app = TestApp::new();
        let now = OffsetDateTime::now_utc();
        let mut dto = create_dto(0);
        dto.valid_from = now - Duration::days(7);
        dto.expires_at = now - Duration::days(1);
        app.create_voucher(dto).await.expect("create");

        let available = app.available_vouchers().await.expect("list");
        assert!(available.is_empty());
    }

    #[tokio::test]
    async fn claim_is_exclusive() {
        let app = TestApp::new();
        let voucher_id = app.create_voucher(create_dto(0)).await.expect("create");
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        app.claim_voucher(ClaimVoucherDto {
            voucher_id,
            user_id: first,
        })
        .await
        .expect("first claim");

        let available = app.available_vouchers().await.expect("list");
        assert!(available.is_empty());
        let claimed = app
            .vouchers_claimed_by(GetUserVouchersDto { user_id: first })
            .await
            .expect("claimed list");
        assert_eq!(claimed.len(), 1);
        assert_eq!(claimed[0].id, voucher_id);

        let rejected = app
            .claim_voucher(ClaimVoucherDto {
                voucher_id,
                user_id: second,
            })
            .await;
        assert_eq!(
            context(rejected),
            KernelError::AlreadyClaimed { claimed_by: first }
        );

        // A repeat claim by the holder fails the same way; the payload lets
        // the caller recognise the voucher as already theirs.
        let repeated = app
            .claim_voucher(ClaimVoucherDto {
                voucher_id,
                user_id: first,
            })
            .await;
        assert_eq!(
            context(repeated),
            KernelError::AlreadyClaimed { claimed_by: first }
        );

        let voucher = stored(&app, voucher_id).await;
        assert_eq!(voucher.version().as_ref(), &1);
    }

    #[tokio::test]
    async fn claim_unknown_voucher_is_not_found() {
        let app = TestApp::new();
        let rejected = app
            .claim_voucher(ClaimVoucherDto {
                voucher_id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
            })
            .await;
        assert_eq!(context(rejected), KernelError::NotFound);
    }

    #[tokio::test]
    async fn concurrent_claims_elect_one_winner() {
        let app = TestApp::new();
        let voucher_id = app.create_voucher(create_dto(0)).await.expect("create");

        let users: Vec<Uuid> = (0..8).map(|_| Uuid::new_v4()).collect();
        let mut handles = Vec::new();
        for user_id in users.clone() {
            let app = app.clone();
            handles.push(tokio::spawn(async move {
                let outcome = app
                    .claim_voucher(ClaimVoucherDto {
                        voucher_id,
                        user_id,
                    })
                    .await;
                (user_id, outcome)
            }));
        }

        let mut winners = Vec::new();
        for handle in handles {
            let (user_id, outcome) = handle.await.expect("task");
            match outcome {
                Ok(()) => winners.push(user_id),
                Err(report) => match report.current_context() {
                    KernelError::AlreadyClaimed { .. } => {}
                    other => panic!("unexpected loser outcome: {other}"),
                },
            }
        }
        assert_eq!(winners.len(), 1);

        let voucher = stored(&app, voucher_id).await;
        assert_eq!(
            voucher.claimed_by().map(|user| *user.as_ref()),
            Some(winners[0])
        );
        assert_eq!(voucher.version().as_ref(), &1);
    }

    #[tokio::test]
    async fn single_use_voucher_redeems_once_per_user() {
        let app = TestApp::new();
        let voucher_id = app.create_voucher(create_dto(1)).await.expect("create");
        let user_id = Uuid::new_v4();

        app.redeem_voucher(RedeemVoucherDto {
            voucher_id,
            user_id,
        })
        .await
        .expect("first redeem");

        let repeated = app
            .redeem_voucher(RedeemVoucherDto {
                voucher_id,
                user_id,
            })
            .await;
        assert_eq!(context(repeated), KernelError::AlreadyRedeemed);

        let other = app
            .redeem_voucher(RedeemVoucherDto {
                voucher_id,
                user_id: Uuid::new_v4(),
            })
            .await;
        assert_eq!(context(other), KernelError::LimitExceeded);
    }

    #[tokio::test]
    async fn redeem_stops_at_usage_limit() {
        let app = TestApp::new();
        let voucher_id = app.create_voucher(create_dto(3)).await.expect("create");

        for _ in 0..3 {
            app.redeem_voucher(RedeemVoucherDto {
                voucher_id,
                user_id: Uuid::new_v4(),
            })
            .await
            .expect("redeem within limit");
        }

        let rejected = app
            .redeem_voucher(RedeemVoucherDto {
                voucher_id,
                user_id: Uuid::new_v4(),
            })
            .await;
        assert_eq!(context(rejected), KernelError::LimitExceeded);

        let voucher = stored(&app, voucher_id).await;
        assert_eq!(voucher.redeemed_count().as_ref(), &3);
        assert_eq!(voucher.redeemed_by().len(), 3);
    }

    #[tokio::test]
    async fn unlimited_voucher_counts_repeat_redemptions() {
        let app = TestApp::new();
        let voucher_id = app.create_voucher(create_dto(0)).await.expect("create");
        let user_id = Uuid::new_v4();

        for _ in 0..2 {
            app.redeem_voucher(RedeemVoucherDto {
                voucher_id,
                user_id,
            })
            .await
            .expect("redeem");
        }

        let voucher = stored(&app, voucher_id).await;
        assert_eq!(voucher.redeemed_count().as_ref(), &2);
        // Repeat redemptions by the same user are counted but recorded once.
        assert_eq!(voucher.redeemed_by().len(), 1);
    }

    #[tokio::test]
    async fn deactivate_is_idempotent() {
        let app = TestApp::new();
        let voucher_id = app.create_voucher(create_dto(0)).await.expect("create");

        app.deactivate_voucher(DeactivateVoucherDto { voucher_id })
            .await
            .expect("deactivate");
        let available = app.available_vouchers().await.expect("list");
        assert!(available.is_empty());

        app.deactivate_voucher(DeactivateVoucherDto { voucher_id })
            .await
            .expect("repeat deactivate");
        let voucher = stored(&app, voucher_id).await;
        assert!(!voucher.is_active().as_ref());
        assert_eq!(voucher.version().as_ref(), &1);

        let missing = app
            .deactivate_voucher(DeactivateVoucherDto {
                voucher_id: Uuid::new_v4(),
            })
            .await;
        assert_eq!(context(missing), KernelError::NotFound);
    }
}
