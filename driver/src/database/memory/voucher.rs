use error_stack::ResultExt;
use time::OffsetDateTime;

use kernel::interface::query::VoucherQuery;
use kernel::interface::update::VoucherModifier;
use kernel::prelude::entity::{UserId, Voucher, VoucherId};
use kernel::KernelError;

use crate::database::memory::{Document, MemoryTransaction, Write};

pub(in crate::database) static VOUCHER_COLLECTION: &str = "vouchers";

pub struct MemoryVoucherRepository;

#[async_trait::async_trait]
impl VoucherQuery<MemoryTransaction> for MemoryVoucherRepository {
    async fn find_by_id(
        &self,
        con: &mut MemoryTransaction,
        id: &VoucherId,
    ) -> error_stack::Result<Option<Voucher>, KernelError> {
        con.read(VOUCHER_COLLECTION, id.as_ref())
            .map(|document| decode(&document))
            .transpose()
    }

    async fn find_available(
        &self,
        con: &mut MemoryTransaction,
        now: &OffsetDateTime,
    ) -> error_stack::Result<Vec<Voucher>, KernelError> {
        let vouchers = all(con)?;
        Ok(vouchers
            .into_iter()
            .filter(|voucher| {
                *voucher.is_active().as_ref()
                    && voucher.claimed_by().is_none()
                    && voucher.expires_at().as_ref() > now
            })
            .collect())
    }

    async fn find_by_claimer(
        &self,
        con: &mut MemoryTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<Voucher>, KernelError> {
        let vouchers = all(con)?;
        Ok(vouchers
            .into_iter()
            .filter(|voucher| voucher.claimed_by() == Some(user_id))
            .collect())
    }
}

#[async_trait::async_trait]
impl VoucherModifier<MemoryTransaction> for MemoryVoucherRepository {
    async fn create(
        &self,
        con: &mut MemoryTransaction,
        voucher: &Voucher,
    ) -> error_stack::Result<(), KernelError> {
        con.push(Write::Insert {
            collection: VOUCHER_COLLECTION,
            id: *voucher.id().as_ref(),
            document: encode(voucher)?,
        });
        Ok(())
    }

    async fn update(
        &self,
        con: &mut MemoryTransaction,
        voucher: &Voucher,
    ) -> error_stack::Result<(), KernelError> {
        let advanced = voucher.clone().advance();
        con.push(Write::Update {
            collection: VOUCHER_COLLECTION,
            id: *advanced.id().as_ref(),
            expected: *voucher.version().as_ref(),
            document: encode(&advanced)?,
        });
        Ok(())
    }
}

fn all(con: &MemoryTransaction) -> error_stack::Result<Vec<Voucher>, KernelError> {
    con.read_all(VOUCHER_COLLECTION)
        .iter()
        .map(decode)
        .collect()
}

fn encode(voucher: &Voucher) -> error_stack::Result<Document, KernelError> {
    let body = serde_json::to_value(voucher).change_context(KernelError::Internal)?;
    Ok(Document {
        version: *voucher.version().as_ref(),
        body,
    })
}

fn decode(document: &Document) -> error_stack::Result<Voucher, KernelError> {
    serde_json::from_value(document.body.clone())
        .change_context(KernelError::Internal)
        .attach_printable("malformed voucher document")
}

#[cfg(test)]
mod test {
    use error_stack::Report;
    use time::{Duration, OffsetDateTime};

    use kernel::interface::database::{DatabaseConnection, Transaction};
    use kernel::interface::query::VoucherQuery;
    use kernel::interface::update::VoucherModifier;
    use kernel::prelude::entity::{
        DiscountType, DiscountValue, ExpiresAt, IsActive, RedeemCount, Revision, UsageLimit,
        UserId, ValidFrom, Voucher, VoucherCode, VoucherId, VoucherScope,
    };
    use kernel::KernelError;

    use crate::database::memory::{MemoryDatabase, MemoryVoucherRepository};

    fn fixture(id: VoucherId) -> Voucher {
        let now = OffsetDateTime::now_utc();
        Voucher::new(
            id,
            VoucherCode::new("SPRING15"),
            DiscountType::FixedAmount,
            DiscountValue::new(15.0),
            VoucherScope::AllRooms,
            ValidFrom::new(now - Duration::days(1)),
            ExpiresAt::new(now + Duration::days(7)),
            UsageLimit::new(0),
            RedeemCount::new(0),
            Vec::new(),
            None,
            IsActive::new(true),
            Revision::new(0),
        )
    }

    #[tokio::test]
    async fn round_trip() -> Result<(), Report<KernelError>> {
        let db = MemoryDatabase::new();
        let id = VoucherId::new(uuid::Uuid::new_v4());
        let voucher = fixture(id.clone());

        let mut con = db.transact().await?;
        MemoryVoucherRepository.create(&mut con, &voucher).await?;
        con.commit().await?;

        let mut con = db.transact().await?;
        let found = MemoryVoucherRepository.find_by_id(&mut con, &id).await?;
        assert_eq!(found, Some(voucher));
        Ok(())
    }

    #[tokio::test]
    async fn buffered_writes_invisible_before_commit() -> Result<(), Report<KernelError>> {
        let db = MemoryDatabase::new();
        let id = VoucherId::new(uuid::Uuid::new_v4());
        let voucher = fixture(id.clone());

        let mut pending = db.transact().await?;
        MemoryVoucherRepository
            .create(&mut pending, &voucher)
            .await?;

        let mut con = db.transact().await?;
        let found = MemoryVoucherRepository.find_by_id(&mut con, &id).await?;
        assert_eq!(found, None);

        pending.commit().await?;
        let found = MemoryVoucherRepository.find_by_id(&mut con, &id).await?;
        assert_eq!(found, Some(voucher));
        Ok(())
    }

    #[tokio::test]
    async fn stale_revision_conflicts_at_commit() -> Result<(), Report<KernelError>> {
        let db = MemoryDatabase::new();
        let id = VoucherId::new(uuid::Uuid::new_v4());
        let voucher = fixture(id.clone());

        let mut con = db.transact().await?;
        MemoryVoucherRepository.create(&mut con, &voucher).await?;
        con.commit().await?;

        let user_a = UserId::new(uuid::Uuid::new_v4());
        let user_b = UserId::new(uuid::Uuid::new_v4());

        let mut first = db.transact().await?;
        let mut second = db.transact().await?;
        let seen_by_first = MemoryVoucherRepository
            .find_by_id(&mut first, &id)
            .await?
            .ok_or_else(|| Report::new(KernelError::NotFound))?;
        let seen_by_second = MemoryVoucherRepository
            .find_by_id(&mut second, &id)
            .await?
            .ok_or_else(|| Report::new(KernelError::NotFound))?;

        MemoryVoucherRepository
            .update(&mut first, &seen_by_first.claim(user_a.clone()))
            .await?;
        MemoryVoucherRepository
            .update(&mut second, &seen_by_second.claim(user_b))
            .await?;

        first.commit().await?;
        let lost = second.commit().await;
        match lost {
            Err(report) => assert_eq!(report.current_context(), &KernelError::Conflict),
            Ok(()) => panic!("second commit must conflict"),
        }

        let mut con = db.transact().await?;
        let found = MemoryVoucherRepository
            .find_by_id(&mut con, &id)
            .await?
            .ok_or_else(|| Report::new(KernelError::NotFound))?;
        assert_eq!(found.claimed_by(), Some(&user_a));
        assert_eq!(found.version().as_ref(), &1);
        Ok(())
    }
}
