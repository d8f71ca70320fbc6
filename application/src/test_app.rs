use driver::database::{
    MemoryDatabase, MemoryListingRepository, MemoryReviewRepository, MemoryTransaction,
    MemoryVoucherRepository,
};
use kernel::interface::database::DatabaseConnection;
use kernel::interface::query::{DependOnListingQuery, DependOnReviewQuery, DependOnVoucherQuery};
use kernel::interface::update::{
    DependOnListingModifier, DependOnReviewModifier, DependOnVoucherModifier,
};
use kernel::KernelError;

/// Service test harness wired to the in-memory backend. Cloning shares the
/// store, so one scenario can drive several concurrent service calls
/// against the same data.
#[derive(Clone, Default)]
pub struct TestApp {
    database: MemoryDatabase,
}

impl TestApp {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl DatabaseConnection<MemoryTransaction> for TestApp {
    async fn transact(&self) -> error_stack::Result<MemoryTransaction, KernelError> {
        self.database.transact().await
    }
}

impl DependOnVoucherQuery<MemoryTransaction> for TestApp {
    type VoucherQuery = MemoryVoucherRepository;
    fn voucher_query(&self) -> &Self::VoucherQuery {
        &MemoryVoucherRepository
    }
}

impl DependOnVoucherModifier<MemoryTransaction> for TestApp {
    type VoucherModifier = MemoryVoucherRepository;
    fn voucher_modifier(&self) -> &Self::VoucherModifier {
        &MemoryVoucherRepository
    }
}

impl DependOnListingQuery<MemoryTransaction> for TestApp {
    type ListingQuery = MemoryListingRepository;
    fn listing_query(&self) -> &Self::ListingQuery {
        &MemoryListingRepository
    }
}

impl DependOnListingModifier<MemoryTransaction> for TestApp {
    type ListingModifier = MemoryListingRepository;
    fn listing_modifier(&self) -> &Self::ListingModifier {
        &MemoryListingRepository
    }
}

impl DependOnReviewQuery<MemoryTransaction> for TestApp {
    type ReviewQuery = MemoryReviewRepository;
    fn review_query(&self) -> &Self::ReviewQuery {
        &MemoryReviewRepository
    }
}

impl DependOnReviewModifier<MemoryTransaction> for TestApp {
    type ReviewModifier = MemoryReviewRepository;
    fn review_modifier(&self) -> &Self::ReviewModifier {
        &MemoryReviewRepository
    }
}
