mod code;
mod discount;
mod id;
mod scope;
mod usage;
mod window;

pub use self::{code::*, discount::*, id::*, scope::*, usage::*, window::*};
use serde::{Deserialize, Serialize};

use crate::entity::common::{IsActive, Revision};
use crate::entity::user::UserId;

/// A discount code document.
///
/// Claiming (`claimed_by`) and redeeming (`redeemed_by`/`usage_limit`) are
/// orthogonal mechanisms: claiming reserves the document for one user,
/// redeeming counts applications of the discount. Vouchers are never
/// hard-deleted; expiry is time based and suspension is `is_active`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voucher {
    id: VoucherId,
    code: VoucherCode,
    discount_type: DiscountType,
    discount_value: DiscountValue,
    scope: VoucherScope,
    valid_from: ValidFrom,
    expires_at: ExpiresAt,
    usage_limit: UsageLimit,
    redeemed_count: RedeemCount,
    redeemed_by: Vec<UserId>,
    claimed_by: Option<UserId>,
    is_active: IsActive<Voucher>,
    version: Revision<Voucher>,
}

impl Voucher {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: VoucherId,
        code: VoucherCode,
        discount_type: DiscountType,
        discount_value: DiscountValue,
        scope: VoucherScope,
        valid_from: ValidFrom,
        expires_at: ExpiresAt,
        usage_limit: UsageLimit,
        redeemed_count: RedeemCount,
        redeemed_by: Vec<UserId>,
        claimed_by: Option<UserId>,
        is_active: IsActive<Voucher>,
        version: Revision<Voucher>,
    ) -> Self {
        Self {
            id,
            code,
            discount_type,
            discount_value,
            scope,
            valid_from,
            expires_at,
            usage_limit,
            redeemed_count,
            redeemed_by,
            claimed_by,
            is_active,
            version,
        }
    }

    pub fn id(&self) -> &VoucherId {
        &self.id
    }

    pub fn code(&self) -> &VoucherCode {
        &self.code
    }

    pub fn discount_type(&self) -> &DiscountType {
        &self.discount_type
    }

    pub fn discount_value(&self) -> &DiscountValue {
        &self.discount_value
    }

    pub fn scope(&self) -> &VoucherScope {
        &self.scope
    }

    pub fn valid_from(&self) -> &ValidFrom {
        &self.valid_from
    }

    pub fn expires_at(&self) -> &ExpiresAt {
        &self.expires_at
    }

    pub fn usage_limit(&self) -> &UsageLimit {
        &self.usage_limit
    }

    pub fn redeemed_count(&self) -> &RedeemCount {
        &self.redeemed_count
    }

    pub fn redeemed_by(&self) -> &[UserId] {
        &self.redeemed_by
    }

    pub fn claimed_by(&self) -> Option<&UserId> {
        self.claimed_by.as_ref()
    }

    pub fn is_active(&self) -> &IsActive<Voucher> {
        &self.is_active
    }

    pub fn version(&self) -> &Revision<Voucher> {
        &self.version
    }

    /// Reserves the voucher for `user_id`. Callers must have verified that
    /// `claimed_by` is unset under the same transaction.
    pub fn claim(self, user_id: UserId) -> Self {
        Self {
            claimed_by: Some(user_id),
            ..self
        }
    }

    /// Records one redemption. `redeemed_by` keeps set semantics: a repeat
    /// redeemer is counted but not listed twice.
    pub fn redeem(self, user_id: UserId) -> Self {
        let mut redeemed_by = self.redeemed_by;
        if !redeemed_by.contains(&user_id) {
            redeemed_by.push(user_id);
        }
        Self {
            redeemed_count: self.redeemed_count.next(),
            redeemed_by,
            ..self
        }
    }

    pub fn deactivate(self) -> Self {
        Self {
            is_active: IsActive::new(false),
            ..self
        }
    }

    /// The document as it will be stored after a guarded write.
    pub fn advance(self) -> Self {
        Self {
            version: self.version.next(),
            ..self
        }
    }
}
