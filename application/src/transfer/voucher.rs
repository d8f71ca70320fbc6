use time::OffsetDateTime;
use uuid::Uuid;

use kernel::prelude::entity::{DiscountType, Voucher, VoucherScope};

#[derive(Debug, Clone)]
pub struct VoucherDto {
    pub id: Uuid,
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    pub scope: VoucherScope,
    pub valid_from: OffsetDateTime,
    pub expires_at: OffsetDateTime,
    pub usage_limit: i32,
    pub redeemed_count: i32,
    pub redeemed_by: Vec<Uuid>,
    pub claimed_by: Option<Uuid>,
    pub is_active: bool,
    pub version: i64,
}

impl From<Voucher> for VoucherDto {
    fn from(value: Voucher) -> Self {
        Self {
            id: *value.id().as_ref(),
            code: value.code().as_ref().to_string(),
            discount_type: *value.discount_type(),
            discount_value: *value.discount_value().as_ref(),
            scope: *value.scope(),
            valid_from: *value.valid_from().as_ref(),
            expires_at: *value.expires_at().as_ref(),
            usage_limit: *value.usage_limit().as_ref(),
            redeemed_count: *value.redeemed_count().as_ref(),
            redeemed_by: value.redeemed_by().iter().map(|user| *user.as_ref()).collect(),
            claimed_by: value.claimed_by().map(|user| *user.as_ref()),
            is_active: *value.is_active().as_ref(),
            version: *value.version().as_ref(),
        }
    }
}

pub struct CreateVoucherDto {
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    pub scope: VoucherScope,
    pub valid_from: OffsetDateTime,
    pub expires_at: OffsetDateTime,
    pub usage_limit: i32,
}

pub struct ClaimVoucherDto {
    pub voucher_id: Uuid,
    pub user_id: Uuid,
}

pub struct RedeemVoucherDto {
    pub voucher_id: Uuid,
    pub user_id: Uuid,
}

pub struct DeactivateVoucherDto {
    pub voucher_id: Uuid,
}

pub struct GetUserVouchersDto {
    pub user_id: Uuid,
}
