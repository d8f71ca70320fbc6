use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::KernelError;

/// Which bookings the discount may apply to. Consumed by the booking flow,
/// not enforced by the ledger.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoucherScope {
    AllHomestays,
    AllRooms,
    SpecificHomestay,
    SpecificRoom,
    Category,
    NewUsers,
    ReturningUsers,
}

impl VoucherScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoucherScope::AllHomestays => "all_homestays",
            VoucherScope::AllRooms => "all_rooms",
            VoucherScope::SpecificHomestay => "specific_homestay",
            VoucherScope::SpecificRoom => "specific_room",
            VoucherScope::Category => "category",
            VoucherScope::NewUsers => "new_users",
            VoucherScope::ReturningUsers => "returning_users",
        }
    }
}

impl FromStr for VoucherScope {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all_homestays" => Ok(VoucherScope::AllHomestays),
            "all_rooms" => Ok(VoucherScope::AllRooms),
            "specific_homestay" => Ok(VoucherScope::SpecificHomestay),
            "specific_room" => Ok(VoucherScope::SpecificRoom),
            "category" => Ok(VoucherScope::Category),
            "new_users" => Ok(VoucherScope::NewUsers),
            "returning_users" => Ok(VoucherScope::ReturningUsers),
            _ => Err(KernelError::Internal),
        }
    }
}
