pub use self::{common::*, listing::*, review::*, user::*, voucher::*};

mod common;
mod listing;
mod review;
mod user;
mod voucher;
