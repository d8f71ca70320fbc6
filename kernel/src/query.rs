pub use self::{listing::*, review::*, voucher::*};

mod listing;
mod review;
mod voucher;
