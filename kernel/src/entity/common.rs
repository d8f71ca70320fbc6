pub use self::{flag::*, revision::*, time::*};

mod flag;
mod revision;
mod time;
