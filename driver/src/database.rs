pub use self::{memory::*, postgres::*};

mod memory;
mod postgres;
