mod booking;
mod common;
mod machine;
mod user;

pub use self::{booking::*, common::*, machine::*, user::*};
