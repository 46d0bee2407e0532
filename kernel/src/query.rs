mod booking;
mod machine;
mod user;

pub use self::{booking::*, machine::*, user::*};
