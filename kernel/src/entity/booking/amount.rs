use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Fromln, AsRefln)]
pub struct BookingAmount(f64);

impl BookingAmount {
    pub fn new(amount: impl Into<f64>) -> Self {
        Self(amount.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Fromln, AsRefln)]
pub struct ServiceName(String);

impl ServiceName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}
