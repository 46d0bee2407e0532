use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

/// Human facing identifier printed on the machine itself. Unique across machines.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Fromln, AsRefln, Serialize, Deserialize,
)]
pub struct MachineNumber(String);

impl MachineNumber {
    pub fn new(number: impl Into<String>) -> Self {
        Self(number.into())
    }
}
