use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct MachineKind(String);

impl MachineKind {
    pub fn new(kind: impl Into<String>) -> Self {
        Self(kind.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct MachineLocation(String);

impl MachineLocation {
    pub fn new(location: impl Into<String>) -> Self {
        Self(location.into())
    }
}
