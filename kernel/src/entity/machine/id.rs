use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct MachineId(Uuid);

impl MachineId {
    pub fn new(id: impl Into<Uuid>) -> Self {
        Self(id.into())
    }
}
