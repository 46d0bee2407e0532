use std::fmt::Display;
use std::str::FromStr;

use destructure::Destructure;
use error_stack::Report;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use vodca::References;

use crate::entity::{BookingId, UserId};
use crate::KernelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MachineStatus {
    Available,
    InUse,
    Maintenance,
    OutOfService,
}

impl MachineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MachineStatus::Available => "AVAILABLE",
            MachineStatus::InUse => "IN_USE",
            MachineStatus::Maintenance => "MAINTENANCE",
            MachineStatus::OutOfService => "OUT_OF_SERVICE",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MachineStatus::Available => "Available",
            MachineStatus::InUse => "In Use",
            MachineStatus::Maintenance => "Maintenance",
            MachineStatus::OutOfService => "Out of Service",
        }
    }
}

impl Display for MachineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MachineStatus {
    type Err = Report<KernelError>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AVAILABLE" => Ok(MachineStatus::Available),
            "IN_USE" => Ok(MachineStatus::InUse),
            "MAINTENANCE" => Ok(MachineStatus::Maintenance),
            "OUT_OF_SERVICE" => Ok(MachineStatus::OutOfService),
            other => Err(KernelError::InvalidArgument
                .with_detail(format!("Unknown machine status: {other}"))),
        }
    }
}

/// Who holds a machine right now and since when.
#[derive(Debug, Clone, PartialEq, Eq, References, Destructure)]
pub struct Occupancy {
    user_id: UserId,
    booking_id: BookingId,
    started_at: OffsetDateTime,
}

impl Occupancy {
    pub fn new(user_id: UserId, booking_id: BookingId, started_at: OffsetDateTime) -> Self {
        Self {
            user_id,
            booking_id,
            started_at,
        }
    }
}

/// Occupancy state of a machine. The occupant only exists while in use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MachineState {
    Available,
    InUse(Occupancy),
    Maintenance,
    OutOfService,
}

impl MachineState {
    pub fn status(&self) -> MachineStatus {
        match self {
            MachineState::Available => MachineStatus::Available,
            MachineState::InUse(_) => MachineStatus::InUse,
            MachineState::Maintenance => MachineStatus::Maintenance,
            MachineState::OutOfService => MachineStatus::OutOfService,
        }
    }

    pub fn occupancy(&self) -> Option<&Occupancy> {
        match self {
            MachineState::InUse(occupancy) => Some(occupancy),
            _ => None,
        }
    }

    /// Rebuilds the state from its stored columns, rejecting rows that break the
    /// "occupant iff in use" rule.
    pub fn restore(
        status: MachineStatus,
        occupancy: Option<Occupancy>,
    ) -> error_stack::Result<Self, KernelError> {
        match (status, occupancy) {
            (MachineStatus::InUse, Some(occupancy)) => Ok(MachineState::InUse(occupancy)),
            (MachineStatus::Available, None) => Ok(MachineState::Available),
            (MachineStatus::Maintenance, None) => Ok(MachineState::Maintenance),
            (MachineStatus::OutOfService, None) => Ok(MachineState::OutOfService),
            (status, occupancy) => Err(Report::new(KernelError::Internal).attach_printable(
                format!(
                    "inconsistent machine state: status {status} with occupant present = {}",
                    occupancy.is_some()
                ),
            )),
        }
    }
}

#[cfg(test)]
mod test {
    use time::macros::datetime;
    use uuid::Uuid;

    use crate::entity::{BookingId, MachineState, MachineStatus, Occupancy, UserId};

    #[test]
    fn restore_requires_occupant_iff_in_use() {
        let occupancy = Occupancy::new(
            UserId::new(Uuid::new_v4()),
            BookingId::new(Uuid::new_v4()),
            datetime!(2024-01-01 10:00 UTC),
        );
        assert!(MachineState::restore(MachineStatus::InUse, Some(occupancy.clone())).is_ok());
        assert!(MachineState::restore(MachineStatus::InUse, None).is_err());
        assert!(MachineState::restore(MachineStatus::Available, Some(occupancy)).is_err());
        assert_eq!(
            MachineState::restore(MachineStatus::Maintenance, None).unwrap(),
            MachineState::Maintenance
        );
    }

    #[test]
    fn parse_status() {
        assert_eq!(
            "out_of_service".parse::<MachineStatus>().unwrap(),
            MachineStatus::OutOfService
        );
        assert!("BROKEN".parse::<MachineStatus>().is_err());
    }
}
