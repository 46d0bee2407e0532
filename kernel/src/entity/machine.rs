mod id;
mod ledger;
mod number;
mod profile;
mod state;

pub use self::{id::*, ledger::*, number::*, profile::*, state::*};
use destructure::{Destructure, Mutation};
use time::OffsetDateTime;
use vodca::References;

use crate::entity::{BookingId, UserId};

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure, Mutation)]
pub struct Machine {
    id: MachineId,
    number: MachineNumber,
    kind: Option<MachineKind>,
    location: Option<MachineLocation>,
    state: MachineState,
}

impl Machine {
    pub fn new(
        id: MachineId,
        number: MachineNumber,
        kind: Option<MachineKind>,
        location: Option<MachineLocation>,
        state: MachineState,
    ) -> Self {
        Self {
            id,
            number,
            kind,
            location,
            state,
        }
    }

    pub fn status(&self) -> MachineStatus {
        self.state.status()
    }

    pub fn occupancy(&self) -> Option<&Occupancy> {
        self.state.occupancy()
    }

    /// Hands the machine to `user_id` on behalf of `booking_id`.
    ///
    /// Only an [`MachineStatus::Available`] machine can be occupied; machines under
    /// maintenance, out of service or already held by another booking are refused.
    pub fn occupy(
        &mut self,
        user_id: UserId,
        booking_id: BookingId,
        now: OffsetDateTime,
    ) -> Result<(), LedgerError> {
        match self.state {
            MachineState::Available => {
                let occupancy = Occupancy::new(user_id, booking_id, now);
                self.substitute(|machine| *machine.state = MachineState::InUse(occupancy));
                Ok(())
            }
            ref other => Err(LedgerError::NotAvailable {
                number: self.number.clone(),
                status: other.status(),
            }),
        }
    }

    /// Frees the machine if, and only if, its occupancy belongs to `booking_id`.
    ///
    /// Returns whether the machine state changed.
    pub fn release(&mut self, booking_id: &BookingId) -> bool {
        let held = self
            .occupancy()
            .is_some_and(|occupancy| occupancy.booking_id() == booking_id);
        if held {
            self.substitute(|machine| *machine.state = MachineState::Available);
        }
        held
    }

    /// Manager override. Any occupancy is dropped without touching the booking side.
    pub fn set_status(&mut self, status: MachineStatus) -> Result<(), LedgerError> {
        let state = match status {
            MachineStatus::Available => MachineState::Available,
            MachineStatus::Maintenance => MachineState::Maintenance,
            MachineStatus::OutOfService => MachineState::OutOfService,
            MachineStatus::InUse => return Err(LedgerError::OccupantRequired),
        };
        self.substitute(|machine| *machine.state = state);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use time::macros::datetime;
    use uuid::Uuid;

    use crate::entity::{
        BookingId, LedgerError, Machine, MachineId, MachineNumber, MachineState, MachineStatus,
        UserId,
    };

    fn machine(state: MachineState) -> Machine {
        Machine::new(
            MachineId::new(Uuid::new_v4()),
            MachineNumber::new("W-05"),
            None,
            None,
            state,
        )
    }

    #[test]
    fn occupy_available_machine() {
        let mut machine = machine(MachineState::Available);
        let user = UserId::new(Uuid::new_v4());
        let booking = BookingId::new(Uuid::new_v4());
        let now = datetime!(2024-01-01 10:00 UTC);

        machine.occupy(user.clone(), booking.clone(), now).unwrap();

        assert_eq!(machine.status(), MachineStatus::InUse);
        let occupancy = machine.occupancy().unwrap();
        assert_eq!(occupancy.user_id(), &user);
        assert_eq!(occupancy.booking_id(), &booking);
        assert_eq!(occupancy.started_at(), &now);
    }

    #[test]
    fn occupy_rejects_unavailable_machines() {
        for state in [MachineState::Maintenance, MachineState::OutOfService] {
            let mut machine = machine(state);
            let before = machine.clone();
            let result = machine.occupy(
                UserId::new(Uuid::new_v4()),
                BookingId::new(Uuid::new_v4()),
                datetime!(2024-01-01 10:00 UTC),
            );
            assert!(matches!(result, Err(LedgerError::NotAvailable { .. })));
            assert_eq!(machine, before);
        }

        let mut machine = machine(MachineState::Available);
        let now = datetime!(2024-01-01 10:00 UTC);
        machine
            .occupy(UserId::new(Uuid::new_v4()), BookingId::new(Uuid::new_v4()), now)
            .unwrap();
        let result = machine.occupy(
            UserId::new(Uuid::new_v4()),
            BookingId::new(Uuid::new_v4()),
            now,
        );
        assert!(matches!(
            result,
            Err(LedgerError::NotAvailable {
                status: MachineStatus::InUse,
                ..
            })
        ));
    }

    #[test]
    fn release_only_for_holding_booking() {
        let mut machine = machine(MachineState::Available);
        let booking = BookingId::new(Uuid::new_v4());
        machine
            .occupy(
                UserId::new(Uuid::new_v4()),
                booking.clone(),
                datetime!(2024-01-01 10:00 UTC),
            )
            .unwrap();

        assert!(!machine.release(&BookingId::new(Uuid::new_v4())));
        assert_eq!(machine.status(), MachineStatus::InUse);

        assert!(machine.release(&booking));
        assert_eq!(machine.status(), MachineStatus::Available);
        assert!(machine.occupancy().is_none());
    }

    #[test]
    fn manager_override_clears_occupancy() {
        let mut machine = machine(MachineState::Available);
        machine
            .occupy(
                UserId::new(Uuid::new_v4()),
                BookingId::new(Uuid::new_v4()),
                datetime!(2024-01-01 10:00 UTC),
            )
            .unwrap();

        machine.set_status(MachineStatus::Maintenance).unwrap();
        assert_eq!(machine.status(), MachineStatus::Maintenance);
        assert!(machine.occupancy().is_none());

        let result = machine.set_status(MachineStatus::InUse);
        assert!(matches!(result, Err(LedgerError::OccupantRequired)));
        assert_eq!(machine.status(), MachineStatus::Maintenance);
    }
}
