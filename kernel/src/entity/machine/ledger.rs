use std::fmt::Display;

use error_stack::{Context, Report};

use crate::entity::{MachineNumber, MachineStatus};
use crate::{ErrorDetail, KernelError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    NotAvailable {
        number: MachineNumber,
        status: MachineStatus,
    },
    OccupantRequired,
}

impl LedgerError {
    pub fn into_report(self) -> Report<KernelError> {
        let context = match self {
            LedgerError::NotAvailable { .. } => KernelError::InvalidState,
            LedgerError::OccupantRequired => KernelError::InvalidArgument,
        };
        let detail = ErrorDetail::new(self.to_string());
        Report::new(self)
            .change_context(context)
            .attach_printable(detail)
    }
}

impl Display for LedgerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerError::NotAvailable { number, status } => write!(
                f,
                "Machine {} is not available, current status is: {}",
                number.as_ref(),
                status.display_name()
            ),
            LedgerError::OccupantRequired => write!(
                f,
                "A machine can only be put in use by approving a booking"
            ),
        }
    }
}

impl Context for LedgerError {}
