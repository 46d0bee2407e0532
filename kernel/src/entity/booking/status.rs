use std::fmt::Display;
use std::str::FromStr;

use error_stack::{Context, Report};
use serde::{Deserialize, Serialize};

use crate::{ErrorDetail, KernelError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl BookingStatus {
    /// Statuses that still hold a claim on their machine slot.
    pub const ACTIVE: [BookingStatus; 2] = [BookingStatus::Pending, BookingStatus::InProgress];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::InProgress => "IN_PROGRESS",
            BookingStatus::Completed => "COMPLETED",
            BookingStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::InProgress => "In Progress",
            BookingStatus::Completed => "Completed",
            BookingStatus::Cancelled => "Cancelled",
        }
    }

    pub fn is_active(&self) -> bool {
        Self::ACTIVE.contains(self)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }

    pub fn approve(self) -> Result<Approval, TransitionError> {
        match self {
            BookingStatus::Pending => Ok(Approval::Started),
            BookingStatus::InProgress => Ok(Approval::AlreadyStarted),
            from => Err(TransitionError::Approve { from }),
        }
    }

    pub fn complete(self) -> Result<BookingStatus, TransitionError> {
        match self {
            BookingStatus::InProgress => Ok(BookingStatus::Completed),
            from => Err(TransitionError::Complete { from }),
        }
    }

    pub fn cancel(self) -> Result<BookingStatus, TransitionError> {
        match self {
            BookingStatus::Pending => Ok(BookingStatus::Cancelled),
            from => Err(TransitionError::Cancel { from }),
        }
    }
}

impl Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = Report<KernelError>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(BookingStatus::Pending),
            "IN_PROGRESS" => Ok(BookingStatus::InProgress),
            "COMPLETED" => Ok(BookingStatus::Completed),
            "CANCELLED" => Ok(BookingStatus::Cancelled),
            other => Err(KernelError::InvalidArgument
                .with_detail(format!("Unknown booking status: {other}"))),
        }
    }
}

/// Outcome of a successful approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Approval {
    /// PENDING moved to IN_PROGRESS; the machine must be occupied.
    Started,
    /// Already IN_PROGRESS; nothing to do.
    AlreadyStarted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    Approve { from: BookingStatus },
    Complete { from: BookingStatus },
    Cancel { from: BookingStatus },
    Reopen { from: BookingStatus },
}

impl TransitionError {
    pub fn from_status(&self) -> BookingStatus {
        match self {
            TransitionError::Approve { from }
            | TransitionError::Complete { from }
            | TransitionError::Cancel { from }
            | TransitionError::Reopen { from } => *from,
        }
    }

    pub fn into_report(self) -> Report<KernelError> {
        let detail = ErrorDetail::new(self.to_string());
        Report::new(self)
            .change_context(KernelError::InvalidState)
            .attach_printable(detail)
    }
}

impl Display for TransitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransitionError::Approve { from } => write!(
                f,
                "Booking cannot be approved, current status is: {}",
                from.display_name()
            ),
            TransitionError::Complete { from } => write!(
                f,
                "Only in-progress bookings can be completed, current status is: {}",
                from.display_name()
            ),
            TransitionError::Cancel { from } => write!(
                f,
                "Only pending bookings can be cancelled, current status is: {}",
                from.display_name()
            ),
            TransitionError::Reopen { from } => write!(
                f,
                "Booking cannot return to pending, current status is: {}",
                from.display_name()
            ),
        }
    }
}

impl Context for TransitionError {}

#[cfg(test)]
mod test {
    use super::{Approval, BookingStatus, TransitionError};

    #[test]
    fn approve_from_each_status() {
        assert_eq!(BookingStatus::Pending.approve(), Ok(Approval::Started));
        assert_eq!(
            BookingStatus::InProgress.approve(),
            Ok(Approval::AlreadyStarted)
        );
        for from in [BookingStatus::Completed, BookingStatus::Cancelled] {
            assert_eq!(from.approve(), Err(TransitionError::Approve { from }));
        }
    }

    #[test]
    fn complete_only_from_in_progress() {
        assert_eq!(
            BookingStatus::InProgress.complete(),
            Ok(BookingStatus::Completed)
        );
        for from in [
            BookingStatus::Pending,
            BookingStatus::Completed,
            BookingStatus::Cancelled,
        ] {
            assert_eq!(from.complete(), Err(TransitionError::Complete { from }));
        }
    }

    #[test]
    fn cancel_only_from_pending() {
        assert_eq!(BookingStatus::Pending.cancel(), Ok(BookingStatus::Cancelled));
        for from in [
            BookingStatus::InProgress,
            BookingStatus::Completed,
            BookingStatus::Cancelled,
        ] {
            assert_eq!(from.cancel(), Err(TransitionError::Cancel { from }));
        }
    }

    #[test]
    fn message_uses_display_name() {
        let error = BookingStatus::Completed.approve().unwrap_err();
        assert!(error.to_string().contains("current status is: Completed"));
        let error = BookingStatus::InProgress.cancel().unwrap_err();
        assert!(error.to_string().contains("In Progress"));
    }

    #[test]
    fn parse_accepts_tokens_only() {
        assert_eq!(
            "in_progress".parse::<BookingStatus>().unwrap(),
            BookingStatus::InProgress
        );
        assert!("CONFIRMED".parse::<BookingStatus>().is_err());
        assert!("In Progress".parse::<BookingStatus>().is_err());
    }
}
