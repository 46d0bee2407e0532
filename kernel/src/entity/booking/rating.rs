use std::fmt::Display;

use error_stack::{Context, Report};
use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

use crate::entity::BookingStatus;
use crate::{ErrorDetail, KernelError};

pub const MIN_RATING: i16 = 1;
pub const MAX_RATING: i16 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Fromln, AsRefln)]
pub struct BookingRating(i16);

impl BookingRating {
    pub fn new(score: i16) -> Self {
        Self(score)
    }

    pub fn is_in_range(&self) -> bool {
        (MIN_RATING..=MAX_RATING).contains(&self.0)
    }
}

/// Reasons the rating gate turns a submission away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RatingRejection {
    NotCompleted(BookingStatus),
    NotOwner,
    AlreadyRated,
    OutOfRange(i16),
}

impl RatingRejection {
    pub fn into_report(self) -> Report<KernelError> {
        let context = match self {
            RatingRejection::OutOfRange(_) => KernelError::InvalidArgument,
            _ => KernelError::InvalidState,
        };
        let detail = ErrorDetail::new(self.to_string());
        Report::new(self)
            .change_context(context)
            .attach_printable(detail)
    }
}

impl Display for RatingRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RatingRejection::NotCompleted(status) => write!(
                f,
                "Can only rate completed bookings, current status is: {}",
                status.display_name()
            ),
            RatingRejection::NotOwner => write!(f, "Cannot rate other user's booking"),
            RatingRejection::AlreadyRated => write!(f, "Booking already rated"),
            RatingRejection::OutOfRange(score) => write!(
                f,
                "Rating must be between {MIN_RATING} and {MAX_RATING}, got {score}"
            ),
        }
    }
}

impl Context for RatingRejection {}
