use error_stack::Report;
use sqlx::Error;

use kernel::KernelError;

/// Active slot index on bookings, see `migrations`.
pub(crate) const ACTIVE_SLOT_CONSTRAINT: &str = "bookings_active_slot";
pub(crate) const MACHINE_NUMBER_CONSTRAINT: &str = "machines_machine_number_key";

pub(crate) const SLOT_TAKEN: &str = "This time slot for this machine is already taken";
pub(crate) const NUMBER_TAKEN: &str = "Machine number already exists";

const SERIALIZATION_FAILURE: &str = "40001";
const DEADLOCK_DETECTED: &str = "40P01";

pub(crate) trait ConvertError: Sized {
    type Ok;
    fn convert_error(self) -> error_stack::Result<Self::Ok, KernelError>;
}

impl<T> ConvertError for Result<T, Error> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| {
            let (context, detail) = classify(&error);
            let report = Report::from(error).change_context(context);
            match detail {
                Some(detail) => report.attach_printable(kernel::ErrorDetail::new(detail)),
                None => report,
            }
        })
    }
}

fn classify(error: &Error) -> (KernelError, Option<&'static str>) {
    match error {
        Error::PoolTimedOut => (KernelError::Timeout, None),
        Error::Database(db) if db.is_unique_violation() => match db.constraint() {
            Some(ACTIVE_SLOT_CONSTRAINT) => (KernelError::Conflict, Some(SLOT_TAKEN)),
            Some(MACHINE_NUMBER_CONSTRAINT) => (KernelError::Conflict, Some(NUMBER_TAKEN)),
            _ => (KernelError::Conflict, Some("Resource already exists")),
        },
        Error::Database(db)
            if matches!(
                db.code().as_deref(),
                Some(SERIALIZATION_FAILURE) | Some(DEADLOCK_DETECTED)
            ) =>
        {
            (KernelError::Concurrency, None)
        }
        _ => (KernelError::Internal, None),
    }
}

#[cfg(test)]
mod test {
    use kernel::{FindDetail, KernelError};

    use super::ConvertError;

    #[test]
    fn pool_timeout_is_timeout() {
        let result: Result<(), sqlx::Error> = Err(sqlx::Error::PoolTimedOut);
        let report = result.convert_error().unwrap_err();
        assert_eq!(report.current_context(), &KernelError::Timeout);
        assert!(report.detail().is_none());
    }

    #[test]
    fn other_errors_are_internal() {
        let result: Result<(), sqlx::Error> = Err(sqlx::Error::RowNotFound);
        let report = result.convert_error().unwrap_err();
        assert_eq!(report.current_context(), &KernelError::Internal);
    }
}
