use error_stack::Report;

use kernel::KernelError;

pub use self::{booking::*, machine::*, rating::*, user::*};

mod booking;
mod machine;
mod rating;
mod user;

pub(crate) fn required<T>(value: Option<T>, field: &str) -> error_stack::Result<T, KernelError> {
    value.ok_or_else(|| KernelError::InvalidArgument.with_detail(format!("{field} is required")))
}

pub(crate) fn required_text(
    value: Option<String>,
    field: &str,
) -> error_stack::Result<String, KernelError> {
    let value = required(value, field)?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(KernelError::InvalidArgument.with_detail(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn not_found(entity: &str, id: impl std::fmt::Display) -> Report<KernelError> {
    KernelError::NotFound.with_detail(format!("{entity} not found with ID: {id}"))
}

#[cfg(test)]
mod test {
    use kernel::{FindDetail, KernelError};

    use super::{not_found, required, required_text};

    #[test]
    fn missing_field_is_named() {
        let report = required::<u8>(None, "machineId").unwrap_err();
        assert_eq!(report.current_context(), &KernelError::InvalidArgument);
        assert_eq!(
            report.detail().map(|detail| detail.as_ref()),
            Some("machineId is required")
        );
        assert_eq!(required(Some(3), "machineId").unwrap(), 3);
    }

    #[test]
    fn blank_text_is_missing() {
        assert!(required_text(Some("   ".into()), "name").is_err());
        assert_eq!(required_text(Some(" W-01 ".into()), "name").unwrap(), "W-01");
    }

    #[test]
    fn not_found_names_entity() {
        let report = not_found("Machine", 5);
        assert_eq!(report.current_context(), &KernelError::NotFound);
        assert_eq!(
            report.detail().map(|detail| detail.to_string()),
            Some("Machine not found with ID: 5".to_string())
        );
    }
}
