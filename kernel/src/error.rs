use std::fmt::Display;

use error_stack::{Context, Report};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelError {
    NotFound,
    InvalidArgument,
    Conflict,
    InvalidState,
    Concurrency,
    Timeout,
    Internal,
}

impl KernelError {
    /// Builds a report carrying a message that is safe to show to API clients.
    pub fn with_detail(self, detail: impl Into<String>) -> Report<KernelError> {
        Report::new(self).attach_printable(ErrorDetail::new(detail))
    }
}

impl Display for KernelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelError::NotFound => write!(f, "Requested resource was not found"),
            KernelError::InvalidArgument => write!(f, "Invalid argument"),
            KernelError::Conflict => write!(f, "Resource conflict"),
            KernelError::InvalidState => write!(f, "Operation not permitted in current state"),
            KernelError::Concurrency => write!(f, "Concurrency error"),
            KernelError::Timeout => write!(f, "Process timed out"),
            KernelError::Internal => write!(f, "Internal kernel error"),
        }
    }
}

impl Context for KernelError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetail(String);

impl ErrorDetail {
    pub fn new(detail: impl Into<String>) -> Self {
        Self(detail.into())
    }
}

impl AsRef<str> for ErrorDetail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for ErrorDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

pub trait FindDetail {
    /// Latest [`ErrorDetail`] attached to the report, if any.
    fn detail(&self) -> Option<&ErrorDetail>;
}

impl FindDetail for Report<KernelError> {
    fn detail(&self) -> Option<&ErrorDetail> {
        self.frames()
            .find_map(|frame| frame.downcast_ref::<ErrorDetail>())
    }
}
