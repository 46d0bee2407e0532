use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use error_stack::Report;
use kernel::{FindDetail, KernelError};
use serde::Serialize;
use std::process::{ExitCode, Termination};

#[derive(Debug)]
pub struct StackTrace(Report<KernelError>);

impl From<Report<KernelError>> for StackTrace {
    fn from(e: Report<KernelError>) -> Self {
        StackTrace(e)
    }
}

impl Termination for StackTrace {
    fn report(self) -> ExitCode {
        self.0.report()
    }
}

#[derive(Debug)]
pub struct ErrorStatus(Report<KernelError>);

impl From<Report<KernelError>> for ErrorStatus {
    fn from(e: Report<KernelError>) -> Self {
        ErrorStatus(e)
    }
}

impl From<JsonRejection> for ErrorStatus {
    fn from(rejection: JsonRejection) -> Self {
        ErrorStatus(KernelError::InvalidArgument.with_detail(rejection.body_text()))
    }
}

impl From<QueryRejection> for ErrorStatus {
    fn from(rejection: QueryRejection) -> Self {
        ErrorStatus(KernelError::InvalidArgument.with_detail(rejection.body_text()))
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

impl ErrorStatus {
    fn status(&self) -> (StatusCode, &'static str) {
        match self.0.current_context() {
            KernelError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            KernelError::InvalidArgument => (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT"),
            KernelError::Conflict => (StatusCode::CONFLICT, "CONFLICT"),
            KernelError::InvalidState => (StatusCode::BAD_REQUEST, "INVALID_STATUS"),
            KernelError::Concurrency => (StatusCode::CONFLICT, "CONCURRENCY"),
            KernelError::Timeout => (StatusCode::REQUEST_TIMEOUT, "TIMEOUT"),
            KernelError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "SERVER_ERROR"),
        }
    }
}

impl IntoResponse for ErrorStatus {
    fn into_response(self) -> axum::response::Response {
        let (status, code) = self.status();
        let error = if status.is_server_error() {
            tracing::error!("{:?}", self.0);
            "Internal server error".to_string()
        } else {
            tracing::debug!(code, "{:?}", self.0);
            self.0
                .detail()
                .map(ToString::to_string)
                .unwrap_or_else(|| self.0.current_context().to_string())
        };
        (status, Json(ErrorBody { error, code })).into_response()
    }
}
