use crate::client::FetchError;
use crate::export::ExportError;
use crate::form::RangeError;
use axum::http::StatusCode;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<RangeError> for AppError {
    fn from(err: RangeError) -> Self {
        Self::unprocessable(err.to_string())
    }
}

// Only the sanitized notice leaves the process; the detail is in the log.
impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        let status = match err {
            FetchError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            FetchError::ConnectionFailure(_) | FetchError::UnexpectedFailure(_) => {
                StatusCode::BAD_GATEWAY
            }
        };
        Self {
            status,
            message: err.user_notice().to_string(),
        }
    }
}

impl From<ExportError> for AppError {
    fn from(_: ExportError) -> Self {
        Self::internal("The spreadsheet could not be built.")
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
