use cinebook_core::CoreError;
use std::process::ExitCode;

#[derive(Debug)]
pub enum AppError {
    NotFoundError(String),
    ConflictError(String),
    /// Seat lost to another booking at commit time; selecting again may succeed
    RetryError(String),
    ValidationError(String),
    Anyhow(anyhow::Error),
}

impl AppError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            AppError::Anyhow(_) => ExitCode::from(1),
            AppError::ValidationError(_) => ExitCode::from(2),
            AppError::NotFoundError(_) => ExitCode::from(3),
            AppError::ConflictError(_) => ExitCode::from(4),
            AppError::RetryError(_) => ExitCode::from(75),
        }
    }

    /// Print the error for the user and return the process exit code
    pub fn report(self) -> ExitCode {
        let code = self.exit_code();
        match self {
            AppError::Anyhow(err) => {
                tracing::error!("Command failed: {:#}", err);
                eprintln!("error: {:#}", err);
            }
            AppError::RetryError(msg) => {
                eprintln!("error: {}", msg);
                eprintln!("hint: run the booking again with different seats");
            }
            AppError::NotFoundError(msg)
            | AppError::ConflictError(msg)
            | AppError::ValidationError(msg) => eprintln!("error: {}", msg),
        }
        code
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        let Some(core) = err.downcast_ref::<CoreError>() else {
            return Self::Anyhow(err);
        };

        let msg = core.to_string();
        match core {
            CoreError::NotFound { .. } => Self::NotFoundError(msg),
            CoreError::SeatConflict(_) => Self::RetryError(msg),
            CoreError::SeatUnavailable(_) | CoreError::AlreadyCancelled(_) => Self::ConflictError(msg),
            CoreError::InvalidTicketClass(_)
            | CoreError::InvalidDate(_)
            | CoreError::ValidationError(_) => Self::ValidationError(msg),
            CoreError::StorageError(_) => Self::Anyhow(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinebook_shared::BookingId;

    #[test]
    fn test_core_errors_map_to_exit_codes() {
        let err = AppError::from(CoreError::not_found("Showtime", "S9"));
        assert!(matches!(err, AppError::NotFoundError(ref m) if m == "Showtime not found: S9"));

        let err = AppError::from(CoreError::SeatConflict("A1".parse().unwrap()));
        assert!(matches!(err, AppError::RetryError(_)));
        assert_eq!(err.exit_code(), ExitCode::from(75));

        let err = AppError::from(CoreError::AlreadyCancelled(BookingId::new()));
        assert!(matches!(err, AppError::ConflictError(_)));

        let err = AppError::from(CoreError::InvalidDate("tomorrow".into()));
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn test_storage_and_foreign_errors_are_internal() {
        assert!(matches!(
            AppError::from(CoreError::StorageError("disk full".into())),
            AppError::Anyhow(_)
        ));
        assert!(matches!(
            AppError::from(anyhow::anyhow!("boom")),
            AppError::Anyhow(_)
        ));
    }
}
