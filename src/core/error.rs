use thiserror::Error;

/// Longest month-by-month series any calculator will build.
pub const MAX_PROJECTION_MONTHS: u32 = 12_000;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },
    #[error("savings goal is unreachable: inflation outpaces interest faster than monthly savings accrue")]
    GoalUnreachable,
    #[error("projection needs {months} months, more than the supported {limit}")]
    HorizonTooLong { months: u64, limit: u32 },
}

impl CalcError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

/// Rejects a series length above [`MAX_PROJECTION_MONTHS`] before anything is allocated.
pub(crate) fn ensure_horizon(months: u64) -> Result<u32, CalcError> {
    match u32::try_from(months) {
        Ok(months) if months <= MAX_PROJECTION_MONTHS => Ok(months),
        _ => Err(CalcError::HorizonTooLong {
            months,
            limit: MAX_PROJECTION_MONTHS,
        }),
    }
}
