use thiserror::Error;

/// Failures surfaced by the loss engine.
///
/// Nothing is computed once one of these is returned; callers never see a
/// partial result.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// A raw input violates its range constraint, e.g. a negative landfall rate
    /// or a negative strategy id.
    #[error("Expect {field}{bound}, got {value}")]
    InvalidParameter {
        field: &'static str,
        bound: &'static str,
        value: f64,
    },

    /// Non-negative strategy id with no registered implementation.
    #[error("strategy_id={0} is not implemented")]
    UnknownStrategy(i64),

    #[error("worker pool error: {0}")]
    WorkerPool(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SimulationError {
    /// A field that must be strictly positive (and finite).
    pub fn not_positive(field: &'static str, value: f64) -> Self {
        Self::InvalidParameter { field, bound: ">0", value }
    }

    /// Name of the offending input, if this is a validation failure.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidParameter { field, .. } => Some(field),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SimulationError>;
