use thiserror::Error;

/// The complete error taxonomy for the planner and driver.
///
/// Each variant maps to exactly one process exit code; see
/// [`WraptabError::exit_code`].
#[derive(Error, Debug)]
pub enum WraptabError {
    #[error("invalid argument: {0}")]
    Argument(String),

    #[error("failed to read input: {0}")]
    Input(#[from] std::io::Error),

    #[error("failed to parse delimited input: {0}")]
    Parse(#[from] csv::Error),

    #[error(
        "no width assignment fits the table in the requested budget \
         (need at least 2 columns per unset column, budget was {budget})"
    )]
    PlanningInfeasible { budget: i64 },

    #[error("line in column {column} exceeds its width of {width} and --strict was requested")]
    OverWidth { column: usize, width: usize },

    #[error("internal error: unknown layout dispatched: {0}")]
    LayoutUnknown(String),
}

pub type Result<T> = std::result::Result<T, WraptabError>;

impl WraptabError {
    /// The process exit code this error maps to.
    pub fn exit_code(&self) -> u8 {
        match self {
            WraptabError::Argument(_) => 1,
            WraptabError::Input(_) | WraptabError::Parse(_) => 2,
            WraptabError::PlanningInfeasible { .. }
            | WraptabError::OverWidth { .. }
            | WraptabError::LayoutUnknown(_) => 4,
        }
    }
}
