use derive_more::{Display, Error};

/// The ways a decision request can fail.
///
/// Every kind is a caller contract violation. The engine never retries and never
/// recovers internally; the error is surfaced to the turn manager immediately.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum EngineErrorKind {
    /// A cell index outside `[0, size²)`.
    #[display("cell index {index} is out of range for a board of {cells} cells")]
    OutOfRange {
        /// The offending index.
        index: usize,
        /// Number of cells on the board.
        cells: usize,
    },
    /// A decision or move was requested on a board that cannot accept it.
    #[display("invalid state: {_0}")]
    InvalidState(String),
    /// Board dimensions or engine configuration are not usable.
    #[display("invalid configuration: {_0}")]
    InvalidConfig(String),
}

/// Engine error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("{} at {}:{}", kind, file, line)]
pub struct EngineError {
    /// What went wrong.
    pub kind: EngineErrorKind,
    /// Line number where the error was raised.
    pub line: u32,
    /// Source file where the error was raised.
    pub file: &'static str,
}

impl EngineError {
    /// Creates a new error, recording the caller's location.
    #[track_caller]
    pub fn new(kind: EngineErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    #[track_caller]
    pub(crate) fn out_of_range(index: usize, cells: usize) -> Self {
        Self::new(EngineErrorKind::OutOfRange { index, cells })
    }

    #[track_caller]
    pub(crate) fn invalid_state(message: impl Into<String>) -> Self {
        Self::new(EngineErrorKind::InvalidState(message.into()))
    }

    #[track_caller]
    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Self::new(EngineErrorKind::InvalidConfig(message.into()))
    }
}

impl From<crate::search::BudgetExhausted> for EngineError {
    #[track_caller]
    fn from(err: crate::search::BudgetExhausted) -> Self {
        Self::invalid_state(err.to_string())
    }
}

impl From<toml::de::Error> for EngineError {
    #[track_caller]
    fn from(err: toml::de::Error) -> Self {
        Self::invalid_config(format!("failed to parse config: {}", err))
    }
}
