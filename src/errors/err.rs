use crate::collector::Phase;
use std::error::Error;
use std::fmt;
use std::fmt::Formatter;

/// every way a command against the simulated heap can be rejected.
/// commands are validate-then-commit: a returned error means no mutation
/// happened at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeapError {
    /// overlapping, out-of-bounds or shape-violating object layout
    MalformedLayout(String),
    /// an insertion that does not fit the free address space
    InsufficientSpace(String),
    /// an operation invoked outside the phase that accepts it
    InvalidPhase { required: Phase, actual: Phase },
    /// undo against an empty history stack
    NoHistory,
}

impl HeapError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        HeapError::MalformedLayout(msg.into())
    }

    pub(crate) fn no_space(msg: impl Into<String>) -> Self {
        HeapError::InsufficientSpace(msg.into())
    }

    pub(crate) fn wrong_phase(required: Phase, actual: Phase) -> Self {
        HeapError::InvalidPhase { required, actual }
    }
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            HeapError::MalformedLayout(msg) => write!(f, "MalformedLayoutError - {msg}"),
            HeapError::InsufficientSpace(msg) => write!(f, "InsufficientSpaceError - {msg}"),
            HeapError::InvalidPhase { required, actual } => write!(
                f,
                "InvalidPhaseError - requires the {required} phase, but the collector is {actual}"
            ),
            HeapError::NoHistory => write!(f, "NoHistoryError - nothing to undo"),
        }
    }
}

impl Error for HeapError {}
