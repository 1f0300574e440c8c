//! Async request lifecycle shared by the auth and health stores.
//!
//! DESIGN
//! ======
//! Every store action moves through `Idle -> Pending -> {Succeeded, Failed}`.
//! Keeping the phase and the error in one enum means "loading" and "error"
//! can never both be set, and a new dispatch clears the previous error by
//! construction.

#[cfg(test)]
#[path = "request_test.rs"]
mod tests;

/// Lifecycle of the single tracked operation of a store.
///
/// `Op` names the operation (sign-in, fetch-metrics, ...), `E` is the error
/// payload the UI renders.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum RequestStatus<Op, E> {
    #[default]
    Idle,
    Pending(Op),
    Succeeded(Op),
    Failed { op: Op, error: E },
}

impl<Op, E> RequestStatus<Op, E> {
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    /// Error of the last resolved operation, if it failed.
    #[must_use]
    pub fn error(&self) -> Option<&E> {
        match self {
            Self::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    /// The operation this status refers to; `None` while idle.
    #[must_use]
    pub fn op(&self) -> Option<&Op> {
        match self {
            Self::Idle => None,
            Self::Pending(op) | Self::Succeeded(op) | Self::Failed { op, .. } => Some(op),
        }
    }

    /// Drop a stored error, returning to `Idle`. Other phases are untouched.
    pub fn dismiss_error(&mut self) {
        if matches!(self, Self::Failed { .. }) {
            *self = Self::Idle;
        }
    }
}
