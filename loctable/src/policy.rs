//! Strict/lenient handling of structural parse and verification failures.

use crate::error::Error;

/// Decides what happens when a loader or the verifier hits a structural failure.
///
/// In strict mode the first failure aborts the run and is returned to the caller.
/// In lenient mode the failure is logged and processing continues, skipping the
/// offending line (parsers) or merely flagging the key (verifier).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ErrorPolicy {
    /// Abort on the first failure instead of logging it.
    pub strict: bool,
}

impl ErrorPolicy {
    /// Creates a lenient policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a policy that aborts on the first failure.
    pub fn strict() -> Self {
        Self { strict: true }
    }

    /// Enables/disables strict mode.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Single decision point for every parse/verify failure.
    pub fn report(&self, error: Error) -> Result<(), Error> {
        if self.strict {
            return Err(error);
        }
        tracing::error!("{}", error);
        Ok(())
    }
}
