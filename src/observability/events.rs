//! Observable events for modelguard
//!
//! Events are explicit and typed.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Startup
    /// Configuration loaded
    ConfigLoaded,
    /// Model file loaded
    ModelLoaded,

    // Installation
    /// Validation entry points installed on a type
    HooksInstalled,
    /// Type has no managed fields, nothing installed
    HooksSkipped,
    /// An entry point could not be registered
    EntryRegistrationFailed,

    // Validation
    /// A hook reported pass but also produced an error
    HookContractViolation,
    /// A hook reported failure without an error
    HookFailedWithoutError,
    /// Validation of an object failed
    ValidationFailed,

    // Store
    /// Object inserted into a context
    ObjectInserted,
    /// Fetch rejected by the store
    FetchFailed,
    /// Commit rejected by validation
    CommitRejected,
    /// Commit applied
    CommitApplied,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ModelLoaded => "MODEL_LOADED",

            Event::HooksInstalled => "HOOKS_INSTALLED",
            Event::HooksSkipped => "HOOKS_SKIPPED",
            Event::EntryRegistrationFailed => "ENTRY_REGISTRATION_FAILED",

            Event::HookContractViolation => "HOOK_CONTRACT_VIOLATION",
            Event::HookFailedWithoutError => "HOOK_FAILED_WITHOUT_ERROR",
            Event::ValidationFailed => "VALIDATION_FAILED",

            Event::ObjectInserted => "OBJECT_INSERTED",
            Event::FetchFailed => "FETCH_FAILED",
            Event::CommitRejected => "COMMIT_REJECTED",
            Event::CommitApplied => "COMMIT_APPLIED",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
