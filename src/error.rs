//! Unified error types for the event engine.
//!
//! A single `Error` enum that every fallible operation funnels into.
//! All variants are `Copy` so they can be returned from the scheduler
//! pass and from component callbacks without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the engine funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Fixed backing storage ran out.  Unrecoverable for the task.
    ResourceExhausted(Resource),
    /// The event queue had no room left for a posted event.
    QueueFull,
    /// Task configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ResourceExhausted(r) => write!(f, "resource exhausted: {r}"),
            Self::QueueFull => write!(f, "event queue full"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Exhaustible resources
// ---------------------------------------------------------------------------

/// Fixed-capacity storage owned by the event task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// Arena holding attached components.
    ComponentTable,
    /// List of components registered for polling.
    PollerRegistry,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ComponentTable => write!(f, "component table"),
            Self::PollerRegistry => write!(f, "poller registry"),
        }
    }
}

impl From<Resource> for Error {
    fn from(r: Resource) -> Self {
        Self::ResourceExhausted(r)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
