//! OSAL ports — the boundary between the event task and the event queue.
//!
//! ```text
//!   Producers ──▶ EventPost ──▶ queue ──▶ EventQueue::wait ──▶ EventTask
//! ```
//!
//! Two backends ship with the crate:
//!
//! - [`SuperloopQueue`] never blocks.  `wait` returns immediately whether
//!   or not an event is pending, so a bare-metal main loop keeps spinning.
//! - [`BlockingQueue`] suspends the calling thread until an event arrives
//!   or the timeout elapses, the way an RTOS queue receive would.
//!
//! Both are `Sync` and can live in a `static`, so ISRs and other threads
//! post into the same queue the task drains.

pub mod blocking;
pub mod superloop;

pub use blocking::BlockingQueue;
pub use superloop::SuperloopQueue;

use core::time::Duration;

use crate::error::Result;
use crate::events::Event;

/// Default queue depth: one slot per built-in event id for four ports.
pub const DEFAULT_QUEUE_DEPTH: usize = 16;

// ───────────────────────────────────────────────────────────────
// Post port (producers → queue)
// ───────────────────────────────────────────────────────────────

/// Write side of the event queue.  Object safe so components can post
/// through a `&dyn EventPost` without knowing the backend.
pub trait EventPost {
    /// Append `event` to the queue.
    ///
    /// `from_isr` marks calls made from interrupt context.  Backends that
    /// need a different code path for ISRs branch on it; the host
    /// backends accept it and carry on.
    ///
    /// Returns [`Error::QueueFull`](crate::error::Error::QueueFull) when
    /// the event could not be stored.
    fn post(&self, event: Event, from_isr: bool) -> Result<()>;
}

// ───────────────────────────────────────────────────────────────
// Wait port (queue → event task)
// ───────────────────────────────────────────────────────────────

/// Read side of the event queue, consumed only by the event task.
pub trait EventQueue: EventPost {
    /// Take the oldest pending event.
    ///
    /// A blocking backend waits at most `timeout`; a zero timeout always
    /// returns immediately.  Non-blocking backends ignore `timeout`.
    fn wait(&self, timeout: Duration) -> Option<Event>;
}
