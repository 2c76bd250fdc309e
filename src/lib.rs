//! Cooperative event engine for an embedded Modbus stack.
//!
//! The [`EventTask`](task::EventTask) multiplexes two kinds of work on a
//! single execution context: reacting to events posted through an OSAL
//! queue, and polling the components that registered for time-based
//! servicing.  Protocol components (client and server channels, RTU/TCP
//! transports) plug in through the [`Component`](component::Component)
//! trait and are addressed by checked [`ComponentId`](events::ComponentId)
//! handles.
//!
//! ```text
//!   ISR / threads ──post──▶ EventQueue ──wait──▶ EventTask ──▶ dyn Component
//!                                                   │
//!                                                   └──▶ PollerRegistry
//! ```

#![deny(unused_must_use)]

pub mod adapters;
pub mod component;
pub mod config;
pub mod error;
pub mod events;
pub mod osal;
pub mod registry;
pub mod task;

pub use component::{Component, TaskContext};
pub use config::TaskConfig;
pub use error::{Error, Resource, Result};
pub use events::{ComponentId, Event, EventId, UserId};
pub use osal::{BlockingQueue, EventPost, EventQueue, SuperloopQueue};
pub use task::{EventTask, TaskStats};
