//! Event model shared by the event task, the OSAL queues and components.
//!
//! Events are produced by:
//! - Transport ISRs (byte received, frame complete)
//! - Components themselves (start/stop polling, PDU hand-over)
//! - Other threads that create or tear down components
//!
//! Events are consumed by [`EventTask`](crate::task::EventTask), one per
//! pass, in FIFO order.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ UART ISR    │────▶│              │     │              │
//! │ Components  │────▶│  Event Queue │────▶│  Event Task  │
//! │ Threads     │────▶│  (OSAL)      │     │  (consumer)  │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```

use core::fmt;

/// First raw value available to component-defined identifiers.
pub const USER_ID_BASE: u8 = 16;

/// Event identifiers.
///
/// `StartPolling` and `StopPolling` are interpreted by the event task
/// itself.  Everything else is forwarded untouched to the addressed
/// component's [`process`](crate::component::Component::process).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventId {
    /// Start calling the component's poll handler on every pass.
    StartPolling,
    /// Stop calling the component's poll handler.
    StopPolling,
    /// Transport layer received a new protocol data unit.
    PduReceived,
    /// Transport layer finished transmitting a protocol data unit.
    PduTransmitted,
    /// Identifier defined by the receiving component.
    User(UserId),
}

/// Component-defined event identifier.  Always carries a raw value of at
/// least [`USER_ID_BASE`], so it can never alias a built-in identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(u8);

impl UserId {
    /// `None` for raw values below [`USER_ID_BASE`].
    pub const fn new(raw: u8) -> Option<Self> {
        if raw >= USER_ID_BASE {
            Some(Self(raw))
        } else {
            None
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl EventId {
    /// Component-defined identifier for `raw`, or `None` if `raw` falls in
    /// the built-in or reserved range.
    pub const fn user(raw: u8) -> Option<Self> {
        match UserId::new(raw) {
            Some(id) => Some(Self::User(id)),
            None => None,
        }
    }

    /// Raw wire value of this identifier.
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::StartPolling => 0,
            Self::StopPolling => 1,
            Self::PduReceived => 2,
            Self::PduTransmitted => 3,
            Self::User(id) => id.get(),
        }
    }

    /// Decode a raw value.  Values 4..=15 are reserved and yield `None`.
    pub const fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::StartPolling),
            1 => Some(Self::StopPolling),
            2 => Some(Self::PduReceived),
            3 => Some(Self::PduTransmitted),
            r => Self::user(r),
        }
    }

    /// `true` for the identifiers the event task consumes itself.
    pub const fn is_control(self) -> bool {
        matches!(self, Self::StartPolling | Self::StopPolling)
    }
}

/// Checked handle to a component attached to an event task.
///
/// The generation is bumped each time an arena slot is released, so a
/// handle that outlives its component never resolves to the component
/// that reuses the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentId {
    index: u16,
    generation: u16,
}

impl ComponentId {
    pub(crate) const fn new(index: u16, generation: u16) -> Self {
        Self { index, generation }
    }

    pub(crate) const fn index(self) -> usize {
        self.index as usize
    }

    pub(crate) const fn generation(self) -> u16 {
        self.generation
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.index, self.generation)
    }
}

/// A single event travelling through the OSAL queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub id: EventId,
    /// Component the event is addressed to.  `None` never reaches a
    /// component; the task reports it as a consistency violation.
    pub context: Option<ComponentId>,
}

impl Event {
    pub const fn new(id: EventId, target: ComponentId) -> Self {
        Self {
            id,
            context: Some(target),
        }
    }

    pub const fn start_polling(target: ComponentId) -> Self {
        Self::new(EventId::StartPolling, target)
    }

    pub const fn stop_polling(target: ComponentId) -> Self {
        Self::new(EventId::StopPolling, target)
    }

    /// Event without a target.  Only useful for exercising the task's
    /// consistency checks.
    pub const fn unaddressed(id: EventId) -> Self {
        Self { id, context: None }
    }
}
