//! Component capability — the seam between the event task and the
//! protocol components it drives.
//!
//! ```text
//!   EventTask ──▶ dyn Component ──▶ client / server / transport
//! ```
//!
//! Every protocol component (client channel, server channel, transport
//! layer) implements [`Component`] independently.  The event task only
//! ever sees `dyn Component`, so it never needs to know which concrete
//! kind it is driving.  Components are owned by a [`ComponentTable`] and
//! addressed through checked [`ComponentId`] handles.

use log::{debug, warn};

use crate::error::{Resource, Result};
use crate::events::{ComponentId, Event, EventId};
use crate::osal::EventPost;

// ───────────────────────────────────────────────────────────────
// Component trait
// ───────────────────────────────────────────────────────────────

/// Shared interface of everything the event task services.
///
/// Both operations are optional: the defaults do nothing, so a component
/// that only reacts to events leaves `poll` alone and a purely
/// time-driven one leaves `process` alone.
///
/// Handlers run to completion inside the task's pass.  A slow handler
/// stalls every other component, so keep them short and non-blocking.
pub trait Component {
    /// Time-driven servicing.  Called once per pass while the component is
    /// registered for polling.
    fn poll(&mut self, _ctx: &mut TaskContext<'_>) {}

    /// Event-driven servicing.  Called once for every non-control event
    /// addressed to this component.
    fn process(&mut self, _event: &Event, _ctx: &mut TaskContext<'_>) {}

    /// Short label used in log output.
    fn name(&self) -> &'static str {
        "component"
    }
}

// ───────────────────────────────────────────────────────────────
// Callback context
// ───────────────────────────────────────────────────────────────

/// Handed to [`Component::poll`] and [`Component::process`].
///
/// Carries the callee's own handle and the post side of the event queue.
/// It deliberately has no access to the poller registry: a component that
/// wants to stop being polled posts a StopPolling event for itself, which
/// the task applies on a later pass.
pub struct TaskContext<'a> {
    id: ComponentId,
    poster: &'a dyn EventPost,
}

impl<'a> TaskContext<'a> {
    pub fn new(id: ComponentId, poster: &'a dyn EventPost) -> Self {
        Self { id, poster }
    }

    /// Handle of the component being serviced.
    pub fn id(&self) -> ComponentId {
        self.id
    }

    /// Post an arbitrary event.
    pub fn post(&mut self, event: Event) -> Result<()> {
        self.poster.post(event, false)
    }

    /// Post `id` to another component (e.g. a transport handing a PDU to
    /// its channel).
    pub fn notify(&mut self, id: EventId, target: ComponentId) -> Result<()> {
        self.post(Event::new(id, target))
    }

    /// Ask the task to poll this component from the next pass on.
    pub fn start_polling(&mut self) -> Result<()> {
        self.post(Event::start_polling(self.id))
    }

    /// Ask the task to stop polling this component from the next pass on.
    pub fn stop_polling(&mut self) -> Result<()> {
        self.post(Event::stop_polling(self.id))
    }
}

// ───────────────────────────────────────────────────────────────
// Component arena
// ───────────────────────────────────────────────────────────────

struct Slot {
    generation: u16,
    component: Option<Box<dyn Component>>,
    /// Generation space used up.  Never handed out again.
    retired: bool,
}

/// Fixed-capacity arena of attached components.
///
/// Released slots are reused; their generation is bumped on release so
/// older handles stop resolving.  A slot whose generation would wrap is
/// retired instead, which permanently costs one unit of capacity.
pub struct ComponentTable<const N: usize> {
    slots: heapless::Vec<Slot, N>,
    live: usize,
}

impl<const N: usize> ComponentTable<N> {
    pub const fn new() -> Self {
        const { assert!(N <= u16::MAX as usize + 1, "slot index must fit a ComponentId") };
        Self {
            slots: heapless::Vec::new(),
            live: 0,
        }
    }

    /// Store `component` and return its handle.
    pub fn insert(&mut self, component: Box<dyn Component>) -> Result<ComponentId> {
        let name = component.name();

        let free = self
            .slots
            .iter()
            .position(|s| s.component.is_none() && !s.retired);
        let id = if let Some(index) = free {
            let slot = &mut self.slots[index];
            slot.component = Some(component);
            ComponentId::new(index as u16, slot.generation)
        } else {
            let index = self.slots.len();
            self.slots
                .push(Slot {
                    generation: 0,
                    component: Some(component),
                    retired: false,
                })
                .map_err(|_| Resource::ComponentTable)?;
            ComponentId::new(index as u16, 0)
        };

        self.live += 1;
        debug!("component '{}' attached as {}", name, id);
        Ok(id)
    }

    /// Take the component out of the arena.  `None` if `id` is stale.
    pub fn remove(&mut self, id: ComponentId) -> Option<Box<dyn Component>> {
        let slot = self.slot_mut(id)?;
        let component = slot.component.take()?;
        match slot.generation.checked_add(1) {
            Some(next) => slot.generation = next,
            None => {
                slot.retired = true;
                warn!("slot {} retired, generations exhausted", id.index());
            }
        }
        self.live -= 1;
        debug!("component '{}' {} released", component.name(), id);
        Some(component)
    }

    pub fn get(&self, id: ComponentId) -> Option<&dyn Component> {
        self.slots
            .get(id.index())
            .filter(|s| s.generation == id.generation())
            .and_then(|s| s.component.as_deref())
    }

    pub fn get_mut(&mut self, id: ComponentId) -> Option<&mut (dyn Component + 'static)> {
        self.slot_mut(id)?.component.as_deref_mut()
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.get(id).is_some()
    }

    /// Number of attached components.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    fn slot_mut(&mut self, id: ComponentId) -> Option<&mut Slot> {
        self.slots
            .get_mut(id.index())
            .filter(|s| s.generation == id.generation())
    }
}

impl<const N: usize> Default for ComponentTable<N> {
    fn default() -> Self {
        Self::new()
    }
}
