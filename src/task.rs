//! Event task — the cooperative scheduler that drives the protocol stack.
//!
//! Call [`EventTask::run`] over and over, either from the bare-metal main
//! loop or from a dedicated worker thread.  Each call is one pass:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  1. wait(timeout) ──▶ Event?                                 │
//! │        │                                                     │
//! │        ├── StartPolling ──▶ registry.insert(ctx)             │
//! │        ├── StopPolling  ──▶ registry.remove(ctx)             │
//! │        └── other        ──▶ component.process(event)         │
//! │                                                              │
//! │  2. for id in registry ──▶ component.poll()                  │
//! │                                                              │
//! │  3. timeout = registry empty ? idle_timeout : poll_interval  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The only state carried between passes is the poller registry, the
//! component arena and the adaptive wait timeout.  `run` takes `&mut self`,
//! so exactly one execution context can drive a given task.  Other threads
//! and ISRs reach it only through the event queue.

use core::time::Duration;

use log::{debug, error, info, warn};

use crate::component::{Component, ComponentTable, TaskContext};
use crate::config::TaskConfig;
use crate::error::{Resource, Result};
use crate::events::{ComponentId, Event, EventId};
use crate::osal::{EventPost, EventQueue};
use crate::registry::{Insert, PollerRegistry};

/// Default number of components a task can hold.
pub const DEFAULT_COMPONENTS: usize = 8;

/// Default number of components that can be polled at the same time.
pub const DEFAULT_POLLERS: usize = 8;

/// Running counters, mostly useful for tests and diagnostics dumps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    /// Completed calls to [`EventTask::run`].
    pub passes: u64,
    /// Events taken from the queue.
    pub events: u64,
    /// Events handed to a component's `process`.
    pub processed: u64,
    /// Individual `poll` calls.
    pub polls: u64,
    /// Events dropped because their context was missing or stale.
    pub violations: u32,
}

/// The event task.
///
/// Owns the components attached to it and the registry of those that
/// asked to be polled.  Borrows the event queue, which usually lives in a
/// `static` so interrupt handlers and other threads can post to it.
pub struct EventTask<
    'q,
    Q: EventQueue,
    const COMPONENTS: usize = DEFAULT_COMPONENTS,
    const POLLERS: usize = DEFAULT_POLLERS,
> {
    queue: &'q Q,
    config: TaskConfig,
    components: ComponentTable<COMPONENTS>,
    pollers: PollerRegistry<ComponentId, POLLERS>,
    wait_timeout: Duration,
    stats: TaskStats,
}

impl<'q, Q: EventQueue, const COMPONENTS: usize, const POLLERS: usize>
    EventTask<'q, Q, COMPONENTS, POLLERS>
{
    /// Create a task draining `queue`.
    ///
    /// Fails with [`Error::Config`](crate::error::Error::Config) if the
    /// configuration does not validate.
    pub fn new(queue: &'q Q, config: TaskConfig) -> Result<Self> {
        config.validate()?;
        info!(
            "event task ready: {} components, {} pollers, poll={}ms idle={}ms",
            COMPONENTS, POLLERS, config.poll_interval_ms, config.idle_timeout_ms
        );
        Ok(Self {
            queue,
            config,
            components: ComponentTable::new(),
            pollers: PollerRegistry::new(),
            wait_timeout: config.idle_timeout(),
            stats: TaskStats::default(),
        })
    }

    // ── Component lifecycle ───────────────────────────────────

    /// Hand a component over to the task and get its handle back.
    pub fn attach(&mut self, component: impl Component + 'static) -> Result<ComponentId> {
        self.attach_boxed(Box::new(component))
    }

    /// Same as [`attach`](Self::attach) for an already boxed component.
    pub fn attach_boxed(&mut self, component: Box<dyn Component>) -> Result<ComponentId> {
        self.components.insert(component).inspect_err(|e| {
            error!("cannot attach component: {}", e);
        })
    }

    /// Release a component.  Its handle goes stale and, if it was being
    /// polled, it leaves the registry as if a StopPolling had been
    /// processed.  Returns `None` for an unknown or stale handle.
    pub fn detach(&mut self, id: ComponentId) -> Option<Box<dyn Component>> {
        let component = self.components.remove(id)?;
        if self.pollers.remove(&id) {
            debug!("'{}' {} left poll list on detach", component.name(), id);
        }
        Some(component)
    }

    // ── Scheduling ────────────────────────────────────────────

    /// Run one scheduling pass.
    ///
    /// Waits for at most one event (bounded by [`wait_timeout`]), dispatches
    /// it, polls every registered component once, then picks the timeout
    /// for the next pass.
    ///
    /// The only error is running out of poller registry slots, which is
    /// fatal: the pass is abandoned and the caller should treat the stack
    /// as misconfigured.
    ///
    /// [`wait_timeout`]: Self::wait_timeout
    pub fn run(&mut self) -> Result<()> {
        if let Some(event) = self.queue.wait(self.wait_timeout) {
            self.stats.events += 1;
            self.dispatch(event)?;
        }

        self.poll_all();

        self.wait_timeout = if self.pollers.is_empty() {
            self.config.idle_timeout()
        } else {
            self.config.poll_interval()
        };
        self.stats.passes += 1;
        Ok(())
    }

    fn dispatch(&mut self, event: Event) -> Result<()> {
        let Some(id) = event.context else {
            report_violation(&mut self.stats, &event, "event without context");
            return Ok(());
        };

        match event.id {
            EventId::StartPolling => {
                if !self.components.contains(id) {
                    report_violation(&mut self.stats, &event, "stale component handle");
                    return Ok(());
                }
                match self.pollers.insert(id) {
                    Ok(Insert::Added) => debug!("{} polling started", id),
                    Ok(Insert::AlreadyPresent) => debug!("{} already polling, ignored", id),
                    Err(_) => {
                        error!(
                            "poller registry full ({} slots), cannot poll {}",
                            POLLERS, id
                        );
                        return Err(Resource::PollerRegistry.into());
                    }
                }
            }

            EventId::StopPolling => {
                if self.pollers.remove(&id) {
                    debug!("{} polling stopped", id);
                }
            }

            _ => {
                let queue: &dyn EventPost = self.queue;
                match self.components.get_mut(id) {
                    Some(component) => {
                        let mut ctx = TaskContext::new(id, queue);
                        component.process(&event, &mut ctx);
                        self.stats.processed += 1;
                    }
                    None => report_violation(&mut self.stats, &event, "stale component handle"),
                }
            }
        }
        Ok(())
    }

    fn poll_all(&mut self) {
        let queue: &dyn EventPost = self.queue;
        for &id in self.pollers.iter() {
            // Detach purges the registry, so every member resolves.
            if let Some(component) = self.components.get_mut(id) {
                let mut ctx = TaskContext::new(id, queue);
                component.poll(&mut ctx);
                self.stats.polls += 1;
            }
        }
    }

    // ── Introspection ─────────────────────────────────────────

    /// Timeout the next [`run`](Self::run) will wait for an event.
    pub fn wait_timeout(&self) -> Duration {
        self.wait_timeout
    }

    /// Number of components currently registered for polling.
    pub fn polling_count(&self) -> usize {
        self.pollers.len()
    }

    pub fn is_polling(&self, id: ComponentId) -> bool {
        self.pollers.contains(&id)
    }

    /// Registered components in poll order.
    pub fn pollers(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.pollers.iter().copied()
    }

    pub fn is_attached(&self, id: ComponentId) -> bool {
        self.components.contains(id)
    }

    pub fn component(&self, id: ComponentId) -> Option<&dyn Component> {
        self.components.get(id)
    }

    /// Number of attached components.
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub fn stats(&self) -> TaskStats {
        self.stats
    }

    pub fn config(&self) -> &TaskConfig {
        &self.config
    }

    /// The queue this task drains.  Setup code running on the task's own
    /// context uses it to post the first StartPolling events.
    pub fn queue(&self) -> &'q Q {
        self.queue
    }
}

fn report_violation(stats: &mut TaskStats, event: &Event, what: &str) {
    stats.violations = stats.violations.saturating_add(1);
    warn!("{} for {:?}, dispatch skipped", what, event.id);
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
