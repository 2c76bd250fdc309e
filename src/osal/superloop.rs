//! Non-blocking event queue for bare-metal superloop integrations.
//!
//! Ring-buffer FIFO built on an `embassy-sync` channel guarded by a
//! critical section, so ISRs can post while the main loop drains.

use core::time::Duration;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::warn;

use super::{DEFAULT_QUEUE_DEPTH, EventPost, EventQueue};
use crate::error::{Error, Result};
use crate::events::Event;

/// FIFO of at most `N` events.  `wait` never suspends.
pub struct SuperloopQueue<const N: usize = DEFAULT_QUEUE_DEPTH> {
    channel: Channel<CriticalSectionRawMutex, Event, N>,
}

impl<const N: usize> SuperloopQueue<N> {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }
}

impl<const N: usize> Default for SuperloopQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> EventPost for SuperloopQueue<N> {
    fn post(&self, event: Event, _from_isr: bool) -> Result<()> {
        self.channel.try_send(event).map_err(|_| {
            warn!("event queue full ({} slots), dropping {:?}", N, event.id);
            Error::QueueFull
        })
    }
}

impl<const N: usize> EventQueue for SuperloopQueue<N> {
    fn wait(&self, _timeout: Duration) -> Option<Event> {
        self.channel.try_receive().ok()
    }
}
