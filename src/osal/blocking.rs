//! Blocking event queue for threaded integrations.
//!
//! The event task runs in a dedicated worker thread and sleeps inside
//! [`wait`](EventQueue::wait) until either an event is posted or the
//! timeout elapses.  The wait races the channel receive against an
//! `async-io-mini` reactor timer, driven by `futures_lite::block_on`, so
//! the thread never busy-spins.  On host the timer runs on the
//! `embassy-time` std driver.
//!
//! ```text
//!  producer threads ──try_send──▶ Channel ──receive().await──┐
//!                                                           ├─ or ─▶ Option<Event>
//!                                  Timer::after(timeout) ───┘
//! ```

use core::time::Duration;

use async_io_mini::Timer;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use futures_lite::future;
use log::warn;

use super::{DEFAULT_QUEUE_DEPTH, EventPost, EventQueue};
use crate::error::{Error, Result};
use crate::events::Event;

/// FIFO of at most `N` events whose `wait` suspends the caller.
pub struct BlockingQueue<const N: usize = DEFAULT_QUEUE_DEPTH> {
    channel: Channel<CriticalSectionRawMutex, Event, N>,
}

impl<const N: usize> BlockingQueue<N> {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }
}

impl<const N: usize> Default for BlockingQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> EventPost for BlockingQueue<N> {
    fn post(&self, event: Event, _from_isr: bool) -> Result<()> {
        self.channel.try_send(event).map_err(|_| {
            warn!("event queue full ({} slots), dropping {:?}", N, event.id);
            Error::QueueFull
        })
    }
}

impl<const N: usize> EventQueue for BlockingQueue<N> {
    fn wait(&self, timeout: Duration) -> Option<Event> {
        // Fast path, and the only path for a zero timeout.
        if let Ok(event) = self.channel.try_receive() {
            return Some(event);
        }
        if timeout.is_zero() {
            return None;
        }

        future::block_on(future::or(
            async { Some(self.channel.receive().await) },
            async {
                Timer::after(timeout).await;
                None
            },
        ))
    }
}
