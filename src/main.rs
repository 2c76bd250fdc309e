//! Event task demo — hosted worker-thread integration.
//!
//! ```text
//! ┌──────────────┐  RX_BYTE (from_isr)  ┌──────────────────────────────┐
//! │ UART thread  │─────────────────────▶│  BlockingQueue (static)      │
//! └──────────────┘                      └──────────────┬───────────────┘
//!                                                      │ wait(timeout)
//!                                       ┌──────────────▼───────────────┐
//!                                       │  EventTask::run() loop       │
//!                                       │   RtuTransport  (poll: t3.5) │
//!                                       │   ServerChannel (process)    │
//!                                       └──────────────────────────────┘
//! ```
//!
//! A simulated UART thread posts received-byte events in bursts.  The
//! transport starts polling on the first byte of a burst, detects the
//! 3.5-character end-of-frame gap in its poll handler, stops polling and
//! hands the frame to the server channel.
//!
//! Environment:
//! - `MBEVENT_LOG`    — `env_logger` filter (default `info`)
//! - `MBEVENT_CONFIG` — JSON `TaskConfig` (optional)
#![deny(unused_must_use)]

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::{info, warn};

use mbevent::adapters::time::{Clock, SystemClock};
use mbevent::{
    BlockingQueue, Component, ComponentId, Event, EventId, EventPost, EventTask, TaskConfig,
    TaskContext,
};

/// Received-byte event raised by the UART "ISR".  Checked at compile time.
const RX_BYTE: EventId = EventId::user(16).unwrap();

const BAUDRATE: u32 = 19_200;
const FRAMES: usize = 5;
const BYTES_PER_FRAME: usize = 8;
const RUN_FOR: Duration = Duration::from_secs(2);

const LOG_ENV: &str = "MBEVENT_LOG";

static EVENTS: BlockingQueue = BlockingQueue::new();

// ── Transport ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RtuState {
    Init,
    Idle,
    Reception,
}

/// Inter-frame gap in microseconds (fixed 1750us above 19200 bps).
fn t3_5_us(baudrate: u32) -> u64 {
    if baudrate > 19_200 {
        1_750
    } else {
        u64::from(38_500_000_u32.div_ceil(baudrate))
    }
}

struct RtuTransport<C: Clock> {
    clock: C,
    channel: ComponentId,
    state: RtuState,
    last_rx_us: u64,
    gap_us: u64,
    rx_len: usize,
}

impl<C: Clock> Component for RtuTransport<C> {
    fn poll(&mut self, ctx: &mut TaskContext<'_>) {
        if self.clock.now_us().saturating_sub(self.last_rx_us) < self.gap_us {
            return;
        }
        match self.state {
            RtuState::Init => {
                // Traffic seen before the first gap is not a frame.
                info!("rtu: bus idle, ready for frames");
                self.state = RtuState::Idle;
                self.rx_len = 0;
            }
            RtuState::Reception => {
                info!("rtu: end of frame ({} bytes)", self.rx_len);
                self.state = RtuState::Idle;
                self.rx_len = 0;
                if let Err(e) = ctx.notify(EventId::PduReceived, self.channel) {
                    warn!("rtu: frame lost: {}", e);
                }
            }
            RtuState::Idle => {}
        }
        if let Err(e) = ctx.stop_polling() {
            warn!("rtu: cannot stop polling: {}", e);
        }
    }

    fn process(&mut self, event: &Event, ctx: &mut TaskContext<'_>) {
        if event.id != RX_BYTE {
            return;
        }
        self.last_rx_us = self.clock.now_us();
        self.rx_len += 1;
        if self.state == RtuState::Idle {
            self.state = RtuState::Reception;
            if let Err(e) = ctx.start_polling() {
                warn!("rtu: cannot start polling: {}", e);
            }
        }
    }

    fn name(&self) -> &'static str {
        "rtu"
    }
}

// ── Server channel ────────────────────────────────────────────

#[derive(Default)]
struct ServerChannel {
    served: u32,
}

impl Component for ServerChannel {
    fn process(&mut self, event: &Event, _ctx: &mut TaskContext<'_>) {
        if event.id == EventId::PduReceived {
            self.served += 1;
            info!("server: request #{} handled", self.served);
        }
    }

    fn name(&self) -> &'static str {
        "server"
    }
}

// ── Main ──────────────────────────────────────────────────────

fn load_config() -> Result<TaskConfig> {
    match std::env::var("MBEVENT_CONFIG") {
        Ok(json) => TaskConfig::from_json(&json).context("MBEVENT_CONFIG"),
        // Short idle timeout so the demo notices its deadline promptly.
        Err(_) => Ok(TaskConfig {
            idle_timeout_ms: 200,
            ..TaskConfig::default()
        }),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or(LOG_ENV, "info"))
        .try_init()
        .context("installing console logger")?;

    let config = load_config()?;
    let mut task: EventTask<'_, _> = EventTask::new(&EVENTS, config)?;

    let server = task.attach(ServerChannel::default())?;
    let clock = SystemClock::new();
    let now = clock.now_us();
    let transport = task.attach(RtuTransport {
        clock,
        channel: server,
        state: RtuState::Init,
        last_rx_us: now,
        gap_us: t3_5_us(BAUDRATE),
        rx_len: 0,
    })?;

    // The transport waits out one inter-frame gap before accepting frames.
    task.queue()
        .post(Event::start_polling(transport), false)
        .context("posting initial StartPolling")?;

    let uart = std::thread::spawn(move || -> mbevent::Result<()> {
        std::thread::sleep(Duration::from_millis(50));
        for _ in 0..FRAMES {
            for _ in 0..BYTES_PER_FRAME {
                EVENTS.post(Event::new(RX_BYTE, transport), true)?;
                std::thread::sleep(Duration::from_micros(500));
            }
            std::thread::sleep(Duration::from_millis(100));
        }
        Ok(())
    });

    let deadline = Instant::now() + RUN_FOR;
    while Instant::now() < deadline {
        task.run()?;
    }

    uart.join()
        .map_err(|_| anyhow::anyhow!("UART thread panicked"))?
        .context("UART thread")?;

    let stats = task.stats();
    info!(
        "done: passes={} events={} processed={} polls={} violations={}",
        stats.passes, stats.events, stats.processed, stats.polls, stats.violations
    );
    Ok(())
}
