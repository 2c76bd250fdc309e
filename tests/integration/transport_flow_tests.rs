//! Integration tests: simulated RTU transport handing frames to a channel.
//!
//! The transport polls only while waiting for an inter-frame gap, the way
//! a real RTU transport detects end of frame.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use mbevent::adapters::time::ManualClock;
use mbevent::{Event, EventPost, EventTask, SuperloopQueue, TaskConfig};

use super::mock_components::{RX_BYTE, RxState, SimChannel, SimTransport};

const GAP_US: u64 = 2_000;

#[test]
fn init_gap_then_frame_delivery() {
    let queue: SuperloopQueue<16> = SuperloopQueue::new();
    let clock = ManualClock::new();
    let received = Rc::new(Cell::new(0));
    let mut task: EventTask<'_, _> = EventTask::new(&queue, TaskConfig::default()).unwrap();

    let channel = task
        .attach(SimChannel {
            received: Rc::clone(&received),
        })
        .unwrap();
    let transport = SimTransport::new(clock.clone(), channel, GAP_US);
    let state = Rc::clone(&transport.state);
    let transport = task.attach(transport).unwrap();

    // Init: poll until one gap has elapsed, then the transport unregisters.
    queue.post(Event::start_polling(transport), false).unwrap();
    task.run().unwrap();
    assert_eq!(state.get(), RxState::Init);
    assert_eq!(task.wait_timeout(), Duration::from_millis(1));

    clock.advance_us(GAP_US);
    task.run().unwrap();
    assert_eq!(state.get(), RxState::Idle);
    task.run().unwrap();
    assert_eq!(task.polling_count(), 0);
    assert_eq!(task.wait_timeout(), Duration::from_millis(5000));

    // A frame of four bytes.
    for _ in 0..4 {
        queue.post(Event::new(RX_BYTE, transport), true).unwrap();
        clock.advance_us(500);
    }
    for _ in 0..4 {
        task.run().unwrap();
    }
    assert_eq!(state.get(), RxState::Reception);
    // First byte queued StartPolling behind the remaining bytes.
    task.run().unwrap();
    assert!(task.is_polling(transport));

    clock.advance_us(GAP_US);
    task.run().unwrap(); // poll: gap detected, PduReceived + StopPolling queued
    task.run().unwrap(); // PduReceived → channel
    task.run().unwrap(); // StopPolling

    assert_eq!(received.get(), 1);
    assert_eq!(state.get(), RxState::Idle);
    assert!(!task.is_polling(transport));
    assert_eq!(task.stats().violations, 0);
}
