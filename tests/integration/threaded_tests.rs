//! Integration tests: blocking queue with producers on other threads.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

use mbevent::{
    BlockingQueue, Component, Event, EventId, EventPost, EventTask, TaskConfig, TaskContext,
};

struct Counter {
    polls: Arc<AtomicU32>,
    events: Arc<AtomicU32>,
}

impl Component for Counter {
    fn poll(&mut self, _ctx: &mut TaskContext<'_>) {
        self.polls.fetch_add(1, Ordering::Relaxed);
    }

    fn process(&mut self, _event: &Event, _ctx: &mut TaskContext<'_>) {
        self.events.fetch_add(1, Ordering::Relaxed);
    }
}

#[test]
fn idle_pass_blocks_until_event_arrives() {
    let queue: Arc<BlockingQueue<8>> = Arc::new(BlockingQueue::new());
    let events = Arc::new(AtomicU32::new(0));
    let mut task: EventTask<'_, _> = EventTask::new(&*queue, TaskConfig::default()).unwrap();
    let c = task
        .attach(Counter {
            polls: Arc::new(AtomicU32::new(0)),
            events: Arc::clone(&events),
        })
        .unwrap();

    let producer = Arc::clone(&queue);
    let handle = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(20));
        producer
            .post(Event::new(EventId::PduReceived, c), true)
            .unwrap();
    });

    // Idle timeout is 5 s; the post must wake the pass well before that.
    let start = Instant::now();
    task.run().unwrap();
    handle.join().unwrap();

    assert_eq!(events.load(Ordering::Relaxed), 1);
    assert!(start.elapsed() < Duration::from_secs(4));
}

#[test]
fn cross_thread_registration_is_marshalled_through_queue() {
    let queue: Arc<BlockingQueue<8>> = Arc::new(BlockingQueue::new());
    let polls = Arc::new(AtomicU32::new(0));
    let config = TaskConfig {
        poll_interval_ms: 1,
        idle_timeout_ms: 50,
    };
    let mut task: EventTask<'_, _> = EventTask::new(&*queue, config).unwrap();
    let c = task
        .attach(Counter {
            polls: Arc::clone(&polls),
            events: Arc::new(AtomicU32::new(0)),
        })
        .unwrap();

    let producer = Arc::clone(&queue);
    std::thread::spawn(move || producer.post(Event::start_polling(c), false))
        .join()
        .unwrap()
        .unwrap();

    task.run().unwrap();
    assert!(task.is_polling(c));
    assert_eq!(task.wait_timeout(), Duration::from_millis(1));

    // Short waits while polling.
    let start = Instant::now();
    for _ in 0..10 {
        task.run().unwrap();
    }
    assert_eq!(polls.load(Ordering::Relaxed), 11);
    assert!(start.elapsed() < Duration::from_secs(1));

    let producer = Arc::clone(&queue);
    std::thread::spawn(move || producer.post(Event::stop_polling(c), false))
        .join()
        .unwrap()
        .unwrap();
    task.run().unwrap();
    assert!(!task.is_polling(c));
    assert_eq!(task.wait_timeout(), Duration::from_millis(50));
}
