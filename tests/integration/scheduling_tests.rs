//! Integration tests: registration lifecycle and adaptive wait timeout.

use std::time::Duration;

use mbevent::{Event, EventPost, EventTask, SuperloopQueue, TaskConfig};

use super::mock_components::{Journal, Probe};

const POLL: Duration = Duration::from_millis(1);
const IDLE: Duration = Duration::from_millis(5000);

// ── Register → poll → stop scenario ───────────────────────────

#[test]
fn register_then_stop_scenario() {
    let queue: SuperloopQueue<8> = SuperloopQueue::new();
    let journal = Journal::new();
    let mut task: EventTask<'_, _> = EventTask::new(&queue, TaskConfig::default()).unwrap();
    let a = task.attach(Probe::new("a", &journal)).unwrap();

    queue.post(Event::start_polling(a), false).unwrap();
    task.run().unwrap();
    assert_eq!(journal.polls_of("a"), 1, "polled in the registering pass");
    assert_eq!(task.wait_timeout(), POLL);

    // Pass without an incoming event.
    task.run().unwrap();
    assert_eq!(journal.polls_of("a"), 2);
    assert_eq!(task.wait_timeout(), POLL);

    queue.post(Event::stop_polling(a), false).unwrap();
    task.run().unwrap();
    assert_eq!(task.polling_count(), 0);
    assert_eq!(journal.polls_of("a"), 2, "not polled in the stopping pass");
    assert_eq!(task.wait_timeout(), IDLE);

    for _ in 0..5 {
        task.run().unwrap();
    }
    assert_eq!(journal.polls_of("a"), 2, "never polled again");
}

#[test]
fn one_poll_per_pass_while_registered() {
    let queue: SuperloopQueue<8> = SuperloopQueue::new();
    let journal = Journal::new();
    let mut task: EventTask<'_, _> = EventTask::new(&queue, TaskConfig::default()).unwrap();
    let a = task.attach(Probe::new("a", &journal)).unwrap();
    let b = task.attach(Probe::new("b", &journal)).unwrap();

    queue.post(Event::start_polling(a), false).unwrap();
    task.run().unwrap();
    queue.post(Event::start_polling(b), false).unwrap();
    for _ in 0..9 {
        task.run().unwrap();
    }

    assert_eq!(journal.polls_of("a"), 10);
    assert_eq!(journal.polls_of("b"), 9);
}

#[test]
fn timeout_follows_registry_size() {
    let queue: SuperloopQueue<8> = SuperloopQueue::new();
    let journal = Journal::new();
    let mut task: EventTask<'_, _> = EventTask::new(&queue, TaskConfig::default()).unwrap();
    let a = task.attach(Probe::new("a", &journal)).unwrap();
    let b = task.attach(Probe::new("b", &journal)).unwrap();

    let steps = [
        (Event::start_polling(a), POLL),
        (Event::start_polling(b), POLL),
        (Event::stop_polling(a), POLL),
        (Event::stop_polling(b), IDLE),
        (Event::stop_polling(b), IDLE),
    ];
    for (event, expected) in steps {
        queue.post(event, false).unwrap();
        task.run().unwrap();
        assert_eq!(task.wait_timeout(), expected, "after {:?}", event);
    }
}

#[test]
fn custom_timeouts_from_config() {
    let queue: SuperloopQueue<8> = SuperloopQueue::new();
    let journal = Journal::new();
    let config = TaskConfig::from_json(r#"{ "poll_interval_ms": 10, "idle_timeout_ms": 100 }"#)
        .unwrap();
    let mut task: EventTask<'_, _> = EventTask::new(&queue, config).unwrap();
    let a = task.attach(Probe::new("a", &journal)).unwrap();

    assert_eq!(task.wait_timeout(), Duration::from_millis(100));
    queue.post(Event::start_polling(a), false).unwrap();
    task.run().unwrap();
    assert_eq!(task.wait_timeout(), Duration::from_millis(10));
}

#[test]
fn reregistration_moves_to_back_of_poll_order() {
    let queue: SuperloopQueue<8> = SuperloopQueue::new();
    let journal = Journal::new();
    let mut task: EventTask<'_, _> = EventTask::new(&queue, TaskConfig::default()).unwrap();
    let a = task.attach(Probe::new("a", &journal)).unwrap();
    let b = task.attach(Probe::new("b", &journal)).unwrap();

    for ev in [
        Event::start_polling(a),
        Event::start_polling(b),
        Event::stop_polling(a),
        Event::start_polling(a),
    ] {
        queue.post(ev, false).unwrap();
        task.run().unwrap();
    }

    assert_eq!(task.pollers().collect::<Vec<_>>(), vec![b, a]);
}
