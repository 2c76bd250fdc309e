//! Fuzz target: `EventTask::run`
//!
//! Decodes arbitrary bytes into a stream of events (raw id, target slot)
//! and drives them through a small task.  Asserts that it never panics,
//! that the registry never exceeds the attached component count, and that
//! the wait timeout always matches registry occupancy.
//!
//! cargo fuzz run fuzz_event_stream

#![no_main]

use std::time::Duration;

use libfuzzer_sys::fuzz_target;
use mbevent::{
    Component, ComponentId, Event, EventId, EventPost, EventTask, SuperloopQueue, TaskConfig,
    TaskContext,
};

/// Echoes every processed user event back to itself, and unregisters
/// itself from its poll handler every seventh poll.
struct Chatty {
    polls: u8,
}

impl Component for Chatty {
    fn poll(&mut self, ctx: &mut TaskContext<'_>) {
        self.polls = self.polls.wrapping_add(1);
        if self.polls % 7 == 0 {
            let _ = ctx.stop_polling();
        }
    }

    fn process(&mut self, event: &Event, ctx: &mut TaskContext<'_>) {
        if let EventId::User(user) = event.id {
            if let Some(next) = user.get().checked_add(1).and_then(EventId::user) {
                let me = ctx.id();
                let _ = ctx.post(Event::new(next, me));
            }
        }
    }
}

fuzz_target!(|data: &[u8]| {
    let queue: SuperloopQueue<8> = SuperloopQueue::new();
    let Ok(mut task) = EventTask::<'_, _, 4, 4>::new(&queue, TaskConfig::default()) else {
        return;
    };
    let mut ids: Vec<ComponentId> = Vec::new();
    for _ in 0..3 {
        if let Ok(id) = task.attach(Chatty { polls: 0 }) {
            ids.push(id);
        }
    }

    for pair in data.chunks(2) {
        let raw = pair[0];
        let target = pair.get(1).copied().unwrap_or(0);

        match target % 5 {
            // Release and re-attach a component to produce stale handles.
            4 => {
                if let Some(&id) = ids.first() {
                    task.detach(id);
                    if let Ok(new) = task.attach(Chatty { polls: 0 }) {
                        ids[0] = new;
                    }
                }
            }
            slot => {
                if let Some(id) = EventId::from_u8(raw) {
                    let event = match ids.get(slot as usize) {
                        Some(&target) => Event::new(id, target),
                        None => Event::unaddressed(id),
                    };
                    let _ = queue.post(event, false);
                }
            }
        }

        assert!(task.run().is_ok(), "registry sized for every component");
        assert!(task.polling_count() <= task.component_count());
        let expected = if task.polling_count() == 0 {
            Duration::from_millis(5000)
        } else {
            Duration::from_millis(1)
        };
        assert_eq!(task.wait_timeout(), expected);
    }
});
