/// Cancellable delayed actions against a session clock.
///
/// Every delayed step (bird respawn, end-of-round check, flash reversion) is
/// queued with a due time and drained by the owner's update tick.
/// [`clear`](Scheduler::clear) at teardown guarantees no stale action ever
/// fires against removed state.
pub struct Scheduler<T> {
    entries: Vec<Entry<T>>,
    next_seq: u64,
}

struct Entry<T> {
    due: f64,
    seq: u64,
    task: T,
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_seq: 0,
        }
    }

    /// Queue a task to run `delay` seconds after `now`.
    pub fn schedule(&mut self, now: f64, delay: f64, task: T) {
        self.entries.push(Entry {
            due: now + delay,
            seq: self.next_seq,
            task,
        });
        self.next_seq += 1;
    }

    /// Remove and return all tasks due at or before `now`, in schedule order
    /// (earlier due time first; insertion order breaks ties).
    pub fn drain_due(&mut self, now: f64) -> Vec<T> {
        let mut due: Vec<Entry<T>> = Vec::new();
        let mut i = 0;
        while i < self.entries.len() {
            if self.entries[i].due <= now {
                due.push(self.entries.swap_remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by(|a, b| {
            a.due
                .partial_cmp(&b.due)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.seq.cmp(&b.seq))
        });
        due.into_iter().map(|e| e.task).collect()
    }

    /// Cancel every pending task.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
