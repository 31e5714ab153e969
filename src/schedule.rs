use std::time::{Duration, SystemTime};

/// Handle returned when scheduling; cancelling it stops further firings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CancelToken(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// one-second countdown of the typing test
    TestTimer,
    /// animation step of the falling-word game
    GameFrame,
}

/// A task that came due, with how many of its intervals have elapsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Firing {
    pub token: CancelToken,
    pub kind: TaskKind,
    pub count: u32,
}

#[derive(Debug, Clone)]
struct Task {
    token: CancelToken,
    kind: TaskKind,
    interval: Duration,
    next_due: SystemTime,
}

/// Repeating tasks polled by the event-loop driver.
///
/// Nothing here runs on its own: the driver calls `due` and dispatches the
/// firings, so a cancelled task can never fire afterwards.
#[derive(Debug, Default)]
pub struct Scheduler {
    tasks: Vec<Task>,
    next_token: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, kind: TaskKind, interval: Duration, now: SystemTime) -> CancelToken {
        let token = CancelToken(self.next_token);
        self.next_token += 1;
        self.tasks.push(Task {
            token,
            kind,
            interval,
            next_due: now + interval,
        });
        token
    }

    /// Returns false if the token was not (or no longer) scheduled
    pub fn cancel(&mut self, token: CancelToken) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.token != token);
        before != self.tasks.len()
    }

    pub fn is_scheduled(&self, token: CancelToken) -> bool {
        self.tasks.iter().any(|t| t.token == token)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Collect every task whose deadline has passed and move its deadline on
    pub fn due(&mut self, now: SystemTime) -> Vec<Firing> {
        let mut firings = Vec::new();

        for task in &mut self.tasks {
            if task.next_due > now {
                continue;
            }

            let mut count = 0;
            while task.next_due <= now {
                count += 1;
                task.next_due += task.interval;
                if task.interval.is_zero() {
                    task.next_due = now + Duration::from_millis(1);
                }
            }

            firings.push(Firing {
                token: task.token,
                kind: task.kind,
                count,
            });
        }

        firings
    }
}
