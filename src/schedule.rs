use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::model::{RollTicket, RoundToken};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    CompleteRoll(RollTicket),
    Announce { text: String, language: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scheduled {
    pub due_ms: u64,
    pub round: RoundToken,
    pub action: Action,
    seq: u64,
}

// BinaryHeap is a max-heap; invert so the earliest (due, seq) pops first.
impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        (other.due_ms, other.seq).cmp(&(self.due_ms, self.seq))
    }
}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Default)]
pub struct Scheduler {
    queue: BinaryHeap<Scheduled>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due_ms: u64, round: RoundToken, action: Action) {
        self.next_seq += 1;
        self.queue.push(Scheduled { due_ms, round, action, seq: self.next_seq });
    }

    /// Pops the earliest entry due at or before `now_ms`. Entries due at the
    /// same instant come out in scheduling order.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<Scheduled> {
        if self.queue.peek()?.due_ms > now_ms { return None; }
        self.queue.pop()
    }

    /// Drops everything scheduled under a round older than `current`.
    pub fn cancel_stale(&mut self, current: RoundToken) -> usize {
        let before = self.queue.len();
        self.queue.retain(|s| s.round >= current);
        before - self.queue.len()
    }

    pub fn next_due(&self) -> Option<u64> {
        self.queue.peek().map(|s| s.due_ms)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
