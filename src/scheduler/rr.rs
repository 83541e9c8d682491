use crate::scheduler::{policy::Queue, rcb::Rcb};
use std::collections::VecDeque;

/// Single FIFO queue for Round-Robin (§4.3).
///
/// A `VecDeque` gives the same O(1) push-back/pop-front behavior as the
/// spec's "singly-linked FIFO, head + tail pointers" without hand-rolled
/// raw-pointer chains (see SPEC_FULL.md §4 for why the linked-list shape
/// is not carried over literally).
pub(crate) struct RrQueue {
    fifo: VecDeque<Rcb>,
}

impl RrQueue {
    pub(crate) fn new() -> Self {
        Self {
            fifo: VecDeque::new(),
        }
    }
}

impl Queue for RrQueue {
    fn insert(&mut self, rcb: Rcb) {
        self.fifo.push_back(rcb);
    }

    fn dequeue(&mut self) -> Option<Rcb> {
        self.fifo.pop_front()
    }
}
