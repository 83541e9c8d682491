use crate::scheduler::{policy::Queue, rcb::Rcb};

/// Initial heap capacity (§4.2). `Vec::push` doubles on overflow past this,
/// matching the spec's "initial capacity 100, doubles on overflow".
const INITIAL_CAPACITY: usize = 100;

/// Min-heap keyed by [`Rcb::tot_bytes`], smallest file first.
///
/// Hand-rolled rather than `std::collections::BinaryHeap` (a max-heap) so
/// the sift-up/sift-down shape and left-child tie-break match §4.2's
/// pseudocode exactly. Ties are broken arbitrarily; stable ordering is not
/// required (§4.2, Open Question 3).
pub(crate) struct SjfQueue {
    heap: Vec<Rcb>,
}

impl SjfQueue {
    pub(crate) fn new() -> Self {
        Self {
            heap: Vec::with_capacity(INITIAL_CAPACITY),
        }
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.heap[parent].tot_bytes <= self.heap[i].tot_bytes {
                break;
            }
            self.heap.swap(parent, i);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * i + 1;
            let right = 2 * i + 2;
            let mut smallest = i;

            if left < len && self.heap[left].tot_bytes < self.heap[smallest].tot_bytes {
                smallest = left;
            }
            // Strict `<` on the right child: on a tie, the left child wins,
            // matching §4.2's "on tie prefer left".
            if right < len && self.heap[right].tot_bytes < self.heap[smallest].tot_bytes {
                smallest = right;
            }
            if smallest == i {
                break;
            }
            self.heap.swap(i, smallest);
            i = smallest;
        }
    }
}

impl Queue for SjfQueue {
    fn insert(&mut self, rcb: Rcb) {
        self.heap.push(rcb);
        self.sift_up(self.heap.len() - 1);
    }

    fn dequeue(&mut self) -> Option<Rcb> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.heap.swap(0, last);
        let rcb = self.heap.pop();
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        rcb
    }
}
