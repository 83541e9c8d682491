//! The dispatcher (C7): the mutex/condvar wrapper shared by the producer
//! (accept thread) and worker consumers (§4.5, §5).
//!
//! Locking discipline: `submit`/`next`/`requeue` all acquire the single
//! mutex; `serve` (driven by [`crate::server::worker`]) runs unlocked so
//! I/O across workers is parallelizable, and re-acquires the mutex only to
//! hand an unfinished RCB back to the policy queue.

use crate::scheduler::{self, PolicyKind, Queue, Rcb};
use std::sync::{Condvar, Mutex};

struct State {
    queue: Box<dyn Queue>,
    /// Incremented only while the mutex is held, so `seq_num` assignment
    /// is totally ordered across concurrent submissions (§5, invariant 4).
    next_seq: u64,
}

pub(crate) struct Dispatcher {
    kind: PolicyKind,
    state: Mutex<State>,
    not_empty: Condvar,
}

impl Dispatcher {
    pub(crate) fn new(kind: PolicyKind) -> Self {
        Self {
            kind,
            state: Mutex::new(State {
                queue: scheduler::new_queue(kind),
                next_seq: 1,
            }),
            not_empty: Condvar::new(),
        }
    }

    pub(crate) fn kind(&self) -> PolicyKind {
        self.kind
    }

    /// Assigns the next `seq_num`, inserts the RCB, and wakes one waiting
    /// worker. Called by the accept thread once a request has been parsed
    /// and its file opened (§4.5 `submit`).
    pub(crate) fn submit(
        &self,
        socket: std::net::TcpStream,
        path: String,
        file: std::fs::File,
        tot_bytes: u64,
    ) -> u64 {
        let mut state = self.state.lock().expect("dispatcher mutex poisoned");
        let seq_num = state.next_seq;
        state.next_seq += 1;

        let rcb = Rcb::new(seq_num, socket, path, file, tot_bytes);
        state.queue.insert(rcb);
        self.not_empty.notify_one();
        seq_num
    }

    /// Blocks until a non-empty dequeue succeeds, tolerating spurious
    /// wakeups via the standard predicate-loop idiom (§5 "Mutual
    /// exclusion").
    pub(crate) fn next(&self) -> Rcb {
        let mut state = self.state.lock().expect("dispatcher mutex poisoned");
        loop {
            if let Some(rcb) = state.queue.dequeue() {
                return rcb;
            }
            state = self
                .not_empty
                .wait(state)
                .expect("dispatcher mutex poisoned");
        }
    }

    /// Hands an unfinished RCB back to the policy queue after a partial
    /// serve, re-acquiring the mutex for the duration of the insert only
    /// (§4.5 "the re-enqueue path re-acquires the mutex").
    pub(crate) fn requeue(&self, rcb: Rcb) {
        let mut state = self.state.lock().expect("dispatcher mutex poisoned");
        state.queue.insert(rcb);
        self.not_empty.notify_one();
    }
}
