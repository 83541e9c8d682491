//! The worker loop (C8): dequeue, emit the status line once, invoke the
//! policy's serve step, and either drop, requeue, or (MLQF) demote and
//! requeue the RCB.

use crate::{
    dispatcher::Dispatcher,
    scheduler::{Rcb, ServeOutcome},
    wire::{self, CHUNK_SIZE},
};
use std::io::Write;

/// Runs forever on a dedicated OS thread. Workers never self-terminate
/// (§4.6); the process exits by external signal.
pub(crate) fn run(dispatcher: &Dispatcher) -> ! {
    // Thread-local scratch buffer: the teacher's static shared buffer is
    // the latent race spec.md's design notes call out (§9 "Per-thread
    // scratch buffer"). One stack-allocated buffer per worker avoids it.
    let mut buf = [0u8; CHUNK_SIZE];

    loop {
        let mut rcb = dispatcher.next();
        emit_status_once(&mut rcb);

        match dispatcher.kind().serve(&mut rcb, &mut buf) {
            ServeOutcome::Completed => {
                // Literal completion marker expected by the scheduler's
                // end-to-end ordering scenarios (spec §8, S1).
                println!("Request {} completed", rcb.seq_num);
                log::info!("request {} completed ({} bytes)", rcb.seq_num, rcb.tot_bytes);
            }
            ServeOutcome::Requeue => {
                let seq_num = rcb.seq_num;
                dispatcher.requeue(rcb);
                log::trace!("request {seq_num} requeued");
            }
            ServeOutcome::IoError => {
                log::warn!("request {} abandoned after I/O error", rcb.seq_num);
            }
        }
    }
}

/// Writes `HTTP/1.1 200 OK\n\n` the first time this RCB is served, and
/// never again across RR/MLQF re-enqueues (§4.6).
fn emit_status_once(rcb: &mut Rcb) {
    if rcb.status_emitted {
        return;
    }
    rcb.status_emitted = true;
    // A failed status write means the client is already gone; the next
    // body write will surface the same error and abandon the RCB.
    let _ = rcb.socket.write_all(wire::STATUS_200);
}
