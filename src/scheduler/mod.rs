//! The request scheduler: the policy-agnostic queue abstraction (C3) and
//! its three concrete policies (C4–C6), plus the request control block
//! they operate on (C1).

pub(crate) mod mlqf;
pub(crate) mod policy;
pub(crate) mod rcb;
pub(crate) mod rr;
pub(crate) mod sjf;

pub(crate) use policy::{PolicyKind, Queue, ServeOutcome};
pub(crate) use rcb::Rcb;

/// Builds the queue storage for `kind`, encapsulating which concrete
/// structure (C4's heap, C5's single FIFO, C6's three FIFOs) backs it.
pub(crate) fn new_queue(kind: PolicyKind) -> Box<dyn Queue> {
    match kind {
        PolicyKind::Sjf => Box::new(sjf::SjfQueue::new()),
        PolicyKind::Rr => Box::new(rr::RrQueue::new()),
        PolicyKind::Mlqf => Box::new(mlqf::MlqfQueue::new()),
    }
}
