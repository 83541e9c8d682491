use crate::scheduler::{
    policy::Queue,
    rcb::{Rcb, Tier},
};
use std::collections::VecDeque;

/// Three independent priority FIFOs, `Q0 > Q1 > Q2` (§4.4). An RCB's
/// `tier` field indexes which of the three it currently belongs to.
pub(crate) struct MlqfQueue {
    tiers: [VecDeque<Rcb>; 3],
}

impl MlqfQueue {
    pub(crate) fn new() -> Self {
        Self {
            tiers: [VecDeque::new(), VecDeque::new(), VecDeque::new()],
        }
    }
}

impl Queue for MlqfQueue {
    fn insert(&mut self, rcb: Rcb) {
        self.tiers[rcb.tier.index()].push_back(rcb);
    }

    fn dequeue(&mut self) -> Option<Rcb> {
        self.tiers.iter_mut().find_map(VecDeque::pop_front)
    }
}
