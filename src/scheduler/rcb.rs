use std::{fs::File, net::TcpStream};

/// MLQF priority level. Unused (always [`Tier::T0`]) by SJF and RR, which
/// don't carry tier-based state.
///
/// Tier is monotone non-decreasing over an RCB's lifetime: there is no
/// anti-aging demotion back to a higher priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum Tier {
    /// 8 KiB quantum, the entry tier for every new request.
    #[default]
    T0,
    /// 64 KiB quantum, reached after one unfinished `T0` quantum.
    T1,
    /// Unbounded round-robin tier; an RCB can cycle here indefinitely.
    T2,
}

impl Tier {
    /// Array index into MLQF's three priority FIFOs.
    pub(crate) const fn index(self) -> usize {
        match self {
            Tier::T0 => 0,
            Tier::T1 => 1,
            Tier::T2 => 2,
        }
    }

    /// Next tier down on an unfinished quantum. `T2` demotes to itself:
    /// there is nowhere lower to go, so MLQF just re-enqueues at `T2`.
    pub(crate) const fn demote(self) -> Tier {
        match self {
            Tier::T0 => Tier::T1,
            Tier::T1 | Tier::T2 => Tier::T2,
        }
    }
}

/// Request Control Block: the per-request state every policy queues.
///
/// An RCB is constructed once per accepted, parsed, file-openable `GET`
/// and is owned by exactly one holder at a time — the dispatcher during
/// submission, a policy queue while waiting, or a worker while being
/// served — until it completes or aborts on I/O error and is dropped.
pub(crate) struct Rcb {
    /// Monotonically assigned identity, unique for the process lifetime.
    pub(crate) seq_num: u64,
    /// Client socket, owned for the RCB's entire life.
    pub(crate) socket: TcpStream,
    /// Requested path, relative to the server's working directory.
    #[allow(dead_code)]
    pub(crate) path: String,
    /// Open handle on the requested file, owned for the RCB's entire life.
    pub(crate) file: File,
    /// File size at submission time. Immutable.
    pub(crate) tot_bytes: u64,
    /// Bytes already written to the client. Monotonically nondecreasing,
    /// never exceeds `tot_bytes`.
    pub(crate) snt_bytes: u64,
    /// MLQF priority; unused by SJF and RR.
    pub(crate) tier: Tier,
    /// Guards against re-emitting the status line across RR/MLQF
    /// re-enqueues: the worker loop writes it exactly once per RCB.
    pub(crate) status_emitted: bool,
}

impl Rcb {
    pub(crate) fn new(
        seq_num: u64,
        socket: TcpStream,
        path: String,
        file: File,
        tot_bytes: u64,
    ) -> Self {
        Self {
            seq_num,
            socket,
            path,
            file,
            tot_bytes,
            snt_bytes: 0,
            tier: Tier::default(),
            status_emitted: false,
        }
    }

    /// Completion ⇔ `snt_bytes == tot_bytes` (invariant 2).
    pub(crate) const fn is_complete(&self) -> bool {
        self.snt_bytes >= self.tot_bytes
    }
}
