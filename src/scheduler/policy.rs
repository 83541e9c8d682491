use crate::{
    scheduler::rcb::Rcb,
    wire::CHUNK_SIZE,
};
use std::io::{self, Read, Write};

/// The three scheduling policies this server can run, selected once at
/// startup from the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PolicyKind {
    /// Shortest Job First: non-preemptive, keyed by total file size.
    Sjf,
    /// Round-Robin: one fixed 8 KiB quantum per serve.
    Rr,
    /// Multi-Level Queue with Feedback: three priority tiers with demotion.
    Mlqf,
}

impl PolicyKind {
    pub(crate) fn parse(name: &str) -> Option<Self> {
        match name {
            "SJF" => Some(PolicyKind::Sjf),
            "RR" => Some(PolicyKind::Rr),
            "MLQF" => Some(PolicyKind::Mlqf),
            _ => None,
        }
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            PolicyKind::Sjf => "SJF",
            PolicyKind::Rr => "RR",
            PolicyKind::Mlqf => "MLQF",
        }
    }
}

/// Queue storage behind the dispatcher's single mutex. Every policy
/// provides its own layout (SJF's heap, RR's single FIFO, MLQF's three
/// FIFOs) but exposes the same `insert`/`dequeue` contract (§4.1).
///
/// `insert` and `dequeue` always run with the dispatcher mutex held; they
/// must not block.
pub(crate) trait Queue: Send {
    fn insert(&mut self, rcb: Rcb);
    fn dequeue(&mut self) -> Option<Rcb>;
}

/// Outcome of one `serve` invocation (one scheduling quantum, or — for
/// SJF — the entire remaining transfer).
pub(crate) enum ServeOutcome {
    /// `snt_bytes == tot_bytes`; the RCB is destroyed.
    Completed,
    /// The quantum ended without finishing; the caller re-enqueues the
    /// RCB (possibly after demoting its tier).
    Requeue,
    /// Socket write or file read failed; the caller abandons the RCB
    /// without re-enqueueing it.
    IoError,
}

impl PolicyKind {
    /// How many `CHUNK_SIZE` read/write cycles make up one quantum for
    /// this policy and tier (§4.2–§4.4).
    fn quantum_chunks(self, rcb: &Rcb) -> usize {
        match self {
            PolicyKind::Sjf => usize::MAX,
            PolicyKind::Rr => 1,
            PolicyKind::Mlqf => match rcb.tier {
                crate::scheduler::rcb::Tier::T0 => 1,
                crate::scheduler::rcb::Tier::T1 | crate::scheduler::rcb::Tier::T2 => 8,
            },
        }
    }

    /// Runs one scheduling unit of work against `rcb`, bounded by the
    /// policy's quantum, using `buf` as thread-local scratch space.
    ///
    /// SJF's quantum is unbounded (`usize::MAX` chunks): since its key
    /// never changes after submission, preemption gains nothing, so it
    /// runs every quantum to completion in a single `serve` call.
    pub(crate) fn serve(self, rcb: &mut Rcb, buf: &mut [u8; CHUNK_SIZE]) -> ServeOutcome {
        for _ in 0..self.quantum_chunks(rcb) {
            if rcb.is_complete() {
                break;
            }
            match copy_chunk(rcb, buf) {
                Ok(()) => {}
                Err(_) => return ServeOutcome::IoError,
            }
        }

        if rcb.is_complete() {
            return ServeOutcome::Completed;
        }

        if self == PolicyKind::Mlqf {
            rcb.tier = rcb.tier.demote();
        }
        ServeOutcome::Requeue
    }
}

/// Reads up to `CHUNK_SIZE` bytes from `rcb.file` and writes them to
/// `rcb.socket`, advancing `snt_bytes`. A short read near EOF completes
/// the RCB mid-quantum rather than treating the read as an error (§4.4
/// edge cases).
fn copy_chunk(rcb: &mut Rcb, buf: &mut [u8; CHUNK_SIZE]) -> io::Result<()> {
    let remaining = rcb.tot_bytes - rcb.snt_bytes;
    let want = (remaining as usize).min(CHUNK_SIZE);

    let n = rcb.file.read(&mut buf[..want])?;
    if n == 0 {
        // Unexpected EOF before tot_bytes is reached: treat the file as
        // fully drained rather than looping forever on zero-byte reads.
        rcb.snt_bytes = rcb.tot_bytes;
        return Ok(());
    }

    rcb.socket.write_all(&buf[..n])?;
    rcb.snt_bytes += n as u64;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_scheduler_names() {
        assert_eq!(PolicyKind::parse("SJF"), Some(PolicyKind::Sjf));
        assert_eq!(PolicyKind::parse("RR"), Some(PolicyKind::Rr));
        assert_eq!(PolicyKind::parse("MLQF"), Some(PolicyKind::Mlqf));
    }

    #[test]
    fn rejects_unknown_or_lowercase_names() {
        assert_eq!(PolicyKind::parse("sjf"), None);
        assert_eq!(PolicyKind::parse("FIFO"), None);
        assert_eq!(PolicyKind::parse(""), None);
    }
}

/// Exercises `serve`'s quantum behavior per policy (spec §8 invariants
/// 5-11, scenario S3), over a real loopback socket and on-disk file so
/// `copy_chunk`'s read/write/counter-advance loop runs for real.
#[cfg(test)]
mod serve_tests {
    use super::*;
    use crate::scheduler::rcb::{Rcb, Tier};
    use std::{
        fs::File,
        net::{TcpListener, TcpStream},
    };
    use tempfile::NamedTempFile;

    /// Builds an `Rcb` over a real loopback socket pair and a temp file
    /// containing `tot_bytes` bytes, returning the client-side socket (to
    /// read back what `serve` writes) and the temp file (kept alive for
    /// the test's duration).
    fn make_rcb(tot_bytes: u64) -> (Rcb, TcpStream, NamedTempFile) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server_side = TcpStream::connect(addr).unwrap();
        let (client_side, _) = listener.accept().unwrap();

        let mut tmp = NamedTempFile::new().unwrap();
        tmp.write_all(&vec![b'x'; tot_bytes as usize]).unwrap();
        let file = File::open(tmp.path()).unwrap();

        (
            Rcb::new(1, server_side, "/x".into(), file, tot_bytes),
            client_side,
            tmp,
        )
    }

    /// Spawns a thread draining `client` into a `Vec` concurrently, so
    /// `serve`'s blocking writes never stall waiting for this test to get
    /// around to reading the socket.
    fn spawn_drain(mut client: TcpStream) -> std::thread::JoinHandle<Vec<u8>> {
        std::thread::spawn(move || {
            let mut received = Vec::new();
            client.read_to_end(&mut received).ok();
            received
        })
    }

    #[test]
    fn sjf_runs_to_completion_in_one_serve_call() {
        let (mut rcb, client, _tmp) = make_rcb(3 * CHUNK_SIZE as u64);
        let drain = spawn_drain(client);
        let mut buf = [0u8; CHUNK_SIZE];

        let outcome = PolicyKind::Sjf.serve(&mut rcb, &mut buf);

        assert!(matches!(outcome, ServeOutcome::Completed));
        assert_eq!(rcb.snt_bytes, rcb.tot_bytes);
        drop(rcb); // closes the socket so the drain thread's read sees EOF
        assert_eq!(drain.join().unwrap().len(), 3 * CHUNK_SIZE);
    }

    #[test]
    fn rr_serve_writes_at_most_one_chunk() {
        let (mut rcb, client, _tmp) = make_rcb(3 * CHUNK_SIZE as u64);
        let drain = spawn_drain(client);
        let mut buf = [0u8; CHUNK_SIZE];

        let outcome = PolicyKind::Rr.serve(&mut rcb, &mut buf);

        assert!(matches!(outcome, ServeOutcome::Requeue));
        assert_eq!(rcb.snt_bytes, CHUNK_SIZE as u64);
        drop(rcb);
        assert_eq!(drain.join().unwrap().len(), CHUNK_SIZE);
    }

    #[test]
    fn rr_serve_completes_a_file_smaller_than_one_quantum() {
        let (mut rcb, client, _tmp) = make_rcb(100);
        let drain = spawn_drain(client);
        let mut buf = [0u8; CHUNK_SIZE];

        let outcome = PolicyKind::Rr.serve(&mut rcb, &mut buf);

        assert!(matches!(outcome, ServeOutcome::Completed));
        assert_eq!(rcb.snt_bytes, 100);
        drop(rcb);
        assert_eq!(drain.join().unwrap().len(), 100);
    }

    /// Replicates S3: a 200000-byte file served under MLQF demotes
    /// T0 -> T1 -> T2, draining 8192 then 65536 then the remaining
    /// 126272 bytes across at least two T2 quanta.
    #[test]
    fn mlqf_demotes_through_tiers_matching_scenario_s3() {
        let (mut rcb, client, _tmp) = make_rcb(200_000);
        let drain = spawn_drain(client);
        let mut buf = [0u8; CHUNK_SIZE];
        assert_eq!(rcb.tier, Tier::T0);

        let outcome = PolicyKind::Mlqf.serve(&mut rcb, &mut buf);
        assert!(matches!(outcome, ServeOutcome::Requeue));
        assert_eq!(rcb.tier, Tier::T1);
        assert_eq!(rcb.snt_bytes, CHUNK_SIZE as u64);

        let outcome = PolicyKind::Mlqf.serve(&mut rcb, &mut buf);
        assert!(matches!(outcome, ServeOutcome::Requeue));
        assert_eq!(rcb.tier, Tier::T2);
        assert_eq!(rcb.snt_bytes, 9 * CHUNK_SIZE as u64);

        let outcome = PolicyKind::Mlqf.serve(&mut rcb, &mut buf);
        assert!(matches!(outcome, ServeOutcome::Requeue));
        assert_eq!(rcb.tier, Tier::T2);
        assert_eq!(rcb.snt_bytes, 17 * CHUNK_SIZE as u64);

        let outcome = PolicyKind::Mlqf.serve(&mut rcb, &mut buf);
        assert!(matches!(outcome, ServeOutcome::Completed));
        assert_eq!(rcb.snt_bytes, 200_000);

        drop(rcb);
        assert_eq!(drain.join().unwrap().len(), 200_000);
    }
}
