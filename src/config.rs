//! Command-line configuration (§6): `sws <port> <scheduler> <thread_count>`.

use clap::Parser;

/// A minimal HTTP/1.1 static file server with a pluggable request scheduler.
#[derive(Debug, Parser)]
#[command(name = "sws", version, about)]
pub(crate) struct Args {
    /// TCP port to listen on.
    pub(crate) port: u16,

    /// Scheduling policy: `SJF`, `RR`, or `MLQF`.
    pub(crate) scheduler: String,

    /// Number of worker threads (at least 1).
    pub(crate) thread_count: usize,
}

/// Validated server configuration, built from [`Args`] after checking the
/// constraints `clap` can't express as types (a nonzero port, a known
/// scheduler name, at least one worker thread).
pub(crate) struct Config {
    pub(crate) port: u16,
    pub(crate) scheduler: crate::scheduler::PolicyKind,
    pub(crate) thread_count: usize,
}

impl Config {
    /// Validates `args`, returning a human-readable reason on failure.
    ///
    /// Any failure here is fatal at startup (§7: "Unknown scheduler name"
    /// and malformed CLI arguments abort before accepting requests).
    pub(crate) fn from_args(args: Args) -> Result<Self, String> {
        if args.port == 0 {
            return Err("port must be a positive integer".to_string());
        }
        if args.thread_count == 0 {
            return Err("thread_count must be at least 1".to_string());
        }
        let scheduler = crate::scheduler::PolicyKind::parse(&args.scheduler)
            .ok_or_else(|| format!("unknown scheduler {:?} (expected SJF, RR, or MLQF)", args.scheduler))?;

        Ok(Self {
            port: args.port,
            scheduler,
            thread_count: args.thread_count,
        })
    }

    pub(crate) fn scheduler_name(&self) -> &'static str {
        self.scheduler.name()
    }
}
