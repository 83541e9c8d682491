//! sws - a minimal HTTP/1.1 static file server built around a pluggable
//! request scheduler.
//!
//! The server itself is deliberately small: `GET` a file, get back
//! `200`/`400`/`404` and nothing else (no headers, no persistent
//! connections, no TLS). What it actually demonstrates is the scheduler
//! sitting between the TCP accept loop and the worker pool, which can run
//! any of three policies selected once at startup:
//!
//! - **SJF** - Shortest Job First, a non-preemptive min-heap over file size.
//! - **RR** - Round-Robin, strict byte-quantum fairness over a single FIFO.
//! - **MLQF** - a three-tier Multi-Level Queue with Feedback that demotes
//!   long-running requests out of the way of short ones without knowing
//!   file sizes ahead of time.
//!
//! One accept thread (the producer) parses requests and opens files; N
//! worker threads (the consumers) dequeue request control blocks (RCBs)
//! and serve them in scheduler-defined quanta. A single mutex + condition
//! variable guards the active policy's queue state; `serve` itself always
//! runs without the lock held, since file and socket I/O dominate its cost
//! and must be parallelizable across workers.

mod config;
mod dispatcher;
mod errors;
mod scheduler;
mod server;
mod wire;

use clap::Parser;
use config::{Args, Config};
use dispatcher::Dispatcher;
use server::listener::Listener;
use std::{process::ExitCode, sync::Arc, thread};

fn main() -> ExitCode {
    env_logger::init();

    // clap prints its own usage/error text; §6 only requires it land on
    // stdout, which is where `Args::parse()` already sends `--help`/usage
    // output. We just need to make sure our own validation errors do too.
    let args = Args::parse();

    let config = match Config::from_args(args) {
        Ok(config) => config,
        Err(reason) => {
            println!("sws: {reason}");
            println!("usage: sws <port> <SJF|RR|MLQF> <thread_count>");
            return ExitCode::FAILURE;
        }
    };

    let listener = match Listener::bind(config.port) {
        Ok(listener) => listener,
        Err(error) => {
            log::error!("failed to bind port {}: {error}", config.port);
            return ExitCode::FAILURE;
        }
    };

    let dispatcher = Arc::new(Dispatcher::new(config.scheduler));
    log::info!(
        "sws listening on port {} with {} scheduler, {} worker thread(s)",
        config.port,
        config.scheduler_name(),
        config.thread_count
    );

    for id in 0..config.thread_count {
        let dispatcher = dispatcher.clone();
        if let Err(error) = thread::Builder::new()
            .name(format!("sws-worker-{id}"))
            .spawn(move || server::worker::run(&dispatcher))
        {
            log::error!("failed to spawn worker {id}: {error}");
            return ExitCode::FAILURE;
        }
    }

    listener.accept_loop(&dispatcher);
}
