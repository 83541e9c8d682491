//! The TCP accept loop: the concrete realization of the
//! `network_init`/`network_wait`/`network_open` collaborator interface
//! from spec §6, and of `submit(fd)` from §4.5.
//!
//! This is the one piece of the system spec.md treats as an external
//! collaborator rather than part of the scheduler core; it exists here so
//! the crate is a runnable binary, not just a library of scheduling
//! primitives.

use crate::{dispatcher::Dispatcher, errors::ErrorKind, wire};
use socket2::{Domain, Socket, Type};
use std::{
    fs, io,
    net::{SocketAddr, TcpListener, TcpStream},
    io::{Read, Write},
};

/// Backlog for pending TCP connections, passed to `listen(2)`.
const LISTEN_BACKLOG: i32 = 1024;

pub(crate) struct Listener {
    tcp: TcpListener,
}

impl Listener {
    /// `network_init(port)`: binds and configures a listening socket.
    ///
    /// Uses `socket2` (carried over from the teacher crate) to set
    /// `SO_REUSEADDR` and an explicit backlog before handing the socket to
    /// `std::net`, which does the blocking accept loop.
    pub(crate) fn bind(port: u16) -> io::Result<Self> {
        let addr: SocketAddr = ([0, 0, 0, 0], port).into();
        let socket = Socket::new(Domain::IPV4, Type::STREAM, None)?;
        socket.set_reuse_address(true)?;
        socket.bind(&addr.into())?;
        socket.listen(LISTEN_BACKLOG)?;

        Ok(Self { tcp: socket.into() })
    }

    /// `network_wait()` + `network_open()`: blocks for the next
    /// connection and hands each accepted socket to `submit`.
    ///
    /// Never returns; the process exits only by external signal (§4.6).
    pub(crate) fn accept_loop(&self, dispatcher: &Dispatcher) -> ! {
        loop {
            match self.tcp.accept() {
                Ok((stream, _addr)) => submit(stream, dispatcher),
                Err(error) => {
                    log::debug!("accept failed: {error}");
                }
            }
        }
    }
}

/// `submit(fd)` (§4.5): reads the request line, validates `GET <path>`,
/// stats and opens the file, and hands a fully-formed RCB to the
/// dispatcher. Malformed requests and missing files are answered and
/// closed here without ever reaching a policy queue.
fn submit(mut socket: TcpStream, dispatcher: &Dispatcher) {
    let mut buf = [0u8; wire::REQUEST_READ_CAP];
    let n = match socket.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(error) => {
            log::debug!("read failed during submit: {error}");
            return;
        }
    };

    let path = match wire::parse_request_line(&buf[..n]) {
        Ok(path) => path,
        Err(_) => {
            reply_and_close(&mut socket, ErrorKind::InvalidMethod.as_http());
            return;
        }
    };

    match open_for_serving(path) {
        Ok((file, tot_bytes)) => {
            log::debug!("submitting {path:?} ({tot_bytes} bytes)");
            dispatcher.submit(socket, path.to_string(), file, tot_bytes);
        }
        Err(_) => {
            log::debug!("not found: {path:?}");
            reply_and_close(&mut socket, ErrorKind::NotFound.as_http());
        }
    }
}

/// Stats then opens the path (leading `/` stripped, relative to the
/// server's working directory), per §6.
fn open_for_serving(path: &str) -> io::Result<(fs::File, u64)> {
    let fs_path = wire::to_fs_path(path);
    let metadata = fs::metadata(fs_path)?;
    let file = fs::File::open(fs_path)?;
    Ok((file, metadata.len()))
}

fn reply_and_close(socket: &mut TcpStream, response: &[u8]) {
    let _ = socket.write_all(response);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpStream;
    use tempfile::NamedTempFile;

    fn connect_and_write(port: u16, request: &[u8]) -> TcpStream {
        let mut stream = TcpStream::connect(("127.0.0.1", port)).unwrap();
        stream.write_all(request).unwrap();
        stream
    }

    #[test]
    fn bad_request_gets_400_and_closes() {
        let listener = Listener::bind(0).unwrap();
        let port = listener.tcp.local_addr().unwrap().port();
        let dispatcher = Dispatcher::new(crate::scheduler::PolicyKind::Rr);

        let client = connect_and_write(port, b"POST /x HTTP/1.1\r\n\r\n");
        let (stream, _) = listener.tcp.accept().unwrap();
        submit(stream, &dispatcher);

        let mut response = Vec::new();
        let mut client = client;
        client.shutdown(std::net::Shutdown::Write).unwrap();
        client.read_to_end(&mut response).unwrap();
        assert_eq!(response, b"HTTP/1.1 400 Bad request\n\n");
    }

    #[test]
    fn missing_file_gets_404_and_closes() {
        let listener = Listener::bind(0).unwrap();
        let port = listener.tcp.local_addr().unwrap().port();
        let dispatcher = Dispatcher::new(crate::scheduler::PolicyKind::Rr);

        let client = connect_and_write(port, b"GET /does-not-exist HTTP/1.1\r\n\r\n");
        let (stream, _) = listener.tcp.accept().unwrap();
        submit(stream, &dispatcher);

        let mut response = Vec::new();
        let mut client = client;
        client.shutdown(std::net::Shutdown::Write).unwrap();
        client.read_to_end(&mut response).unwrap();
        assert_eq!(response, b"HTTP/1.1 404 File not found\n\n");
    }

    #[test]
    fn existing_file_is_submitted_to_the_dispatcher() {
        let listener = Listener::bind(0).unwrap();
        let port = listener.tcp.local_addr().unwrap().port();
        let dispatcher = Dispatcher::new(crate::scheduler::PolicyKind::Sjf);

        let mut tmp = NamedTempFile::new_in(".").unwrap();
        tmp.write_all(b"hello world").unwrap();
        let name = tmp.path().file_name().unwrap().to_str().unwrap().to_string();
        let request = format!("GET /{name} HTTP/1.1\r\n\r\n");

        let _client = connect_and_write(port, request.as_bytes());
        let (stream, _) = listener.tcp.accept().unwrap();
        submit(stream, &dispatcher);

        let rcb = dispatcher.next();
        assert_eq!(rcb.tot_bytes, 11);
    }
}
