use std::{error, fmt, io};

/// Failure kinds the request-parsing and serving path can produce.
///
/// Each variant maps to exactly one of the three literal response lines
/// the wire format allows (`400`, `404`, or an abandoned connection for
/// I/O failures, which never reach the client as a status line at all).
#[derive(Debug, PartialEq)]
pub(crate) enum ErrorKind {
    /// The request line was not `GET <path> ...`.
    InvalidMethod,
    /// The request line had no usable path, or the path was not valid UTF-8.
    InvalidUrl,
    /// `stat`/`open` on the requested path failed.
    NotFound,
    /// Heap growth for a policy's queue storage failed.
    #[allow(dead_code)]
    Allocation,
    /// Socket or file I/O failed mid-serve.
    Io(IoError),
}

impl ErrorKind {
    /// The literal bytes written to the client for this error, per the
    /// minimal wire format (no headers, no content-length).
    pub(crate) const fn as_http(&self) -> &'static [u8] {
        match self {
            ErrorKind::InvalidMethod | ErrorKind::InvalidUrl => b"HTTP/1.1 400 Bad request\n\n",
            ErrorKind::NotFound => b"HTTP/1.1 404 File not found\n\n",
            ErrorKind::Allocation | ErrorKind::Io(_) => b"",
        }
    }
}

impl error::Error for ErrorKind {}
impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl From<io::Error> for ErrorKind {
    fn from(err: io::Error) -> Self {
        ErrorKind::Io(IoError(err))
    }
}

#[derive(Debug)]
pub(crate) struct IoError(pub(crate) io::Error);

impl PartialEq for IoError {
    fn eq(&self, other: &Self) -> bool {
        self.0.kind() == other.0.kind()
    }
}
