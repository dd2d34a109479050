//! Output trait for encoding, usable with and without `std`.
//!
//! Decoding works on byte slices, so only the write side needs an abstraction.
//! The trait uses a fixed `IoError` type so the encoder is written once for
//! both environments.

use core::fmt;

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

// Re-export ErrorKind for error construction
pub use embedded_io::ErrorKind;

/// I/O error type used by this crate.
///
/// In std mode, this wraps `std::io::Error`. In no_std mode, it contains an `ErrorKind`.
#[derive(Debug)]
pub struct IoError {
    #[cfg(feature = "std")]
    inner: std::io::Error,
    #[cfg(not(feature = "std"))]
    kind: ErrorKind,
}

impl IoError {
    /// Create a new error from an ErrorKind.
    #[cfg(not(feature = "std"))]
    #[inline]
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind }
    }

    /// Create a new error from an ErrorKind.
    #[cfg(feature = "std")]
    #[inline]
    pub fn new(kind: ErrorKind) -> Self {
        let io_kind = match kind {
            ErrorKind::NotFound => std::io::ErrorKind::NotFound,
            ErrorKind::PermissionDenied => std::io::ErrorKind::PermissionDenied,
            ErrorKind::AlreadyExists => std::io::ErrorKind::AlreadyExists,
            ErrorKind::InvalidInput => std::io::ErrorKind::InvalidInput,
            ErrorKind::Interrupted => std::io::ErrorKind::Interrupted,
            ErrorKind::WriteZero => std::io::ErrorKind::WriteZero,
            ErrorKind::OutOfMemory => std::io::ErrorKind::OutOfMemory,
            _ => std::io::ErrorKind::Other,
        };
        Self {
            inner: std::io::Error::new(io_kind, "write failed"),
        }
    }

    /// Returns the error kind.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        #[cfg(feature = "std")]
        {
            match self.inner.kind() {
                std::io::ErrorKind::NotFound => ErrorKind::NotFound,
                std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
                std::io::ErrorKind::AlreadyExists => ErrorKind::AlreadyExists,
                std::io::ErrorKind::InvalidInput => ErrorKind::InvalidInput,
                std::io::ErrorKind::Interrupted => ErrorKind::Interrupted,
                std::io::ErrorKind::WriteZero => ErrorKind::WriteZero,
                std::io::ErrorKind::OutOfMemory => ErrorKind::OutOfMemory,
                _ => ErrorKind::Other,
            }
        }
        #[cfg(not(feature = "std"))]
        {
            self.kind
        }
    }
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[cfg(feature = "std")]
        {
            fmt::Display::fmt(&self.inner, f)
        }
        #[cfg(not(feature = "std"))]
        {
            write!(f, "I/O error: {:?}", self.kind)
        }
    }
}

impl core::error::Error for IoError {
    #[cfg(feature = "std")]
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        core::error::Error::source(&self.inner)
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for IoError {
    #[inline]
    fn from(err: std::io::Error) -> Self {
        Self { inner: err }
    }
}

#[cfg(feature = "std")]
impl From<IoError> for std::io::Error {
    #[inline]
    fn from(err: IoError) -> Self {
        err.inner
    }
}

impl From<ErrorKind> for IoError {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

/// Result type for I/O operations.
pub type Result<T> = core::result::Result<T, IoError>;

/// Write trait for GIF encoding with unified error type.
pub trait Write {
    /// Write bytes from buffer, returning number of bytes written.
    fn write(&mut self, buf: &[u8]) -> Result<usize>;

    /// Write all bytes or error.
    fn write_all(&mut self, mut buf: &[u8]) -> Result<()> {
        while !buf.is_empty() {
            match self.write(buf) {
                Ok(0) => return Err(IoError::new(ErrorKind::WriteZero)),
                Ok(n) => buf = &buf[n..],
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Flush output.
    fn flush(&mut self) -> Result<()>;
}

#[cfg(feature = "std")]
impl<T: std::io::Write + ?Sized> Write for T {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        std::io::Write::write(self, buf).map_err(IoError::from)
    }

    #[inline]
    fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        std::io::Write::write_all(self, buf).map_err(IoError::from)
    }

    #[inline]
    fn flush(&mut self) -> Result<()> {
        std::io::Write::flush(self).map_err(IoError::from)
    }
}

// Infallible sink for the in-memory `encode`
#[cfg(not(feature = "std"))]
impl Write for Vec<u8> {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.extend_from_slice(buf);
        Ok(buf.len())
    }

    #[inline]
    fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        self.extend_from_slice(buf);
        Ok(())
    }

    #[inline]
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
