//! Archive sources, and telling their read failures apart from format errors.
//!
//! Format code tends to swallow or rewrap I/O errors: zip detection reports
//! "not a zip", the 7z reader turns everything into its own error type. A
//! `TrackedSource` remembers the first failed read so the extractor can still
//! treat a locked or vanished source as such.

use std::cell::Cell;
use std::io;
use std::io::Read;
use std::io::Seek;
use std::io::SeekFrom;
use std::rc::Rc;

/// A readable, seekable archive source, as handed out by a
/// [`SourceOpener`](crate::SourceOpener).
pub trait SourceReader: Read + Seek + Send {}

impl<T: Read + Seek + Send> SourceReader for T {}

#[derive(Debug, Clone, Copy)]
struct Fault {
    kind: io::ErrorKind,
    os_code: Option<i32>,
}

impl Fault {
    fn of(err: &io::Error) -> Self {
        Self {
            kind: err.kind(),
            os_code: err.raw_os_error(),
        }
    }

    fn into_error(self) -> io::Error {
        self.os_code
            .map_or_else(|| io::Error::from(self.kind), io::Error::from_raw_os_error)
    }
}

/// Reader wrapper recording the first failed `read`.
///
/// Seek errors are passed through unrecorded: format detection may seek
/// before the start of short files.
pub(crate) struct TrackedSource<R> {
    inner: R,
    fault: Rc<Cell<Option<Fault>>>,
}

/// Read side of a `TrackedSource`'s fault record.
#[derive(Debug, Clone)]
pub(crate) struct SourceFault(Rc<Cell<Option<Fault>>>);

impl SourceFault {
    /// Rebuilds the first read error seen, keeping its OS code.
    pub(crate) fn error(&self) -> Option<io::Error> {
        self.0.get().map(Fault::into_error)
    }
}

impl<R> TrackedSource<R> {
    pub(crate) fn new(inner: R) -> (Self, SourceFault) {
        let fault = Rc::new(Cell::new(None));
        let handle = SourceFault(Rc::clone(&fault));
        (Self { inner, fault }, handle)
    }

    fn record(&self, err: &io::Error) {
        if err.kind() != io::ErrorKind::Interrupted && self.fault.get().is_none() {
            self.fault.set(Some(Fault::of(err)));
        }
    }
}

impl<R: Read> Read for TrackedSource<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let result = self.inner.read(buf);
        if let Err(e) = &result {
            self.record(e);
        }
        result
    }
}

impl<R: Seek> Seek for TrackedSource<R> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}
