//! Output substrates.
//!
//! A [`Sink`] is the write endpoint attached to an encoder: a fixed byte
//! buffer ([`SliceSink`]), a growable vector ([`VecSink`], `alloc`), or an
//! arbitrary writer behind a stage buffer ([`WriterSink`], `std` only).

use crate::{Error, ErrorCode};

#[cfg(feature = "alloc")]
use crate::alloc_util::try_reserve;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// The write endpoint of an encoder.
///
/// All multi-byte numeric writes are big-endian.
pub trait Sink {
    /// Append one byte.
    ///
    /// # Errors
    ///
    /// Returns an error if the substrate cannot accept the byte.
    fn write_byte(&mut self, byte: u8) -> Result<(), Error> {
        self.write_span(&[byte])
    }

    /// Append a byte span.
    ///
    /// # Errors
    ///
    /// Returns an error if the substrate cannot accept the bytes.
    fn write_span(&mut self, bytes: &[u8]) -> Result<(), Error>;

    /// Number of bytes accepted so far.
    fn position(&self) -> usize;
}

/// Buffer substrate: writes into a caller-provided fixed byte slice.
///
/// Exhaustion fails with [`ErrorCode::BufferOverflow`]; nothing is written
/// past the end.
pub struct SliceSink<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> SliceSink<'a> {
    /// Wrap a writable byte slice.
    #[must_use]
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// The written prefix of the buffer.
    #[must_use]
    pub fn written(&self) -> &[u8] {
        &self.buf[..self.pos]
    }
}

impl Sink for SliceSink<'_> {
    fn write_byte(&mut self, byte: u8) -> Result<(), Error> {
        if self.pos >= self.buf.len() {
            return Err(Error::new(ErrorCode::BufferOverflow, self.pos));
        }
        self.buf[self.pos] = byte;
        self.pos += 1;
        Ok(())
    }

    fn write_span(&mut self, bytes: &[u8]) -> Result<(), Error> {
        let end = self
            .pos
            .checked_add(bytes.len())
            .ok_or_else(|| Error::new(ErrorCode::BufferOverflow, self.pos))?;
        if end > self.buf.len() {
            return Err(Error::new(ErrorCode::BufferOverflow, self.pos));
        }
        self.buf[self.pos..end].copy_from_slice(bytes);
        self.pos = end;
        Ok(())
    }

    fn position(&self) -> usize {
        self.pos
    }
}

/// Growable substrate backed by a `Vec<u8>` with fallible growth.
#[cfg(feature = "alloc")]
#[derive(Default)]
pub struct VecSink {
    buf: Vec<u8>,
}

#[cfg(feature = "alloc")]
impl VecSink {
    /// Create an empty sink.
    #[must_use]
    pub const fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Create a sink with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut buf = Vec::new();
        let _ = buf.try_reserve(capacity);
        Self { buf }
    }

    /// Consume and return the written bytes.
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }

    /// Borrow the bytes written so far.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }
}

#[cfg(feature = "alloc")]
impl Sink for VecSink {
    fn write_byte(&mut self, byte: u8) -> Result<(), Error> {
        if self.buf.len() == self.buf.capacity() {
            let position = self.buf.len();
            try_reserve(&mut self.buf, 1, position)?;
        }
        self.buf.push(byte);
        Ok(())
    }

    fn write_span(&mut self, bytes: &[u8]) -> Result<(), Error> {
        let available = self.buf.capacity() - self.buf.len();
        if bytes.len() > available {
            let position = self.buf.len();
            try_reserve(&mut self.buf, bytes.len(), position)?;
        }
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    fn position(&self) -> usize {
        self.buf.len()
    }
}

/// Stream substrate: an arbitrary writer behind a stage buffer.
///
/// The stage buffer is flushed to the writer when it fills and on
/// [`WriterSink::finish`]; dropping the sink without finishing loses staged
/// bytes.
#[cfg(feature = "std")]
pub struct WriterSink<W> {
    writer: W,
    stage: alloc::boxed::Box<[u8]>,
    len: usize,
    flushed: usize,
}

#[cfg(feature = "std")]
impl<W: std::io::Write> WriterSink<W> {
    /// Wrap a writer with a stage buffer of `capacity` bytes.
    #[must_use]
    pub fn new(writer: W, capacity: usize) -> Self {
        Self {
            writer,
            stage: alloc::vec![0u8; capacity.max(1)].into_boxed_slice(),
            len: 0,
            flushed: 0,
        }
    }

    /// Flush staged bytes and the underlying writer, returning the writer.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn finish(mut self) -> Result<W, Error> {
        self.flush_stage()?;
        self.writer
            .flush()
            .map_err(|e| Error::new(ErrorCode::Io(e.kind()), self.position()))?;
        Ok(self.writer)
    }

    fn flush_stage(&mut self) -> Result<(), Error> {
        if self.len > 0 {
            let pos = self.position();
            self.writer
                .write_all(&self.stage[..self.len])
                .map_err(|e| Error::new(ErrorCode::Io(e.kind()), pos))?;
            self.flushed += self.len;
            self.len = 0;
        }
        Ok(())
    }
}

#[cfg(feature = "std")]
impl<W: std::io::Write> Sink for WriterSink<W> {
    fn write_span(&mut self, bytes: &[u8]) -> Result<(), Error> {
        if bytes.len() >= self.stage.len() {
            self.flush_stage()?;
            let pos = self.position();
            self.writer
                .write_all(bytes)
                .map_err(|e| Error::new(ErrorCode::Io(e.kind()), pos))?;
            self.flushed += bytes.len();
            return Ok(());
        }
        if self.len + bytes.len() > self.stage.len() {
            self.flush_stage()?;
        }
        self.stage[self.len..self.len + bytes.len()].copy_from_slice(bytes);
        self.len += bytes.len();
        Ok(())
    }

    fn position(&self) -> usize {
        self.flushed + self.len
    }
}
