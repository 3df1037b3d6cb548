//! Byte source and sink contracts for the resync engine
//!
//! The engine only needs sequential reads and whole-packet writes, so
//! both sides are expressed as traits; core tests run against in-memory
//! buffers instead of real file descriptors.

use crate::error::ResyncError;
use std::io::{ErrorKind, Read, Write};

/// Sequential byte producer feeding the resync engine.
pub trait ByteSource {
    /// Fill `buf` completely if possible and return the number of bytes
    /// obtained. A result smaller than `buf.len()` means the stream is
    /// exhausted; short reads are retried internally and never surface.
    fn read_fill(&mut self, buf: &mut [u8]) -> Result<usize, ResyncError>;
}

/// Packet consumer on the output side.
pub trait ByteSink {
    /// Write one packet. Failure is fatal for the run; a partial write to
    /// a stream sink cannot be retried safely.
    fn write_packet(&mut self, packet: &[u8]) -> Result<(), ResyncError>;

    /// Flush buffered output. Called once when the run terminates.
    fn flush(&mut self) -> Result<(), ResyncError> {
        Ok(())
    }
}

/// Adapter exposing any [`Read`] as a [`ByteSource`]
#[derive(Debug)]
pub struct ReadSource<R> {
    inner: R,
}

impl<R: Read> ReadSource<R> {
    /// Wrap a reader
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Unwrap the reader
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> ByteSource for ReadSource<R> {
    fn read_fill(&mut self, buf: &mut [u8]) -> Result<usize, ResyncError> {
        let mut got = 0;
        while got < buf.len() {
            match self.inner.read(&mut buf[got..]) {
                Ok(0) => break,
                Ok(n) => got += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(got)
    }
}

/// Adapter exposing any [`Write`] as a [`ByteSink`]
#[derive(Debug)]
pub struct WriteSink<W> {
    inner: W,
}

impl<W: Write> WriteSink<W> {
    /// Wrap a writer
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Unwrap the writer
    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Borrow the writer
    pub fn get_ref(&self) -> &W {
        &self.inner
    }
}

impl<W: Write> ByteSink for WriteSink<W> {
    fn write_packet(&mut self, packet: &[u8]) -> Result<(), ResyncError> {
        self.inner.write_all(packet).map_err(Into::into)
    }

    fn flush(&mut self) -> Result<(), ResyncError> {
        self.inner.flush().map_err(Into::into)
    }
}
