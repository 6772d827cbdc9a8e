//! Byte sources with single-byte pushback.
//!
//! The scanner pulls one byte at a time and occasionally needs to give the
//! last byte back (a delimiter that belongs to the next token). [`ByteSource`]
//! captures exactly that contract; [`PushbackReader`] adapts any
//! [`std::io::Read`] and [`SliceSource`] walks an in-memory buffer.

use crate::error::{Error, Result};
use bytes::Bytes;
use std::io::{BufRead, BufReader, Read};

/// Sequential byte input that can undo its most recent read.
pub trait ByteSource {
    /// Read the next byte.
    ///
    /// Fails with [`Error::UnexpectedEof`] once the data is exhausted.
    fn read_byte(&mut self) -> Result<u8>;

    /// Push back the byte returned by the last successful [`read_byte`](Self::read_byte).
    ///
    /// At most one byte can be pending; a second call without an intervening
    /// read does nothing.
    fn unread_byte(&mut self);

    /// Number of bytes consumed so far, net of pushback.
    fn position(&self) -> usize;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_byte(&mut self) -> Result<u8> {
        (**self).read_byte()
    }

    fn unread_byte(&mut self) {
        (**self).unread_byte()
    }

    fn position(&self) -> usize {
        (**self).position()
    }
}

/// Buffered [`Read`] adapter with one byte of pushback.
#[derive(Debug)]
pub struct PushbackReader<R> {
    inner: BufReader<R>,
    last: Option<u8>,
    pending: Option<u8>,
    position: usize,
}

impl<R: Read> PushbackReader<R> {
    /// Wrap a reader.
    pub fn new(reader: R) -> Self {
        Self {
            inner: BufReader::new(reader),
            last: None,
            pending: None,
            position: 0,
        }
    }

    /// Unwrap into the underlying buffered reader.
    ///
    /// A byte still pending from [`unread_byte`](ByteSource::unread_byte) is lost.
    pub fn into_inner(self) -> BufReader<R> {
        self.inner
    }
}

impl<R: Read> ByteSource for PushbackReader<R> {
    fn read_byte(&mut self) -> Result<u8> {
        if let Some(b) = self.pending.take() {
            self.last = Some(b);
            self.position += 1;
            return Ok(b);
        }

        let b = loop {
            match self.inner.fill_buf() {
                Ok([]) => {
                    self.last = None;
                    return Err(Error::UnexpectedEof);
                },
                Ok(buf) => break buf[0],
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.last = None;
                    return Err(Error::Io(e));
                },
            }
        };
        self.inner.consume(1);
        self.last = Some(b);
        self.position += 1;
        Ok(b)
    }

    fn unread_byte(&mut self) {
        if let Some(b) = self.last.take() {
            self.pending = Some(b);
            self.position -= 1;
        }
    }

    fn position(&self) -> usize {
        self.position
    }
}

/// Cursor over an in-memory buffer.
#[derive(Debug, Clone)]
pub struct SliceSource {
    data: Bytes,
    pos: usize,
    can_unread: bool,
}

impl SliceSource {
    /// Create a source over `data`.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            pos: 0,
            can_unread: false,
        }
    }

    /// Create a source over a copy of `data`.
    pub fn from_slice(data: &[u8]) -> Self {
        Self::new(Bytes::copy_from_slice(data))
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> &[u8] {
        &self.data[self.pos..]
    }
}

impl ByteSource for SliceSource {
    fn read_byte(&mut self) -> Result<u8> {
        match self.data.get(self.pos) {
            Some(&b) => {
                self.pos += 1;
                self.can_unread = true;
                Ok(b)
            },
            None => {
                self.can_unread = false;
                Err(Error::UnexpectedEof)
            },
        }
    }

    fn unread_byte(&mut self) {
        if self.can_unread {
            self.pos -= 1;
            self.can_unread = false;
        }
    }

    fn position(&self) -> usize {
        self.pos
    }
}
