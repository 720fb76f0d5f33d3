//! Storage backends the engine reads its source from.
//!
//! A [`FileSystem`] reports the node topology, the length of a named
//! resource and opens [`RecordReader`]s over byte ranges of it. Both shipped
//! backends frame records as newline-delimited lines through [`LineRecords`].

use anyhow::Result;
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

pub mod local;
pub mod s3;

/// The storage and topology collaborator of the engine.
///
/// Implementations must be safe to call from many partition tasks at once.
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// The ordered list of node ids the source may be split across.
    async fn nodes(&self) -> Result<Vec<String>>;

    /// Total length in bytes of the resource called `name`.
    async fn length(&self, name: &str) -> Result<u64>;

    /// Opens a forward-only record stream over `[start, end)` of `name`.
    async fn read_file(&self, name: &str, start: u64, end: u64) -> Result<Box<dyn RecordReader>>;
}

/// A forward-only stream of records.
#[async_trait]
pub trait RecordReader: Send {
    /// Returns the next record, or `Ok(None)` once the stream is exhausted.
    async fn read(&mut self) -> Result<Option<Bytes>>;
}

/// Newline-delimited records owned by one byte range.
///
/// A range owns every line that starts inside it. The inner reader must be
/// positioned at `start - 1` (or at `0` when `start == 0`): the byte before
/// `start` tells whether the first line began in an earlier range, in which
/// case it is skipped. The last owned line is read to its end even when that
/// lies past `end`.
pub struct LineRecords<R> {
    inner: R,
    start: u64,
    end: u64,
    pos: u64,
    aligned: bool,
    buf: Vec<u8>,
}

impl<R> LineRecords<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(inner: R, start: u64, end: u64) -> Self {
        Self {
            inner,
            start,
            end,
            pos: start,
            aligned: start == 0,
            buf: Vec::new(),
        }
    }

    /// Skips the tail of a line that started before this range.
    async fn align(&mut self) -> Result<()> {
        let mut previous = [0u8; 1];
        if self.inner.read(&mut previous).await? == 0 {
            // the source ends before our range does, nothing to skip
            return Ok(());
        }
        if previous[0] != b'\n' {
            self.buf.clear();
            let skipped = self.inner.read_until(b'\n', &mut self.buf).await?;
            self.pos += skipped as u64;
        }
        Ok(())
    }
}

#[async_trait]
impl<R> RecordReader for LineRecords<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn read(&mut self) -> Result<Option<Bytes>> {
        if !self.aligned {
            self.align().await?;
            self.aligned = true;
        }
        if self.pos >= self.end {
            return Ok(None);
        }
        self.buf.clear();
        let n = self.inner.read_until(b'\n', &mut self.buf).await?;
        if n == 0 {
            return Ok(None);
        }
        self.pos += n as u64;

        let mut line = BytesMut::from(&self.buf[..]);
        if line.ends_with(b"\n") {
            line.truncate(line.len() - 1);
            if line.ends_with(b"\r") {
                line.truncate(line.len() - 1);
            }
        }
        Ok(Some(line.freeze()))
    }
}

impl<R> std::fmt::Debug for LineRecords<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineRecords")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("pos", &self.pos)
            .finish()
    }
}

/// Offset a [`LineRecords`] reader for `[start, ..)` has to be opened at.
#[inline]
pub fn framing_offset(start: u64) -> u64 {
    start.saturating_sub(1)
}
