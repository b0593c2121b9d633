//! Connection Prefix Streams
//!
//! The matcher never consumes a connection. It asks a [`PrefixSource`] for
//! "the first `n` bytes", possibly several times with growing `n`, and the
//! source keeps everything it read so the connection can be handed to the
//! next stage untouched.
//!
//! Detecting bytes *past* a request must not wait for the peer: a client
//! that sent its request waits for the answer, so
//! [`fill_available`](PrefixSource::fill_available) only takes what has
//! already arrived.
//!
//! [`RewindStream`] is the tokio implementation: it wraps any
//! [`AsyncRead`], buffers the inspected prefix and, once inspection is over,
//! reads back as the original stream would have (prefix first, then the
//! rest of the connection).

use std::future::poll_fn;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, ReadBuf};

/// Bounded, rewindable access to the first bytes of a connection
#[async_trait]
pub trait PrefixSource: Send {
    /// Make sure the first `n` bytes are buffered.
    ///
    /// Returns how many of them are available: `n`, or fewer if the stream
    /// ended first. Must not read past byte `n` of the stream.
    async fn fill_to(&mut self, n: usize) -> io::Result<usize>;

    /// Buffer up to `n` bytes without waiting for more data to arrive.
    ///
    /// Returns how many of the first `n` bytes are buffered once the inner
    /// stream has nothing ready. Must not read past byte `n` of the stream.
    async fn fill_available(&mut self, n: usize) -> io::Result<usize>;

    /// Everything buffered so far, starting at the first byte of the stream
    fn buffered(&self) -> &[u8];
}

/// Stream wrapper that records the inspected prefix and replays it
#[derive(Debug)]
pub struct RewindStream<S> {
    inner: S,
    prefix: BytesMut,
    eof: bool,
    replay_pos: usize,
}

impl<S> RewindStream<S> {
    /// Wrap a stream whose first byte has not been read yet
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            prefix: BytesMut::new(),
            eof: false,
            replay_pos: 0,
        }
    }

    /// Whether the inner stream reported end of stream during inspection
    pub fn is_eof(&self) -> bool {
        self.eof
    }

    fn ensure_not_replaying(&self) -> io::Result<()> {
        if self.replay_pos > 0 {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                "prefix inspection after replay started",
            ));
        }
        Ok(())
    }

    /// Split into the inner stream and the bytes already read from it
    pub fn into_parts(self) -> (S, Bytes) {
        (self.inner, self.prefix.freeze())
    }
}

#[async_trait]
impl<S> PrefixSource for RewindStream<S>
where
    S: AsyncRead + Unpin + Send,
{
    async fn fill_to(&mut self, n: usize) -> io::Result<usize> {
        self.ensure_not_replaying()?;

        while self.prefix.len() < n && !self.eof {
            let want = n - self.prefix.len();
            self.prefix.reserve(want);
            let read = (&mut self.inner)
                .take(want as u64)
                .read_buf(&mut self.prefix)
                .await?;
            if read == 0 {
                self.eof = true;
            }
        }

        Ok(self.prefix.len().min(n))
    }

    async fn fill_available(&mut self, n: usize) -> io::Result<usize> {
        self.ensure_not_replaying()?;

        while self.prefix.len() < n && !self.eof {
            let mut chunk = vec![0u8; n - self.prefix.len()];
            let inner = &mut self.inner;
            // Pending means nothing has arrived yet
            let read = poll_fn(|cx| {
                let mut buf = ReadBuf::new(&mut chunk);
                match Pin::new(&mut *inner).poll_read(cx, &mut buf) {
                    Poll::Ready(Ok(())) => Poll::Ready(Ok(Some(buf.filled().len()))),
                    Poll::Ready(Err(e)) => Poll::Ready(Err(e)),
                    Poll::Pending => Poll::Ready(Ok(None)),
                }
            })
            .await?;

            match read {
                None => break,
                Some(0) => self.eof = true,
                Some(len) => self.prefix.extend_from_slice(&chunk[..len]),
            }
        }

        Ok(self.prefix.len().min(n))
    }

    fn buffered(&self) -> &[u8] {
        &self.prefix
    }
}

impl<S> AsyncRead for RewindStream<S>
where
    S: AsyncRead + Unpin,
{
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();

        if this.replay_pos < this.prefix.len() {
            let pending = &this.prefix[this.replay_pos..];
            let n = pending.len().min(buf.remaining());
            buf.put_slice(&pending[..n]);
            this.replay_pos += n;
            return Poll::Ready(Ok(()));
        }

        Pin::new(&mut this.inner).poll_read(cx, buf)
    }
}

impl<S> AsyncWrite for RewindStream<S>
where
    S: AsyncWrite + Unpin,
{
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.get_mut().inner).poll_write(cx, buf)
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_shutdown(cx)
    }
}
