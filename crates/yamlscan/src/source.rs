//! Pull-based byte sources the scanner reads from.

use alloc::boxed::Box;

/// A pull-based provider of raw bytes.
///
/// The scanner calls [`fill`](ByteSource::fill) whenever it runs out of
/// buffered input. Implementations are synchronous; a source that blocks or
/// never reports end of input blocks the scanner with it.
pub trait ByteSource {
    /// Writes up to `max_len` bytes into `buffer[offset..]`.
    ///
    /// Returns `Some(n)` with the number of bytes written, which may be less
    /// than requested, or `None` when the input is exhausted and nothing was
    /// written.
    ///
    /// An empty `buffer` or a `max_len` of zero is a no-op returning
    /// `Some(0)`.
    ///
    /// # Panics
    ///
    /// Implementations panic when `offset >= buffer.len()` on a non-empty
    /// buffer.
    fn fill(&mut self, buffer: &mut [u8], offset: usize, max_len: usize) -> Option<usize>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn fill(&mut self, buffer: &mut [u8], offset: usize, max_len: usize) -> Option<usize> {
        (**self).fill(buffer, offset, max_len)
    }
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    fn fill(&mut self, buffer: &mut [u8], offset: usize, max_len: usize) -> Option<usize> {
        (**self).fill(buffer, offset, max_len)
    }
}

/// Validates a `fill` request and returns how many bytes fit in the window.
fn window(buffer: &[u8], offset: usize, max_len: usize) -> usize {
    if buffer.is_empty() || max_len == 0 {
        return 0;
    }
    assert!(
        offset < buffer.len(),
        "fill offset {offset} out of bounds for a buffer of length {}",
        buffer.len()
    );
    max_len.min(buffer.len() - offset)
}

/// Byte source over an in-memory slice.
///
/// An optional chunk size caps every read, which exercises the scanner's
/// handling of partial reads.
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    bytes: &'a [u8],
    position: usize,
    chunk_size: usize,
}

impl<'a> SliceSource<'a> {
    /// Reads `bytes` in as few calls as the scanner's buffer allows.
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self::with_chunk_size(bytes, usize::MAX)
    }

    /// Reads `bytes` at most `chunk_size` bytes at a time.
    ///
    /// A `chunk_size` of zero is treated as one.
    #[must_use]
    pub fn with_chunk_size(bytes: &'a [u8], chunk_size: usize) -> Self {
        Self {
            bytes,
            position: 0,
            chunk_size: chunk_size.max(1),
        }
    }
}

impl ByteSource for SliceSource<'_> {
    fn fill(&mut self, buffer: &mut [u8], offset: usize, max_len: usize) -> Option<usize> {
        let window = window(buffer, offset, max_len);
        if window == 0 {
            return Some(0);
        }
        let remaining = &self.bytes[self.position..];
        if remaining.is_empty() {
            return None;
        }
        let count = remaining.len().min(window).min(self.chunk_size);
        buffer[offset..offset + count].copy_from_slice(&remaining[..count]);
        self.position += count;
        Some(count)
    }
}

/// Byte source over an iterator of chunks, such as pieces of a network
/// stream.
///
/// Each read is served from a single chunk, so chunk boundaries surface to
/// the scanner as short reads. Empty chunks are skipped.
pub struct ChunkSource<I: Iterator> {
    chunks: I,
    current: Option<I::Item>,
    position: usize,
}

impl<I> ChunkSource<I>
where
    I: Iterator,
    I::Item: AsRef<[u8]>,
{
    /// Wraps anything that yields byte chunks.
    pub fn new<T>(chunks: T) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        Self {
            chunks: chunks.into_iter(),
            current: None,
            position: 0,
        }
    }
}

impl<I> ByteSource for ChunkSource<I>
where
    I: Iterator,
    I::Item: AsRef<[u8]>,
{
    fn fill(&mut self, buffer: &mut [u8], offset: usize, max_len: usize) -> Option<usize> {
        let window = window(buffer, offset, max_len);
        if window == 0 {
            return Some(0);
        }
        loop {
            if let Some(chunk) = &self.current {
                let remaining = &chunk.as_ref()[self.position..];
                if !remaining.is_empty() {
                    let count = remaining.len().min(window);
                    buffer[offset..offset + count].copy_from_slice(&remaining[..count]);
                    self.position += count;
                    return Some(count);
                }
            }
            self.current = Some(self.chunks.next()?);
            self.position = 0;
        }
    }
}

#[cfg(feature = "std")]
pub use self::reader::ReaderSource;

#[cfg(feature = "std")]
mod reader {
    use std::io::{ErrorKind, Read};

    use tracing::warn;

    use super::{ByteSource, window};

    /// Byte source over any [`std::io::Read`].
    ///
    /// An I/O error other than `Interrupted` is logged and treated as end of
    /// input.
    #[derive(Debug)]
    pub struct ReaderSource<R> {
        inner: R,
        done: bool,
    }

    impl<R: Read> ReaderSource<R> {
        /// Wraps a reader.
        pub fn new(inner: R) -> Self {
            Self { inner, done: false }
        }

        /// Returns the wrapped reader.
        pub fn into_inner(self) -> R {
            self.inner
        }
    }

    impl<R: Read> ByteSource for ReaderSource<R> {
        fn fill(&mut self, buffer: &mut [u8], offset: usize, max_len: usize) -> Option<usize> {
            let window = window(buffer, offset, max_len);
            if window == 0 {
                return Some(0);
            }
            if self.done {
                return None;
            }
            loop {
                match self.inner.read(&mut buffer[offset..offset + window]) {
                    Ok(0) => {
                        self.done = true;
                        return None;
                    }
                    Ok(read) => return Some(read),
                    Err(err) if err.kind() == ErrorKind::Interrupted => {}
                    Err(err) => {
                        warn!(error = %err, "byte source read failed; treating as end of input");
                        self.done = true;
                        return None;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn slice_source_honours_chunk_size_and_window() {
        let mut source = SliceSource::with_chunk_size(b"abcdef", 4);
        let mut buffer = [0u8; 8];
        assert_eq!(source.fill(&mut buffer, 1, 8), Some(4));
        assert_eq!(&buffer[1..5], b"abcd");
        assert_eq!(source.fill(&mut buffer, 6, 8), Some(2));
        assert_eq!(&buffer[6..8], b"ef");
        assert_eq!(source.fill(&mut buffer, 0, 8), None);
    }

    #[test]
    fn empty_requests_are_no_ops() {
        let mut source = SliceSource::new(b"abc");
        assert_eq!(source.fill(&mut [], 0, 4), Some(0));
        assert_eq!(source.fill(&mut [0u8; 4], 0, 0), Some(0));
        let mut exhausted = SliceSource::new(b"");
        assert_eq!(exhausted.fill(&mut [0u8; 4], 0, 0), Some(0));
        assert_eq!(exhausted.fill(&mut [0u8; 4], 0, 4), None);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn offset_past_the_buffer_panics() {
        let mut source = SliceSource::new(b"abc");
        let _ = source.fill(&mut [0u8; 4], 4, 1);
    }

    #[test]
    fn chunk_source_reads_one_chunk_at_a_time() {
        let mut source = ChunkSource::new(vec![&b"ab"[..], &b""[..], &b"cde"[..]]);
        let mut buffer = [0u8; 4];
        assert_eq!(source.fill(&mut buffer, 0, 4), Some(2));
        assert_eq!(source.fill(&mut buffer, 2, 2), Some(2));
        assert_eq!(&buffer, b"abcd");
        assert_eq!(source.fill(&mut buffer, 0, 4), Some(1));
        assert_eq!(buffer[0], b'e');
        assert_eq!(source.fill(&mut buffer, 0, 4), None);
    }

    #[cfg(feature = "std")]
    #[test]
    fn reader_source_reads_until_eof() {
        let mut source = ReaderSource::new(std::io::Cursor::new(b"xyz".to_vec()));
        let mut buffer = [0u8; 2];
        assert_eq!(source.fill(&mut buffer, 0, 2), Some(2));
        assert_eq!(source.fill(&mut buffer, 0, 2), Some(1));
        assert_eq!(source.fill(&mut buffer, 0, 2), None);
    }
}
