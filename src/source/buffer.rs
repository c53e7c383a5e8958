//! Shared byte buffers and line iteration

use crate::error::{Error, Result};
use bytes::Bytes;
use memmap2::Mmap;
use std::fmt;
use std::fs::File;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A byte range inside a [`ByteSource`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Offset of the first byte
    pub offset: usize,
    /// Number of bytes
    pub len: usize,
}

impl Span {
    /// Create a new span
    pub const fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }

    /// The empty span, used for values that have no bytes (absent fields)
    pub const fn empty() -> Self {
        Self { offset: 0, len: 0 }
    }

    /// Check if the span covers no bytes
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Offset one past the last byte
    pub const fn end(&self) -> usize {
        self.offset + self.len
    }

    /// Convert to a slice range
    pub const fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.len
    }
}

enum SourceData {
    Memory(Bytes),
    Mapped(Mmap),
}

impl SourceData {
    fn as_slice(&self) -> &[u8] {
        match self {
            SourceData::Memory(bytes) => &bytes[..],
            SourceData::Mapped(mmap) => &mmap[..],
        }
    }
}

struct SourceInner {
    data: SourceData,
    path: Option<PathBuf>,
}

/// Reference-counted, read-only bytes of a JSON-lines file
///
/// Cloning is cheap: every clone shares the same buffer or mapping, which is
/// released when the last dataset referring to it is dropped.
#[derive(Clone)]
pub struct ByteSource {
    inner: Arc<SourceInner>,
}

impl ByteSource {
    /// Wrap an in-memory buffer
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        Self {
            inner: Arc::new(SourceInner {
                data: SourceData::Memory(bytes.into()),
                path: None,
            }),
        }
    }

    /// Memory-map a file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| open_error(path, e))?;
        let len = file.metadata()?.len();

        // Zero-length mappings are rejected by some platforms
        let data = if len == 0 {
            SourceData::Memory(Bytes::new())
        } else {
            // SAFETY: the mapping is read-only; callers must not truncate the
            // file while a dataset built over it is alive.
            let mmap = unsafe { Mmap::map(&file) }?;
            SourceData::Mapped(mmap)
        };

        tracing::debug!(path = %path.display(), bytes = len, "mapped source file");
        Ok(Self {
            inner: Arc::new(SourceInner {
                data,
                path: Some(path.to_path_buf()),
            }),
        })
    }

    /// Read a whole file into memory
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read(path).map_err(|e| open_error(path, e))?;

        tracing::debug!(path = %path.display(), bytes = contents.len(), "read source file");
        Ok(Self {
            inner: Arc::new(SourceInner {
                data: SourceData::Memory(Bytes::from(contents)),
                path: Some(path.to_path_buf()),
            }),
        })
    }

    /// All bytes of the source
    pub fn as_bytes(&self) -> &[u8] {
        self.inner.data.as_slice()
    }

    /// Bytes covered by a span
    ///
    /// Spans always come from this source, so an out-of-bounds span yields an
    /// empty slice instead of panicking.
    pub fn slice(&self, span: Span) -> &[u8] {
        self.as_bytes().get(span.range()).unwrap_or_default()
    }

    /// Total size in bytes
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Check if the source has no bytes
    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    /// File the source was opened from, if any
    pub fn path(&self) -> Option<&Path> {
        self.inner.path.as_deref()
    }

    /// Check if the source is memory-mapped
    pub fn is_mapped(&self) -> bool {
        matches!(self.inner.data, SourceData::Mapped(_))
    }

    /// Check if two handles share the same underlying bytes
    pub fn ptr_eq(&self, other: &ByteSource) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Iterate over the record spans of this source
    pub fn records(&self, skip_blank_lines: bool) -> Records<'_> {
        Records {
            bytes: self.as_bytes(),
            pos: 0,
            skip_blank_lines,
        }
    }
}

impl fmt::Debug for ByteSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteSource")
            .field("path", &self.inner.path)
            .field("len", &self.len())
            .field("mapped", &self.is_mapped())
            .finish()
    }
}

impl From<Vec<u8>> for ByteSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<String> for ByteSource {
    fn from(text: String) -> Self {
        Self::from_bytes(text.into_bytes())
    }
}

impl From<&'static str> for ByteSource {
    fn from(text: &'static str) -> Self {
        Self::from_bytes(Bytes::from_static(text.as_bytes()))
    }
}

fn open_error(path: &Path, e: std::io::Error) -> Error {
    if e.kind() == std::io::ErrorKind::NotFound {
        Error::FileNotFound {
            path: path.display().to_string(),
        }
    } else {
        Error::Io(e)
    }
}

/// Iterator over the record spans of a [`ByteSource`]
///
/// Each line is one record. The line terminator (`\n` or `\r\n`) is not part
/// of the span.
#[derive(Debug, Clone)]
pub struct Records<'a> {
    bytes: &'a [u8],
    pos: usize,
    skip_blank_lines: bool,
}

impl Iterator for Records<'_> {
    type Item = Span;

    fn next(&mut self) -> Option<Span> {
        while self.pos < self.bytes.len() {
            let start = self.pos;
            let rest = &self.bytes[start..];
            let (line_len, advance) = match rest.iter().position(|&b| b == b'\n') {
                Some(i) => (i, i + 1),
                None => (rest.len(), rest.len()),
            };
            self.pos += advance;

            let mut line = &rest[..line_len];
            if let Some(stripped) = line.strip_suffix(b"\r") {
                line = stripped;
            }

            if self.skip_blank_lines && line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            return Some(Span::new(start, line.len()));
        }
        None
    }
}
