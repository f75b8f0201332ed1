//! Byte buffer with read/write cursors, pluggable overflow/underflow
//! policy, and optional OS-backed sync.
//!
//! The C source (`vf_buf`) carries `read_check`/`write_check`/`sync` as
//! raw function pointers taking the buffer itself, so one struct can be
//! specialized six ways at construction time. Rust has no clean way to
//! store `fn(&mut Self, ...)` on `Self` without unsafe aliasing tricks,
//! so the policy is a closed `Role` enum matched in `read_check`/
//! `write_check` instead — same six behaviors, no function pointers.

use std::fs::File;
use std::io::{Read as IoRead, Write as IoWrite};

use crate::error::{Error, Result};

/// Initial window size for file-backed buffers, matching the C source's
/// `vf_buffered_reader_fd`/`vf_buffered_writer_fd` (4096 bytes).
const FILE_WINDOW: usize = 4096;

enum Storage<'a> {
    Owned(Vec<u8>),
    Borrowed(&'a mut [u8]),
}

impl<'a> Storage<'a> {
    fn as_slice(&self) -> &[u8] {
        match self {
            Storage::Owned(v) => v,
            Storage::Borrowed(s) => s,
        }
    }

    fn as_mut_slice(&mut self) -> &mut [u8] {
        match self {
            Storage::Owned(v) => v,
            Storage::Borrowed(s) => s,
        }
    }

    fn len(&self) -> usize {
        self.as_slice().len()
    }
}

/// Capacity-check policy, selected by the factory used to create the
/// buffer. See spec §4.1 for the behavior each variant implements.
enum Role {
    /// Fixed-capacity buffer with no OS backing (`vf_buf_new`,
    /// `vf_buf_memory_new`): both read and write are bounds-checked
    /// against the current markers, neither grows nor syncs.
    Fixed,
    /// Growable buffer (`vf_resizable_buf_new`): writes grow the
    /// backing store to the next power of two; reads are bounds-checked.
    Resizable,
    /// File-backed reader (`vf_buffered_reader_fd`): reads trigger a
    /// compact + refill from `file` when they would underflow; writes
    /// are never permitted.
    ReaderFd,
    /// File-backed writer (`vf_buffered_writer_fd`): writes trigger a
    /// compact + drain to `file` when they would overflow; reads are
    /// never permitted.
    WriterFd,
}

/// A byte buffer with independent read and write cursors.
pub struct Buffer<'a> {
    storage: Storage<'a>,
    read_marker: usize,
    write_marker: usize,
    role: Role,
    file: Option<File>,
}

macro_rules! write_le {
    ($name:ident, $t:ty) => {
        pub fn $name(&mut self, val: $t) -> Result<usize> {
            let bytes = val.to_le_bytes();
            self.write_bytes(&bytes)
        }
    };
}

macro_rules! read_le {
    ($name:ident, $t:ty, $n:expr) => {
        pub fn $name(&mut self) -> Result<$t> {
            let mut buf = [0u8; $n];
            self.read_bytes(&mut buf)?;
            Ok(<$t>::from_le_bytes(buf))
        }
    };
}

impl<'a> Buffer<'a> {
    /// A fixed-capacity buffer of `size` zeroed bytes, empty to start.
    pub fn fixed(size: usize) -> Self {
        Buffer {
            storage: Storage::Owned(vec![0u8; size]),
            read_marker: 0,
            write_marker: 0,
            role: Role::Fixed,
            file: None,
        }
    }

    /// Wraps caller-owned memory. The buffer never frees or reallocates
    /// it; the whole region is immediately readable, mirroring
    /// `vf_buf_memory_new`'s `write_marker = size`.
    pub fn borrowed(data: &'a mut [u8]) -> Self {
        let len = data.len();
        Buffer {
            storage: Storage::Borrowed(data),
            read_marker: 0,
            write_marker: len,
            role: Role::Fixed,
            file: None,
        }
    }

    /// A buffer that grows to the next power of two on write overflow.
    pub fn resizable() -> Self {
        Buffer {
            storage: Storage::Owned(vec![0u8; FILE_WINDOW]),
            read_marker: 0,
            write_marker: 0,
            role: Role::Resizable,
            file: None,
        }
    }

    /// A buffered reader over an already-open file.
    pub fn reader_fd(file: File) -> Self {
        Buffer {
            storage: Storage::Owned(vec![0u8; FILE_WINDOW]),
            read_marker: 0,
            write_marker: 0,
            role: Role::ReaderFd,
            file: Some(file),
        }
    }

    /// A buffered writer over an already-open file.
    pub fn writer_fd(file: File) -> Self {
        Buffer {
            storage: Storage::Owned(vec![0u8; FILE_WINDOW]),
            read_marker: 0,
            write_marker: 0,
            role: Role::WriterFd,
            file: None,
        }
        .with_file(file)
    }

    fn with_file(mut self, file: File) -> Self {
        self.file = Some(file);
        self
    }

    /// Opens `path` for buffered reading.
    pub fn reader_file(path: &std::path::Path) -> Result<Self> {
        Ok(Self::reader_fd(File::open(path)?))
    }

    /// Opens (creating/truncating) `path` for buffered writing.
    pub fn writer_file(path: &std::path::Path) -> Result<Self> {
        Ok(Self::writer_fd(File::create(path)?))
    }

    pub fn read_marker(&self) -> usize {
        self.read_marker
    }

    pub fn write_marker(&self) -> usize {
        self.write_marker
    }

    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// The unread bytes currently buffered, `[read_marker, write_marker)`.
    pub fn unread(&self) -> &[u8] {
        &self.storage.as_slice()[self.read_marker..self.write_marker]
    }

    fn compact_for_read(&mut self) {
        if self.read_marker == 0 {
            return;
        }
        let (start, end) = (self.read_marker, self.write_marker);
        self.storage.as_mut_slice().copy_within(start..end, 0);
        self.write_marker -= self.read_marker;
        self.read_marker = 0;
    }

    fn reader_sync(&mut self) -> Result<()> {
        let file = self.file.as_mut().expect("reader role always has a file");
        let cap = self.storage.len();
        let to_read = cap - self.write_marker;
        if to_read == 0 {
            return Ok(());
        }
        let n = file.read(&mut self.storage.as_mut_slice()[self.write_marker..cap])?;
        self.write_marker += n;
        log::trace!("reader_sync: read {n} bytes, write_marker={}", self.write_marker);
        Ok(())
    }

    fn writer_sync(&mut self) -> Result<()> {
        let file = self.file.as_mut().expect("writer role always has a file");
        let to_write = self.write_marker - self.read_marker;
        if to_write == 0 {
            return Ok(());
        }
        let n = file.write(&self.storage.as_slice()[self.read_marker..self.write_marker])?;
        self.read_marker += n;
        log::trace!("writer_sync: wrote {n} bytes, read_marker={}", self.read_marker);
        Ok(())
    }

    fn read_check(&mut self, len: usize) -> Result<()> {
        match self.role {
            Role::Fixed | Role::Resizable => {
                if self.read_marker + len > self.write_marker {
                    return Err(Error::BufferUnderflow {
                        requested: len,
                        available: self.write_marker - self.read_marker,
                    });
                }
                Ok(())
            }
            Role::ReaderFd => {
                if self.read_marker + len > self.write_marker {
                    self.compact_for_read();
                    self.reader_sync()?;
                }
                if self.read_marker + len > self.write_marker {
                    return Err(Error::BufferUnderflow {
                        requested: len,
                        available: self.write_marker - self.read_marker,
                    });
                }
                Ok(())
            }
            Role::WriterFd => Err(Error::BufferUnderflow {
                requested: len,
                available: 0,
            }),
        }
    }

    fn write_check(&mut self, len: usize) -> Result<()> {
        match self.role {
            Role::Fixed => {
                if self.write_marker + len > self.storage.len() {
                    return Err(Error::BufferOverflow {
                        requested: len,
                        available: self.storage.len() - self.write_marker,
                    });
                }
                Ok(())
            }
            Role::Resizable => {
                if self.write_marker + len > self.storage.len() {
                    let new_size = crate::bits::pow2_ge((self.write_marker + len) as u64) as usize;
                    self.resize(new_size);
                }
                Ok(())
            }
            Role::WriterFd => {
                if self.write_marker + len > self.storage.len() {
                    self.writer_sync()?;
                    self.compact_for_read();
                }
                if self.write_marker + len > self.storage.len() {
                    return Err(Error::BufferOverflow {
                        requested: len,
                        available: self.storage.len() - self.write_marker,
                    });
                }
                Ok(())
            }
            Role::ReaderFd => Err(Error::BufferOverflow {
                requested: len,
                available: 0,
            }),
        }
    }

    fn resize(&mut self, new_size: usize) {
        match &mut self.storage {
            Storage::Owned(v) => v.resize(new_size, 0),
            Storage::Borrowed(_) => panic!("cannot resize a borrowed buffer"),
        }
    }

    /// Flushes pending writer bytes through `sync` once. Called
    /// automatically on drop for file-backed writers.
    pub fn flush(&mut self) -> Result<()> {
        if matches!(self.role, Role::WriterFd) && self.write_marker > self.read_marker {
            self.writer_sync()?;
        }
        Ok(())
    }

    // -- scalar writes --

    pub fn write_u8(&mut self, val: u8) -> Result<usize> {
        self.write_check(1)?;
        self.storage.as_mut_slice()[self.write_marker] = val;
        self.write_marker += 1;
        Ok(1)
    }

    pub fn write_i8(&mut self, val: i8) -> Result<usize> {
        self.write_u8(val as u8)
    }

    write_le!(write_i16, i16);
    write_le!(write_i32, i32);
    write_le!(write_i64, i64);
    write_le!(write_u16, u16);
    write_le!(write_u32, u32);
    write_le!(write_u64, u64);

    pub fn write_bytes(&mut self, src: &[u8]) -> Result<usize> {
        self.write_check(src.len())?;
        let wm = self.write_marker;
        self.storage.as_mut_slice()[wm..wm + src.len()].copy_from_slice(src);
        self.write_marker += src.len();
        Ok(src.len())
    }

    pub fn write_str(&mut self, s: &str) -> Result<usize> {
        self.write_bytes(s.as_bytes())
    }

    /// Writes formatted text. Unlike the C source's `vf_buf_write_format`
    /// (which formats directly into the buffer and retries once after
    /// growing), this formats into a scratch `String` first — `write!`
    /// has no fixed-capacity failure mode to retry around — then copies
    /// the result through `write_bytes`, preserving the same
    /// capacity-check/grow behavior on the copy.
    pub fn write_format(&mut self, args: std::fmt::Arguments<'_>) -> Result<usize> {
        use std::fmt::Write as _;
        let mut s = String::new();
        s.write_fmt(args).expect("formatting to a String cannot fail");
        self.write_str(&s)
    }

    // -- scalar reads --

    pub fn read_u8(&mut self) -> Result<u8> {
        self.read_check(1)?;
        let v = self.storage.as_slice()[self.read_marker];
        self.read_marker += 1;
        Ok(v)
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    read_le!(read_i16, i16, 2);
    read_le!(read_i32, i32, 4);
    read_le!(read_i64, i64, 8);
    read_le!(read_u16, u16, 2);
    read_le!(read_u32, u32, 4);
    read_le!(read_u64, u64, 8);

    pub fn read_bytes(&mut self, dst: &mut [u8]) -> Result<usize> {
        self.read_check(dst.len())?;
        let rm = self.read_marker;
        dst.copy_from_slice(&self.storage.as_slice()[rm..rm + dst.len()]);
        self.read_marker += dst.len();
        Ok(dst.len())
    }

    pub fn read_vec_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut v = vec![0u8; len];
        self.read_bytes(&mut v)?;
        Ok(v)
    }
}

impl<'a> Drop for Buffer<'a> {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_round_trip() {
        let mut buf = Buffer::fixed(16);
        assert_eq!(buf.write_u8(0x42).unwrap(), 1);
        assert_eq!(buf.write_i32(-7).unwrap(), 4);
        assert_eq!(buf.read_u8().unwrap(), 0x42);
        assert_eq!(buf.read_i32().unwrap(), -7);
        assert_eq!(buf.read_marker(), buf.write_marker());
    }

    #[test]
    fn fixed_write_overflow_leaves_markers_unchanged() {
        let mut buf = Buffer::fixed(2);
        buf.write_u8(1).unwrap();
        let (rm, wm) = (buf.read_marker(), buf.write_marker());
        assert!(buf.write_i32(0).is_err());
        assert_eq!((buf.read_marker(), buf.write_marker()), (rm, wm));
    }

    #[test]
    fn fixed_read_underflow_is_rejected() {
        let mut buf = Buffer::fixed(4);
        buf.write_u8(1).unwrap();
        assert!(buf.read_i32().is_err());
    }

    #[test]
    fn resizable_grows_on_demand() {
        let mut buf = Buffer::resizable();
        let payload = vec![7u8; 10_000];
        buf.write_bytes(&payload).unwrap();
        assert!(buf.capacity() >= 10_000);
        assert_eq!(buf.unread(), payload.as_slice());
    }

    #[test]
    fn borrowed_buffer_is_readable_immediately() {
        let mut data = [1u8, 2, 3, 4];
        let mut buf = Buffer::borrowed(&mut data);
        assert_eq!(buf.read_u8().unwrap(), 1);
        assert_eq!(buf.read_u32().unwrap_err().to_string().contains("underflow"), true);
    }

    #[test]
    fn cursor_invariant_holds_after_writes_and_reads() {
        let mut buf = Buffer::fixed(64);
        for i in 0..10u8 {
            buf.write_u8(i).unwrap();
        }
        for _ in 0..5 {
            buf.read_u8().unwrap();
        }
        assert!(buf.read_marker() <= buf.write_marker());
        assert!(buf.write_marker() <= buf.capacity());
    }
}
