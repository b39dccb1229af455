//! Flash collaborator.
//!
//! The timezone database lives in external SPI flash. This module defines the
//! read-only range-read interface the lookup engine consumes, plus host-side
//! implementations backed by memory and by a file dump of the chip.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::{Error, Result};

/// Byte-addressable, read-only access to a flash image.
pub trait FlashRead {
    /// Fill `buf` with the bytes starting at `address`.
    ///
    /// Implementations must either fill the whole buffer or fail; a short read
    /// is an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the range cannot be read.
    fn read(&mut self, address: u64, buf: &mut [u8]) -> io::Result<()>;

    /// Size of the image in bytes, if known.
    fn capacity(&self) -> Option<u64> {
        None
    }
}

impl<T: FlashRead + ?Sized> FlashRead for &mut T {
    fn read(&mut self, address: u64, buf: &mut [u8]) -> io::Result<()> {
        (**self).read(address, buf)
    }

    fn capacity(&self) -> Option<u64> {
        (**self).capacity()
    }
}

/// A flash image held in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryFlash {
    data: Vec<u8>,
}

impl MemoryFlash {
    /// Wrap an image.
    #[must_use]
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// The raw image bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl From<Vec<u8>> for MemoryFlash {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl FlashRead for MemoryFlash {
    fn read(&mut self, address: u64, buf: &mut [u8]) -> io::Result<()> {
        let start = usize::try_from(address).map_err(|_| out_of_bounds(address, buf.len()))?;
        let end = start
            .checked_add(buf.len())
            .ok_or_else(|| out_of_bounds(address, buf.len()))?;
        let src = self
            .data
            .get(start..end)
            .ok_or_else(|| out_of_bounds(address, buf.len()))?;
        buf.copy_from_slice(src);
        Ok(())
    }

    fn capacity(&self) -> Option<u64> {
        u64::try_from(self.data.len()).ok()
    }
}

fn out_of_bounds(address: u64, length: usize) -> io::Error {
    io::Error::new(
        io::ErrorKind::UnexpectedEof,
        format!("range {address:#x}+{length} is past the end of the image"),
    )
}

/// A flash image read from a file, typically a dump of the SPI chip.
#[derive(Debug)]
pub struct FileFlash {
    path: PathBuf,
    file: File,
    len: u64,
}

impl FileFlash {
    /// Open an image file for reading.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or its size read.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let open = || -> io::Result<(File, u64)> {
            let file = File::open(&path)?;
            let len = file.metadata()?.len();
            Ok((file, len))
        };
        let (file, len) = open().map_err(|source| Error::ImageOpen {
            path: path.clone(),
            source,
        })?;

        debug!("Opened flash image {} ({} bytes)", path.display(), len);
        Ok(Self { path, file, len })
    }

    /// Path of the image file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FlashRead for FileFlash {
    fn read(&mut self, address: u64, buf: &mut [u8]) -> io::Result<()> {
        trace!("flash read {:#x}+{}", address, buf.len());
        self.file.seek(SeekFrom::Start(address))?;
        self.file.read_exact(buf)
    }

    fn capacity(&self) -> Option<u64> {
        Some(self.len)
    }
}

/// Places a database image at a fixed base address inside a larger flash.
#[derive(Debug)]
pub struct OffsetFlash<F> {
    inner: F,
    base: u64,
}

impl<F: FlashRead> OffsetFlash<F> {
    /// Wrap `inner` so that address 0 maps to `base`.
    #[must_use]
    pub fn new(inner: F, base: u64) -> Self {
        Self { inner, base }
    }

    /// Unwrap the inner reader.
    #[must_use]
    pub fn into_inner(self) -> F {
        self.inner
    }
}

impl<F: FlashRead> FlashRead for OffsetFlash<F> {
    fn read(&mut self, address: u64, buf: &mut [u8]) -> io::Result<()> {
        let address = self
            .base
            .checked_add(address)
            .ok_or_else(|| out_of_bounds(address, buf.len()))?;
        self.inner.read(address, buf)
    }

    fn capacity(&self) -> Option<u64> {
        self.inner
            .capacity()
            .map(|cap| cap.saturating_sub(self.base))
    }
}
