//! Scoped archive writers for platform bundles.
//!
//! Windows bundles ship as zip files, everything else as gzip tarballs.
//! An [`Archive`] owns its open file; call [`Archive::finish`] to write
//! the trailers and surface errors. Dropping an unfinished archive still
//! closes the file, but any error on that path is lost.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::system::System;
use crate::error::Result;

/// On-disk archive format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    TarGz,
}

impl ArchiveFormat {
    /// The format used for bundles on `system`.
    pub fn for_system(system: System) -> Self {
        if system.is_windows() {
            ArchiveFormat::Zip
        } else {
            ArchiveFormat::TarGz
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ArchiveFormat::Zip => "zip",
            ArchiveFormat::TarGz => "tar.gz",
        }
    }
}

enum ArchiveWriter {
    Zip(ZipWriter<File>),
    TarGz(tar::Builder<GzEncoder<File>>),
}

/// An open archive being written.
pub struct Archive {
    path: PathBuf,
    format: ArchiveFormat,
    writer: ArchiveWriter,
}

impl Archive {
    /// Create (or truncate) an archive at `path`.
    pub fn create(path: &Path, format: ArchiveFormat) -> Result<Self> {
        let file = File::create(path)?;
        let writer = match format {
            ArchiveFormat::Zip => ArchiveWriter::Zip(ZipWriter::new(file)),
            ArchiveFormat::TarGz => {
                let encoder = GzEncoder::new(file, Compression::default());
                ArchiveWriter::TarGz(tar::Builder::new(encoder))
            }
        };

        tracing::debug!(path = %path.display(), format = format.extension(), "archive opened");

        Ok(Self {
            path: path.to_path_buf(),
            format,
            writer,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> ArchiveFormat {
        self.format
    }

    /// Add the file at `src` to the archive under `name`.
    pub fn add_file(&mut self, src: &Path, name: &str) -> Result<()> {
        match &mut self.writer {
            ArchiveWriter::Zip(zip) => {
                let options = SimpleFileOptions::default()
                    .compression_method(CompressionMethod::Deflated)
                    .unix_permissions(file_mode(src)?);
                zip.start_file(name, options)?;
                let mut input = File::open(src)?;
                io::copy(&mut input, zip)?;
            }
            ArchiveWriter::TarGz(builder) => {
                builder.append_path_with_name(src, name)?;
            }
        }
        Ok(())
    }

    /// Write the archive trailers and close the file.
    pub fn finish(self) -> Result<PathBuf> {
        match self.writer {
            ArchiveWriter::Zip(zip) => {
                zip.finish()?;
            }
            ArchiveWriter::TarGz(builder) => {
                let encoder = builder.into_inner()?;
                encoder.finish()?;
            }
        }

        tracing::debug!(path = %self.path.display(), "archive complete");
        Ok(self.path)
    }
}

impl std::fmt::Debug for Archive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Archive")
            .field("path", &self.path)
            .field("format", &self.format)
            .finish()
    }
}

#[cfg(unix)]
fn file_mode(src: &Path) -> Result<u32> {
    use std::os::unix::fs::PermissionsExt;
    Ok(std::fs::metadata(src)?.permissions().mode() & 0o777)
}

#[cfg(not(unix))]
fn file_mode(_src: &Path) -> Result<u32> {
    Ok(0o755)
}
