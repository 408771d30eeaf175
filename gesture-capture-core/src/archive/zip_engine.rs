use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::traits::archive_engine::{ArchiveEngine, ArchiveJob};

/// ZIP archive engine: DEFLATE compression at a fixed level.
pub struct ZipEngine {
    compression_level: i64,
}

impl ZipEngine {
    /// `compression_level` is the DEFLATE level, 0-9.
    pub fn new(compression_level: i64) -> Self {
        Self { compression_level }
    }
}

impl Default for ZipEngine {
    fn default() -> Self {
        Self::new(6)
    }
}

impl ArchiveEngine for ZipEngine {
    fn is_available(&self) -> bool {
        true
    }

    fn begin(&self) -> Result<Box<dyn ArchiveJob>, String> {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(self.compression_level));
        Ok(Box::new(ZipJob {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            options,
        }))
    }
}

struct ZipJob {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
}

impl ArchiveJob for ZipJob {
    fn add_directory(&mut self, path: &str) -> Result<(), String> {
        self.writer
            .add_directory(path, self.options)
            .map_err(|e| e.to_string())
    }

    fn add_file(&mut self, path: &str, bytes: &[u8]) -> Result<(), String> {
        self.writer
            .start_file(path, self.options)
            .map_err(|e| e.to_string())?;
        self.writer.write_all(bytes).map_err(|e| e.to_string())
    }

    fn finish(self: Box<Self>) -> Result<Vec<u8>, String> {
        let ZipJob { writer, .. } = *self;
        let cursor = writer.finish().map_err(|e| e.to_string())?;
        Ok(cursor.into_inner())
    }
}
