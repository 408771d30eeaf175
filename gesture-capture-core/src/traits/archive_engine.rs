/// Compression/container capability injected into the archive builder.
///
/// Availability is checked once, as a build precondition, rather than
/// polled at call sites. Errors cross the trait seam as `String` and are
/// mapped into `CaptureError` by the builder.
pub trait ArchiveEngine: Send + Sync {
    /// Whether the engine can produce archives right now.
    fn is_available(&self) -> bool;

    /// Begin a new archive job.
    fn begin(&self) -> Result<Box<dyn ArchiveJob>, String>;
}

/// One in-flight archive assembly.
///
/// Entry paths use `/` separators; directory paths do not need a trailing
/// slash. Entries must be added parent-first.
pub trait ArchiveJob {
    /// Add a directory entry.
    fn add_directory(&mut self, path: &str) -> Result<(), String>;

    /// Add a file entry with the given contents.
    fn add_file(&mut self, path: &str, bytes: &[u8]) -> Result<(), String>;

    /// Finalize the container and return its bytes.
    fn finish(self: Box<Self>) -> Result<Vec<u8>, String>;
}
