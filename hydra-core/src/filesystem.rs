//! Filesystem abstraction.
//!
//! The interpreter never touches the disk directly: `save` writes through
//! this trait, and drivers read program files through it. Implementations:
//! - `OsFileSystem` in the CLI crate (reads and writes relative to the
//!   working directory)
//! - in-memory filesystems in tests

/// A filesystem for reading programs and writing rendered drawings.
pub trait FileSystem {
    /// Read a file by name, returning its contents.
    ///
    /// Returns `None` if the file cannot be found or read.
    fn read_file(&self, name: &str) -> Option<String>;

    /// Write `contents` to the file `name`, replacing it if it exists.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason if the file cannot be written.
    fn write_file(&mut self, name: &str, contents: &str) -> Result<(), String>;
}

/// A filesystem that has no files and refuses every write.
///
/// Used as the default when no filesystem is configured.
pub struct NullFileSystem;

impl FileSystem for NullFileSystem {
    fn read_file(&self, _name: &str) -> Option<String> {
        None
    }

    fn write_file(&mut self, name: &str, _contents: &str) -> Result<(), String> {
        Err(format!("no filesystem available to write '{name}'"))
    }
}
