use data_error::Result;

pub trait BaseStorage<T> {
    /// Load the whole document
    /// from pre-configured location in the filesystem.
    fn read_fs(&mut self) -> Result<T>;

    /// Persist the whole document
    /// to pre-configured location in the filesystem.
    fn write_fs(&mut self, data: &T) -> Result<()>;

    /// Check if the file on disk was modified
    /// since it was last read or written by this storage.
    fn needs_syncing(&self) -> Result<bool>;
}
