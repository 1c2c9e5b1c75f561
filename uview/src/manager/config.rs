//! Configuration for the Package Manager.

/// Default limit for files added from disk: 512 MiB.
pub const DEFAULT_MAX_ASSET_SIZE: u64 = 512 * 1024 * 1024;

/// Configuration for the Package Manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerConfig {
    /// Largest source file `add_asset` accepts, in bytes.
    ///
    /// The whole file is buffered in memory, so this bounds the memory a
    /// single add can take.
    pub max_asset_size: u64,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            max_asset_size: DEFAULT_MAX_ASSET_SIZE,
        }
    }
}

impl ManagerConfig {
    /// Set the maximum asset size.
    pub fn with_max_asset_size(mut self, bytes: u64) -> Self {
        self.max_asset_size = bytes;
        self
    }
}
