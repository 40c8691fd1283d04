//! Asset storage abstractions
//!
//! Provides read-only, path-addressed access to assets kept in persistent
//! storage (boot splash image and similar).

/// Errors from asset lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AssetError {
    /// No asset stored under the path
    NotFound,
    /// Asset exists but could not be read
    Unreadable,
}

/// One stored asset, as listed by [`AssetStore::entries`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AssetEntry<'a> {
    pub path: &'a str,
    pub size: usize,
}

/// Read-only asset store
///
/// Paths are absolute and case-sensitive (`/logo.bmp`).
pub trait AssetStore {
    /// Borrow the full contents of the asset at `path`
    fn load(&self, path: &str) -> Result<&[u8], AssetError>;

    /// List all stored assets
    fn entries(&self) -> impl Iterator<Item = AssetEntry<'_>>;
}

/// Asset store backed by a table of flash-resident byte slices
///
/// Used for assets compiled into the firmware image with `include_bytes!`.
#[derive(Debug, Clone, Copy)]
pub struct StaticAssets<'a> {
    table: &'a [(&'a str, &'a [u8])],
}

impl<'a> StaticAssets<'a> {
    pub const fn new(table: &'a [(&'a str, &'a [u8])]) -> Self {
        Self { table }
    }

    /// Store with no assets
    pub const fn empty() -> Self {
        Self { table: &[] }
    }
}

impl AssetStore for StaticAssets<'_> {
    fn load(&self, path: &str) -> Result<&[u8], AssetError> {
        self.table
            .iter()
            .find(|(name, _)| *name == path)
            .map(|(_, data)| *data)
            .ok_or(AssetError::NotFound)
    }

    fn entries(&self) -> impl Iterator<Item = AssetEntry<'_>> {
        self.table.iter().map(|&(path, data)| AssetEntry {
            path,
            size: data.len(),
        })
    }
}
