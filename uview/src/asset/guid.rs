//! Asset GUIDs.

use std::borrow::Borrow;
use std::fmt;

use uuid::Uuid;

use super::{AssetError, AssetResult};

/// Stable per-asset identifier used as the primary key inside a package.
///
/// Unity writes GUIDs as 32 lowercase hex characters. Packages produced by
/// other tools occasionally deviate, so [`Guid::new`] accepts any non-empty
/// token and only freshly generated GUIDs are guaranteed to be canonical.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Guid(String);

impl Guid {
    /// Wrap an existing GUID token, e.g. one read from an archive.
    pub fn new(value: impl Into<String>) -> AssetResult<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(AssetError::EmptyGuid);
        }
        Ok(Self(value))
    }

    /// Generate a fresh random GUID in Unity's canonical form.
    ///
    /// # Example
    ///
    /// ```
    /// use uview::asset::Guid;
    ///
    /// let guid = Guid::new_random();
    /// assert_eq!(guid.as_str().len(), 32);
    /// assert!(guid.is_canonical());
    /// ```
    pub fn new_random() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// The GUID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether this GUID is 32 lowercase hex characters.
    pub fn is_canonical(&self) -> bool {
        self.0.len() == 32
            && self
                .0
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Guid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Guid {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Guid {
    type Error = AssetError;

    fn try_from(value: &str) -> AssetResult<Self> {
        Self::new(value)
    }
}

impl TryFrom<String> for Guid {
    type Error = AssetError;

    fn try_from(value: String) -> AssetResult<Self> {
        Self::new(value)
    }
}
