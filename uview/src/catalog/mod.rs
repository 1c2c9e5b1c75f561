//! In-memory asset catalog.
//!
//! The catalog stores assets by GUID and keeps a secondary index from asset
//! path to GUID for constant-time path lookups. Every path in the index
//! resolves to an asset whose path equals the key.
//!
//! Paths are not required to be unique across GUIDs: real packages have been
//! seen with two GUIDs claiming the same path. The index points at the most
//! recently added one, and removing it re-points the index at the survivor
//! with the smallest GUID. Removing an asset with a unique path costs O(1).

use std::collections::{BTreeSet, HashMap};

use crate::asset::{Guid, UnityAsset};

/// GUID-keyed, path-indexed collection of assets for one open package.
#[derive(Debug, Clone, Default)]
pub struct AssetCatalog {
    assets_by_guid: HashMap<Guid, UnityAsset>,
    path_to_guid: HashMap<String, Guid>,
    /// Other GUIDs claiming an indexed path. Only collisions appear here.
    shadowed: HashMap<String, BTreeSet<Guid>>,
}

impl AssetCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from assets, later GUIDs replacing earlier ones.
    pub fn from_assets(assets: impl IntoIterator<Item = UnityAsset>) -> Self {
        let mut catalog = Self::new();
        for asset in assets {
            catalog.add_or_replace(asset);
        }
        catalog
    }

    /// Insert an asset, replacing any asset with the same GUID.
    ///
    /// Returns the replaced asset, if there was one.
    pub fn add_or_replace(&mut self, asset: UnityAsset) -> Option<UnityAsset> {
        let guid = asset.guid().clone();
        let path = asset.asset_path().to_string();

        let previous = self.assets_by_guid.insert(guid.clone(), asset);
        if let Some(old) = &previous {
            if old.asset_path() != path {
                self.unindex(old.asset_path(), &guid);
            }
        }
        self.index(path, guid);
        previous
    }

    /// Remove the asset indexed at `path`.
    ///
    /// Returns the removed asset, or `None` if no asset is indexed there.
    pub fn remove_by_path(&mut self, path: &str) -> Option<UnityAsset> {
        let guid = self.path_to_guid.get(path)?.clone();
        self.remove_by_guid(&guid)
    }

    /// Remove the asset with `guid`.
    pub fn remove_by_guid(&mut self, guid: &Guid) -> Option<UnityAsset> {
        let removed = self.assets_by_guid.remove(guid)?;
        self.unindex(removed.asset_path(), guid);
        Some(removed)
    }

    /// Asset indexed at `path`.
    pub fn get_by_path(&self, path: &str) -> Option<&UnityAsset> {
        self.path_to_guid
            .get(path)
            .and_then(|guid| self.assets_by_guid.get(guid))
    }

    /// Asset with `guid`.
    pub fn get(&self, guid: &Guid) -> Option<&UnityAsset> {
        self.assets_by_guid.get(guid)
    }

    /// Whether an asset is indexed at `path`.
    pub fn contains_path(&self, path: &str) -> bool {
        self.path_to_guid.contains_key(path)
    }

    /// All assets, in no particular order.
    pub fn all(&self) -> impl Iterator<Item = &UnityAsset> + '_ {
        self.assets_by_guid.values()
    }

    /// All assets ordered by path, then GUID.
    pub fn sorted(&self) -> Vec<&UnityAsset> {
        let mut assets: Vec<&UnityAsset> = self.all().collect();
        assets.sort_by(|a, b| {
            a.asset_path()
                .cmp(b.asset_path())
                .then_with(|| a.guid().cmp(b.guid()))
        });
        assets
    }

    /// Indexed paths, in no particular order.
    pub fn paths(&self) -> impl Iterator<Item = &str> + '_ {
        self.path_to_guid.keys().map(String::as_str)
    }

    /// Number of assets.
    pub fn len(&self) -> usize {
        self.assets_by_guid.len()
    }

    /// Whether the catalog holds no assets.
    pub fn is_empty(&self) -> bool {
        self.assets_by_guid.is_empty()
    }

    /// Number of entries in the path index.
    pub fn indexed_paths(&self) -> usize {
        self.path_to_guid.len()
    }

    /// Remove every asset.
    pub fn clear(&mut self) {
        self.assets_by_guid.clear();
        self.path_to_guid.clear();
        self.shadowed.clear();
    }

    /// Point `path` at `guid`, shadowing whatever was indexed there.
    fn index(&mut self, path: String, guid: Guid) {
        if let Some(set) = self.shadowed.get_mut(&path) {
            set.remove(&guid);
        }
        match self.path_to_guid.insert(path.clone(), guid.clone()) {
            Some(old) if old != guid => {
                self.shadowed.entry(path).or_default().insert(old);
            }
            _ => {
                if self.shadowed.get(&path).is_some_and(BTreeSet::is_empty) {
                    self.shadowed.remove(&path);
                }
            }
        }
    }

    /// Drop `guid`'s claim on `path`. If it was the indexed asset, the
    /// shadowed claimant with the smallest GUID takes over.
    fn unindex(&mut self, path: &str, guid: &Guid) {
        if self.path_to_guid.get(path) == Some(guid) {
            self.path_to_guid.remove(path);
            if let Some(set) = self.shadowed.get_mut(path) {
                if let Some(survivor) = set.pop_first() {
                    self.path_to_guid.insert(path.to_string(), survivor);
                }
                if set.is_empty() {
                    self.shadowed.remove(path);
                }
            }
        } else if let Some(set) = self.shadowed.get_mut(path) {
            set.remove(guid);
            if set.is_empty() {
                self.shadowed.remove(path);
            }
        }
    }
}

impl FromIterator<UnityAsset> for AssetCatalog {
    fn from_iter<T: IntoIterator<Item = UnityAsset>>(iter: T) -> Self {
        Self::from_assets(iter)
    }
}

impl<'a> IntoIterator for &'a AssetCatalog {
    type Item = &'a UnityAsset;
    type IntoIter = std::collections::hash_map::Values<'a, Guid, UnityAsset>;

    fn into_iter(self) -> Self::IntoIter {
        self.assets_by_guid.values()
    }
}
