//! Artist catalog: id → display name.
//!
//! Built once from the `artists.dat` export and read-only afterwards. If an id
//! appears more than once the last row wins; catalogs are append-only exports
//! so a repeated id is a correction, not an error.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use tracing::{info, warn};

use crate::error::{CatalogError, CatalogResult, DataError, DataResult};
use crate::tsv;

/// Header name of the artist id column.
pub const ID_COLUMN: &str = "id";
/// Header name of the artist name column.
pub const NAME_COLUMN: &str = "name";

/// One catalog row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub item_id: usize,
    pub name: String,
}

impl CatalogEntry {
    pub fn new(item_id: usize, name: impl Into<String>) -> Self {
        Self {
            item_id,
            name: name.into(),
        }
    }
}

/// Immutable id → name lookup.
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    names: HashMap<usize, String>,
}

impl ItemCatalog {
    /// Populate the catalog in one pass; later entries overwrite earlier ones.
    pub fn load<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = CatalogEntry>,
    {
        let mut names = HashMap::new();
        for entry in entries {
            if let Some(previous) = names.insert(entry.item_id, entry.name) {
                warn!(item_id = entry.item_id, previous = %previous, "duplicate catalog id, keeping last");
            }
        }
        Self { names }
    }

    /// Display name for `item_id`.
    pub fn name_of(&self, item_id: usize) -> CatalogResult<&str> {
        self.names
            .get(&item_id)
            .map(String::as_str)
            .ok_or(CatalogError::UnknownItemId { item_id })
    }

    pub fn contains(&self, item_id: usize) -> bool {
        self.names.contains_key(&item_id)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Read a tab-separated catalog with at least `id` and `name` columns.
pub fn read_catalog<R: Read>(reader: R) -> DataResult<ItemCatalog> {
    let mut rdr = tsv::reader(reader, true);
    let [id_idx, name_idx] = tsv::column_indices(&mut rdr, [ID_COLUMN, NAME_COLUMN])?;

    let mut entries = Vec::new();
    for (i, result) in rdr.byte_records().enumerate() {
        let row = i + 1;
        let record = result.map_err(|e| DataError::MalformedRecord {
            row,
            reason: e.to_string(),
        })?;
        let id = tsv::field(&record, id_idx, ID_COLUMN, row)?;
        let item_id = id.parse::<usize>().map_err(|_| DataError::MalformedRecord {
            row,
            reason: format!("invalid artist id \"{id}\""),
        })?;
        let name = tsv::field(&record, name_idx, NAME_COLUMN, row)?;
        entries.push(CatalogEntry::new(item_id, name));
    }

    Ok(ItemCatalog::load(entries))
}

/// Load the catalog file at `path`.
pub fn load_catalog(path: &Path) -> DataResult<ItemCatalog> {
    let file = tsv::open(path)?;
    let catalog = read_catalog(file)?;
    info!(path = %path.display(), artists = catalog.len(), "loaded artist catalog");
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_of_returns_stored_name() {
        let catalog = ItemCatalog::load([CatalogEntry::new(0, "Alpha"), CatalogEntry::new(1, "Beta")]);
        assert_eq!(catalog.name_of(0).unwrap(), "Alpha");
        assert_eq!(catalog.name_of(1).unwrap(), "Beta");
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn unknown_id_is_an_error() {
        let catalog = ItemCatalog::load([CatalogEntry::new(0, "Alpha")]);
        let err = catalog.name_of(5).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownItemId { item_id: 5 }));
        assert!(!catalog.contains(5));
    }

    #[test]
    fn last_duplicate_wins() {
        let catalog = ItemCatalog::load([CatalogEntry::new(3, "Old"), CatalogEntry::new(3, "New")]);
        assert_eq!(catalog.name_of(3).unwrap(), "New");
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn reads_artists_dat_layout() {
        let data = "id\tname\turl\tpictureURL\n\
                    1\tMALICE MIZER\thttp://www.last.fm/music/MALICE+MIZER\thttp://x/1.jpg\n\
                    2\tDiary of Dreams\thttp://www.last.fm/music/Diary+of+Dreams\thttp://x/2.jpg\n\
                    3\t\"Weird Al\" Yankovic\thttp://x\n";
        let catalog = read_catalog(data.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.name_of(2).unwrap(), "Diary of Dreams");
        assert_eq!(catalog.name_of(3).unwrap(), "\"Weird Al\" Yankovic");
    }

    #[test]
    fn invalid_id_is_malformed() {
        let data = "id\tname\n1\tA\nabc\tB\n";
        let err = read_catalog(data.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::MalformedRecord { row: 2, .. }));
    }

    #[test]
    fn missing_name_column() {
        let err = read_catalog("id\tartist\n1\tA\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn { ref column } if column == "name"));
    }
}
