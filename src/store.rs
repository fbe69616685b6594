use crate::error::StoreError;
use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

const EXTENSION: &str = "json";

/// Saved searches: one deduplicated set of listing links per name, each kept
/// as a pretty-printed JSON array in `<dir>/<name>.json`.
///
/// Reads never fail; a missing or corrupt file reads as an empty search.
/// Writes replace the whole file at once and report every failure. There is
/// no locking: two processes saving the same name race, and the last one wins.
#[derive(Debug, Clone)]
pub struct SearchStore {
    dir: PathBuf,
}

impl SearchStore {
    /// Store rooted at `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Merges `links` into the search `name` and returns the size of the stored set.
    pub fn save<I>(&self, name: &str, links: I) -> Result<usize, StoreError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let path = self.path_for(name)?;

        let mut merged = self.load(name);
        let before = merged.len();
        merged.extend(links.into_iter().map(|link| link.as_ref().to_string()));

        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(&merged)?;
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, json)?;
        fs::rename(&staging, &path)?;

        ::log::info!(
            "Saved search {}: {} links ({} new)",
            name,
            merged.len(),
            merged.len() - before
        );
        Ok(merged.len())
    }

    /// Links saved under `name`; empty when there are none or they can't be read.
    pub fn load(&self, name: &str) -> BTreeSet<String> {
        let path = match self.path_for(name) {
            Ok(path) => path,
            Err(e) => {
                ::log::debug!("{}", e);
                return BTreeSet::new();
            }
        };

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                ::log::debug!("No saved search {}", name);
                return BTreeSet::new();
            }
            Err(e) => {
                ::log::warn!("Couldn't read {}: {}", path.display(), e);
                return BTreeSet::new();
            }
        };

        match serde_json::from_str::<BTreeSet<String>>(&contents) {
            Ok(links) => links,
            Err(e) => {
                ::log::warn!("Ignoring corrupt search file {}: {}", path.display(), e);
                BTreeSet::new()
            }
        }
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Names of all saved searches, sorted
    pub fn list(&self) -> Result<Vec<String>, StoreError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Deletes the search `name`. Returns whether there was anything to delete.
    pub fn remove(&self, name: &str) -> Result<bool, StoreError> {
        let path = self.path_for(name)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                ::log::info!("Removed search {}", name);
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, StoreError> {
        if !is_valid_name(name) {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        Ok(self.dir.join(format!("{name}.{EXTENSION}")))
    }
}

/// Names map straight to file names, so they can't be empty, climb out of
/// the directory or contain separators.
fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn set(links: &[&str]) -> BTreeSet<String> {
        links.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_missing_search_loads_empty() {
        let dir = tempdir().unwrap();
        let store = SearchStore::new(dir.path().join("not-created-yet"));
        assert!(store.load("nothing").is_empty());
        assert!(!store.exists("nothing"));
        assert_eq!(store.list().unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_save_creates_directory_and_round_trips() {
        let dir = tempdir().unwrap();
        let store = SearchStore::new(dir.path().join("data"));

        let stored = store.save("santiago", ["https://a/1", "https://a/2", "https://a/1"]).unwrap();
        assert_eq!(stored, 2);
        assert!(store.exists("santiago"));
        assert_eq!(store.load("santiago"), set(&["https://a/1", "https://a/2"]));
    }

    #[test]
    fn test_save_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = SearchStore::new(dir.path());
        let links = ["https://a/3", "https://a/1", "https://a/2"];

        store.save("s", links).unwrap();
        let once = fs::read_to_string(dir.path().join("s.json")).unwrap();
        store.save("s", links).unwrap();
        let twice = fs::read_to_string(dir.path().join("s.json")).unwrap();

        assert_eq!(once, twice);
        assert_eq!(store.load("s").len(), 3);
    }

    #[test]
    fn test_saves_merge_as_union() {
        let dir = tempdir().unwrap();
        let store = SearchStore::new(dir.path());

        store.save("s", ["b", "a", "c"]).unwrap();
        let stored = store.save("s", ["d", "a"]).unwrap();

        assert_eq!(stored, 4);
        assert_eq!(store.load("s"), set(&["a", "b", "c", "d"]));
    }

    #[test]
    fn test_saving_nothing_keeps_existing_links() {
        let dir = tempdir().unwrap();
        let store = SearchStore::new(dir.path());

        store.save("s", ["a"]).unwrap();
        store.save("s", Vec::<String>::new()).unwrap();
        assert_eq!(store.load("s"), set(&["a"]));
    }

    #[test]
    fn test_links_stored_verbatim() {
        let dir = tempdir().unwrap();
        let store = SearchStore::new(dir.path());
        let odd = ["", "  spaced  ", "not a url", "ñandú"];

        store.save("odd", odd).unwrap();
        assert_eq!(store.load("odd"), set(&odd));
    }

    #[test]
    fn test_file_is_pretty_json_array() {
        let dir = tempdir().unwrap();
        let store = SearchStore::new(dir.path());
        store.save("s", ["b", "a"]).unwrap();

        let contents = fs::read_to_string(dir.path().join("s.json")).unwrap();
        assert_eq!(contents, "[\n  \"a\",\n  \"b\"\n]");
        assert!(!dir.path().join("s.json.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_reads_empty_and_is_replaced_on_save() {
        let dir = tempdir().unwrap();
        let store = SearchStore::new(dir.path());
        fs::write(dir.path().join("s.json"), "{ not json").unwrap();

        assert!(store.load("s").is_empty());
        store.save("s", ["a"]).unwrap();
        assert_eq!(store.load("s"), set(&["a"]));
    }

    #[test]
    fn test_other_schema_reads_empty() {
        let dir = tempdir().unwrap();
        let store = SearchStore::new(dir.path());
        fs::write(
            dir.path().join("old.json"),
            r#"{"url": "https://x", "properties": {"favorites": [], "archived": []}}"#,
        )
        .unwrap();

        assert!(store.load("old").is_empty());
    }

    #[test]
    fn test_list_and_remove() {
        let dir = tempdir().unwrap();
        let store = SearchStore::new(dir.path());
        store.save("zeta", ["a"]).unwrap();
        store.save("alpha", ["b"]).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        assert_eq!(store.list().unwrap(), vec!["alpha", "zeta"]);

        assert!(store.remove("zeta").unwrap());
        assert!(!store.remove("zeta").unwrap());
        assert!(!store.exists("zeta"));
        assert!(store.load("zeta").is_empty());
        assert_eq!(store.list().unwrap(), vec!["alpha"]);
    }

    #[test]
    fn test_invalid_names() {
        let dir = tempdir().unwrap();
        let store = SearchStore::new(dir.path());

        for name in ["", ".", "..", "../escape", "a/b", "a\\b"] {
            assert!(
                matches!(store.save(name, ["x"]), Err(StoreError::InvalidName(_))),
                "{name:?} should be rejected"
            );
            assert!(store.load(name).is_empty());
            assert!(!store.exists(name));
            assert!(matches!(store.remove(name), Err(StoreError::InvalidName(_))));
        }
        assert_eq!(store.list().unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_write_failure_is_reported() {
        let dir = tempdir().unwrap();
        // A file where the store directory should be
        let blocker = dir.path().join("data");
        fs::write(&blocker, "").unwrap();
        let store = SearchStore::new(&blocker);

        assert!(matches!(store.save("s", ["a"]), Err(StoreError::Io(_))));
    }
}
