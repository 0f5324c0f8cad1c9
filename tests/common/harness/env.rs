//! Isolated test environment with temp directory.

use super::{PicoCommand, TestPost};
use pico_export::domain::RecordId;
use pico_export::store::SqliteStore;
use std::collections::HashMap;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated test environment with a temporary working directory.
///
/// Holds a seeded content database, a private temp directory for staging
/// trees, and a private config home, all removed on drop. Commands run with
/// the working directory, `TMPDIR` and config location pointed inside it.
pub struct TestEnv {
    /// The temporary directory (kept for lifetime management)
    _temp_dir: TempDir,
    /// Root of the environment
    root: PathBuf,
    store: SqliteStore,
    authors: RefCell<HashMap<String, i64>>,
}

impl TestEnv {
    /// Creates a new isolated test environment with an empty content database.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path().to_path_buf();
        std::fs::create_dir_all(root.join("tmp")).expect("Failed to create tmp dir");
        std::fs::create_dir_all(root.join("config")).expect("Failed to create config dir");

        let store = SqliteStore::create(&root.join("site.db")).expect("Failed to create store");
        Self {
            _temp_dir: temp_dir,
            root,
            store,
            authors: RefCell::new(HashMap::new()),
        }
    }

    /// Returns the working directory commands run in.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the path to the content database.
    pub fn db_path(&self) -> PathBuf {
        self.root.join("site.db")
    }

    /// Returns the directory used as `TMPDIR` for staging.
    pub fn tmp_dir(&self) -> PathBuf {
        self.root.join("tmp")
    }

    /// Returns the directory used as the config home.
    pub fn config_home(&self) -> PathBuf {
        self.root.join("config")
    }

    /// Adds a test post, creating its author on first use.
    pub fn add_post(&self, post: &TestPost) -> RecordId {
        let author_id = self.author_id(post.get_author());
        self.store
            .insert_post(&post.to_new_post(author_id))
            .expect("Failed to insert test post")
    }

    fn author_id(&self, name: &str) -> i64 {
        if let Some(id) = self.authors.borrow().get(name) {
            return *id;
        }
        let id = self
            .store
            .insert_user(name)
            .expect("Failed to insert test author");
        self.authors.borrow_mut().insert(name.to_string(), id);
        id
    }

    /// Writes the pico-export config file for this environment.
    pub fn write_config(&self, contents: &str) -> PathBuf {
        let dir = self.config_home().join("pico-export");
        std::fs::create_dir_all(&dir).expect("Failed to create config dir");
        let path = dir.join("config.toml");
        std::fs::write(&path, contents).expect("Failed to write config");
        path
    }

    /// Names of everything left in the staging temp directory.
    pub fn tmp_leftovers(&self) -> Vec<String> {
        std::fs::read_dir(self.tmp_dir())
            .expect("Failed to read tmp dir")
            .map(|e| e.expect("dir entry").file_name().to_string_lossy().to_string())
            .collect()
    }

    /// Creates a PicoCommand configured for this test environment.
    pub fn cmd(&self) -> PicoCommand {
        PicoCommand::new()
            .current_dir(&self.root)
            .env("TMPDIR", self.tmp_dir())
            .env("XDG_CONFIG_HOME", self.config_home())
            .env("HOME", &self.root)
            .db(&self.db_path())
    }

    /// Writes a file to the test environment and returns its path.
    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root.join(name);
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pico_export::store::ContentStore;

    #[test]
    fn test_env_creates_temp_directory() {
        let env = TestEnv::new();
        assert!(env.root().is_dir());
        assert!(env.tmp_dir().is_dir());
        assert!(env.db_path().is_file());
    }

    #[test]
    fn test_env_cleanup_on_drop() {
        let path = {
            let env = TestEnv::new();
            env.root().to_path_buf()
        };
        assert!(
            !path.exists(),
            "temp directory should be cleaned up on drop"
        );
    }

    #[test]
    fn test_env_add_post_is_selectable() {
        let env = TestEnv::new();
        let id = env.add_post(&TestPost::new("First"));
        env.add_post(&TestPost::new("Draft").draft());

        let store = SqliteStore::open(&env.db_path()).unwrap();
        assert_eq!(store.select_published_ids().unwrap(), vec![id]);
    }

    #[test]
    fn test_env_reuses_authors() {
        let env = TestEnv::new();
        let a = env.add_post(&TestPost::new("One").author("Ann"));
        let b = env.add_post(&TestPost::new("Two").author("Ann"));

        let store = SqliteStore::open(&env.db_path()).unwrap();
        assert_eq!(store.fetch_record(a).unwrap().author(), "Ann");
        assert_eq!(store.fetch_record(b).unwrap().author(), "Ann");
        assert_eq!(env.authors.borrow().len(), 1);
    }

    #[test]
    fn test_env_provides_command() {
        let env = TestEnv::new();
        let cmd = env.cmd();
        let args = cmd.get_args();
        assert_eq!(args[0], "--db");
        assert_eq!(args[1], env.db_path().to_string_lossy());
    }
}
