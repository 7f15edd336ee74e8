//! File-backed blacklist of token and developer addresses
//!
//! The blacklists live in the bot configuration document. The store owns
//! that document and rewrites the whole file on every addition:
//!
//! ```ignore
//! let mut store = BlacklistStore::open("config.json")?;
//!
//! if !store.is_blacklisted("TOKEN", "DEV") {
//!     store.add("TOKEN", "DEV")?;
//! }
//! ```
//!
//! Consistency:
//! - The new document is written (temp file + rename) before the in-memory
//!   copy is replaced, so a failed write leaves membership unchanged
//! - Single process, single actor; no locking beyond `&mut self`

use crate::config::BotConfig;
use crate::error::Result;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct BlacklistStore {
    path: PathBuf,
    document: BotConfig,
}

impl BlacklistStore {
    /// Load the configuration document at `path` and take ownership of it
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let document = BotConfig::load(&path)?;
        Ok(Self { path, document })
    }

    /// Wrap an already loaded document; nothing is written until `add`
    pub fn from_document(path: impl Into<PathBuf>, document: BotConfig) -> Self {
        Self {
            path: path.into(),
            document,
        }
    }

    /// The document as last written
    pub fn config(&self) -> &BotConfig {
        &self.document
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True iff the token or the developer is blacklisted
    pub fn is_blacklisted(&self, token_address: &str, dev_address: &str) -> bool {
        self.is_token_blacklisted(token_address) || self.is_dev_blacklisted(dev_address)
    }

    pub fn is_token_blacklisted(&self, token_address: &str) -> bool {
        self.document.blacklisted_coins.iter().any(|c| c == token_address)
    }

    pub fn is_dev_blacklisted(&self, dev_address: &str) -> bool {
        self.document.blacklisted_devs.iter().any(|d| d == dev_address)
    }

    pub fn tokens(&self) -> &[String] {
        &self.document.blacklisted_coins
    }

    pub fn devs(&self) -> &[String] {
        &self.document.blacklisted_devs
    }

    /// Add the token and developer (each only if absent), then rewrite the file
    ///
    /// Empty addresses are skipped: an empty developer entry would match
    /// every pair that lacks a developer field.
    ///
    /// Returns whether either list changed. The file is rewritten either way,
    /// so repeated additions leave it byte-identical.
    pub fn add(&mut self, token_address: &str, dev_address: &str) -> Result<bool> {
        let mut updated = self.document.clone();
        let mut changed = false;

        if !token_address.is_empty() && !self.is_token_blacklisted(token_address) {
            updated.blacklisted_coins.push(token_address.to_string());
            changed = true;
        }
        if !dev_address.is_empty() && !self.is_dev_blacklisted(dev_address) {
            updated.blacklisted_devs.push(dev_address.to_string());
            changed = true;
        }

        updated.save_atomic(&self.path)?;
        self.document = updated;

        if changed {
            log::info!(
                "Blacklisted token={} dev={} ({} tokens, {} devs)",
                token_address,
                dev_address,
                self.document.blacklisted_coins.len(),
                self.document.blacklisted_devs.len()
            );
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn create_store() -> (TempDir, BlacklistStore) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{
                "rugcheck_api_url": "https://rugcheck.example/api",
                "filters": {"min_liquidity": 10000, "min_market_cap": 1000000},
                "blacklisted_coins": ["KnownScam"],
                "blacklisted_devs": ["KnownDev"]
            }"#,
        )
        .unwrap();
        let store = BlacklistStore::open(&path).unwrap();
        (dir, store)
    }

    #[test]
    fn test_membership_either_address() {
        let (_dir, store) = create_store();

        assert!(store.is_blacklisted("KnownScam", "someone"));
        assert!(store.is_blacklisted("fresh", "KnownDev"));
        assert!(!store.is_blacklisted("fresh", "someone"));
    }

    #[test]
    fn test_add_is_idempotent() {
        let (_dir, mut store) = create_store();

        assert!(store.add("NewToken", "NewDev").unwrap());
        let after_first = std::fs::read_to_string(store.path()).unwrap();

        assert!(!store.add("NewToken", "NewDev").unwrap());
        let after_second = std::fs::read_to_string(store.path()).unwrap();

        assert_eq!(after_first, after_second);
        assert_eq!(store.tokens().iter().filter(|t| *t == "NewToken").count(), 1);
        assert_eq!(store.devs().iter().filter(|d| *d == "NewDev").count(), 1);
    }

    #[test]
    fn test_reload_round_trip() {
        let (_dir, mut store) = create_store();
        let added = ["T1", "T2", "T3", "T4"];
        for (i, token) in added.iter().enumerate() {
            store.add(token, &format!("D{}", i)).unwrap();
        }

        let reloaded = BlacklistStore::open(store.path()).unwrap();

        let expected: HashSet<&str> =
            ["KnownScam", "T1", "T2", "T3", "T4"].into_iter().collect();
        let actual: HashSet<&str> = reloaded.tokens().iter().map(String::as_str).collect();
        assert_eq!(actual, expected);
        assert_eq!(reloaded.tokens().len(), expected.len());
        assert_eq!(reloaded.devs().len(), 5);
    }

    #[test]
    fn test_empty_dev_not_added() {
        let (_dir, mut store) = create_store();

        store.add("TokenOnly", "").unwrap();

        assert!(store.is_token_blacklisted("TokenOnly"));
        assert!(!store.is_dev_blacklisted(""));
        assert_eq!(store.devs(), &["KnownDev".to_string()]);
    }

    #[test]
    fn test_failed_write_leaves_membership_unchanged() {
        let (dir, store) = create_store();
        let document = store.config().clone();
        let mut store =
            BlacklistStore::from_document(dir.path().join("missing_dir").join("config.json"), document);

        assert!(store.add("Unsaved", "UnsavedDev").is_err());
        assert!(!store.is_blacklisted("Unsaved", "UnsavedDev"));
    }
}
