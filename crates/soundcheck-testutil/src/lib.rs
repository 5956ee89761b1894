//! Test utilities for soundcheck.
//!
//! [`Fixture`] is a throwaway soundboard root: a temporary directory that
//! tests fill with the three JSON documents and (empty) audio files.
//!
//! ```ignore
//! let fixture = Fixture::new();
//! fixture
//!     .audio("audio/laugh.ogg")
//!     .sounds(json!({"laugh": [{"filename": "audio/laugh.ogg"}]}))
//!     .commands(json!({"haha": {"sound": "laugh"}}));
//! ```

// Fixture setup failing means the test environment is broken.
#![allow(clippy::expect_used)]

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::TempDir;

/// Default document file names inside a root.
pub const SOUNDS_FILE: &str = "sounds.json";
pub const COMMANDS_FILE: &str = "commands.json";
pub const SLASH_COMMANDS_FILE: &str = "commands_slash.json";

/// A temporary soundboard root, removed on drop.
pub struct Fixture {
    dir: TempDir,
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

impl Fixture {
    /// Create an empty root.
    pub fn new() -> Self {
        // A non-hidden prefix: hidden directories are skipped by the audio walk.
        let dir = tempfile::Builder::new()
            .prefix("soundcheck-")
            .tempdir()
            .expect("create temporary root");
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of `relative` inside the root.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Write a file, creating parent directories.
    pub fn write(&self, relative: &str, contents: &str) -> &Self {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent directories");
        }
        fs::write(&path, contents).expect("write fixture file");
        self
    }

    /// Create an empty audio file.
    pub fn audio(&self, relative: &str) -> &Self {
        self.write(relative, "")
    }

    pub fn sounds(&self, document: Value) -> &Self {
        self.json(SOUNDS_FILE, &document)
    }

    pub fn commands(&self, document: Value) -> &Self {
        self.json(COMMANDS_FILE, &document)
    }

    pub fn slash_commands(&self, document: Value) -> &Self {
        self.json(SLASH_COMMANDS_FILE, &document)
    }

    fn json(&self, relative: &str, document: &Value) -> &Self {
        let text = serde_json::to_string_pretty(document).expect("serialize fixture document");
        self.write(relative, &text)
    }

    /// Write all three documents empty (`{}`).
    pub fn empty_documents(&self) -> &Self {
        self.write(SOUNDS_FILE, "{}")
            .write(COMMANDS_FILE, "{}")
            .write(SLASH_COMMANDS_FILE, "{}")
    }
}
