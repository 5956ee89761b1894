//! Sounds: weighted groups of audio files resolved against the root.
//!
//! A sound is a list of file groups. Playing a sound first picks a group,
//! weighted by the group's weight, then a file from that group uniformly.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path, PathBuf};

use indexmap::IndexMap;
use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use serde_json::Value;
use soundcheck_types::{FileSpec, SoundsDocument};

use crate::diagnostics::Diagnostics;
use crate::error::Error;

/// Failure to pick a file from a built sound.
#[derive(Debug, thiserror::Error)]
pub enum SoundError {
    #[error("sound '{0}' has no playable file groups")]
    NoGroups(String),

    #[error("sound '{0}' picked an empty file group")]
    EmptyGroup(String),
}

/// A non-empty set of candidate files with a positive weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileGroup {
    paths: Vec<PathBuf>,
    weight: u32,
}

impl FileGroup {
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }
}

/// A named sound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sound {
    name: String,
    groups: Vec<FileGroup>,
}

impl Sound {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn groups(&self) -> &[FileGroup] {
        &self.groups
    }

    /// A sound whose every group was discarded. It stays registered so
    /// references to it resolve, but it cannot be played.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Every resolved file, group by group.
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.groups
            .iter()
            .flat_map(|g| g.paths.iter().map(PathBuf::as_path))
    }

    /// Pick a file: a group by weight, then a path from it uniformly.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&Path, SoundError> {
        let weights = WeightedIndex::new(self.groups.iter().map(|g| u64::from(g.weight)))
            .map_err(|_| SoundError::NoGroups(self.name.clone()))?;
        self.groups
            .get(weights.sample(&mut *rng))
            .and_then(|group| group.paths.choose(rng))
            .map(PathBuf::as_path)
            .ok_or_else(|| SoundError::EmptyGroup(self.name.clone()))
    }
}

/// All sounds of a document plus the reverse file → sounds map.
#[derive(Debug, Clone, Default)]
pub struct SoundRegistry {
    sounds: IndexMap<String, Sound>,
    files: BTreeMap<PathBuf, BTreeSet<String>>,
}

impl SoundRegistry {
    /// Resolve every sound of `document` against `root`.
    ///
    /// Missing files, empty globs and bad weights are reported and the
    /// affected file or group is dropped. A repeated sound name is reported
    /// and the later definition ignored.
    #[tracing::instrument(level = "debug", skip_all, fields(root = %root.display()))]
    pub fn build(
        document: &SoundsDocument,
        root: &Path,
        diagnostics: &mut Diagnostics,
    ) -> Result<Self, Error> {
        let mut registry = Self::default();

        for (name, specs) in document.iter() {
            let mut scope = diagnostics.enter(format!("Sound '{name}'"));
            if registry.sounds.contains_key(name) {
                scope.report(format!("Reuse of sound name '{name}'"))?;
                continue;
            }

            let mut groups = Vec::with_capacity(specs.len());
            for (index, spec) in specs.iter().enumerate() {
                let mut group_scope = scope.enter(format!("File group {}", index + 1));
                if let Some(group) = build_group(spec, root, &mut group_scope)? {
                    groups.push(group);
                }
            }
            if groups.is_empty() {
                scope.report("No sounds supplied")?;
            }

            for group in &groups {
                for path in &group.paths {
                    registry
                        .files
                        .entry(path.clone())
                        .or_default()
                        .insert(name.to_owned());
                }
            }
            tracing::debug!(sound = name, groups = groups.len(), "built sound");
            registry.sounds.insert(
                name.to_owned(),
                Sound {
                    name: name.to_owned(),
                    groups,
                },
            );
        }

        Ok(registry)
    }

    pub fn get(&self, name: &str) -> Option<&Sound> {
        self.sounds.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sounds.contains_key(name)
    }

    /// Sound names in document order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sounds.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sound> {
        self.sounds.values()
    }

    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }

    /// Resolved file → names of the sounds that use it.
    pub fn files(&self) -> &BTreeMap<PathBuf, BTreeSet<String>> {
        &self.files
    }

    /// Whether any sound resolved to `path`.
    pub fn is_referenced(&self, path: &Path) -> bool {
        self.files
            .get(&lexical(path))
            .is_some_and(|users| !users.is_empty())
    }
}

/// Resolve one group spec. `None` means the group was discarded (and why
/// was reported).
fn build_group(
    spec: &FileSpec,
    root: &Path,
    diagnostics: &mut Diagnostics,
) -> Result<Option<FileGroup>, Error> {
    let mut paths = Vec::new();

    if let Some(pattern) = &spec.glob {
        match expand_glob(root, pattern) {
            Ok(found) if found.is_empty() => {
                diagnostics.report(format!("No files for glob: '{pattern}'"))?;
            }
            Ok(found) => paths.extend(found),
            Err(e) => diagnostics.report(format!("Invalid glob '{pattern}': {e}"))?,
        }
    }

    if let Some(filenames) = &spec.filenames {
        if filenames.is_empty() {
            diagnostics.report("Empty list of filenames")?;
        }
        for filename in filenames {
            if let Some(path) = resolve_file(root, filename, diagnostics)? {
                paths.push(path);
            }
        }
    }

    if let Some(filename) = &spec.filename {
        if let Some(path) = resolve_file(root, filename, diagnostics)? {
            paths.push(path);
        }
    }

    if paths.is_empty() {
        diagnostics.report("No sounds supplied")?;
        return Ok(None);
    }

    let Some(weight) = parse_weight(spec.weight.as_ref()) else {
        let raw = spec.weight.as_ref().map_or_else(String::new, Value::to_string);
        diagnostics.report(format!("Invalid weight: {raw}"))?;
        return Ok(None);
    };

    Ok(Some(FileGroup { paths, weight }))
}

fn resolve_file(
    root: &Path,
    filename: &str,
    diagnostics: &mut Diagnostics,
) -> Result<Option<PathBuf>, Error> {
    let path = root.join(filename);
    if path.exists() {
        Ok(Some(lexical(&path)))
    } else {
        diagnostics.report(format!("File '{filename}' does not exist"))?;
        Ok(None)
    }
}

/// Files under `root` matching `pattern`, sorted. Directories never match.
fn expand_glob(root: &Path, pattern: &str) -> Result<Vec<PathBuf>, glob::PatternError> {
    let full = format!(
        "{}/{pattern}",
        glob::Pattern::escape(&root.to_string_lossy())
    );
    let mut found: Vec<PathBuf> = glob::glob(&full)?
        .flatten()
        .filter(|path| path.is_file())
        .map(|path| lexical(&path))
        .collect();
    found.sort();
    Ok(found)
}

/// Weight of a group: absent means 1; otherwise a positive integer, given
/// as a JSON number (`2` or `2.0`) or a numeric string.
fn parse_weight(raw: Option<&Value>) -> Option<u32> {
    let Some(raw) = raw else {
        return Some(1);
    };
    let weight = match raw {
        Value::Number(n) => match n.as_u64() {
            Some(weight) => weight,
            None => n
                .as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0)
                .map(|f| f as u64)?,
        },
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    u32::try_from(weight).ok().filter(|w| *w > 0)
}

/// `path` with `.` components removed and each `..` folded into the
/// directory before it, so differently spelled references to the same file
/// compare equal. Symlinks are not resolved; a leading `..` is kept.
pub(crate) fn lexical(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir
                if matches!(cleaned.components().next_back(), Some(Component::Normal(_))) =>
            {
                cleaned.pop();
            }
            other => cleaned.push(other),
        }
    }
    if cleaned.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        cleaned
    }
}
