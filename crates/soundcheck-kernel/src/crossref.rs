//! Checks that need every registry: unused sounds, references to sounds
//! that do not exist, and audio files no sound uses.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::diagnostics::Diagnostics;
use crate::error::Error;
use crate::sound::SoundRegistry;
use crate::usage::{UsageIndex, User};

/// Which registries must reference a sound for it to count as used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Coverage {
    /// Either registry is enough.
    #[default]
    Combined,
    /// Both text commands and slash commands must use every sound.
    Each,
}

/// The cross-reference checks over one set of built registries.
///
/// A usage index that is absent belongs to a document that failed to load
/// or build; checks run against the remaining one.
#[derive(Debug, Clone, Copy)]
pub struct CrossReference<'a> {
    sounds: &'a SoundRegistry,
    commands: Option<&'a UsageIndex>,
    slash_commands: Option<&'a UsageIndex>,
    coverage: Coverage,
}

impl<'a> CrossReference<'a> {
    pub fn new(sounds: &'a SoundRegistry) -> Self {
        Self {
            sounds,
            commands: None,
            slash_commands: None,
            coverage: Coverage::default(),
        }
    }

    pub fn with_commands(mut self, usage: &'a UsageIndex) -> Self {
        self.commands = Some(usage);
        self
    }

    pub fn with_slash_commands(mut self, usage: &'a UsageIndex) -> Self {
        self.slash_commands = Some(usage);
        self
    }

    pub fn with_coverage(mut self, coverage: Coverage) -> Self {
        self.coverage = coverage;
        self
    }

    /// Run all three checks. Each runs to completion in collecting mode.
    pub fn run(
        &self,
        audio_files: &[PathBuf],
        root: &Path,
        diagnostics: &mut Diagnostics,
    ) -> Result<(), Error> {
        self.check_unused_sounds(diagnostics)?;
        self.check_dangling(diagnostics)?;
        self.check_unreferenced_files(audio_files, root, diagnostics)
    }

    /// Warn once per sound that no available registry references.
    pub fn check_unused_sounds(&self, diagnostics: &mut Diagnostics) -> Result<(), Error> {
        if self.commands.is_none() && self.slash_commands.is_none() {
            tracing::info!("no usage available, skipping unused sound check");
            return Ok(());
        }

        for name in self.sounds.names() {
            let in_commands = self.commands.map(|u| u.is_used(name));
            let in_slash = self.slash_commands.map(|u| u.is_used(name));
            let message = match (in_commands, in_slash, self.coverage) {
                (Some(false), Some(false), _) => "Sound is not referenced",
                (Some(false), None, _) => "Sound is not referenced in commands",
                (None, Some(false), _) => "Sound is not referenced in slash commands",
                (Some(false), Some(true), Coverage::Each) => {
                    "Sound is not referenced in commands (slash only)"
                }
                (Some(true), Some(false), Coverage::Each) => {
                    "Sound is not referenced in slash commands (commands only)"
                }
                _ => continue,
            };
            diagnostics.enter(format!("Sound '{name}'")).warn(message)?;
        }
        Ok(())
    }

    /// Report every referenced sound name the sound registry lacks, once,
    /// with all of its users.
    pub fn check_dangling(&self, diagnostics: &mut Diagnostics) -> Result<(), Error> {
        let mut missing: IndexMap<&str, BTreeSet<&User>> = IndexMap::new();
        for usage in [self.commands, self.slash_commands].into_iter().flatten() {
            for (name, users) in usage.iter() {
                if !self.sounds.contains(name) {
                    missing.entry(name).or_default().extend(users);
                }
            }
        }

        for (name, users) in missing {
            let users: Vec<String> = users.iter().map(ToString::to_string).collect();
            diagnostics
                .enter(format!("Sound '{name}'"))
                .report(format!("Sound does not exist (used by {})", users.join(", ")))?;
        }
        Ok(())
    }

    /// Warn for every audio file that no sound resolved to.
    pub fn check_unreferenced_files(
        &self,
        audio_files: &[PathBuf],
        root: &Path,
        diagnostics: &mut Diagnostics,
    ) -> Result<(), Error> {
        for file in audio_files {
            if self.sounds.is_referenced(file) {
                continue;
            }
            let shown = file.strip_prefix(root).unwrap_or(file);
            diagnostics.warn(format!("File '{}' is not referenced", shown.display()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;
    use crate::usage::SlashPath;
    use rstest::rstest;
    use serde_json::json;
    use soundcheck_testutil::Fixture;
    use soundcheck_types::SoundsDocument;

    fn sounds(fixture: &Fixture, names: &[&str]) -> SoundRegistry {
        let mut document = serde_json::Map::new();
        for name in names {
            let file = format!("{name}.ogg");
            fixture.audio(&file);
            document.insert((*name).to_owned(), json!([{"filename": file}]));
        }
        let document: SoundsDocument =
            serde_json::from_value(document.into()).expect("valid sounds");
        let mut diagnostics = Diagnostics::collecting();
        SoundRegistry::build(&document, fixture.root(), &mut diagnostics).expect("sounds build")
    }

    fn usage(sounds: &[&str]) -> UsageIndex {
        let mut usage = UsageIndex::new();
        for sound in sounds {
            usage.record(sound, User::Command(format!("play-{sound}")));
        }
        usage
    }

    fn messages(diagnostics: &Diagnostics) -> Vec<String> {
        diagnostics.problems().iter().map(ToString::to_string).collect()
    }

    #[test]
    fn split_coverage_is_complete_when_combined() {
        let fixture = Fixture::new();
        let registry = sounds(&fixture, &["a", "b"]);
        let commands = usage(&["a"]);
        let slash = usage(&["b"]);
        let mut diagnostics = Diagnostics::collecting();

        CrossReference::new(&registry)
            .with_commands(&commands)
            .with_slash_commands(&slash)
            .check_unused_sounds(&mut diagnostics)
            .expect("collecting");
        assert!(messages(&diagnostics).is_empty());
    }

    #[test]
    fn split_coverage_is_refined_when_each() {
        let fixture = Fixture::new();
        let registry = sounds(&fixture, &["a", "b"]);
        let commands = usage(&["a"]);
        let slash = usage(&["b"]);
        let mut diagnostics = Diagnostics::collecting();

        CrossReference::new(&registry)
            .with_commands(&commands)
            .with_slash_commands(&slash)
            .with_coverage(Coverage::Each)
            .check_unused_sounds(&mut diagnostics)
            .expect("collecting");
        assert_eq!(
            messages(&diagnostics),
            [
                "Sound 'a': Sound is not referenced in slash commands (commands only)",
                "Sound 'b': Sound is not referenced in commands (slash only)",
            ]
        );
    }

    #[rstest]
    #[case::combined(Coverage::Combined)]
    #[case::each(Coverage::Each)]
    fn unused_sound_reported_once(#[case] coverage: Coverage) {
        let fixture = Fixture::new();
        let registry = sounds(&fixture, &["a", "lonely"]);
        let commands = usage(&["a"]);
        let slash = usage(&["a"]);
        let mut diagnostics = Diagnostics::collecting();

        CrossReference::new(&registry)
            .with_commands(&commands)
            .with_slash_commands(&slash)
            .with_coverage(coverage)
            .check_unused_sounds(&mut diagnostics)
            .expect("collecting");
        assert_eq!(
            messages(&diagnostics),
            ["Sound 'lonely': Sound is not referenced"]
        );
        assert_eq!(diagnostics.problems()[0].severity(), Severity::Warning);
    }

    #[test]
    fn one_registry_unavailable() {
        let fixture = Fixture::new();
        let registry = sounds(&fixture, &["a", "b"]);
        let slash = usage(&["a"]);
        let mut diagnostics = Diagnostics::collecting();

        CrossReference::new(&registry)
            .with_slash_commands(&slash)
            .check_unused_sounds(&mut diagnostics)
            .expect("collecting");
        assert_eq!(
            messages(&diagnostics),
            ["Sound 'b': Sound is not referenced in slash commands"]
        );
    }

    #[test]
    fn both_registries_unavailable_skips_check() {
        let fixture = Fixture::new();
        let registry = sounds(&fixture, &["a"]);
        let mut diagnostics = Diagnostics::collecting();

        CrossReference::new(&registry)
            .check_unused_sounds(&mut diagnostics)
            .expect("collecting");
        assert_eq!(diagnostics.count(), 0);
    }

    #[test]
    fn dangling_reference_reported_once_with_all_users() {
        let fixture = Fixture::new();
        let registry = sounds(&fixture, &["a"]);
        let mut commands = usage(&["a", "ghost"]);
        commands.record("ghost", User::Command("boo".into()));
        let mut slash = UsageIndex::new();
        slash.record("ghost", User::Slash(SlashPath::from_iter(["spooky", "boo"])));
        let mut diagnostics = Diagnostics::collecting();

        CrossReference::new(&registry)
            .with_commands(&commands)
            .with_slash_commands(&slash)
            .check_dangling(&mut diagnostics)
            .expect("collecting");
        assert_eq!(
            messages(&diagnostics),
            [
                "Sound 'ghost': Sound does not exist (used by command 'boo', command 'play-ghost', slash command '/spooky boo')"
            ]
        );
        assert!(diagnostics.problems()[0].is_blocking());
    }

    #[test]
    fn unreferenced_file_reported_relative_to_root() {
        let fixture = Fixture::new();
        let registry = sounds(&fixture, &["a"]);
        fixture.audio("audio/extra.wav");
        let files = vec![fixture.path("a.ogg"), fixture.path("audio/extra.wav")];
        let mut diagnostics = Diagnostics::collecting();

        CrossReference::new(&registry)
            .check_unreferenced_files(&files, fixture.root(), &mut diagnostics)
            .expect("collecting");
        assert_eq!(
            messages(&diagnostics),
            ["File 'audio/extra.wav' is not referenced"]
        );
        assert!(!diagnostics.problems()[0].is_blocking());
    }

    #[test]
    fn run_continues_past_earlier_checks() {
        let fixture = Fixture::new();
        let registry = sounds(&fixture, &["a", "unused"]);
        fixture.audio("extra.ogg");
        let commands = usage(&["a", "ghost"]);
        let files = vec![fixture.path("extra.ogg")];
        let mut diagnostics = Diagnostics::collecting();

        CrossReference::new(&registry)
            .with_commands(&commands)
            .run(&files, fixture.root(), &mut diagnostics)
            .expect("collecting");
        assert_eq!(diagnostics.count(), 3);
        assert_eq!(diagnostics.blocking(), 1);
    }

    #[test]
    fn strict_stops_at_first() {
        let fixture = Fixture::new();
        let registry = sounds(&fixture, &["unused"]);
        let commands = usage(&["ghost"]);
        let mut diagnostics = Diagnostics::strict();

        let err = CrossReference::new(&registry)
            .with_commands(&commands)
            .run(&[], fixture.root(), &mut diagnostics)
            .expect_err("strict aborts");
        assert_eq!(err.problem().message(), "Sound is not referenced in commands");
        assert_eq!(diagnostics.count(), 1);
    }
}
