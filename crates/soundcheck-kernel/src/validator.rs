//! One validation run over a soundboard root.
//!
//! Order: sounds, then text commands and slash commands (each against the
//! built sounds), then the audio walk and the cross-reference checks. A
//! document that fails to load or build is reported under its file name
//! and only its registry is missing from the result; without sounds
//! nothing else can run.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use soundcheck_types::{CommandsDocument, SlashCommandsDocument, SoundsDocument};

use crate::audio::collect_audio_files;
use crate::command::CommandRegistry;
use crate::config::{Config, ConfigError};
use crate::crossref::CrossReference;
use crate::diagnostics::{Diagnostics, Problem};
use crate::error::Error;
use crate::loader::{LoadError, load_document};
use crate::slash::SlashRegistry;
use crate::sound::SoundRegistry;
use crate::usage::UsageIndex;

/// Validates the documents below one root.
#[derive(Debug, Clone)]
pub struct Validator {
    root: PathBuf,
    config: Config,
}

impl Validator {
    pub fn new(root: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// A validator configured by the root's `soundcheck.toml`, if any.
    pub fn from_root(root: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let root = root.into();
        let config = Config::load(&root)?;
        Ok(Self::new(root, config))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run every check.
    ///
    /// In collecting mode every problem ends up in the report. In strict
    /// mode the first problem is returned as [`Error::Aborted`].
    #[tracing::instrument(level = "info", skip_all, fields(root = %self.root.display()))]
    pub fn run(&self) -> Result<Report, Error> {
        let mut diagnostics = Diagnostics::new(self.config.mode);
        let mut report = Report {
            root: self.root.clone(),
            allow_warnings: self.config.allow_warnings,
            sounds: None,
            commands: None,
            slash_commands: None,
            audio_files: Vec::new(),
            problems: Vec::new(),
        };

        let sounds = self.stage(
            &self.config.sounds_file,
            &mut diagnostics,
            |document: &SoundsDocument, diagnostics| {
                SoundRegistry::build(document, &self.root, diagnostics)
            },
        )?;
        let Some(sounds) = sounds else {
            tracing::warn!("no sounds available, skipping remaining checks");
            report.problems = diagnostics.into_problems();
            return Ok(report);
        };
        tracing::info!(sounds = sounds.len(), files = sounds.files().len(), "sounds built");

        let commands = self.stage(
            &self.config.commands_file,
            &mut diagnostics,
            |document: &CommandsDocument, diagnostics| {
                let mut usage = UsageIndex::new();
                let registry = CommandRegistry::build(document, &sounds, &mut usage, diagnostics)?;
                Ok((registry, usage))
            },
        )?;
        let slash_commands = self.stage(
            &self.config.slash_commands_file,
            &mut diagnostics,
            |document: &SlashCommandsDocument, diagnostics| {
                let mut usage = UsageIndex::new();
                let registry = SlashRegistry::build(document, &sounds, &mut usage, diagnostics)?;
                Ok((registry, usage))
            },
        )?;
        tracing::info!(
            commands = commands.as_ref().map(|(r, _)| r.len()),
            slash_commands = slash_commands.as_ref().map(|(r, _)| r.len()),
            "commands built"
        );

        let audio_dir = self.root.join(&self.config.audio_dir);
        let audio_files = collect_audio_files(&audio_dir, &self.config.audio_extensions);

        let mut crossref = CrossReference::new(&sounds).with_coverage(self.config.coverage);
        if let Some((_, usage)) = &commands {
            crossref = crossref.with_commands(usage);
        }
        if let Some((_, usage)) = &slash_commands {
            crossref = crossref.with_slash_commands(usage);
        }
        crossref.run(&audio_files, &self.root, &mut diagnostics)?;

        tracing::info!(
            problems = diagnostics.count(),
            blocking = diagnostics.blocking(),
            "validation finished"
        );
        report.sounds = Some(sounds);
        report.commands = commands;
        report.slash_commands = slash_commands;
        report.audio_files = audio_files;
        report.problems = diagnostics.into_problems();
        Ok(report)
    }

    /// Load one document and build its registry under the document's
    /// label. `None` means the document was unusable and that was reported.
    fn stage<D, T>(
        &self,
        file: &Path,
        diagnostics: &mut Diagnostics,
        build: impl FnOnce(&D, &mut Diagnostics) -> Result<T, Error>,
    ) -> Result<Option<T>, Error>
    where
        D: DeserializeOwned,
    {
        let mut scope = diagnostics.enter(file.display().to_string());

        let document: D = match load_document(&self.root.join(file)) {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!(error = %e, "document unusable");
                let message = match e {
                    LoadError::Io { source, .. } => format!("Cannot read document: {source}"),
                    LoadError::Json { source, .. } => format!("Invalid document: {source}"),
                };
                scope.report(message)?;
                return Ok(None);
            }
        };

        match build(&document, &mut scope) {
            Ok(built) => Ok(Some(built)),
            Err(Error::Structural(problem)) => {
                tracing::warn!(%problem, "document structure rejected");
                scope.record(problem)?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

/// What a run built and found.
#[derive(Debug, Clone)]
pub struct Report {
    root: PathBuf,
    allow_warnings: bool,
    sounds: Option<SoundRegistry>,
    commands: Option<(CommandRegistry, UsageIndex)>,
    slash_commands: Option<(SlashRegistry, UsageIndex)>,
    audio_files: Vec<PathBuf>,
    problems: Vec<Problem>,
}

impl Report {
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `None` when the sounds document was unusable.
    pub fn sounds(&self) -> Option<&SoundRegistry> {
        self.sounds.as_ref()
    }

    pub fn commands(&self) -> Option<&CommandRegistry> {
        self.commands.as_ref().map(|(registry, _)| registry)
    }

    pub fn slash_commands(&self) -> Option<&SlashRegistry> {
        self.slash_commands.as_ref().map(|(registry, _)| registry)
    }

    pub fn command_usage(&self) -> Option<&UsageIndex> {
        self.commands.as_ref().map(|(_, usage)| usage)
    }

    pub fn slash_usage(&self) -> Option<&UsageIndex> {
        self.slash_commands.as_ref().map(|(_, usage)| usage)
    }

    /// Uses from both registries together.
    pub fn usage(&self) -> UsageIndex {
        let mut usage = UsageIndex::new();
        for part in [self.command_usage(), self.slash_usage()].into_iter().flatten() {
            usage.merge(part);
        }
        usage
    }

    /// Audio files found on disk.
    pub fn audio_files(&self) -> &[PathBuf] {
        &self.audio_files
    }

    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    pub fn count(&self) -> usize {
        self.problems.len()
    }

    pub fn blocking(&self) -> usize {
        self.problems.iter().filter(|p| p.is_blocking()).count()
    }

    /// No problems, or only warnings when those are allowed.
    pub fn passed(&self) -> bool {
        if self.allow_warnings {
            self.blocking() == 0
        } else {
            self.count() == 0
        }
    }
}
