//! The `soundcheck` command line.
//!
//! ```bash
//! soundcheck --root bot/             # validate, exit 1 if fixes are needed
//! soundcheck --root bot/ usage laugh # who plays "laugh"
//! soundcheck pick laugh --seed 7     # which file would play
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use rand::SeedableRng;
use rand::rngs::StdRng;
use soundcheck_kernel::{Config, Coverage, Mode, Report, Validator};

#[derive(Debug, Parser)]
#[command(name = "soundcheck", version, about = "Validate soundboard configuration")]
pub struct Cli {
    /// Soundboard root holding the documents and audio files.
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Config file to use instead of `<root>/soundcheck.toml`.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Stop at the first problem.
    #[arg(long, global = true)]
    pub strict: bool,

    /// Which registries must reference every sound.
    #[arg(long, global = true, value_enum)]
    pub coverage: Option<CoverageArg>,

    /// Pass when only warnings remain.
    #[arg(long, global = true)]
    pub allow_warnings: bool,

    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate the soundboard (the default).
    Check,
    /// List the commands using each sound.
    Usage {
        /// Only this sound.
        sound: Option<String>,
    },
    /// Pick files from a sound the way the bot would.
    Pick {
        sound: String,
        /// Seed for a reproducible pick.
        #[arg(long)]
        seed: Option<u64>,
        /// Number of picks.
        #[arg(long, default_value_t = 1)]
        count: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CoverageArg {
    Combined,
    Each,
}

impl From<CoverageArg> for Coverage {
    fn from(arg: CoverageArg) -> Self {
        match arg {
            CoverageArg::Combined => Coverage::Combined,
            CoverageArg::Each => Coverage::Each,
        }
    }
}

/// How a successful invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Passed,
    FixesRequired,
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> Self {
        match status {
            Status::Passed => ExitCode::SUCCESS,
            Status::FixesRequired => ExitCode::from(1),
        }
    }
}

impl Cli {
    /// The configuration file (or defaults) with command-line overrides
    /// applied.
    pub fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::load(&self.root)?,
        };
        if self.strict {
            config.mode = Mode::Strict;
        }
        if let Some(coverage) = self.coverage {
            config.coverage = coverage.into();
        }
        if self.allow_warnings {
            config.allow_warnings = true;
        }
        Ok(config)
    }
}

/// Run the parsed command line, writing results to `out`.
///
/// `Err` is a usage or configuration error; validation failures are a
/// [`Status`].
pub fn run(cli: &Cli, out: &mut dyn Write) -> Result<Status> {
    let config = cli.load_config().context("failed to load configuration")?;
    tracing::debug!(?config, root = %cli.root.display(), "configuration loaded");

    match &cli.command {
        None | Some(Commands::Check) => check(&cli.root, config, out),
        Some(Commands::Usage { sound }) => usage(&cli.root, config, sound.as_deref(), out),
        Some(Commands::Pick { sound, seed, count }) => {
            pick(&cli.root, config, sound, *seed, *count, out)
        }
    }
}

fn check(root: &Path, config: Config, out: &mut dyn Write) -> Result<Status> {
    let report = match Validator::new(root, config).run() {
        Ok(report) => report,
        Err(error) => {
            writeln!(out, "{}", error.into_problem())?;
            writeln!(out, "Fixes required")?;
            return Ok(Status::FixesRequired);
        }
    };

    for problem in report.problems() {
        writeln!(out, "{problem}")?;
    }
    if report.count() == 0 {
        writeln!(out, "No problems found")?;
        return Ok(Status::Passed);
    }

    writeln!(
        out,
        "{} problem{} found ({} blocking)",
        report.count(),
        if report.count() == 1 { "" } else { "s" },
        report.blocking()
    )?;
    if report.passed() {
        Ok(Status::Passed)
    } else {
        writeln!(out, "Fixes required")?;
        Ok(Status::FixesRequired)
    }
}

/// Build everything in collecting mode; the subcommands that inspect the
/// model do not judge it.
fn collect(root: &Path, mut config: Config) -> Result<Report> {
    config.mode = Mode::Collect;
    let report = Validator::new(root, config).run()?;
    if report.sounds().is_none() {
        let reason = report
            .problems()
            .first()
            .map(ToString::to_string)
            .unwrap_or_default();
        bail!("sounds document is unusable: {reason}");
    }
    Ok(report)
}

fn usage(root: &Path, config: Config, sound: Option<&str>, out: &mut dyn Write) -> Result<Status> {
    let report = collect(root, config)?;
    let usage = report.usage();

    let mut names: Vec<&str> = report.sounds().map(|s| s.names().collect()).unwrap_or_default();
    for name in usage.sounds() {
        if !names.contains(&name) {
            names.push(name);
        }
    }
    if let Some(sound) = sound {
        if !names.contains(&sound) {
            bail!("sound '{sound}' is neither defined nor used");
        }
        names.retain(|name| *name == sound);
    }

    for name in names {
        let defined = report.sounds().is_some_and(|s| s.contains(name));
        let users: Vec<String> = usage
            .users(name)
            .map(|users| users.iter().map(ToString::to_string).collect())
            .unwrap_or_default();
        let listed = if users.is_empty() {
            "not used".to_owned()
        } else {
            users.join(", ")
        };
        let suffix = if defined { "" } else { " (undefined)" };
        writeln!(out, "{name}{suffix}: {listed}")?;
    }
    Ok(Status::Passed)
}

fn pick(
    root: &Path,
    config: Config,
    sound: &str,
    seed: Option<u64>,
    count: usize,
    out: &mut dyn Write,
) -> Result<Status> {
    let report = collect(root, config)?;
    let Some(found) = report.sounds().and_then(|s| s.get(sound)) else {
        bail!("sound '{sound}' is not defined");
    };

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    for _ in 0..count {
        let path = found.choose(&mut rng)?;
        let shown = path.strip_prefix(report.root()).unwrap_or(path);
        writeln!(out, "{}", shown.display())?;
    }
    Ok(Status::Passed)
}
