//! soundcheck-kernel: validation of a soundboard's configuration.
//!
//! A soundboard root holds three JSON documents and a tree of audio files:
//!
//! - **sounds**: named, weighted groups of audio files ([`SoundRegistry`])
//! - **commands**: text commands with aliases, each playing one sound
//!   ([`CommandRegistry`])
//! - **slash commands**: a tree of leaves, option choices and subcommand
//!   groups ([`SlashRegistry`])
//!
//! Building the command registries records which sounds they use in a
//! [`UsageIndex`]; [`CrossReference`] then compares sounds, usages and the
//! files on disk. Every problem carries the labels of the scopes it was
//! found in ([`Diagnostics`]).
//!
//! [`Validator`] runs the whole pipeline for one root:
//!
//! ```ignore
//! let report = Validator::from_root("bot/")?.run()?;
//! for problem in report.problems() {
//!     println!("{problem}");
//! }
//! ```

pub mod audio;
pub mod command;
pub mod config;
pub mod crossref;
pub mod diagnostics;
pub mod error;
pub mod loader;
pub mod permissions;
pub mod slash;
pub mod sound;
pub mod usage;
pub mod validator;

pub use audio::{AUDIO_EXTENSIONS, collect_audio_files};
pub use command::{Command, CommandRegistry};
pub use config::{CONFIG_FILE, Config, ConfigError};
pub use crossref::{Coverage, CrossReference};
pub use diagnostics::{Diagnostics, Mode, Problem, Severity};
pub use error::Error;
pub use loader::{LoadError, load_document};
pub use permissions::{Access, Permission};
pub use slash::{SlashCommand, SlashKind, SlashOption, SlashRegistry};
pub use sound::{FileGroup, Sound, SoundError, SoundRegistry};
pub use usage::{SlashPath, UsageIndex, User};
pub use validator::{Report, Validator};
