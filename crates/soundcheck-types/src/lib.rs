//! soundcheck-types: the three JSON documents of a soundboard, as data.
//!
//! This crate only describes shapes. Resolving sounds against the disk,
//! collision checks and cross-referencing live in `soundcheck-kernel`.
//!
//! | Document | Type |
//! |----------|------|
//! | `sounds.json` | [`SoundsDocument`] |
//! | `commands.json` | [`CommandsDocument`] |
//! | `commands_slash.json` | [`SlashCommandsDocument`] |

mod defs;
mod entries;

pub use defs::{
    CommandDef, CommandsDocument, FileSpec, PermissionDef, PermissionType, SlashCommandDef,
    SlashCommandsDocument, SlashOptionDef, SoundsDocument,
};
pub use entries::Entries;
