//! Definitions as they appear in the JSON documents.
//!
//! Keys the validator reports on when missing (`sound`, `default`) are
//! optional here so that a missing key becomes a located problem rather
//! than a parse failure for the whole document. Unknown keys are still
//! rejected at parse time.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Entries;

/// `sounds.json`: sound name → ordered file groups.
pub type SoundsDocument = Entries<Vec<FileSpec>>;

/// `commands.json`: command name → definition.
pub type CommandsDocument = Entries<CommandDef>;

/// `commands_slash.json`: top-level slash-command name → node.
pub type SlashCommandsDocument = Entries<SlashCommandDef>;

/// One weighted group of candidate files for a sound.
///
/// Any combination of `glob`, `filenames` and `filename` may be given; the
/// resolved paths are pooled into one group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glob: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filenames: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Kept raw: a weight that is not a positive integer is a reported
    /// problem for its group, not a parse error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<Value>,
}

/// A flat text command.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Opaque keyword arguments handed to the bot's command decorator.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub commandkwargs: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_permission: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<PermissionDef>>,
}

/// A slash-command node of any shape.
///
/// The shape is decided by which keys are present: `subcommands` makes a
/// group, `options` an options command, anything else a plain leaf.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlashCommandDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Entries<SlashOptionDef>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcommands: Option<Entries<SlashCommandDef>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_permission: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<PermissionDef>>,
}

/// One choice of an options slash command.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlashOptionDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Who a permission override applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionType {
    Role,
    User,
}

/// A permission override: allow or deny a set of roles or users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PermissionDef {
    #[serde(rename = "type")]
    pub kind: PermissionType,
    pub ids: Vec<u64>,
    #[serde(default = "default_state")]
    pub state: bool,
}

fn default_state() -> bool {
    true
}
