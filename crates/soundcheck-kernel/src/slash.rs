//! The slash-command tree.
//!
//! A node's shape is picked from its keys: `subcommands` makes a group,
//! `options` makes an options node, anything else is a leaf. Groups nest at
//! most two levels below a top-level command.

use std::collections::HashSet;
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use soundcheck_types::{Entries, SlashCommandDef, SlashCommandsDocument, SlashOptionDef};

use crate::diagnostics::Diagnostics;
use crate::error::Error;
use crate::permissions::Access;
use crate::sound::SoundRegistry;
use crate::usage::{SlashPath, UsageIndex, User};

/// Longest ancestor chain a node may have.
pub const MAX_PARENT_DEPTH: usize = 2;

/// Longest option label, in characters.
pub const MAX_OPTION_LABEL: usize = 100;

#[allow(clippy::expect_used)]
static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w-]{1,32}$").expect("valid slash name pattern"));

/// Whether `name` is usable as a slash-command or subcommand name.
pub fn is_valid_name(name: &str) -> bool {
    NAME_PATTERN.is_match(name)
}

/// One choice of an options node.
#[derive(Debug, Clone, PartialEq)]
pub struct SlashOption {
    sound: String,
    description: Option<String>,
}

impl SlashOption {
    pub fn sound(&self) -> &str {
        &self.sound
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// What a node does when invoked.
#[derive(Debug, Clone, PartialEq)]
pub enum SlashKind {
    /// Plays one sound.
    Leaf { sound: String },
    /// Plays the sound of the chosen option, or of `default`.
    Options {
        options: IndexMap<String, SlashOption>,
        default: String,
    },
    /// Dispatches to a named child.
    Group {
        subcommands: IndexMap<String, SlashCommand>,
    },
}

/// A built node with its position in the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct SlashCommand {
    name: String,
    path: SlashPath,
    description: Option<String>,
    access: Access,
    kind: SlashKind,
}

impl SlashCommand {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names from the top-level command down to this node.
    pub fn path(&self) -> &SlashPath {
        &self.path
    }

    /// Path of the enclosing group; `None` for top-level commands.
    pub fn parent(&self) -> Option<SlashPath> {
        self.path.parent().filter(|p| !p.is_empty())
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn access(&self) -> &Access {
        &self.access
    }

    pub fn kind(&self) -> &SlashKind {
        &self.kind
    }

    /// A direct child of a group node.
    pub fn subcommand(&self, name: &str) -> Option<&SlashCommand> {
        match &self.kind {
            SlashKind::Group { subcommands } => subcommands.get(name),
            _ => None,
        }
    }

    /// The sound played for `option`, or for the default when `None`.
    /// Leaves ignore `option`; groups play nothing themselves.
    pub fn sound_for(&self, option: Option<&str>) -> Option<&str> {
        match &self.kind {
            SlashKind::Leaf { sound } => Some(sound.as_str()),
            SlashKind::Options { options, default } => options
                .get(option.unwrap_or(default.as_str()))
                .map(SlashOption::sound),
            SlashKind::Group { .. } => None,
        }
    }
}

/// Top-level slash commands by name.
#[derive(Debug, Clone, Default)]
pub struct SlashRegistry {
    commands: IndexMap<String, SlashCommand>,
}

impl SlashRegistry {
    /// Build the tree of `document`, recording every leaf and option in
    /// `usage`.
    ///
    /// An invalid node name or a tree nested too deep is a structural
    /// error and ends the build. Everything else is reported and the
    /// offending node or option is left out.
    pub fn build(
        document: &SlashCommandsDocument,
        sounds: &SoundRegistry,
        usage: &mut UsageIndex,
        diagnostics: &mut Diagnostics,
    ) -> Result<Self, Error> {
        let commands = build_children(&SlashPath::root(), document, sounds, usage, diagnostics)?;
        tracing::debug!(commands = commands.len(), "built slash commands");
        Ok(Self { commands })
    }

    pub fn get(&self, name: &str) -> Option<&SlashCommand> {
        self.commands.get(name)
    }

    /// Walk the tree along `path`.
    pub fn resolve(&self, path: &SlashPath) -> Option<&SlashCommand> {
        let (first, rest) = path.names().split_first()?;
        rest.iter()
            .try_fold(self.commands.get(first)?, |node, name| node.subcommand(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &SlashCommand> {
        self.commands.values()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Build the siblings below `parent`. The first of several same-named
/// siblings wins.
fn build_children(
    parent: &SlashPath,
    entries: &Entries<SlashCommandDef>,
    sounds: &SoundRegistry,
    usage: &mut UsageIndex,
    diagnostics: &mut Diagnostics,
) -> Result<IndexMap<String, SlashCommand>, Error> {
    let mut built = IndexMap::new();
    let mut seen = HashSet::new();

    for (name, def) in entries.iter() {
        let label = if parent.is_empty() {
            format!("Slash command '{name}'")
        } else {
            format!("Subcommand '{name}'")
        };
        let mut scope = diagnostics.enter(label);
        if !seen.insert(name) {
            scope.report(format!("Reuse of name '{name}'"))?;
            continue;
        }
        if let Some(node) = build_node(parent, name, def, sounds, usage, &mut scope)? {
            built.insert(name.to_owned(), node);
        }
    }

    Ok(built)
}

fn build_node(
    parent: &SlashPath,
    name: &str,
    def: &SlashCommandDef,
    sounds: &SoundRegistry,
    usage: &mut UsageIndex,
    diagnostics: &mut Diagnostics,
) -> Result<Option<SlashCommand>, Error> {
    if parent.len() > MAX_PARENT_DEPTH {
        return Err(diagnostics.structural(format!("Max parent depth is {MAX_PARENT_DEPTH}")));
    }
    if !is_valid_name(name) {
        return Err(diagnostics.structural(format!(
            "Name must match regular expression: {}",
            NAME_PATTERN.as_str()
        )));
    }

    let path = parent.child(name);
    let access = Access::resolve(def.default_permission, def.permissions.as_deref(), diagnostics)?;

    let kind = if let Some(subcommands) = &def.subcommands {
        SlashKind::Group {
            subcommands: build_children(&path, subcommands, sounds, usage, diagnostics)?,
        }
    } else if let Some(options) = &def.options {
        match build_options(&path, options, def.default.as_deref(), sounds, usage, diagnostics)? {
            Some(kind) => kind,
            None => return Ok(None),
        }
    } else {
        let Some(sound) = def.sound.as_deref() else {
            diagnostics.report("Missing key 'sound'")?;
            return Ok(None);
        };
        usage.record(sound, User::Slash(path.clone()));
        if !sounds.contains(sound) {
            tracing::debug!(%path, sound, "slash command references unknown sound");
            return Ok(None);
        }
        SlashKind::Leaf {
            sound: sound.to_owned(),
        }
    };

    Ok(Some(SlashCommand {
        name: name.to_owned(),
        path,
        description: def.description.clone(),
        access,
        kind,
    }))
}

/// Build the options of the node at `path`. `None` drops the node: its
/// default is missing, undeclared, or names an option that was left out.
fn build_options(
    path: &SlashPath,
    options: &Entries<SlashOptionDef>,
    default: Option<&str>,
    sounds: &SoundRegistry,
    usage: &mut UsageIndex,
    diagnostics: &mut Diagnostics,
) -> Result<Option<SlashKind>, Error> {
    let mut built = IndexMap::new();

    for (label, option) in options.iter() {
        let mut scope = diagnostics.enter(format!("Option '{label}'"));
        if !(1..=MAX_OPTION_LABEL).contains(&label.chars().count()) {
            scope.report("Invalid option label")?;
            continue;
        }
        if built.contains_key(label) {
            scope.report(format!("Reuse of option '{label}'"))?;
            continue;
        }
        let Some(sound) = option.sound.as_deref() else {
            scope.report("Missing key 'sound'")?;
            continue;
        };
        usage.record(sound, User::Slash(path.child(label)));
        if sounds.contains(sound) {
            built.insert(
                label.to_owned(),
                SlashOption {
                    sound: sound.to_owned(),
                    description: option.description.clone(),
                },
            );
        }
    }

    let Some(default) = default else {
        diagnostics.report("Missing key 'default'")?;
        return Ok(None);
    };
    if !options.contains_key(default) {
        diagnostics.report(format!("Invalid default sound '{default}'"))?;
        return Ok(None);
    }
    if !built.contains_key(default) {
        tracing::debug!(%path, default, "default option was left out");
        return Ok(None);
    }

    Ok(Some(SlashKind::Options {
        options: built,
        default: default.to_owned(),
    }))
}
