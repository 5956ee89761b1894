//! Flat text commands and their aliases.

use std::collections::{BTreeSet, HashSet};

use indexmap::IndexMap;
use serde_json::{Map, Value};
use soundcheck_types::CommandsDocument;

use crate::diagnostics::Diagnostics;
use crate::error::Error;
use crate::permissions::Access;
use crate::sound::SoundRegistry;
use crate::usage::{UsageIndex, User};

/// A text command bound to one sound.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    name: String,
    sound: String,
    aliases: BTreeSet<String>,
    description: Option<String>,
    kwargs: Map<String, Value>,
    access: Access,
}

impl Command {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the sound this command plays; always registered.
    pub fn sound(&self) -> &str {
        &self.sound
    }

    /// Never contains the command's own name.
    pub fn aliases(&self) -> &BTreeSet<String> {
        &self.aliases
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Extra keyword data passed through to the bot untouched.
    pub fn kwargs(&self) -> &Map<String, Value> {
        &self.kwargs
    }

    pub fn access(&self) -> &Access {
        &self.access
    }
}

/// All text commands of a document.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: IndexMap<String, Command>,
}

impl CommandRegistry {
    /// Build the commands of `document`, recording each one's sound in
    /// `usage`.
    ///
    /// Names and aliases share one namespace across the whole document; a
    /// repeat of either is reported. Entries without a `sound` key, or whose
    /// sound is not registered, are left out (the latter is reported by the
    /// cross-reference check).
    pub fn build(
        document: &CommandsDocument,
        sounds: &SoundRegistry,
        usage: &mut UsageIndex,
        diagnostics: &mut Diagnostics,
    ) -> Result<Self, Error> {
        let mut registry = Self::default();
        let mut taken: HashSet<String> = HashSet::new();

        for (name, def) in document.iter() {
            let mut scope = diagnostics.enter(format!("Command '{name}'"));
            if !taken.insert(name.to_owned()) {
                scope.report(format!("Reuse of name '{name}'"))?;
            }

            let Some(sound) = def.sound.as_deref() else {
                scope.report("Missing key 'sound'")?;
                continue;
            };
            usage.record(sound, User::Command(name.to_owned()));
            if !sounds.contains(sound) {
                tracing::debug!(command = name, sound, "command references unknown sound");
                continue;
            }

            let access =
                Access::resolve(def.default_permission, def.permissions.as_deref(), &mut scope)?;

            let mut aliases: BTreeSet<String> = def.aliases.iter().cloned().collect();
            aliases.remove(name);
            for alias in &aliases {
                if !taken.insert(alias.clone()) {
                    scope.report(format!("Reuse of alias '{alias}'"))?;
                }
            }

            if registry.commands.contains_key(name) {
                continue;
            }
            registry.commands.insert(
                name.to_owned(),
                Command {
                    name: name.to_owned(),
                    sound: sound.to_owned(),
                    aliases,
                    description: def.description.clone(),
                    kwargs: def.commandkwargs.clone(),
                    access,
                },
            );
        }

        tracing::debug!(commands = registry.len(), "built commands");
        Ok(registry)
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    /// Find a command by its name or one of its aliases.
    pub fn resolve(&self, name_or_alias: &str) -> Option<&Command> {
        self.commands.get(name_or_alias).or_else(|| {
            self.commands
                .values()
                .find(|c| c.aliases.contains(name_or_alias))
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.values()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use soundcheck_testutil::Fixture;
    use soundcheck_types::SoundsDocument;

    struct Built {
        registry: CommandRegistry,
        usage: UsageIndex,
        diagnostics: Diagnostics,
        _fixture: Fixture,
    }

    fn build(commands: Value) -> Built {
        build_document(serde_json::from_value(commands).expect("valid commands"))
    }

    fn build_document(document: CommandsDocument) -> Built {
        let fixture = Fixture::new();
        fixture.audio("laugh.ogg").audio("cry.ogg");
        let sounds: SoundsDocument = serde_json::from_value(json!({
            "laugh": [{"filename": "laugh.ogg"}],
            "cry": [{"filename": "cry.ogg"}]
        }))
        .expect("valid sounds");
        let mut diagnostics = Diagnostics::collecting();
        let sounds =
            SoundRegistry::build(&sounds, fixture.root(), &mut diagnostics).expect("sounds build");

        let mut usage = UsageIndex::new();
        let registry = CommandRegistry::build(&document, &sounds, &mut usage, &mut diagnostics)
            .expect("commands build");
        Built {
            registry,
            usage,
            diagnostics,
            _fixture: fixture,
        }
    }

    fn messages(built: &Built) -> Vec<&str> {
        built.diagnostics.problems().iter().map(|p| p.message()).collect()
    }

    #[test]
    fn duplicate_alias_in_own_list_is_fine() {
        let built = build(json!({"haha": {"sound": "laugh", "aliases": ["lol", "lol"]}}));
        assert!(messages(&built).is_empty());
        let haha = built.registry.get("haha").expect("built");
        assert_eq!(haha.aliases().len(), 1);
        assert_eq!(built.registry.resolve("lol").map(Command::name), Some("haha"));
    }

    #[test]
    fn self_alias_is_dropped_silently() {
        let built = build(json!({"haha": {"sound": "laugh", "aliases": ["haha", "hehe"]}}));
        assert!(messages(&built).is_empty());
        let haha = built.registry.get("haha").expect("built");
        assert!(!haha.aliases().contains("haha"));
        assert!(haha.aliases().contains("hehe"));
    }

    #[test]
    fn alias_reused_across_commands() {
        let built = build(json!({
            "haha": {"sound": "laugh", "aliases": ["lol"]},
            "sob": {"sound": "cry", "aliases": ["lol"]}
        }));
        assert_eq!(messages(&built), ["Reuse of alias 'lol'"]);
        assert_eq!(
            built.diagnostics.problems()[0].context(),
            ["Command 'sob'"]
        );
    }

    #[test]
    fn name_reusing_earlier_alias() {
        let built = build(json!({
            "haha": {"sound": "laugh", "aliases": ["sob"]},
            "sob": {"sound": "cry"}
        }));
        assert_eq!(messages(&built), ["Reuse of name 'sob'"]);
        // the later command is still built
        assert!(built.registry.get("sob").is_some());
    }

    #[test]
    fn alias_reusing_earlier_name() {
        let built = build(json!({
            "haha": {"sound": "laugh"},
            "sob": {"sound": "cry", "aliases": ["haha"]}
        }));
        assert_eq!(messages(&built), ["Reuse of alias 'haha'"]);
    }

    #[test]
    fn repeated_command_key_keeps_first() {
        let document: CommandsDocument =
            serde_json::from_str(r#"{"haha": {"sound": "laugh"}, "haha": {"sound": "cry"}}"#)
                .expect("valid commands");
        let built = build_document(document);

        assert_eq!(messages(&built), ["Reuse of name 'haha'"]);
        assert_eq!(built.registry.get("haha").map(Command::sound), Some("laugh"));
        // both definitions count as users of their sounds
        assert!(built.usage.is_used("laugh"));
        assert!(built.usage.is_used("cry"));
    }

    #[test]
    fn missing_sound_key_skips_entry_and_aliases() {
        let built = build(json!({
            "broken": {"aliases": ["b"]},
            "ok": {"sound": "laugh", "aliases": ["b"]}
        }));
        assert_eq!(messages(&built), ["Missing key 'sound'"]);
        assert!(built.registry.get("broken").is_none());
        assert_eq!(built.registry.resolve("b").map(Command::name), Some("ok"));
    }

    #[test]
    fn unknown_sound_is_recorded_but_not_built() {
        let built = build(json!({"ghost": {"sound": "boo"}}));
        assert!(messages(&built).is_empty());
        assert!(built.registry.is_empty());
        assert!(built.usage.is_used("boo"));
    }

    #[test]
    fn usage_records_command_names() {
        let built = build(json!({
            "haha": {"sound": "laugh"},
            "hehe": {"sound": "laugh"}
        }));
        let users = built.usage.users("laugh").expect("used");
        assert!(users.contains(&User::Command("haha".into())));
        assert!(users.contains(&User::Command("hehe".into())));
    }

    #[test]
    fn keeps_description_and_kwargs() {
        let built = build(json!({
            "haha": {
                "sound": "laugh",
                "description": "laughs",
                "commandkwargs": {"hidden": true},
                "permissions": [{"type": "user", "ids": [42]}]
            }
        }));
        let haha = built.registry.get("haha").expect("built");
        assert_eq!(haha.description(), Some("laughs"));
        assert_eq!(haha.kwargs().get("hidden"), Some(&Value::Bool(true)));
        assert!(!haha.access().default_permission());
    }
}
