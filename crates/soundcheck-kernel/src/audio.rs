//! Enumerate the audio files on disk.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::sound::lexical;

/// Extensions recognized as audio, lowercase and without the dot.
pub const AUDIO_EXTENSIONS: &[&str] = &[
    "aac", "flac", "m4a", "mka", "mp3", "oga", "ogg", "opus", "spx", "wav",
];

/// Every non-hidden file below `dir` whose extension is in `extensions`
/// (compared case-insensitively), sorted.
///
/// Hidden files and directories are skipped; ignore files are not
/// consulted. Symlinks are not followed into directories, but a link that
/// does not point at a directory is listed under its own path. A missing
/// directory yields no files.
pub fn collect_audio_files<S: AsRef<str>>(dir: &Path, extensions: &[S]) -> Vec<PathBuf> {
    if !dir.is_dir() {
        tracing::warn!(dir = %dir.display(), "audio directory does not exist");
        return Vec::new();
    }

    let walker = WalkBuilder::new(dir)
        .hidden(true)
        .parents(false)
        .ignore(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable audio entry");
                continue;
            }
        };
        let listed = entry
            .file_type()
            .is_some_and(|t| t.is_file() || (t.is_symlink() && !entry.path().is_dir()));
        if !listed {
            continue;
        }
        if has_extension(entry.path(), extensions) {
            files.push(lexical(entry.path()));
        }
    }

    files.sort();
    tracing::debug!(dir = %dir.display(), files = files.len(), "collected audio files");
    files
}

fn has_extension<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    extensions
        .iter()
        .any(|known| known.as_ref().trim_start_matches('.').eq_ignore_ascii_case(ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use soundcheck_testutil::Fixture;

    #[rstest]
    #[case::ogg("a.ogg", true)]
    #[case::upper("A.WAV", true)]
    #[case::opus("deep/b.opus", true)]
    #[case::text("notes.txt", false)]
    #[case::no_extension("README", false)]
    #[case::extension_only_in_dir("x.ogg/readme", false)]
    fn recognizes_extensions(#[case] path: &str, #[case] audio: bool) {
        assert_eq!(has_extension(Path::new(path), AUDIO_EXTENSIONS), audio);
    }

    #[test]
    fn dotted_extension_list_entries() {
        assert!(has_extension(Path::new("a.mp3"), &[".mp3"]));
    }

    #[test]
    fn walks_nested_and_skips_hidden() {
        let fixture = Fixture::new();
        fixture
            .audio("audio/a.ogg")
            .audio("audio/sub/b.wav")
            .audio("audio/.hidden.ogg")
            .audio("audio/.cache/c.ogg")
            .write("audio/notes.txt", "not audio");

        let files = collect_audio_files(&fixture.path("audio"), AUDIO_EXTENSIONS);
        assert_eq!(
            files,
            vec![fixture.path("audio/a.ogg"), fixture.path("audio/sub/b.wav")]
        );
    }

    #[test]
    fn ignore_files_are_not_consulted() {
        let fixture = Fixture::new();
        fixture
            .write("audio/.gitignore", "*.ogg\n")
            .write("audio/.ignore", "*.ogg\n")
            .audio("audio/a.ogg");

        let files = collect_audio_files(&fixture.path("audio"), AUDIO_EXTENSIONS);
        assert_eq!(files, vec![fixture.path("audio/a.ogg")]);
    }

    #[test]
    fn custom_extensions() {
        let fixture = Fixture::new();
        fixture.audio("a.ogg").audio("b.mid");

        let files = collect_audio_files(fixture.root(), &["mid".to_owned()]);
        assert_eq!(files, vec![fixture.path("b.mid")]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_files_are_listed_under_the_link() {
        use std::os::unix::fs::symlink;

        let fixture = Fixture::new();
        fixture.audio("store/real.ogg").audio("store/more/b.ogg");
        std::fs::create_dir_all(fixture.path("audio")).expect("audio dir");
        symlink(fixture.path("store/real.ogg"), fixture.path("audio/link.ogg"))
            .expect("file link");
        symlink(fixture.path("store/gone.ogg"), fixture.path("audio/dangling.ogg"))
            .expect("dangling link");
        symlink(fixture.path("store/more"), fixture.path("audio/more")).expect("dir link");

        let files = collect_audio_files(&fixture.path("audio"), AUDIO_EXTENSIONS);
        assert_eq!(
            files,
            vec![fixture.path("audio/dangling.ogg"), fixture.path("audio/link.ogg")]
        );
    }

    #[test]
    fn missing_directory_is_empty() {
        let fixture = Fixture::new();
        assert!(collect_audio_files(&fixture.path("nope"), AUDIO_EXTENSIONS).is_empty());
    }
}
