//! Question file naming and persistence.
//!
//! Files are UTF-8 JSON arrays indented with two spaces. Non-ASCII text is
//! written literally, so accented questions stay readable in the file.
//!
//! Writes go to a temporary file in the target directory which is then renamed
//! over the target, so a failed write never leaves a truncated file behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::OutputError;
use crate::quiz::QuestionSet;

/// Maximum number of characters kept from the theme when building a slug.
pub const SLUG_MAX_CHARS: usize = 30;

/// Prefix shared by every generated file name.
const FILE_PREFIX: &str = "questions_";

/// Builds a filesystem-friendly slug from a theme.
///
/// Lowercases, turns spaces into underscores, drops apostrophes and keeps at
/// most [`SLUG_MAX_CHARS`] characters.
///
/// ```
/// use quizforge::export::theme_slug;
///
/// assert_eq!(theme_slug("Histoire de France"), "histoire_de_france");
/// assert_eq!(theme_slug("L'Égypte"), "légypte");
/// ```
pub fn theme_slug(theme: &str) -> String {
    theme
        .to_lowercase()
        .replace(' ', "_")
        .replace('\'', "")
        .chars()
        .take(SLUG_MAX_CHARS)
        .collect()
}

/// Locations of the files produced by one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// Intermediate file holding the validated, unenriched questions.
    pub raw: PathBuf,
    /// Final artifact, enriched when enrichment succeeded.
    pub final_path: PathBuf,
}

impl OutputPaths {
    /// Resolves output paths for `theme` inside `work_dir`.
    ///
    /// The raw file is always `questions_<slug>.json` in `work_dir`. The final
    /// file is `explicit_output` when given, otherwise
    /// `questions_<slug>.enriched.json` in `work_dir`.
    pub fn resolve(theme: &str, work_dir: &Path, explicit_output: Option<&Path>) -> Self {
        let slug = theme_slug(theme);
        let raw = work_dir.join(format!("{}{}.json", FILE_PREFIX, slug));
        let final_path = explicit_output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| work_dir.join(format!("{}{}.enriched.json", FILE_PREFIX, slug)));

        Self { raw, final_path }
    }
}

/// Serializes a question set the way it is stored on disk.
pub fn to_pretty_json(questions: &QuestionSet) -> Result<String, OutputError> {
    Ok(serde_json::to_string_pretty(questions)?)
}

/// Writes a question set to `path`, creating parent directories as needed.
///
/// The file is replaced atomically. An existing file keeps its permissions.
pub fn write_questions(path: &Path, questions: &QuestionSet) -> Result<(), OutputError> {
    let json = to_pretty_json(questions)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|source| OutputError::Write {
        path: dir.to_path_buf(),
        source,
    })?;

    let write_error = |source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_error)?;
    tmp.write_all(json.as_bytes()).map_err(write_error)?;
    tmp.as_file().sync_all().map_err(write_error)?;
    if let Ok(metadata) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(metadata.permissions())
            .map_err(write_error)?;
    }
    tmp.persist(path).map_err(|e| write_error(e.error))?;

    tracing::debug!(path = %path.display(), count = questions.len(), "Wrote question file");
    Ok(())
}

/// Reads a question set from `path`.
///
/// # Errors
///
/// Returns `OutputError::Read` if the file cannot be read and
/// `OutputError::InvalidBank` if it is not a JSON array of questions.
pub fn read_questions(path: &Path) -> Result<QuestionSet, OutputError> {
    let content = fs::read_to_string(path).map_err(|source| OutputError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|e| OutputError::InvalidBank {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::Question;
    use tempfile::TempDir;

    fn sample_set() -> QuestionSet {
        vec![Question::new(
            "Quelle est la capitale de l'Égypte ?",
            vec![
                "Le Caire".to_string(),
                "Alexandrie".to_string(),
                "Louxor".to_string(),
                "Gizeh".to_string(),
            ],
            "Le Caire",
        )]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_theme_slug_rules() {
        assert_eq!(theme_slug("astronomie"), "astronomie");
        assert_eq!(theme_slug("Histoire de France"), "histoire_de_france");
        assert_eq!(theme_slug("l'art d'aujourd'hui"), "lart_daujourdhui");
    }

    #[test]
    fn test_theme_slug_truncates_on_characters() {
        let theme = "é".repeat(40);
        let slug = theme_slug(&theme);
        assert_eq!(slug.chars().count(), SLUG_MAX_CHARS);

        let long = "les grandes découvertes scientifiques du vingtième siècle";
        assert_eq!(theme_slug(long), "les_grandes_découvertes_scient");
    }

    #[test]
    fn test_output_paths_default_final() {
        let paths = OutputPaths::resolve("Histoire de France", Path::new("/tmp/tools"), None);
        assert_eq!(
            paths.raw,
            PathBuf::from("/tmp/tools/questions_histoire_de_france.json")
        );
        assert_eq!(
            paths.final_path,
            PathBuf::from("/tmp/tools/questions_histoire_de_france.enriched.json")
        );
    }

    #[test]
    fn test_output_paths_explicit_final() {
        let paths = OutputPaths::resolve(
            "géographie",
            Path::new("/tmp/tools"),
            Some(Path::new("out/geo.json")),
        );
        assert_eq!(paths.raw, PathBuf::from("/tmp/tools/questions_géographie.json"));
        assert_eq!(paths.final_path, PathBuf::from("out/geo.json"));
    }

    #[test]
    fn test_pretty_json_keeps_non_ascii_and_indents() {
        let json = to_pretty_json(&sample_set()).expect("should serialize");
        assert!(json.contains("l'Égypte"));
        assert!(!json.contains("\\u"));
        assert!(json.starts_with("[\n  {\n    \"question\""));
        assert!(json.contains("\"reponseCorrecte\": \"Le Caire\""));
    }

    #[test]
    fn test_write_then_read_questions() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("nested").join("questions.json");

        write_questions(&path, &sample_set()).expect("should write");
        let loaded = read_questions(&path).expect("should read");

        assert_eq!(loaded, sample_set());
    }

    #[test]
    fn test_overwrite_leaves_no_temporary_files() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("questions.json");
        fs::write(&path, "[]").expect("write fixture");

        write_questions(&path, &sample_set()).expect("should write");

        let entries: Vec<_> = fs::read_dir(dir.path())
            .expect("list dir")
            .map(|e| e.expect("entry").file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("questions.json")]);
        assert_eq!(read_questions(&path).expect("should read"), sample_set());
    }

    #[test]
    fn test_failed_write_cleans_up_temporary_file() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("questions.json");
        fs::create_dir(&path).expect("occupy target with a directory");

        let err = write_questions(&path, &sample_set()).expect_err("should fail");
        assert!(matches!(err, OutputError::Write { .. }));

        assert!(path.is_dir());
        assert_eq!(fs::read_dir(dir.path()).expect("list dir").count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_overwrite_keeps_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("questions.json");
        fs::write(&path, "[]").expect("write fixture");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).expect("chmod");

        write_questions(&path, &sample_set()).expect("should write");

        let mode = fs::metadata(&path).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn test_read_rejects_non_array() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("bank.json");
        fs::write(&path, "{\"question\": 1}").expect("write fixture");

        let err = read_questions(&path).expect_err("should fail");
        assert!(matches!(err, OutputError::InvalidBank { .. }));
    }
}
