//! Enricher backed by an external script.
//!
//! Runs `<runtime> <script> --in <input> --out <output>` with the script's own
//! directory as working directory, so the script finds its caches and logs
//! next to itself. The subprocess has no timeout.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use super::Enricher;
use crate::error::EnrichmentError;

/// File name of the companion enrichment script.
pub const ENRICH_SCRIPT_NAME: &str = "enrich_questions.js";

/// Program used to run the script.
pub const DEFAULT_RUNTIME: &str = "node";

/// Enricher that delegates to `enrich_questions.js`.
#[derive(Debug, Clone)]
pub struct NodeScriptEnricher {
    script_path: PathBuf,
    runtime: String,
}

impl NodeScriptEnricher {
    /// Creates an enricher for the script at `script_path`, run with `node`.
    pub fn new(script_path: impl Into<PathBuf>) -> Self {
        Self {
            script_path: script_path.into(),
            runtime: DEFAULT_RUNTIME.to_string(),
        }
    }

    /// Creates an enricher for `enrich_questions.js` inside `tools_dir`.
    pub fn in_dir(tools_dir: &Path) -> Self {
        Self::new(tools_dir.join(ENRICH_SCRIPT_NAME))
    }

    /// Overrides the program used to run the script.
    pub fn with_runtime(mut self, runtime: impl Into<String>) -> Self {
        self.runtime = runtime.into();
        self
    }

    pub fn script_path(&self) -> &Path {
        &self.script_path
    }

    pub fn runtime(&self) -> &str {
        &self.runtime
    }
}

#[async_trait]
impl Enricher for NodeScriptEnricher {
    async fn enrich(&self, input: &Path, output: &Path) -> Result<(), EnrichmentError> {
        if !self.script_path.is_file() {
            return Err(EnrichmentError::ScriptNotFound(self.script_path.clone()));
        }

        // The child runs in the script directory; relative paths would resolve there.
        let script = std::path::absolute(&self.script_path)?;
        let input = std::path::absolute(input)?;
        let output = std::path::absolute(output)?;
        let working_dir = script
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        info!(
            script = %script.display(),
            input = %input.display(),
            output = %output.display(),
            "Running enrichment script"
        );

        let result = Command::new(&self.runtime)
            .arg(&script)
            .arg("--in")
            .arg(&input)
            .arg("--out")
            .arg(&output)
            .current_dir(&working_dir)
            .stdin(Stdio::null())
            .output()
            .await;

        let process_output = match result {
            Ok(o) => o,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(EnrichmentError::RuntimeUnavailable {
                    runtime: self.runtime.clone(),
                    message: e.to_string(),
                });
            }
            Err(e) => return Err(EnrichmentError::Io(e)),
        };

        for line in String::from_utf8_lossy(&process_output.stdout).lines() {
            debug!(target: "quizforge::enrich::script", "{}", line);
        }

        if process_output.status.success() {
            Ok(())
        } else {
            Err(EnrichmentError::NonZeroExit {
                code: process_output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&process_output.stderr)
                    .trim()
                    .to_string(),
            })
        }
    }

    fn name(&self) -> &str {
        ENRICH_SCRIPT_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_in_dir_points_at_companion_script() {
        let enricher = NodeScriptEnricher::in_dir(Path::new("/opt/quiz/tools"));
        assert_eq!(
            enricher.script_path(),
            Path::new("/opt/quiz/tools/enrich_questions.js")
        );
        assert_eq!(enricher.runtime(), "node");
    }

    #[tokio::test]
    async fn test_missing_script_is_reported() {
        let dir = TempDir::new().expect("temp dir");
        let enricher = NodeScriptEnricher::in_dir(dir.path());

        let err = enricher
            .enrich(&dir.path().join("in.json"), &dir.path().join("out.json"))
            .await
            .expect_err("should fail");

        assert!(matches!(err, EnrichmentError::ScriptNotFound(_)));
    }

    #[tokio::test]
    async fn test_missing_runtime_is_reported() {
        let dir = TempDir::new().expect("temp dir");
        fs::write(dir.path().join(ENRICH_SCRIPT_NAME), "// noop").expect("write script");

        let enricher = NodeScriptEnricher::in_dir(dir.path())
            .with_runtime("quizforge-no-such-runtime-for-tests");

        let err = enricher
            .enrich(&dir.path().join("in.json"), &dir.path().join("out.json"))
            .await
            .expect_err("should fail");

        assert!(matches!(err, EnrichmentError::RuntimeUnavailable { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_successful_script_writes_output() {
        let dir = TempDir::new().expect("temp dir");
        let script = dir.path().join("copy.sh");
        fs::write(&script, "cp \"$2\" \"$4\"\n").expect("write script");

        let input = dir.path().join("in.json");
        let output = dir.path().join("out.json");
        fs::write(&input, "[]").expect("write input");

        NodeScriptEnricher::new(&script)
            .with_runtime("sh")
            .enrich(&input, &output)
            .await
            .expect("enrichment should succeed");

        assert_eq!(fs::read_to_string(&output).expect("output exists"), "[]");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_script_runs_in_its_own_directory() {
        let tools = TempDir::new().expect("temp dir");
        let elsewhere = TempDir::new().expect("temp dir");
        let script = tools.path().join("pwd.sh");
        fs::write(&script, "pwd > \"$4\"\n").expect("write script");

        let output = elsewhere.path().join("cwd.txt");
        NodeScriptEnricher::new(&script)
            .with_runtime("sh")
            .enrich(&elsewhere.path().join("in.json"), &output)
            .await
            .expect("enrichment should succeed");

        let reported = fs::read_to_string(&output).expect("output exists");
        let reported = fs::canonicalize(reported.trim()).expect("valid dir");
        let expected = fs::canonicalize(tools.path()).expect("valid dir");
        assert_eq!(reported, expected);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_carries_stderr() {
        let dir = TempDir::new().expect("temp dir");
        let script = dir.path().join("fail.sh");
        fs::write(&script, "echo 'Wikidata unreachable' >&2\nexit 3\n").expect("write script");

        let err = NodeScriptEnricher::new(&script)
            .with_runtime("sh")
            .enrich(&dir.path().join("in.json"), &dir.path().join("out.json"))
            .await
            .expect_err("should fail");

        match err {
            EnrichmentError::NonZeroExit { code, stderr } => {
                assert_eq!(code, 3);
                assert_eq!(stderr, "Wikidata unreachable");
            }
            other => panic!("Expected NonZeroExit, got {:?}", other),
        }
    }
}
