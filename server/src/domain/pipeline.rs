//! Pipeline runner
//!
//! Runs the five loader stages in their fixed order, each as a child process
//! of this same binary (`demodw load <stage>`). A stage failure stops the
//! pipeline immediately and the runner exits with the failed child's exit
//! code. Every step is appended to `logs/pipeline.log` in addition to the
//! normal console logging, so a run leaves a file trail.

use std::io::Write;
use std::path::PathBuf;

use thiserror::Error;
use tokio::process::Command;

use crate::core::cli::LoadStage;
use crate::core::config::AppConfig;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Missing raw data directory: {0} (run `demodw generate` first)")]
    MissingRawDir(PathBuf),

    #[error("Cannot write pipeline log {path}: {source}")]
    Log {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot run loader stage '{stage}': {source}")]
    Spawn {
        stage: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("Stage '{stage}' failed (exit code {})", .code.map_or_else(|| "unknown".to_string(), |c| c.to_string()))]
    StageFailed {
        stage: &'static str,
        code: Option<i32>,
    },
}

impl PipelineError {
    /// Process exit code the runner should terminate with
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::StageFailed { code, .. } => code.unwrap_or(1),
            _ => 1,
        }
    }
}

/// Append-only log file for pipeline runs
struct PipelineLog {
    path: PathBuf,
    file: std::fs::File,
}

impl PipelineLog {
    fn open(config: &AppConfig) -> Result<Self, PipelineError> {
        let path = config.paths.pipeline_log();
        std::fs::create_dir_all(&config.paths.log_dir).map_err(|source| PipelineError::Log {
            path: config.paths.log_dir.clone(),
            source,
        })?;
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| PipelineError::Log {
                path: path.clone(),
                source,
            })?;
        Ok(Self { path, file })
    }

    fn line(&mut self, level: &str, message: &str) -> Result<(), PipelineError> {
        let stamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S");
        writeln!(self.file, "{stamp} | {level} | {message}").map_err(|source| {
            PipelineError::Log {
                path: self.path.clone(),
                source,
            }
        })
    }

    fn info(&mut self, message: &str) -> Result<(), PipelineError> {
        tracing::info!("{message}");
        self.line("INFO", message)
    }

    fn error(&mut self, message: &str) -> Result<(), PipelineError> {
        tracing::error!("{message}");
        self.line("ERROR", message)
    }
}

/// Run all five loader stages in order, stopping at the first failure
pub async fn run(config: &AppConfig) -> Result<(), PipelineError> {
    let mut log = PipelineLog::open(config)?;

    if !config.paths.raw_dir.is_dir() {
        log.error(&format!(
            "Missing folder: {} (did you generate your raw files?)",
            config.paths.raw_dir.display()
        ))?;
        return Err(PipelineError::MissingRawDir(config.paths.raw_dir.clone()));
    }
    log.info(&format!(
        "DATABASE_URL set: {}",
        config.database.from_url_var
    ))?;

    for stage in LoadStage::PIPELINE_ORDER {
        run_stage(config, &mut log, stage).await?;
    }

    log.info("Pipeline complete")?;
    Ok(())
}

/// Run one stage as `demodw load <stage>` with the resolved configuration
/// passed explicitly, so children do not re-resolve it differently
async fn run_stage(
    config: &AppConfig,
    log: &mut PipelineLog,
    stage: LoadStage,
) -> Result<(), PipelineError> {
    log.info(&format!("Running stage: {stage}"))?;

    let spawn_err = |source| PipelineError::Spawn {
        stage: stage.as_str(),
        source,
    };
    let exe = std::env::current_exe().map_err(spawn_err)?;
    let output = Command::new(exe)
        .arg("load")
        .arg(stage.as_str())
        .arg("--database-url")
        .arg(&config.database.url)
        .arg("--raw-dir")
        .arg(&config.paths.raw_dir)
        .output()
        .await
        .map_err(spawn_err)?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    if !output.status.success() {
        log.error(&format!("FAILED: {stage}"))?;
        log.error(&format!("STDOUT:\n{}", stdout.trim_end()))?;
        log.error(&format!("STDERR:\n{}", stderr.trim_end()))?;
        return Err(PipelineError::StageFailed {
            stage: stage.as_str(),
            code: output.status.code(),
        });
    }

    // Loader logging goes to stderr; keep whatever the child printed
    let detail = if stderr.trim().is_empty() {
        stdout.trim().to_string()
    } else {
        stderr.trim().to_string()
    };
    log.info(&format!("OK: {stage}\n{detail}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cli::CliConfig;

    fn config_with_paths(raw_dir: PathBuf, log_dir: PathBuf) -> AppConfig {
        let cli = CliConfig {
            raw_dir: Some(raw_dir),
            log_dir: Some(log_dir),
            ..CliConfig::default()
        };
        AppConfig::load(&cli).unwrap()
    }

    #[tokio::test]
    async fn test_missing_raw_dir_fails_before_any_stage() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_paths(dir.path().join("nope"), dir.path().join("logs"));

        let err = run(&config).await.unwrap_err();
        assert!(matches!(err, PipelineError::MissingRawDir(_)));
        assert_eq!(err.exit_code(), 1);

        // The failure is still recorded in the log file
        let log = std::fs::read_to_string(dir.path().join("logs/pipeline.log")).unwrap();
        assert!(log.contains("ERROR"), "{log}");
        assert!(log.contains("Missing folder"), "{log}");
    }

    #[test]
    fn test_stage_failure_mirrors_child_exit_code() {
        let err = PipelineError::StageFailed {
            stage: "orders",
            code: Some(3),
        };
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("'orders'"));

        let killed = PipelineError::StageFailed {
            stage: "returns",
            code: None,
        };
        assert_eq!(killed.exit_code(), 1);
        assert!(killed.to_string().contains("unknown"));
    }

    #[tokio::test]
    async fn test_log_lines_are_timestamped_and_appended() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_paths(dir.path().to_path_buf(), dir.path().join("logs"));

        let mut log = PipelineLog::open(&config).unwrap();
        log.info("first run").unwrap();
        let mut log = PipelineLog::open(&config).unwrap();
        log.info("second run").unwrap();

        let content = std::fs::read_to_string(config.paths.pipeline_log()).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("| INFO | first run"));
        assert!(lines[1].contains("| INFO | second run"));
    }
}
