use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Serialize, de::DeserializeOwned};

/// Where a command writes its JSON result.
pub struct Output {
    writer: Box<dyn Write>,
    label: String,
}

impl Output {
    /// Writes `value` as pretty JSON to `path`, or to stdout when `path` is `None`.
    pub fn save_json<T>(value: &T, path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: Serialize,
    {
        Self::create(path)?.write_json(value)
    }

    fn create(path: Option<PathBuf>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self {
                writer: Box::new(io::stdout().lock()),
                label: "stdout".to_owned(),
            });
        };
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Self {
            writer: Box::new(BufWriter::new(file)),
            label: path.display().to_string(),
        })
    }

    fn write_json<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: Serialize,
    {
        serde_json::to_writer_pretty(&mut self.writer, value)
            .with_context(|| format!("Failed to write JSON to {}", self.label))?;
        writeln!(self.writer)
            .and_then(|()| self.writer.flush())
            .with_context(|| format!("Failed to finish writing {}", self.label))?;
        tracing::debug!(output = %self.label, "wrote JSON output");
        Ok(())
    }
}

/// Reads and parses a JSON file; `file_kind` names the file in error messages.
pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {file_kind} file: {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse {file_kind} JSON file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use tetris_gym_env::EnvConfig;

    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("tetris-gym-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_save_and_read_config() {
        let path = temp_path("config.json");
        let config = EnvConfig {
            max_episode_steps: Some(42),
            ..EnvConfig::default()
        };

        Output::save_json(&config, Some(path.clone())).unwrap();
        let read: EnvConfig = read_json_file("config", &path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(read, config);
    }

    #[test]
    fn test_read_errors_name_the_file() {
        let missing = temp_path("missing.json");
        let err = read_json_file::<EnvConfig, _>("config", &missing).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));

        let invalid = temp_path("invalid.json");
        fs::write(&invalid, r#"{ "board": { "width": "wide" } }"#).unwrap();
        let err = read_json_file::<EnvConfig, _>("config", &invalid).unwrap_err();
        fs::remove_file(&invalid).unwrap();
        assert!(err.to_string().contains("Failed to parse config JSON file"));
    }
}
