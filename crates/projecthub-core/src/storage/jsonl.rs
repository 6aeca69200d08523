//! JSONL-backed project store
//!
//! Records live in a single `.jsonl` file, one project per line, so the
//! directory can be versioned alongside the code that uses it:
//!
//! ```text
//! {"id":"3f0c…","projectName":"Shore Sweep","category":"Beach Cleaning",…}
//! {"id":"9a41…","projectName":"Library Paint Job","category":"School Upgrades",…}
//! ```
//!
//! A missing file reads as an empty store. Inserts append a line.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use uuid::Uuid;

use super::ProjectStore;
use crate::Result;
use crate::domain::{QuerySpec, RawProjectRecord};
use crate::error::Error;

/// Default file name for the project store
pub const PROJECTS_FILE: &str = "projects.jsonl";

/// Project store persisted as JSON Lines
#[derive(Debug, Clone)]
pub struct JsonlProjectStore {
    path: PathBuf,
}

impl JsonlProjectStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record in file order
    pub async fn read_all(&self) -> Result<Vec<RawProjectRecord>> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(Error::Storage(format!(
                    "failed to read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        parse_records(&contents, &self.path)
    }
}

fn parse_records(contents: &str, path: &Path) -> Result<Vec<RawProjectRecord>> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str::<RawProjectRecord>(line).map_err(|e| {
                Error::Storage(format!("{}:{}: {}", path.display(), index + 1, e))
            })
        })
        .collect()
}

#[async_trait]
impl ProjectStore for JsonlProjectStore {
    async fn query(&self, spec: &QuerySpec) -> Result<Vec<RawProjectRecord>> {
        let matched: Vec<RawProjectRecord> = self
            .read_all()
            .await?
            .into_iter()
            .filter(|r| spec.matches(r))
            .collect();
        debug!(path = %self.path.display(), query = %spec, matched = matched.len(), "Queried JSONL store");
        Ok(matched)
    }

    async fn insert(&self, mut record: RawProjectRecord) -> Result<String> {
        if record.id.is_empty() {
            record.id = Uuid::new_v4().to_string();
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let mut line = serde_json::to_string(&record)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        info!(project_id = %record.id, path = %self.path.display(), "Project inserted");
        Ok(record.id)
    }
}
