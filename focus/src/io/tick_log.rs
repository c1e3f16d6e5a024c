//! JSON Lines log of scheduler ticks written by `focus run`.
//!
//! One record per tick, appended in tick order. The log is a product
//! artifact and is unaffected by `RUST_LOG`.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::command::Command;
use crate::core::scheduler::{SchedulerState, TickOutcome};
use crate::core::types::GoalId;
use crate::driver::TickReport;

#[derive(Debug, Clone, Serialize)]
pub struct TickRecord {
    pub tick: u64,
    pub state: SchedulerState,
    pub goal: Option<GoalId>,
    pub outcome: TickOutcome,
    pub commands: Vec<Command>,
}

impl TickRecord {
    pub fn new(report: &TickReport, commands: Vec<Command>) -> Self {
        Self {
            tick: report.tick,
            state: report.state,
            goal: report.goal.clone(),
            outcome: report.outcome.clone(),
            commands,
        }
    }
}

pub struct TickLog {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl TickLog {
    /// Create (or truncate) the log at `path`, creating parent directories.
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("create tick log dir {}", parent.display()))?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("open tick log {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
        })
    }

    pub fn append(&mut self, record: &TickRecord) -> Result<()> {
        let line = serde_json::to_string(record)?;
        writeln!(self.writer, "{line}")
            .and_then(|()| self.writer.flush())
            .with_context(|| format!("write {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::executor::Advance;

    #[test]
    fn appends_one_json_line_per_tick() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("logs").join("ticks.jsonl");
        let mut log = TickLog::create(&path).expect("create");

        log.append(&TickRecord {
            tick: 1,
            state: SchedulerState::Pursuing,
            goal: Some(GoalId::new("kill-1")),
            outcome: TickOutcome::Advanced {
                goal: GoalId::new("kill-1"),
                step: Advance::HeadingToRoute {
                    route: 1,
                    region: 0,
                },
            },
            commands: vec![Command::MoveToRoute {
                route: 1,
                region: 0,
            }],
        })
        .expect("append");
        log.append(&TickRecord {
            tick: 2,
            state: SchedulerState::Blocked,
            goal: None,
            outcome: TickOutcome::Blocked {
                requested_stop: false,
            },
            commands: Vec::new(),
        })
        .expect("append");
        drop(log);

        let contents = fs::read_to_string(&path).expect("read");
        let lines: Vec<serde_json::Value> = contents
            .lines()
            .map(|line| serde_json::from_str(line).expect("json line"))
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["tick"], 1);
        assert_eq!(lines[0]["goal"], "kill-1");
        assert_eq!(lines[0]["commands"][0]["command"], "move_to_route");
        assert_eq!(lines[1]["state"], "blocked");
        assert_eq!(lines[1]["goal"], serde_json::Value::Null);
    }
}
