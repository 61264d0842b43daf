use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_RETENTION_DAYS: u32 = 30;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[value(alias = "todo")]
    Pending,
    #[value(alias = "done")]
    Completed,
    Closed,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Completed => "completed",
            TaskStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// How a reordered day subsequence is written back into the full task list.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpliceMode {
    /// Day tasks go back into the slots they held; other tasks keep their positions.
    InPlace,
    /// Day tasks first, then every other task.
    Append,
}

fn default_color() -> bool {
    true
}

fn default_retention_days() -> u32 {
    DEFAULT_RETENTION_DAYS
}

fn default_splice() -> SpliceMode {
    SpliceMode::InPlace
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub data_dir: Option<String>,
    #[serde(default = "default_color")]
    pub color: bool,
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
    #[serde(default = "default_splice")]
    pub splice: SpliceMode,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            color: default_color(),
            retention_days: default_retention_days(),
            splice: default_splice(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn task_json_uses_camel_case_and_lowercase_status() {
        let task = Task {
            id: "1700000000000".to_string(),
            title: "Buy milk".to_string(),
            status: TaskStatus::Completed,
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
        };

        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["status"], "completed");
        assert!(value.get("createdAt").is_some());
        assert!(value.get("created_at").is_none());
    }

    #[test]
    fn task_reads_browser_style_iso_timestamps() {
        let raw = r#"[{"id":"1","title":"x","status":"closed","createdAt":"2024-05-02T08:15:00.123Z"}]"#;
        let tasks: Vec<Task> = serde_json::from_str(raw).unwrap();
        assert_eq!(tasks[0].status, TaskStatus::Closed);
        assert_eq!(
            tasks[0].created_at.timestamp_millis(),
            Utc.with_ymd_and_hms(2024, 5, 2, 8, 15, 0).unwrap().timestamp_millis() + 123
        );
    }

    #[test]
    fn config_defaults_fill_missing_keys() {
        let config: AppConfig = toml::from_str("color = false").unwrap();
        assert!(!config.color);
        assert_eq!(config.retention_days, 30);
        assert_eq!(config.splice, SpliceMode::InPlace);
    }
}
