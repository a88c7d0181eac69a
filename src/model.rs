//! Projeções somente leitura dos dados da AWS entregues à camada de apresentação.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Uma state machine como listada pelo serviço de orquestração.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateMachineSummary {
    pub name: String,
    pub arn: String,
    /// `STANDARD` ou `EXPRESS`.
    pub workflow_type: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// Uma state machine junto com o documento bruto da sua definição.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateMachineDescription {
    pub summary: StateMachineSummary,
    /// `ACTIVE` ou `DELETING`.
    pub status: Option<String>,
    /// Texto JSON em Amazon States Language, sem parse.
    pub definition: String,
}

/// Predicado de nome aplicado às state machines e jobs do Glue listados.
/// Um filtro vazio aceita qualquer nome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameFilter {
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub contains: Option<String>,
}

impl NameFilter {
    #[cfg(test)]
    pub fn any() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            contains: None,
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        self.prefix.as_deref().is_none_or(|p| name.starts_with(p))
            && self.contains.as_deref().is_none_or(|c| name.contains(c))
    }
}

impl fmt::Display for NameFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.prefix, &self.contains) {
            (None, None) => write!(f, "*"),
            (Some(p), None) => write!(f, "{p}*"),
            (None, Some(c)) => write!(f, "*{c}*"),
            (Some(p), Some(c)) => write!(f, "{p}*{c}*"),
        }
    }
}

/// Definição de um job do Glue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlueJobSummary {
    pub name: String,
    pub created_at: Option<DateTime<Utc>>,
    pub glue_version: Option<String>,
    pub worker_type: Option<String>,
    pub number_of_workers: Option<u32>,
}

/// Estado do ciclo de vida de um job run do Glue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobRunStatus {
    Starting,
    Running,
    Stopping,
    Stopped,
    Succeeded,
    Failed,
    Timeout,
    Error,
    Waiting,
    Expired,
    /// Estado desconhecido.
    #[serde(other)]
    Unknown,
}

impl JobRunStatus {
    /// Indica se o run chegou a um estado final.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobRunStatus::Stopped
                | JobRunStatus::Succeeded
                | JobRunStatus::Failed
                | JobRunStatus::Timeout
                | JobRunStatus::Error
                | JobRunStatus::Expired
        )
    }
}

impl fmt::Display for JobRunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobRunStatus::Starting => "STARTING",
            JobRunStatus::Running => "RUNNING",
            JobRunStatus::Stopping => "STOPPING",
            JobRunStatus::Stopped => "STOPPED",
            JobRunStatus::Succeeded => "SUCCEEDED",
            JobRunStatus::Failed => "FAILED",
            JobRunStatus::Timeout => "TIMEOUT",
            JobRunStatus::Error => "ERROR",
            JobRunStatus::Waiting => "WAITING",
            JobRunStatus::Expired => "EXPIRED",
            JobRunStatus::Unknown => "UNKNOWN",
        };
        write!(f, "{s}")
    }
}

/// Uma execução de um job do Glue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRunSummary {
    pub id: String,
    pub job_name: String,
    pub status: JobRunStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub arguments: BTreeMap<String, String>,
    pub error_message: Option<String>,
}

impl JobRunSummary {
    /// `completed_at - started_at`, ou zero enquanto o run não terminou.
    pub fn duration(&self) -> TimeDelta {
        match (self.started_at, self.completed_at) {
            (Some(start), Some(end)) if end >= start => end - start,
            _ => TimeDelta::zero(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn run(started: Option<i64>, completed: Option<i64>) -> JobRunSummary {
        JobRunSummary {
            id: "jr_1".into(),
            job_name: "etl_daily".into(),
            status: JobRunStatus::Succeeded,
            started_at: started.map(|s| Utc.timestamp_opt(s, 0).unwrap()),
            completed_at: completed.map(|s| Utc.timestamp_opt(s, 0).unwrap()),
            arguments: BTreeMap::new(),
            error_message: None,
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        let f = NameFilter::any();
        assert!(f.matches("anything"));
        assert!(f.matches(""));
        assert_eq!(f.to_string(), "*");
    }

    #[test]
    fn prefix_and_contains_must_both_hold() {
        let f = NameFilter {
            prefix: Some("team_".into()),
            contains: Some("orders".into()),
        };
        assert!(f.matches("team_orders_daily"));
        assert!(!f.matches("team_billing"));
        assert!(!f.matches("other_orders"));
        assert_eq!(f.to_string(), "team_*orders*");
        assert!(NameFilter::prefix("team_").matches("team_billing"));
    }

    #[test]
    fn duration_of_completed_run() {
        let r = run(Some(1_700_000_000), Some(1_700_000_125));
        assert_eq!(r.duration(), TimeDelta::seconds(125));
    }

    #[test]
    fn duration_is_zero_while_running() {
        assert_eq!(run(Some(1_700_000_000), None).duration(), TimeDelta::zero());
        assert_eq!(run(None, None).duration(), TimeDelta::zero());
    }

    #[test]
    fn status_deserializes_known_and_unknown_values() {
        let s: JobRunStatus = serde_json::from_str(r#""SUCCEEDED""#).unwrap();
        assert_eq!(s, JobRunStatus::Succeeded);
        let s: JobRunStatus = serde_json::from_str(r#""TIMEOUT""#).unwrap();
        assert_eq!(s, JobRunStatus::Timeout);
        let s: JobRunStatus = serde_json::from_str(r#""HIBERNATING""#).unwrap();
        assert_eq!(s, JobRunStatus::Unknown);
    }

    #[test]
    fn status_display_matches_provider_names() {
        assert_eq!(JobRunStatus::Running.to_string(), "RUNNING");
        assert_eq!(JobRunStatus::Failed.to_string(), "FAILED");
        assert!(JobRunStatus::Failed.is_terminal());
        assert!(!JobRunStatus::Waiting.is_terminal());
    }
}
