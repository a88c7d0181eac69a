//! Corpos de requisição e resposta das operações de Step Functions e Glue
//! usadas pelo gluedash.
//!
//! Step Functions usa nomes em camelCase e o Glue usa PascalCase.
//! Timestamps chegam como segundos epoch fracionários.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{GlueJobSummary, JobRunStatus, JobRunSummary, StateMachineSummary};

pub(crate) fn epoch_seconds(secs: f64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis((secs * 1000.0).round() as i64)
}

// ---- Step Functions ----

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListStateMachinesInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListStateMachinesOutput {
    #[serde(default)]
    pub state_machines: Vec<StateMachineListItem>,
    #[serde(default)]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateMachineListItem {
    pub state_machine_arn: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub machine_type: String,
    #[serde(default)]
    pub creation_date: Option<f64>,
}

impl From<StateMachineListItem> for StateMachineSummary {
    fn from(item: StateMachineListItem) -> Self {
        Self {
            name: item.name,
            arn: item.state_machine_arn,
            workflow_type: item.machine_type,
            created_at: item.creation_date.and_then(epoch_seconds),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeStateMachineInput {
    pub state_machine_arn: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeStateMachineOutput {
    pub state_machine_arn: String,
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
    pub definition: String,
    #[serde(rename = "type", default)]
    pub machine_type: String,
    #[serde(default)]
    pub creation_date: Option<f64>,
}

// ---- Glue ----

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetJobsInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetJobsOutput {
    #[serde(default)]
    pub jobs: Vec<GlueJob>,
    #[serde(default)]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GlueJob {
    pub name: String,
    #[serde(default)]
    pub created_on: Option<f64>,
    #[serde(default)]
    pub glue_version: Option<String>,
    #[serde(default)]
    pub worker_type: Option<String>,
    #[serde(default)]
    pub number_of_workers: Option<u32>,
}

impl From<GlueJob> for GlueJobSummary {
    fn from(job: GlueJob) -> Self {
        Self {
            name: job.name,
            created_at: job.created_on.and_then(epoch_seconds),
            glue_version: job.glue_version,
            worker_type: job.worker_type,
            number_of_workers: job.number_of_workers,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetJobRunsInput {
    pub job_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetJobRunsOutput {
    #[serde(default)]
    pub job_runs: Vec<GlueJobRun>,
    #[serde(default)]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GlueJobRun {
    pub id: String,
    #[serde(default)]
    pub job_name: Option<String>,
    #[serde(default)]
    pub job_run_state: Option<JobRunStatus>,
    #[serde(default)]
    pub started_on: Option<f64>,
    #[serde(default)]
    pub completed_on: Option<f64>,
    #[serde(default)]
    pub arguments: BTreeMap<String, String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl GlueJobRun {
    /// Runs listados por `GetJobRuns` podem omitir `JobName`; `job_name` preenche.
    pub fn into_summary(self, job_name: &str) -> JobRunSummary {
        JobRunSummary {
            id: self.id,
            job_name: self.job_name.unwrap_or_else(|| job_name.to_string()),
            status: self.job_run_state.unwrap_or(JobRunStatus::Unknown),
            started_at: self.started_on.and_then(epoch_seconds),
            completed_at: self.completed_on.and_then(epoch_seconds),
            arguments: self.arguments,
            error_message: self.error_message,
        }
    }
}
