use crate::model::{GlueJobSummary, JobRunSummary, NameFilter};

use super::GlueJobSource;
use super::client::{AwsSettings, GLUE, JsonProtocolClient, Timeouts};
use super::error::ProviderError;
use super::types::{GetJobRunsInput, GetJobRunsOutput, GetJobsInput, GetJobsOutput};

/// Maior página aceita por `GetJobs`.
const JOBS_PAGE_SIZE: u32 = 1000;
/// Maior página aceita por `GetJobRuns`.
const RUNS_PAGE_SIZE: u32 = 200;

pub struct GlueClient {
    client: JsonProtocolClient,
}

impl GlueClient {
    pub fn new(settings: &AwsSettings, timeouts: Timeouts) -> Result<Self, ProviderError> {
        Ok(Self {
            client: JsonProtocolClient::new(GLUE, settings, timeouts)?,
        })
    }

    pub fn with_endpoint(
        settings: &AwsSettings,
        timeouts: Timeouts,
        endpoint: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: JsonProtocolClient::with_endpoint(GLUE, settings, timeouts, endpoint)?,
        })
    }
}

impl GlueJobSource for GlueClient {
    async fn list_jobs(&self, filter: &NameFilter) -> Result<Vec<GlueJobSummary>, ProviderError> {
        let mut jobs = Vec::new();
        let mut next_token = None;

        loop {
            let input = GetJobsInput {
                next_token: next_token.take(),
                max_results: Some(JOBS_PAGE_SIZE),
            };
            let page: GetJobsOutput = self.client.call("GetJobs", &input).await?;

            jobs.extend(
                page.jobs
                    .into_iter()
                    .filter(|j| filter.matches(&j.name))
                    .map(GlueJobSummary::from),
            );

            match page.next_token {
                Some(token) if !token.is_empty() => next_token = Some(token),
                _ => break,
            }
        }

        tracing::debug!(matched = jobs.len(), %filter, "listed glue jobs");
        Ok(jobs)
    }

    /// O Glue retorna os runs do mais novo ao mais antigo, então os primeiros
    /// `limit` são os mais recentes.
    async fn list_job_runs(
        &self,
        job_name: &str,
        limit: usize,
    ) -> Result<Vec<JobRunSummary>, ProviderError> {
        let mut runs = Vec::new();
        let mut next_token = None;

        while runs.len() < limit {
            let remaining = (limit - runs.len()).min(RUNS_PAGE_SIZE as usize) as u32;
            let input = GetJobRunsInput {
                job_name: job_name.to_string(),
                next_token: next_token.take(),
                max_results: Some(remaining),
            };
            let page: GetJobRunsOutput = self.client.call("GetJobRuns", &input).await?;

            runs.extend(page.job_runs.into_iter().map(|r| r.into_summary(job_name)));

            match page.next_token {
                Some(token) if !token.is_empty() => next_token = Some(token),
                _ => break,
            }
        }

        runs.truncate(limit);
        tracing::debug!(job_name, runs = runs.len(), limit, "listed job runs");
        Ok(runs)
    }
}
