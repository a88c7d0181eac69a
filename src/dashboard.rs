//! Junta as listagens da AWS com o resolver de definições.
//!
//! O [`Dashboard`] possui um [`StateMachineSource`], um [`GlueJobSource`] e o
//! filtro de nomes, e responde às perguntas da CLI: quais jobs do Glue cada
//! state machine inicia, quais state machines iniciam cada job e quais foram
//! os runs recentes de um job.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::aws::{GlueJobSource, StateMachineSource};
use crate::error::{DashError, ResolveError};
use crate::model::{GlueJobSummary, JobRunSummary, NameFilter, StateMachineSummary};
use crate::resolver::{
    JobIndex, StateMachineDefinition, extract_glue_jobs, find_state_machines_using_job,
};

/// Uma state machine e os jobs do Glue que sua definição inicia.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateMachineRow {
    #[serde(flatten)]
    pub summary: StateMachineSummary,
    /// Vazio quando `definition_error` está preenchido.
    pub glue_jobs: BTreeSet<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition_error: Option<String>,
}

/// Um job do Glue e as state machines que o iniciam.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlueJobRow {
    #[serde(flatten)]
    pub job: GlueJobSummary,
    pub state_machines: BTreeSet<String>,
}

/// Jobs do Glue com quem os chama, mais os nomes de jobs que state machines
/// iniciam mas o Glue não lista.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JobsReport {
    pub jobs: Vec<GlueJobRow>,
    pub unknown_jobs: BTreeMap<String, BTreeSet<String>>,
}

/// Definição de uma state machine resolvida para jobs do Glue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescribeReport {
    #[serde(flatten)]
    pub summary: StateMachineSummary,
    pub status: Option<String>,
    pub comment: Option<String>,
    pub start_at: Option<String>,
    pub glue_jobs: BTreeSet<String>,
}

/// Definições das state machines listadas. As malformadas ficam separadas,
/// nunca descartadas.
#[derive(Debug, Default)]
struct Definitions {
    summaries: Vec<StateMachineSummary>,
    parsed: BTreeMap<String, StateMachineDefinition>,
    malformed: BTreeMap<String, ResolveError>,
}

pub struct Dashboard<S, G> {
    states: S,
    glue: G,
    filter: NameFilter,
}

impl<S, G> Dashboard<S, G>
where
    S: StateMachineSource,
    G: GlueJobSource,
{
    pub fn new(states: S, glue: G, filter: NameFilter) -> Self {
        Self {
            states,
            glue,
            filter,
        }
    }

    async fn definitions(&self) -> Result<Definitions, DashError> {
        let summaries = self.states.list_state_machines(&self.filter).await?;
        let mut defs = Definitions::default();

        for summary in &summaries {
            let description = self.states.describe_state_machine(&summary.arn).await?;
            match StateMachineDefinition::parse(&description.definition) {
                Ok(parsed) => {
                    defs.parsed.insert(summary.name.clone(), parsed);
                }
                Err(err) => {
                    tracing::warn!(state_machine = %summary.name, error = %err, "skipping definition");
                    defs.malformed.insert(summary.name.clone(), err);
                }
            }
        }

        defs.summaries = summaries;
        Ok(defs)
    }

    /// Cada state machine filtrada com os jobs do Glue que ela inicia.
    pub async fn state_machines(&self) -> Result<Vec<StateMachineRow>, DashError> {
        let defs = self.definitions().await?;
        let index = JobIndex::build(&defs.parsed);

        Ok(defs
            .summaries
            .into_iter()
            .map(|summary| {
                let (glue_jobs, definition_error) = if defs.parsed.contains_key(&summary.name) {
                    (index.jobs_for(&summary.name), None)
                } else {
                    (
                        BTreeSet::new(),
                        defs.malformed.get(&summary.name).map(ToString::to_string),
                    )
                };
                StateMachineRow {
                    summary,
                    glue_jobs,
                    definition_error,
                }
            })
            .collect())
    }

    /// Cada job do Glue filtrado com as state machines que o iniciam.
    pub async fn glue_jobs(&self) -> Result<JobsReport, DashError> {
        let defs = self.definitions().await?;
        let index = JobIndex::build(&defs.parsed);
        let jobs = self.glue.list_jobs(&self.filter).await?;
        tracing::debug!(
            state_machines = index.state_machine_count(),
            glue_jobs = jobs.len(),
            "built job index"
        );

        let listed: BTreeSet<&str> = jobs.iter().map(|j| j.name.as_str()).collect();
        let unknown_jobs = index
            .jobs()
            .filter(|job| !listed.contains(job) && self.filter.matches(job))
            .map(|job| (job.to_string(), index.state_machines_for(job)))
            .collect();

        let jobs = jobs
            .into_iter()
            .map(|job| GlueJobRow {
                state_machines: index.state_machines_for(&job.name),
                job,
            })
            .collect();

        Ok(JobsReport { jobs, unknown_jobs })
    }

    /// Nomes das state machines filtradas que iniciam `job_name`.
    pub async fn state_machines_using_job(
        &self,
        job_name: &str,
    ) -> Result<BTreeSet<String>, DashError> {
        let defs = self.definitions().await?;
        Ok(find_state_machines_using_job(job_name, &defs.parsed))
    }

    /// Resolve uma state machine. Aqui uma definição malformada é erro.
    pub async fn describe(&self, arn: &str) -> Result<DescribeReport, DashError> {
        let description = match self.states.describe_state_machine(arn).await {
            Ok(description) => description,
            Err(err) => {
                if err.is_not_found() {
                    tracing::warn!(arn, "state machine not found, check region and account_id");
                }
                return Err(err.into());
            }
        };
        let definition = StateMachineDefinition::parse(&description.definition)?;
        Ok(DescribeReport {
            summary: description.summary,
            status: description.status,
            glue_jobs: extract_glue_jobs(&definition),
            comment: definition.comment,
            start_at: definition.start_at,
        })
    }

    /// Até `limit` runs mais recentes de `job_name`.
    pub async fn job_runs(
        &self,
        job_name: &str,
        limit: usize,
    ) -> Result<Vec<JobRunSummary>, DashError> {
        Ok(self.glue.list_job_runs(job_name, limit).await?)
    }
}
