pub mod client;
pub mod error;
pub mod glue;
pub mod signer;
pub mod stepfunctions;
pub mod types;

pub use client::{AwsSettings, Timeouts};
pub use error::ProviderError;
pub use glue::GlueClient;
pub use stepfunctions::StepFunctionsClient;

use crate::model::{
    GlueJobSummary, JobRunSummary, NameFilter, StateMachineDescription, StateMachineSummary,
};

/// Serviço de orquestração: lista state machines e retorna suas definições.
#[allow(async_fn_in_trait)]
pub trait StateMachineSource {
    /// Toda state machine cujo nome `filter` aceita, em todas as páginas.
    async fn list_state_machines(
        &self,
        filter: &NameFilter,
    ) -> Result<Vec<StateMachineSummary>, ProviderError>;

    async fn describe_state_machine(
        &self,
        arn: &str,
    ) -> Result<StateMachineDescription, ProviderError>;
}

/// Serviço de jobs batch: lista definições de jobs e seu histórico de runs.
#[allow(async_fn_in_trait)]
pub trait GlueJobSource {
    /// Todo job cujo nome `filter` aceita, em todas as páginas.
    async fn list_jobs(&self, filter: &NameFilter) -> Result<Vec<GlueJobSummary>, ProviderError>;

    /// Até `limit` runs mais recentes de `job_name`, do mais novo ao mais antigo.
    async fn list_job_runs(
        &self,
        job_name: &str,
        limit: usize,
    ) -> Result<Vec<JobRunSummary>, ProviderError>;
}
