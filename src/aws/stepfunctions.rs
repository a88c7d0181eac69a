use crate::model::{NameFilter, StateMachineDescription, StateMachineSummary};

use super::StateMachineSource;
use super::client::{AwsSettings, JsonProtocolClient, STEP_FUNCTIONS, Timeouts};
use super::error::ProviderError;
use super::types::{
    DescribeStateMachineInput, DescribeStateMachineOutput, ListStateMachinesInput,
    ListStateMachinesOutput, epoch_seconds,
};

/// Maior página aceita por `ListStateMachines`.
const PAGE_SIZE: u32 = 1000;

pub struct StepFunctionsClient {
    client: JsonProtocolClient,
}

impl StepFunctionsClient {
    pub fn new(settings: &AwsSettings, timeouts: Timeouts) -> Result<Self, ProviderError> {
        Ok(Self {
            client: JsonProtocolClient::new(STEP_FUNCTIONS, settings, timeouts)?,
        })
    }

    pub fn with_endpoint(
        settings: &AwsSettings,
        timeouts: Timeouts,
        endpoint: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: JsonProtocolClient::with_endpoint(STEP_FUNCTIONS, settings, timeouts, endpoint)?,
        })
    }
}

impl StateMachineSource for StepFunctionsClient {
    async fn list_state_machines(
        &self,
        filter: &NameFilter,
    ) -> Result<Vec<StateMachineSummary>, ProviderError> {
        let mut machines = Vec::new();
        let mut next_token = None;
        let mut pages = 0u32;

        loop {
            let input = ListStateMachinesInput {
                next_token: next_token.take(),
                max_results: Some(PAGE_SIZE),
            };
            let page: ListStateMachinesOutput =
                self.client.call("ListStateMachines", &input).await?;
            pages += 1;

            machines.extend(
                page.state_machines
                    .into_iter()
                    .filter(|m| filter.matches(&m.name))
                    .map(StateMachineSummary::from),
            );

            match page.next_token {
                Some(token) if !token.is_empty() => next_token = Some(token),
                _ => break,
            }
        }

        tracing::debug!(pages, matched = machines.len(), %filter, "listed state machines");
        Ok(machines)
    }

    async fn describe_state_machine(
        &self,
        arn: &str,
    ) -> Result<StateMachineDescription, ProviderError> {
        let input = DescribeStateMachineInput {
            state_machine_arn: arn.to_string(),
        };
        let output: DescribeStateMachineOutput =
            self.client.call("DescribeStateMachine", &input).await?;

        Ok(StateMachineDescription {
            summary: StateMachineSummary {
                name: output.name,
                arn: output.state_machine_arn,
                workflow_type: output.machine_type,
                created_at: output.creation_date.and_then(epoch_seconds),
            },
            status: output.status,
            definition: output.definition,
        })
    }
}
