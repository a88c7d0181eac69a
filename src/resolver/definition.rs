//! Subconjunto tipado da Amazon States Language lido pelo resolver.
//!
//! Só os campos necessários para achar tasks do Glue são modelados: nomes de
//! estados, `Type`, `Resource`, `Parameters` e os grafos aninhados de estados
//! `Parallel` e `Map`. O restante da definição é ignorado.
//!
//! ```json
//! {
//!   "StartAt": "RunEtl",
//!   "States": {
//!     "RunEtl": {
//!       "Type": "Task",
//!       "Resource": "arn:aws:states:::glue:startJobRun.sync",
//!       "Parameters": { "JobName": "etl_daily" },
//!       "End": true
//!     }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ResolveError;

/// Prefixo do `Resource` da integração que inicia um job run do Glue.
/// Casa tanto `startJobRun` quanto `startJobRun.sync`.
pub const GLUE_START_JOB_RUN_PREFIX: &str = "arn:aws:states:::glue:startJobRun";

/// Uma definição de state machine, ou um dos grafos aninhados de um branch
/// `Parallel` ou do corpo de um `Map`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StateMachineDefinition {
    /// Descrição legível da máquina.
    #[serde(default)]
    pub comment: Option<String>,
    /// Estado inicial.
    #[serde(default)]
    pub start_at: Option<String>,
    /// Estados da máquina, indexados por nome.
    pub states: BTreeMap<String, StateDefinition>,
}

/// Tipos de estado definidos pela States Language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum StateType {
    Task,
    Pass,
    Choice,
    Wait,
    Succeed,
    Fail,
    Parallel,
    Map,
    /// Qualquer tipo desconhecido.
    #[serde(other)]
    Other,
}

/// Um estado. Campos que só fazem sentido para alguns tipos são opcionais e
/// ficam vazios nos demais.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StateDefinition {
    #[serde(rename = "Type")]
    pub state_type: StateType,
    /// Tasks: URI do trabalho a executar, normalmente um ARN.
    #[serde(default)]
    pub resource: Option<String>,
    /// Tasks: argumentos estáticos e JsonPath passados ao resource.
    #[serde(default)]
    pub parameters: Option<Map<String, Value>>,
    /// Estados Parallel.
    #[serde(default)]
    pub branches: Vec<StateMachineDefinition>,
    /// Estados Map, forma antiga.
    #[serde(default)]
    pub iterator: Option<StateMachineDefinition>,
    /// Estados Map.
    #[serde(default)]
    pub item_processor: Option<StateMachineDefinition>,
}

impl StateMachineDefinition {
    /// Faz o parse e valida uma definição a partir do texto JSON.
    pub fn parse(text: &str) -> Result<Self, ResolveError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| ResolveError::malformed(e.to_string()))?;
        Self::from_value(value)
    }

    /// Valida um documento JSON já lido.
    pub fn from_value(value: Value) -> Result<Self, ResolveError> {
        // Structs derivadas também aceitam sequências, então o formato é
        // conferido no documento bruto antes da desserialização.
        check_graph_shape(&value, "root")?;
        let definition: Self =
            serde_json::from_value(value).map_err(|e| ResolveError::malformed(e.to_string()))?;
        definition.validate()?;
        Ok(definition)
    }

    fn validate(&self) -> Result<(), ResolveError> {
        for (name, state) in &self.states {
            state.validate(name)?;
            for graph in state.nested_graphs() {
                graph.validate()?;
            }
        }
        Ok(())
    }
}

impl FromStr for StateMachineDefinition {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Exige objetos JSON no grafo `what`, em cada um dos seus estados e em
/// cada grafo aninhado (`Branches`, `Iterator`, `ItemProcessor`).
fn check_graph_shape(graph: &Value, what: &str) -> Result<(), ResolveError> {
    let Some(graph) = graph.as_object() else {
        return Err(ResolveError::malformed(format!("{what} is not a JSON object")));
    };
    // Ausência de `States` é reportada pelo serde.
    let Some(states) = graph.get("States") else {
        return Ok(());
    };
    let Some(states) = states.as_object() else {
        return Err(ResolveError::malformed(format!(
            "`States` of {what} is not a JSON object"
        )));
    };

    for (name, state) in states {
        let Some(state) = state.as_object() else {
            return Err(ResolveError::malformed(format!(
                "state `{name}` is not a JSON object"
            )));
        };
        if let Some(branches) = state.get("Branches").filter(|v| !v.is_null()) {
            let Some(branches) = branches.as_array() else {
                return Err(ResolveError::malformed(format!(
                    "`Branches` of state `{name}` is not a JSON array"
                )));
            };
            for (i, branch) in branches.iter().enumerate() {
                check_graph_shape(branch, &format!("branch {i} of state `{name}`"))?;
            }
        }
        for key in ["Iterator", "ItemProcessor"] {
            if let Some(nested) = state.get(key).filter(|v| !v.is_null()) {
                check_graph_shape(nested, &format!("`{key}` of state `{name}`"))?;
            }
        }
    }
    Ok(())
}

impl StateDefinition {
    /// Indica se é uma Task que inicia um job run do Glue.
    pub fn is_glue_task(&self) -> bool {
        self.state_type == StateType::Task
            && self
                .resource
                .as_deref()
                .is_some_and(|r| r.starts_with(GLUE_START_JOB_RUN_PREFIX))
    }

    /// Job do Glue iniciado por este estado, se for uma task do Glue.
    ///
    /// `Parameters.JobName` tem prioridade. Sem ele, vale o último segmento
    /// do `Resource` após `:`, que no ARN simples da integração é o nome da
    /// ação (`startJobRun` ou `startJobRun.sync`).
    pub fn glue_job_name(&self) -> Option<&str> {
        if !self.is_glue_task() {
            return None;
        }
        let from_parameters = self
            .parameters
            .as_ref()
            .and_then(|p| p.get("JobName"))
            .and_then(Value::as_str);
        from_parameters.or_else(|| self.resource.as_deref()?.rsplit(':').next())
    }

    /// Grafos aninhados neste estado (branches de Parallel, corpo de Map).
    pub fn nested_graphs(&self) -> impl Iterator<Item = &StateMachineDefinition> {
        self.branches
            .iter()
            .chain(self.iterator.iter())
            .chain(self.item_processor.iter())
    }

    fn validate(&self, name: &str) -> Result<(), ResolveError> {
        if self.state_type != StateType::Task {
            return Ok(());
        }
        if self.resource.is_none() {
            return Err(ResolveError::malformed(format!(
                "task state `{name}` has no `Resource`"
            )));
        }
        if self.is_glue_task()
            && let Some(job_name) = self.parameters.as_ref().and_then(|p| p.get("JobName"))
            && !job_name.is_string()
        {
            return Err(ResolveError::malformed(format!(
                "task state `{name}` has a non-string `Parameters.JobName`"
            )));
        }
        Ok(())
    }
}
