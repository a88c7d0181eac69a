use std::collections::{BTreeMap, BTreeSet};

use crate::error::ResolveError;

use super::definition::StateMachineDefinition;

/// Retorna os nomes dos jobs do Glue iniciados por `definition`.
///
/// Todos os estados são visitados, inclusive os aninhados em branches de
/// `Parallel` e corpos de `Map`. Os nomes vêm de [`StateDefinition::glue_job_name`].
///
/// [`StateDefinition::glue_job_name`]: super::definition::StateDefinition::glue_job_name
pub fn extract_glue_jobs(definition: &StateMachineDefinition) -> BTreeSet<String> {
    let mut jobs = BTreeSet::new();
    collect_glue_jobs(definition, &mut jobs);
    jobs
}

/// Faz o parse de `text` e extrai seus jobs do Glue. Entrada malformada é
/// erro, nunca um conjunto vazio.
pub fn extract_glue_jobs_from_str(text: &str) -> Result<BTreeSet<String>, ResolveError> {
    let definition = StateMachineDefinition::parse(text)?;
    Ok(extract_glue_jobs(&definition))
}

fn collect_glue_jobs(graph: &StateMachineDefinition, jobs: &mut BTreeSet<String>) {
    for state in graph.states.values() {
        if let Some(job) = state.glue_job_name() {
            jobs.insert(job.to_string());
        }
        for nested in state.nested_graphs() {
            collect_glue_jobs(nested, jobs);
        }
    }
}

/// Retorna os nomes das state machines em `definitions` que iniciam
/// `job_name`.
pub fn find_state_machines_using_job<'a, I>(job_name: &str, definitions: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = (&'a String, &'a StateMachineDefinition)>,
{
    definitions
        .into_iter()
        .filter(|(_, definition)| extract_glue_jobs(definition).contains(job_name))
        .map(|(name, _)| name.clone())
        .collect()
}

/// As duas direções da relação state machine → job do Glue, calculadas uma vez.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobIndex {
    by_state_machine: BTreeMap<String, BTreeSet<String>>,
    by_job: BTreeMap<String, BTreeSet<String>>,
}

impl JobIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Monta o índice a partir de pares nome da state machine → definição.
    pub fn build<'a, I>(definitions: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a StateMachineDefinition)>,
    {
        let mut index = Self::new();
        for (name, definition) in definitions {
            index.insert(name, definition);
        }
        index
    }

    /// Registra os jobs do Glue de uma state machine. Inserir o mesmo nome
    /// de novo substitui a entrada anterior.
    pub fn insert(&mut self, state_machine: &str, definition: &StateMachineDefinition) {
        self.remove(state_machine);
        let jobs = extract_glue_jobs(definition);
        for job in &jobs {
            self.by_job
                .entry(job.clone())
                .or_default()
                .insert(state_machine.to_string());
        }
        self.by_state_machine.insert(state_machine.to_string(), jobs);
    }

    fn remove(&mut self, state_machine: &str) {
        let Some(jobs) = self.by_state_machine.remove(state_machine) else {
            return;
        };
        for job in jobs {
            if let Some(machines) = self.by_job.get_mut(&job) {
                machines.remove(state_machine);
                if machines.is_empty() {
                    self.by_job.remove(&job);
                }
            }
        }
    }

    /// Jobs do Glue iniciados por `state_machine`; vazio para nomes desconhecidos.
    pub fn jobs_for(&self, state_machine: &str) -> BTreeSet<String> {
        self.by_state_machine
            .get(state_machine)
            .cloned()
            .unwrap_or_default()
    }

    /// State machines que iniciam `job`; vazio para jobs desconhecidos.
    pub fn state_machines_for(&self, job: &str) -> BTreeSet<String> {
        self.by_job.get(job).cloned().unwrap_or_default()
    }

    /// Todo job do Glue referenciado por ao menos uma state machine indexada.
    pub fn jobs(&self) -> impl Iterator<Item = &str> {
        self.by_job.keys().map(String::as_str)
    }

    pub fn state_machine_count(&self) -> usize {
        self.by_state_machine.len()
    }
}
