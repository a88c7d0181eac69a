mod definition;
mod index;

pub use definition::StateMachineDefinition;
pub use index::{
    JobIndex, extract_glue_jobs, extract_glue_jobs_from_str, find_state_machines_using_job,
};
