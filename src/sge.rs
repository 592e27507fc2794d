//! Render SGE batch scripts for a task graph and submit them with qsub

/// Graph requests are deserialised into a set of structs defined here
pub mod job_request;

/// Merge per-task overrides and write wrapper scripts
pub mod job;

/// Hold flags and the aggregate submission script
pub mod submit;

/// Run the submission script
pub mod launch;

/// Two-phase generate-then-submit pipeline
pub mod submitter;
