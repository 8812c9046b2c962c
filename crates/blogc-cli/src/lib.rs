//! Library surface for the `blogc` binary, split out so the compile-pass
//! orchestration (`run`) can be exercised directly from `blogc-tests`
//! without spawning a subprocess.
pub mod cli;
pub mod error;
pub mod pagination;
pub mod run;
