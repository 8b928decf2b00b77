//! Workflow logic behind the `mdrop` CLI: loading allowlist rows, publishing the
//! commitment, and dispatching batch proof generation to parallel workers.

pub mod commands;
pub mod common;
