//! Connector module metadata
//!
//! Engine identity and the execution set a connector advertises to the
//! workflow engine.

use serde::Serialize;

/// A lifecycle execution a connector can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Execution {
    #[serde(rename = "provision")]
    Provision,
    #[serde(rename = "revoke")]
    Revoke,
    #[serde(rename = "show")]
    Show,
    #[serde(rename = "fetchBatch")]
    FetchBatch,
}

impl Execution {
    /// Get the name used in workflow definitions.
    pub fn as_str(&self) -> &'static str {
        match self {
            Execution::Provision => "provision",
            Execution::Revoke => "revoke",
            Execution::Show => "show",
            Execution::FetchBatch => "fetchBatch",
        }
    }
}

impl std::fmt::Display for Execution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptor a connector module publishes about itself.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleMetadata {
    /// Stable engine identifier the workflow engine dispatches on.
    pub engine: &'static str,
    /// Human-readable module name.
    pub name: &'static str,
    /// Module version.
    pub version: &'static str,
    /// Executions this connector supports.
    pub supported_execution: &'static [Execution],
}

impl ModuleMetadata {
    /// Whether the given execution is supported.
    pub fn supports(&self, execution: Execution) -> bool {
        self.supported_execution.contains(&execution)
    }
}
