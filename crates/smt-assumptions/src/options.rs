// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use crate::error::{SmtError, SmtResult};
use serde::{Deserialize, Serialize};
use z3::{Config, Context};

/// Oracle sort used for `Real` variables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RealEncoding {
    /// Real variables share the integer sort with `Integer` variables.
    /// Arithmetic over them is integer arithmetic.
    #[default]
    Integer,
    /// Real variables use the oracle's real sort.
    Rational,
}

/// Options for a constraint store. Usually built with `Default` and
/// adjusted, or read from a toml source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverOptions {
    /// Per-check timeout handed to the oracle. Expiry is reported as unknown.
    pub timeout_ms: Option<u32>,
    /// Sort used for `Real` variables.
    pub real_encoding: RealEncoding,
    /// Prefix of the boolean constants that track background constraints.
    /// Constraint `i` is tracked by `{label_prefix}{i}`.
    pub label_prefix: String,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            timeout_ms: Some(5000),
            real_encoding: RealEncoding::Integer,
            label_prefix: "__track_".to_string(),
        }
    }
}

impl SolverOptions {
    pub fn from_toml_str(source: &str) -> SmtResult<Self> {
        toml::from_str(source).map_err(|e| SmtError::Config(e.to_string()))
    }

    /// Name of the label tracking the background constraint at `index` (1-based)
    pub fn label_name(&self, index: usize) -> String {
        format!("{}{}", self.label_prefix, index)
    }

    /// Create a Z3 config carrying these options
    pub fn z3_config(&self) -> Config {
        let mut cfg = Config::new();
        if let Some(ms) = self.timeout_ms {
            cfg.set_timeout_msec(ms as u64);
        }
        cfg
    }

    /// Create a new Z3 context for stores built with these options
    pub fn new_context(&self) -> Context {
        Context::new(&self.z3_config())
    }
}

/// Create a new Z3 context with default options
pub fn new_context() -> Context {
    SolverOptions::default().new_context()
}
