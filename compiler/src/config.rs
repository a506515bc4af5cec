use std::{fs, path::Path};

use serde::Deserialize;

use crate::error::ProtoError;

pub const DEFAULT_BANNER: [&str; 2] = [
    "Generated by Proto2RapidJSON",
    "https://github.com/Sweetnow/proto2rapidjson",
];

/// Knobs shared by the parser and the emitter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompileOptions {
    /// Let a later `message X` replace an earlier one instead of failing.
    pub allow_redefinition: bool,
    /// Emit `ToValue` / `ToString` / `ToPrettyString` / `FromString`.
    pub serializers: bool,
    /// Comment lines written after the include guard.
    pub banner: Vec<String>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            allow_redefinition: false,
            serializers:        true,
            banner:             DEFAULT_BANNER.iter().map(|line| line.to_string()).collect(),
        }
    }
}

impl CompileOptions {
    pub fn from_json(text: &str) -> Result<Self, ProtoError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ProtoError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}
