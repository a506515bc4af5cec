//! proto2rapidjson
//!
//! Entry point for turning proto-like schemas into header-only RapidJSON
//! readers.
//!
//! - `compile_to_cpp` (re-exported from the compiler)
//! - `schema_to_json` for inspecting the parsed symbol table

pub use proto2rapidjson_compiler::{compile_schema, compile_schema_with, compile_to_cpp};
pub use proto2rapidjson_compiler::config::CompileOptions;
pub use proto2rapidjson_compiler::error::ProtoError;
pub use proto2rapidjson_compiler::types::{Element, ElementKind, Message, Schema};

/// Parse schema text and pretty-print the package and its messages as JSON.
pub fn schema_to_json(text: &str, options: &CompileOptions) -> Result<String, ProtoError> {
    let schema = compile_schema_with(text, options)?;
    Ok(serde_json::to_string_pretty(&schema)?)
}

pub mod error {
    pub use proto2rapidjson_compiler::error::{ParseErrorKind, Production, ProtoError};
}

pub mod schema {
    pub use proto2rapidjson_compiler::symbols::SymbolTable;
    pub use proto2rapidjson_compiler::types::{Element, ElementKind, Message, Schema};
}
