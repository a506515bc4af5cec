//! proto2rapidjson-compiler
//!
//! This crate implements:
//!  1) A tokenizer for the proto-like schema language,
//!  2) A one-token-lookahead parser building an ordered symbol table,
//!  3) A C++ emitter producing a header-only RapidJSON reader (and writer),
//!  4) Error types (`ProtoError`) and compile options (`CompileOptions`).

pub mod error;
pub mod types;
pub mod utils;
pub mod tokenizer;
pub mod symbols;
pub mod parser;
pub mod config;
pub mod compiler;
pub mod gen_cpp;

pub use compiler::{compile_schema, compile_schema_with, compile_to_cpp};
pub use config::CompileOptions;
pub use error::ProtoError;
pub use gen_cpp::compile_schema_to_cpp;
