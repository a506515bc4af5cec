use crate::{
    config::CompileOptions,
    error::ProtoError,
    gen_cpp::compile_schema_to_cpp,
    parser::parse_schema_with,
    tokenizer::tokenize_schema,
    types::Schema,
};

/// Tokenize and parse schema text with default options.
pub fn compile_schema(text: &str) -> Result<Schema, ProtoError> {
    compile_schema_with(text, &CompileOptions::default())
}

/// Tokenize and parse schema text. Nothing is emitted unless both stages succeed.
pub fn compile_schema_with(text: &str, options: &CompileOptions) -> Result<Schema, ProtoError> {
    let tokens = tokenize_schema(text)?;
    parse_schema_with(&tokens, options)
}

/// Full pipeline: schema text in, C++ header text out.
pub fn compile_to_cpp(text: &str, options: &CompileOptions) -> Result<String, ProtoError> {
    let schema = compile_schema_with(text, options)?;
    Ok(compile_schema_to_cpp(&schema, options))
}
