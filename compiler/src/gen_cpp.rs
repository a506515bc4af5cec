use crate::{
    config::CompileOptions,
    types::{Element, Message, Schema},
};

const INDENT: &str = "    ";

/// Member holding the document behind `FromString`. Schema identifiers
/// cannot contain `_`, so it never collides with a field.
const SOURCE_DOCUMENT: &str = "source_document_";

/// Accumulates indented source lines.
struct Lines {
    lines: Vec<String>,
    depth: usize,
}

impl Lines {
    fn new() -> Self {
        Lines { lines: Vec::new(), depth: 0 }
    }

    fn push(&mut self, line: impl AsRef<str>) {
        let line = line.as_ref();
        if line.is_empty() {
            self.lines.push(String::new());
        } else {
            self.lines.push(format!("{}{}", INDENT.repeat(self.depth), line));
        }
    }

    fn open(&mut self, line: impl AsRef<str>) {
        self.push(line);
        self.depth += 1;
    }

    fn close(&mut self, line: impl AsRef<str>) {
        self.depth = self.depth.saturating_sub(1);
        self.push(line);
    }

    fn finish(self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }
}

/// Include guard macro for a package.
pub fn include_guard(package: &str) -> String {
    format!("_PROTO2RAPIDJSON_{}_HEADER_", package.to_uppercase())
}

/// Renders the whole schema as a header-only C++ file.
///
/// Structs are written in symbol-table order, so every nested type is
/// complete before the struct that uses it.
pub fn compile_schema_to_cpp(schema: &Schema, options: &CompileOptions) -> String {
    let guard = include_guard(&schema.package);
    let mut out = Lines::new();

    out.push(format!("#ifndef {}", guard));
    out.push(format!("#define {}", guard));
    out.push("");
    for line in &options.banner {
        out.push(format!("// {}", line));
    }
    if !options.banner.is_empty() {
        out.push("");
    }

    out.push("#include <cassert>");
    if options.serializers {
        out.push("#include <memory>");
        out.push("#include <string>");
    }
    out.push("#include <vector>");
    out.push("");
    out.push("#include \"rapidjson/document.h\"");
    if options.serializers {
        out.push("#include \"rapidjson/prettywriter.h\"");
        out.push("#include \"rapidjson/stringbuffer.h\"");
        out.push("#include \"rapidjson/writer.h\"");
    }
    out.push("");

    out.push(format!("namespace {} {{", schema.package));
    for message in &schema.messages {
        out.push("");
        generate_struct(&mut out, message, options);
    }
    out.push("");
    out.push(format!("}}  // namespace {}", schema.package));
    out.push("");
    out.push(format!("#endif  // {}", guard));

    let text = out.finish();
    tracing::debug!(package = %schema.package, bytes = text.len(), "emitted header");
    text
}

fn generate_struct(out: &mut Lines, message: &Message, options: &CompileOptions) {
    let name = &message.identifier;
    out.open(format!("struct {} {{", name));

    for element in &message.elements {
        out.push(format!("{} {};", element.declared_type(), element.identifier));
    }
    if options.serializers {
        // Owns the text `FromString` parsed; string fields point into it.
        out.push(format!("std::shared_ptr<rapidjson::Document> {};", SOURCE_DOCUMENT));
    }
    if !message.elements.is_empty() || options.serializers {
        out.push("");
    }

    out.open(format!("{}& Parse(const char* str) {{", name));
    out.push("rapidjson::Document document;");
    out.push("document.Parse(str);");
    out.push("assert(document.IsObject());");
    out.push("return Get(document);");
    out.close("}");
    out.push("");

    if options.serializers {
        out.open(format!("{}& FromString(const char* str) {{", name));
        out.push(format!("{} = std::make_shared<rapidjson::Document>();", SOURCE_DOCUMENT));
        out.push(format!("{}->Parse(str);", SOURCE_DOCUMENT));
        out.push(format!("assert({}->IsObject());", SOURCE_DOCUMENT));
        out.push(format!("return Get(*{});", SOURCE_DOCUMENT));
        out.close("}");
        out.push("");
    }

    out.open(format!("{}& Get(const rapidjson::Value& v) {{", name));
    for element in &message.elements {
        generate_extraction(out, element);
    }
    out.push("return *this;");
    out.close("}");

    if options.serializers {
        out.push("");
        generate_serializers(out, message);
    }

    out.close("};");
}

fn generate_extraction(out: &mut Lines, element: &Element) {
    let id = &element.identifier;
    let member = format!("v[\"{}\"]", id);
    let kind = &element.kind;

    out.push(format!("// parse {}", id));
    out.push(format!("assert(v.HasMember(\"{}\"));", id));
    if element.repeated {
        out.push(format!("assert({}.IsArray());", member));
        out.open(format!("for (auto&& i : {}.GetArray()) {{", member));
        out.push(format!("assert(i.{}());", kind.predicate()));
        out.push(format!("{}.emplace_back({});", id, kind.extraction("i")));
        out.close("}");
    } else {
        out.push(format!("assert({}.{}());", member, kind.predicate()));
        out.push(format!("{} = {};", id, kind.extraction(&member)));
    }
}

fn generate_serializers(out: &mut Lines, message: &Message) {
    out.open("rapidjson::Value ToValue(rapidjson::Document::AllocatorType& allocator) const {");
    out.push("rapidjson::Value v(rapidjson::kObjectType);");
    for element in &message.elements {
        let id = &element.identifier;
        out.push(format!("// serialize {}", id));
        if element.repeated {
            out.open("{");
            out.push("rapidjson::Value array(rapidjson::kArrayType);");
            out.open(format!("for (auto&& i : {}) {{", id));
            out.push(format!("array.PushBack({}.Move(), allocator);", element.kind.to_value("i")));
            out.close("}");
            out.push(format!("v.AddMember(\"{}\", array, allocator);", id));
            out.close("}");
        } else {
            out.push(format!(
                "v.AddMember(\"{}\", {}.Move(), allocator);",
                id,
                element.kind.to_value(id)
            ));
        }
    }
    out.push("return v;");
    out.close("}");
    out.push("");

    for (method, writer) in [("ToString", "Writer"), ("ToPrettyString", "PrettyWriter")] {
        out.open(format!("std::string {}() const {{", method));
        out.push("rapidjson::Document document;");
        out.push("rapidjson::Value v = ToValue(document.GetAllocator());");
        out.push("rapidjson::StringBuffer buffer;");
        out.push(format!("rapidjson::{}<rapidjson::StringBuffer> writer(buffer);", writer));
        out.push("v.Accept(writer);");
        out.push("return buffer.GetString();");
        out.close("}");
        if method == "ToString" {
            out.push("");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parser::parse_schema, tokenizer::tokenize_schema};
    use pretty_assertions::assert_eq;

    fn emit(text: &str, options: &CompileOptions) -> String {
        let schema = parse_schema(&tokenize_schema(text).unwrap()).unwrap();
        compile_schema_to_cpp(&schema, options)
    }

    fn reader_only() -> CompileOptions {
        CompileOptions {
            serializers: false,
            ..CompileOptions::default()
        }
    }

    #[test]
    fn test_include_guard_uses_uppercase_package() {
        assert_eq!(include_guard("demo"), "_PROTO2RAPIDJSON_DEMO_HEADER_");
        assert_eq!(include_guard("mixedCase2"), "_PROTO2RAPIDJSON_MIXEDCASE2_HEADER_");
    }

    #[test]
    fn test_reader_only_header() {
        let got = emit(
            "package demo;\nmessage Sub { double sub1 = 1; int32 sub2; }\nmessage Main { repeated Sub sub; }\n",
            &reader_only(),
        );
        let expected = r#"#ifndef _PROTO2RAPIDJSON_DEMO_HEADER_
#define _PROTO2RAPIDJSON_DEMO_HEADER_

// Generated by Proto2RapidJSON
// https://github.com/Sweetnow/proto2rapidjson

#include <cassert>
#include <vector>

#include "rapidjson/document.h"

namespace demo {

struct Sub {
    double sub1;
    int32_t sub2;

    Sub& Parse(const char* str) {
        rapidjson::Document document;
        document.Parse(str);
        assert(document.IsObject());
        return Get(document);
    }

    Sub& Get(const rapidjson::Value& v) {
        // parse sub1
        assert(v.HasMember("sub1"));
        assert(v["sub1"].IsDouble());
        sub1 = v["sub1"].GetDouble();
        // parse sub2
        assert(v.HasMember("sub2"));
        assert(v["sub2"].IsInt());
        sub2 = v["sub2"].GetInt();
        return *this;
    }
};

struct Main {
    std::vector<Sub> sub;

    Main& Parse(const char* str) {
        rapidjson::Document document;
        document.Parse(str);
        assert(document.IsObject());
        return Get(document);
    }

    Main& Get(const rapidjson::Value& v) {
        // parse sub
        assert(v.HasMember("sub"));
        assert(v["sub"].IsArray());
        for (auto&& i : v["sub"].GetArray()) {
            assert(i.IsObject());
            sub.emplace_back(Sub().Get(i));
        }
        return *this;
    }
};

}  // namespace demo

#endif  // _PROTO2RAPIDJSON_DEMO_HEADER_
"#;
        assert_eq!(got, expected);
    }

    #[test]
    fn test_singular_custom_delegates_to_nested_get() {
        let got = emit("package p; message A { bool x; } message B { A a; }", &reader_only());
        assert!(got.contains("        assert(v[\"a\"].IsObject());\n        a = A().Get(v[\"a\"]);\n"));
        assert!(!got.contains("v[\"a\"].IsArray()"));
    }

    #[test]
    fn test_repeated_primitive_loops_with_element_check() {
        let got = emit("package p; message M { repeated string names; }", &reader_only());
        assert!(got.contains("    std::vector<const char *> names;\n"));
        assert!(got.contains(
            "        assert(v[\"names\"].IsArray());\n\
             \x20       for (auto&& i : v[\"names\"].GetArray()) {\n\
             \x20           assert(i.IsString());\n\
             \x20           names.emplace_back(i.GetString());\n\
             \x20       }\n"
        ));
    }

    #[test]
    fn test_every_primitive_accessor_is_emitted() {
        let got = emit(
            "package p; message M { double a; float b; int32 c; uint32 d; int64 e; uint64 f; bool g; string h; }",
            &reader_only(),
        );
        for (field, native, getter) in [
            ("a", "double", "GetDouble"),
            ("b", "float", "GetFloat"),
            ("c", "int32_t", "GetInt"),
            ("d", "uint32_t", "GetUint"),
            ("e", "int64_t", "GetInt64"),
            ("f", "uint64_t", "GetUint64"),
            ("g", "bool", "GetBool"),
            ("h", "const char *", "GetString"),
        ] {
            assert!(got.contains(&format!("    {} {};\n", native, field)), "missing {}", field);
            assert!(got.contains(&format!("{} = v[\"{}\"].{}();", field, field, getter)));
        }
    }

    #[test]
    fn test_fields_keep_declaration_order() {
        let got = emit("package p; message M { bool zeta; bool alpha; bool mid; }", &reader_only());
        let zeta = got.find("bool zeta;").unwrap();
        let alpha = got.find("bool alpha;").unwrap();
        let mid = got.find("bool mid;").unwrap();
        assert!(zeta < alpha && alpha < mid);
    }

    #[test]
    fn test_serializers_are_emitted() {
        let got = emit(
            "package p; message A { string s; } message B { repeated A items; repeated bool flags; A one; }",
            &CompileOptions::default(),
        );
        assert!(got.contains("#include <string>\n"));
        assert!(got.contains("#include \"rapidjson/prettywriter.h\"\n"));
        assert!(got.contains("        v.AddMember(\"s\", rapidjson::Value(s, allocator).Move(), allocator);\n"));
        assert!(got.contains("                array.PushBack(i.ToValue(allocator).Move(), allocator);\n"));
        assert!(got.contains(
            "                array.PushBack(rapidjson::Value(static_cast<bool>(i)).Move(), allocator);\n"
        ));
        assert!(got.contains("        v.AddMember(\"one\", one.ToValue(allocator).Move(), allocator);\n"));
        assert!(got.contains("        rapidjson::PrettyWriter<rapidjson::StringBuffer> writer(buffer);\n"));
    }

    #[test]
    fn test_from_string_keeps_source_document_alive() {
        let got = emit("package p; message A { string s; }", &CompileOptions::default());
        assert!(got.contains("#include <memory>\n"));
        assert!(got.contains(
            "struct A {\n    const char * s;\n    std::shared_ptr<rapidjson::Document> source_document_;\n\n"
        ));
        assert!(got.contains(
            "    A& FromString(const char* str) {\n\
             \x20       source_document_ = std::make_shared<rapidjson::Document>();\n\
             \x20       source_document_->Parse(str);\n\
             \x20       assert(source_document_->IsObject());\n\
             \x20       return Get(*source_document_);\n\
             \x20   }\n"
        ));
        // `Parse` keeps its local document.
        assert!(got.contains("    A& Parse(const char* str) {\n        rapidjson::Document document;\n"));
    }

    #[test]
    fn test_reader_only_has_no_document_member() {
        let got = emit("package p; message A { string s; }", &reader_only());
        assert!(!got.contains("source_document_"));
        assert!(!got.contains("#include <memory>"));
    }

    #[test]
    fn test_custom_banner() {
        let options = CompileOptions {
            banner: vec!["line one".into(), "line two".into()],
            serializers: false,
            ..CompileOptions::default()
        };
        let got = emit("package p; message M {}", &options);
        assert!(got.starts_with(
            "#ifndef _PROTO2RAPIDJSON_P_HEADER_\n#define _PROTO2RAPIDJSON_P_HEADER_\n\n// line one\n// line two\n\n#include"
        ));
    }

    #[test]
    fn test_empty_message_has_no_blank_member_block() {
        let got = emit("package p; message M {}", &reader_only());
        assert!(got.contains("struct M {\n    M& Parse(const char* str) {\n"));
        assert!(got.contains("    M& Get(const rapidjson::Value& v) {\n        return *this;\n    }\n"));
    }

    #[test]
    fn test_empty_message_still_owns_a_source_document() {
        let got = emit("package p; message M {}", &CompileOptions::default());
        assert!(got.contains(
            "struct M {\n    std::shared_ptr<rapidjson::Document> source_document_;\n\n    M& Parse(const char* str) {\n"
        ));
    }
}
