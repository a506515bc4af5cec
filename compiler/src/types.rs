use std::fmt;

use serde::Serialize;

use crate::symbols::SymbolTable;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schema {
    pub package:  String,
    pub messages: SymbolTable,
}

/// Type of a message field. Primitive variants map onto fixed RapidJSON
/// accessors; `Custom` names an earlier message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ElementKind {
    Custom(String),
    Double,
    Float,
    Int32,
    Uint32,
    Int64,
    Uint64,
    Bool,
    String,
}

impl ElementKind {
    /// Looks up a primitive type keyword.
    pub fn from_primitive(word: &str) -> Option<Self> {
        let kind = match word {
            "double" => ElementKind::Double,
            "float"  => ElementKind::Float,
            "int32"  => ElementKind::Int32,
            "uint32" => ElementKind::Uint32,
            "int64"  => ElementKind::Int64,
            "uint64" => ElementKind::Uint64,
            "bool"   => ElementKind::Bool,
            "string" => ElementKind::String,
            _ => return None,
        };
        Some(kind)
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, ElementKind::Custom(_))
    }

    /// C++ type used for the field declaration.
    pub fn native_type(&self) -> &str {
        match self {
            ElementKind::Custom(name) => name.as_str(),
            ElementKind::Double       => "double",
            ElementKind::Float        => "float",
            ElementKind::Int32        => "int32_t",
            ElementKind::Uint32       => "uint32_t",
            ElementKind::Int64        => "int64_t",
            ElementKind::Uint64       => "uint64_t",
            ElementKind::Bool         => "bool",
            ElementKind::String       => "const char *",
        }
    }

    /// `rapidjson::Value` type predicate.
    pub fn predicate(&self) -> &'static str {
        match self {
            ElementKind::Custom(_) => "IsObject",
            ElementKind::Double    => "IsDouble",
            ElementKind::Float     => "IsFloat",
            ElementKind::Int32     => "IsInt",
            ElementKind::Uint32    => "IsUint",
            ElementKind::Int64     => "IsInt64",
            ElementKind::Uint64    => "IsUint64",
            ElementKind::Bool      => "IsBool",
            ElementKind::String    => "IsString",
        }
    }

    /// Expression extracting this kind from the value expression `base`.
    pub fn extraction(&self, base: &str) -> String {
        let getter = match self {
            ElementKind::Custom(name) => return format!("{}().Get({})", name, base),
            ElementKind::Double       => "GetDouble",
            ElementKind::Float        => "GetFloat",
            ElementKind::Int32        => "GetInt",
            ElementKind::Uint32       => "GetUint",
            ElementKind::Int64        => "GetInt64",
            ElementKind::Uint64       => "GetUint64",
            ElementKind::Bool         => "GetBool",
            ElementKind::String       => "GetString",
        };
        format!("{}.{}()", base, getter)
    }

    /// Expression building a `rapidjson::Value` from the native expression `base`.
    pub fn to_value(&self, base: &str) -> String {
        match self {
            ElementKind::Custom(_) => format!("{}.ToValue(allocator)", base),
            ElementKind::String    => format!("rapidjson::Value({}, allocator)", base),
            primitive => format!(
                "rapidjson::Value(static_cast<{}>({}))",
                primitive.native_type(),
                base
            ),
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ElementKind::Custom(name) => name.as_str(),
            ElementKind::Double       => "double",
            ElementKind::Float        => "float",
            ElementKind::Int32        => "int32",
            ElementKind::Uint32       => "uint32",
            ElementKind::Int64        => "int64",
            ElementKind::Uint64       => "uint64",
            ElementKind::Bool         => "bool",
            ElementKind::String       => "string",
        };
        f.write_str(text)
    }
}

/// One field of a message, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    pub identifier: String,
    pub kind:       ElementKind,
    pub kind_label: String,
    pub repeated:   bool,
}

impl Element {
    pub fn new(identifier: String, kind: ElementKind, repeated: bool) -> Self {
        let kind_label = kind.native_type().to_string();
        Element {
            identifier,
            kind,
            kind_label,
            repeated,
        }
    }

    /// C++ type of the declared member, wrapping repeated fields in `std::vector`.
    pub fn declared_type(&self) -> String {
        if self.repeated {
            format!("std::vector<{}>", self.kind_label)
        } else {
            self.kind_label.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub identifier: String,
    pub elements:   Vec<Element>,
}
