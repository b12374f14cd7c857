use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    pub key:    String,
    pub line:   usize,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventSpec {
    pub name:             String,
    pub line:             usize,
    pub signal:           String,
    pub fields_key:       String,
    pub format:           String,
    pub field_count_hint: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PrefType {
    Str,
    Int,
    Bool,
}

impl PrefType {
    /// Maps a symbolic `TYPE_*` token from the preference table.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "TYPE_STR"  => Some(PrefType::Str),
            "TYPE_INT"  => Some(PrefType::Int),
            "TYPE_BOOL" => Some(PrefType::Bool),
            _ => None,
        }
    }

    /// The Rust type a preference of this kind is read as.
    pub fn rust_type(self) -> &'static str {
        match self {
            PrefType::Str  => "String",
            PrefType::Int  => "i32",
            PrefType::Bool => "bool",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrefSpec {
    pub name:  String,
    pub line:  usize,
    pub type_: PrefType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionSignature {
    pub name:             String,
    /// Parameter names in declaration order, without the leading handle.
    pub parameters:       Vec<String>,
    pub indentation_unit: String,
}
