//! Code emitter - turns a normalized schema into C++ accessor code
//!
//! Produces two artifacts per schema:
//!
//! - **header** (declarations): getter/setter signatures and `enum class`
//!   value types, inside the namespace derived from the module name
//! - **source** (definitions): parse/format helpers, per-enum symbol tables,
//!   and getter/setter bodies, including the header by its install path
//!
//! Emission is a pure function of the schema and [`EmitOptions`]; the same
//! input always yields byte-identical output.

mod header;
mod source;

use sha2::{Digest, Sha256};

use crate::types::{ScalarKind, TypeDescriptor};
use crate::{Property, Schema, Scope};

/// Banner at the top of every generated file
pub const GENERATED_BANNER: &str = "// Generated by the sysprop generator. DO NOT EDIT!";

/// Caller-supplied emission settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    /// Path the header is included by, echoed verbatim into the source
    pub include_name: String,
}

impl EmitOptions {
    pub fn new(include_name: impl Into<String>) -> Self {
        EmitOptions {
            include_name: include_name.into(),
        }
    }
}

/// The two generated text artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub header: String,
    pub source: String,
}

impl Artifacts {
    /// SHA-256 over header then source, lowercase hex
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.header.as_bytes());
        hasher.update(self.source.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

/// Emit header and source for a verified, normalized schema.
pub fn emit(schema: &Schema, options: &EmitOptions) -> Artifacts {
    let _span = tracing::debug_span!("emit", module = %schema.module).entered();
    let header = header::generate(schema, |_| true);
    let source = source::generate(schema, options);
    tracing::debug!(
        props = schema.props.len(),
        header_bytes = header.len(),
        source_bytes = source.len(),
        "emitted artifacts"
    );
    Artifacts { header, source }
}

/// Emit a header that declares only the `Public`-scope accessors.
pub fn emit_public_header(schema: &Schema) -> String {
    header::generate(schema, |prop| prop.scope == Scope::Public)
}

// ── Shared naming ─────────────────────────────────────────

/// `a.b.C` → `a::b::C`
fn cpp_namespace(schema: &Schema) -> String {
    schema.module.replace('.', "::")
}

/// Name of the generated `enum class` for an enum property
fn enum_type_name(prop: &Property) -> String {
    format!("{}_values", prop.identifier())
}

/// Target type of one element
fn scalar_type(scalar: ScalarKind, prop: &Property) -> String {
    match scalar {
        ScalarKind::Boolean => "bool".to_string(),
        ScalarKind::Int32 => "std::int32_t".to_string(),
        ScalarKind::Int64 => "std::int64_t".to_string(),
        ScalarKind::Double => "double".to_string(),
        ScalarKind::String => "std::string".to_string(),
        ScalarKind::Enum => enum_type_name(prop),
    }
}

/// Target value type of a property, list-wrapped where declared
fn value_type(desc: &TypeDescriptor, prop: &Property) -> String {
    let element = scalar_type(desc.scalar, prop);
    if desc.is_list {
        format!("std::vector<{}>", element)
    } else {
        element
    }
}

/// Line-oriented text buffer
#[derive(Default)]
struct SourceWriter {
    buf: String,
}

impl SourceWriter {
    fn line(&mut self, text: &str) {
        self.buf.push_str(text);
        self.buf.push('\n');
    }

    fn blank(&mut self) {
        self.buf.push('\n');
    }

    fn raw(&mut self, text: &str) {
        self.buf.push_str(text);
    }

    fn finish(self) -> String {
        self.buf
    }
}
