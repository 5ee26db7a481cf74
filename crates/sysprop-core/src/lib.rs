//! Sysprop Core - typed accessor generation for system properties
//!
//! Compiles a declarative schema of named, typed properties into getter/setter
//! code for a key-value property store, after checking the schema against a
//! fixed set of naming, ownership and type-consistency rules.
//!
//! # Architecture
//!
//! ```text
//! Schema Text → Parser → Schema → Verifier → Normalizer → Emitter → (header, source)
//!                                                 ↓
//!                                              Runtime → typed get/set on a PropertyStore
//! ```
//!
//! # Guarantees
//!
//! - **All-or-nothing**: any schema violation aborts before output is produced
//! - **Deterministic**: same schema always produces byte-identical artifacts
//! - **Closed types**: every property type dispatches through one exhaustive catalog

pub mod emitter;
pub mod error;
pub mod names;
pub mod normalizer;
pub mod parser;
pub mod runtime;
pub mod types;
pub mod verifier;

use std::path::Path;

pub use emitter::{emit, emit_public_header, Artifacts, EmitOptions};
pub use error::{Error, Result};
pub use types::{PropertyType, ScalarKind, TypeDescriptor};

/// Version of this library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// An enum whose constants are addressable by name and by declaration index
pub trait NamedEnum: Copy + 'static {
    /// All constants in declaration order
    const ALL: &'static [Self];

    /// The constant's name in schema text
    fn name(self) -> &'static str;

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.name() == name)
    }

    fn from_index(index: i64) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }
}

/// Partition that owns the schema's properties
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Owner {
    #[default]
    Platform,
    Vendor,
    Odm,
}

impl NamedEnum for Owner {
    const ALL: &'static [Self] = &[Owner::Platform, Owner::Vendor, Owner::Odm];

    fn name(self) -> &'static str {
        match self {
            Owner::Platform => "Platform",
            Owner::Vendor => "Vendor",
            Owner::Odm => "Odm",
        }
    }
}

/// Access mode; only affects default naming, never runtime enforcement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Access {
    #[default]
    Readonly,
    Writeonce,
    ReadWrite,
}

impl NamedEnum for Access {
    const ALL: &'static [Self] = &[Access::Readonly, Access::Writeonce, Access::ReadWrite];

    fn name(self) -> &'static str {
        match self {
            Access::Readonly => "Readonly",
            Access::Writeonce => "Writeonce",
            Access::ReadWrite => "ReadWrite",
        }
    }
}

/// Visibility tier of the generated accessor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Scope {
    #[default]
    Public,
    /// Deprecated; rewritten to `Public` during normalization
    System,
    Internal,
}

impl NamedEnum for Scope {
    const ALL: &'static [Self] = &[Scope::Public, Scope::System, Scope::Internal];

    fn name(self) -> &'static str {
        match self {
            Scope::Public => "Public",
            Scope::System => "System",
            Scope::Internal => "Internal",
        }
    }
}

/// Root schema: one generation run
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Schema {
    pub owner: Owner,
    /// Dotted module identifier, e.g. `android.os.PlatformProperties`
    pub module: String,
    pub props: Vec<Property>,
}

impl Schema {
    /// Last segment of the module identifier
    pub fn module_name(&self) -> &str {
        match self.module.rfind('.') {
            Some(idx) => &self.module[idx + 1..],
            None => &self.module,
        }
    }

    /// Look up a property by its raw API name
    pub fn property(&self, api_name: &str) -> Option<&Property> {
        self.props.iter().find(|p| p.api_name == api_name)
    }
}

/// One declared accessor unit
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Property {
    pub api_name: String,
    #[serde(rename = "type")]
    pub prop_type: PropertyType,
    pub access: Access,
    pub scope: Scope,
    /// Explicit store key; derived from owner and access when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prop_name: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub enum_values: String,
    #[serde(default)]
    pub integer_as_bool: bool,
}

impl Property {
    /// Effective store key: the explicit `prop_name`, or the derived default
    pub fn store_key(&self, owner: Owner) -> String {
        match self.prop_name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => names::default_prop_name(owner, self.access, &self.api_name),
        }
    }

    /// Identifier used for generated function names
    pub fn identifier(&self) -> String {
        names::api_name_to_identifier(&self.api_name)
    }

    /// Catalog entry for this property's declared type
    pub fn descriptor(&self) -> TypeDescriptor {
        types::describe(self)
    }
}

// ── Pipeline ──────────────────────────────────────────────

/// Parse, validate and normalize schema text.
///
/// Validation runs on the schema exactly as written; defaults are only
/// filled in once it has passed.
///
/// # Errors
/// Returns `Error::Schema` for malformed text or any rule violation.
pub fn load_schema(text: &str) -> Result<Schema> {
    let schema = parser::parse(text)?;
    verifier::verify(&schema)?;
    Ok(normalizer::normalize(schema))
}

/// Read and load a schema file.
///
/// # Errors
/// Returns `Error::Io` if the file cannot be read, otherwise as [`load_schema`].
pub fn load_schema_file(path: &Path) -> Result<Schema> {
    let _span = tracing::debug_span!("load_schema", path = %path.display()).entered();
    let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    load_schema(&text).map_err(|e| match e {
        Error::Schema(msg) => Error::Schema(format!("{}: {}", path.display(), msg)),
        other => other,
    })
}

/// Full pipeline: schema text to header and source artifacts.
pub fn generate(text: &str, options: &EmitOptions) -> Result<Artifacts> {
    let schema = load_schema(text)?;
    Ok(emit(&schema, options))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"
owner: Platform
module: "a.b.C"
prop {
    api_name: "test_int"
    type: Integer
    access: ReadWrite
}
"#;

    #[test]
    fn test_load_schema_fills_prop_name() {
        let schema = load_schema(SCHEMA).unwrap();
        assert_eq!(schema.props[0].prop_name.as_deref(), Some("test_int"));
        assert_eq!(schema.module_name(), "C");
    }

    #[test]
    fn test_load_schema_rejects_invalid_module() {
        let err = load_schema(&SCHEMA.replace("a.b.C", "C")).unwrap_err();
        assert!(err.is_schema());
        assert!(err.to_string().contains("Invalid module name"));
    }

    #[test]
    fn test_load_schema_file_missing_is_io_error() {
        let err = load_schema_file(Path::new("/nonexistent/dir/x.sysprop")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_schema_serialization() {
        let schema = load_schema(SCHEMA).unwrap();
        let json = serde_json::to_string(&schema).unwrap();
        let deserialized: Schema = serde_json::from_str(&json).unwrap();
        assert_eq!(schema, deserialized);
    }

    #[test]
    fn test_version_is_package_version() {
        assert!(!VERSION.is_empty());
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_named_enum_lookup() {
        assert_eq!(Owner::from_name("Odm"), Some(Owner::Odm));
        assert_eq!(Access::from_index(2), Some(Access::ReadWrite));
        assert_eq!(Scope::from_index(3), None);
        assert_eq!(Scope::from_index(-1), None);
        assert_eq!(Owner::from_name("odm"), None);
    }

    #[test]
    fn test_generate_determinism_100_iterations() {
        let options = EmitOptions::new("C.sysprop.h");
        let first = generate(SCHEMA, &options).unwrap();
        for i in 0..100 {
            let result = generate(SCHEMA, &options).unwrap();
            assert_eq!(first, result, "Non-determinism at iteration {}", i);
        }
    }
}
