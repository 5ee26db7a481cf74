//! Type catalog - the closed mapping from declared property types to
//! scalar kinds, list-ness and enum symbol tables.
//!
//! Everything downstream (emitter, runtime codec) dispatches on
//! [`TypeDescriptor`]; nothing special-cases a `PropertyType` directly.

use crate::{NamedEnum, Property};

/// Declared property type: six base kinds, each with a list counterpart
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PropertyType {
    #[default]
    Boolean,
    Integer,
    Long,
    Double,
    String,
    Enum,
    BooleanList,
    IntegerList,
    LongList,
    DoubleList,
    StringList,
    EnumList,
}

impl NamedEnum for PropertyType {
    const ALL: &'static [Self] = &[
        PropertyType::Boolean,
        PropertyType::Integer,
        PropertyType::Long,
        PropertyType::Double,
        PropertyType::String,
        PropertyType::Enum,
        PropertyType::BooleanList,
        PropertyType::IntegerList,
        PropertyType::LongList,
        PropertyType::DoubleList,
        PropertyType::StringList,
        PropertyType::EnumList,
    ];

    fn name(self) -> &'static str {
        match self {
            PropertyType::Boolean => "Boolean",
            PropertyType::Integer => "Integer",
            PropertyType::Long => "Long",
            PropertyType::Double => "Double",
            PropertyType::String => "String",
            PropertyType::Enum => "Enum",
            PropertyType::BooleanList => "BooleanList",
            PropertyType::IntegerList => "IntegerList",
            PropertyType::LongList => "LongList",
            PropertyType::DoubleList => "DoubleList",
            PropertyType::StringList => "StringList",
            PropertyType::EnumList => "EnumList",
        }
    }
}

impl PropertyType {
    /// Base scalar kind and list-ness
    pub const fn shape(self) -> (ScalarKind, bool) {
        match self {
            PropertyType::Boolean => (ScalarKind::Boolean, false),
            PropertyType::Integer => (ScalarKind::Int32, false),
            PropertyType::Long => (ScalarKind::Int64, false),
            PropertyType::Double => (ScalarKind::Double, false),
            PropertyType::String => (ScalarKind::String, false),
            PropertyType::Enum => (ScalarKind::Enum, false),
            PropertyType::BooleanList => (ScalarKind::Boolean, true),
            PropertyType::IntegerList => (ScalarKind::Int32, true),
            PropertyType::LongList => (ScalarKind::Int64, true),
            PropertyType::DoubleList => (ScalarKind::Double, true),
            PropertyType::StringList => (ScalarKind::String, true),
            PropertyType::EnumList => (ScalarKind::Enum, true),
        }
    }

    pub const fn scalar(self) -> ScalarKind {
        self.shape().0
    }

    pub const fn is_list(self) -> bool {
        self.shape().1
    }

    pub const fn is_enum(self) -> bool {
        matches!(self.scalar(), ScalarKind::Enum)
    }

    pub const fn is_boolean(self) -> bool {
        matches!(self.scalar(), ScalarKind::Boolean)
    }
}

/// Non-list base value kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Boolean,
    Int32,
    Int64,
    Double,
    String,
    Enum,
}

/// Resolved type of one property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub scalar: ScalarKind,
    pub is_list: bool,
    /// Enum symbols in declaration order; ordinal == index. Empty for non-enums.
    pub symbols: Vec<String>,
}

impl TypeDescriptor {
    /// Ordinal of an enum symbol (exact, case-sensitive match)
    pub fn ordinal(&self, symbol: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s == symbol)
    }

    /// Symbol name for an enum ordinal
    pub fn symbol(&self, ordinal: usize) -> Option<&str> {
        self.symbols.get(ordinal).map(String::as_str)
    }
}

/// Split an `enum_values` declaration into its ordered symbols
pub fn split_enum_values(enum_values: &str) -> Vec<&str> {
    enum_values.split('|').collect()
}

/// Catalog lookup for a property.
///
/// The enum symbol list is only meaningful after validation, which
/// guarantees it is non-empty and free of case-insensitive duplicates.
pub fn describe(property: &Property) -> TypeDescriptor {
    let (scalar, is_list) = property.prop_type.shape();
    let symbols = match scalar {
        ScalarKind::Enum => split_enum_values(&property.enum_values)
            .into_iter()
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    };
    TypeDescriptor {
        scalar,
        is_list,
        symbols,
    }
}
