//! Runtime accessors - typed get/set over a [`PropertyStore`]
//!
//! The in-process counterpart of the generated C++ accessors. Each
//! [`Accessor`] is bound to one normalized property and applies exactly the
//! same parse and format rules the emitted code does.
//!
//! ```text
//! store.read(key) → codec::parse → Option<Value>
//! Value → codec::format → store.write(key, text)
//! ```

pub mod codec;
pub mod store;

pub use store::{MemoryStore, PropertyStore};

use crate::types::TypeDescriptor;
use crate::{Property, Schema};

/// A typed property value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i32),
    Long(i64),
    Double(f64),
    String(String),
    /// Ordinal into the property's symbol table
    Enum(usize),
    List(Vec<Value>),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(elements) => Some(elements),
            _ => None,
        }
    }
}

/// Getter/setter pair for one property
#[derive(Debug, Clone)]
pub struct Accessor {
    api_name: String,
    key: String,
    descriptor: TypeDescriptor,
    integer_as_bool: bool,
}

impl Accessor {
    /// Bind to a normalized property of `schema`
    pub fn new(schema: &Schema, property: &Property) -> Self {
        Accessor {
            api_name: property.api_name.clone(),
            key: property.store_key(schema.owner),
            descriptor: property.descriptor(),
            integer_as_bool: property.integer_as_bool,
        }
    }

    pub fn api_name(&self) -> &str {
        &self.api_name
    }

    /// Store key this accessor reads and writes
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    /// Current value, or `None` if the key is absent or does not parse.
    pub fn get<S: PropertyStore>(&self, store: &S) -> Option<Value> {
        let raw = store.read(&self.key)?;
        let value = codec::parse(&self.descriptor, &raw);
        if value.is_none() {
            tracing::debug!(key = %self.key, raw = %raw, "stored value does not parse");
        }
        value
    }

    /// Encode and write `value`, returning whether the store accepted it.
    ///
    /// # Panics
    /// If `value` does not match this property's type.
    pub fn set<S: PropertyStore>(&self, store: &S, value: &Value) -> bool {
        let text = if self.integer_as_bool {
            codec::format_integer_as_bool(value)
        } else {
            codec::format(&self.descriptor, value)
        };
        store.write(&self.key, &text)
    }
}

/// All accessors of a schema, in declaration order
#[derive(Debug, Clone, Default)]
pub struct Accessors {
    accessors: Vec<Accessor>,
}

impl Accessors {
    pub fn new(schema: &Schema) -> Self {
        Accessors {
            accessors: schema
                .props
                .iter()
                .map(|prop| Accessor::new(schema, prop))
                .collect(),
        }
    }

    /// Look up by raw API name
    pub fn get(&self, api_name: &str) -> Option<&Accessor> {
        self.accessors.iter().find(|a| a.api_name == api_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Accessor> {
        self.accessors.iter()
    }

    pub fn len(&self) -> usize {
        self.accessors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accessors.is_empty()
    }
}
