//! Schema verifier - naming, ownership and type-consistency rules
//!
//! The verifier is a pure predicate over a parsed [`Schema`]: it never
//! mutates its input and runs before any defaulting. It stops at the first
//! violated rule and reports it as a single `Error::Schema` naming the
//! offending module or property.
//!
//! # Verification Phases
//!
//! 1. **Module**: at least two dot-separated segments, each an identifier
//! 2. **Presence**: at least one property
//! 3. **Per property**: API name, enum values, store key, namespace, access
//! 4. **Uniqueness**: sanitized API names are unique across the schema

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::names::{api_name_to_identifier, is_valid_identifier, is_valid_property_or_api_name};
use crate::types::split_enum_values;
use crate::{Access, Error, Owner, Property, Result, Schema};

// ── Namespace patterns ────────────────────────────────────

/// Store keys a vendor-owned schema may use
fn vendor_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:(?:init\.svc\.|ro\.|persist\.)?vendor\..+|ro\.hardware\..+)$")
            .expect("vendor namespace pattern is valid")
    })
}

/// Store keys an odm-owned schema may use
fn odm_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:(?:init\.svc\.|ro\.|persist\.)?odm\..+|ro\.hardware\..+)$")
            .expect("odm namespace pattern is valid")
    })
}

// ── Public API ────────────────────────────────────────────

/// Verify a parsed schema.
///
/// # Errors
/// Returns `Error::Schema` describing the first rule violated.
pub fn verify(schema: &Schema) -> Result<()> {
    verify_module(&schema.module)?;

    if schema.props.is_empty() {
        return Err(Error::schema("There is no defined property"));
    }

    for prop in &schema.props {
        verify_property(schema.owner, prop)?;
    }

    verify_unique_api_names(&schema.props)
}

// ── Phase 1: Module ───────────────────────────────────────

fn verify_module(module: &str) -> Result<()> {
    let segments: Vec<&str> = module.split('.').collect();
    if segments.len() <= 1 {
        return Err(Error::schema(format!("Invalid module name \"{}\"", module)));
    }

    for segment in segments {
        if !is_valid_identifier(segment) {
            return Err(Error::schema(format!(
                "Invalid name \"{}\" in module",
                segment
            )));
        }
    }

    Ok(())
}

// ── Phase 3: Per property ─────────────────────────────────

/// Verify one property in the context of the schema owner
pub fn verify_property(owner: Owner, prop: &Property) -> Result<()> {
    if !is_valid_property_or_api_name(&prop.api_name) {
        return Err(Error::schema(format!(
            "Invalid API name \"{}\"",
            prop.api_name
        )));
    }

    if prop.prop_type.is_enum() {
        verify_enum_values(prop)?;
    }

    let prop_name = prop.store_key(owner);
    if !is_valid_property_or_api_name(&prop_name) {
        return Err(Error::schema(format!("Invalid prop name \"{}\"", prop_name)));
    }

    verify_namespace(owner, &prop_name)?;

    // Non-ReadWrite keys without "ro." are tolerated until existing
    // misnamed properties are allowlisted.
    if prop.access == Access::ReadWrite && prop_name.starts_with("ro.") {
        return Err(Error::schema(format!(
            "Prop \"{}\" is ReadWrite and also have prefix \"ro.\"",
            prop_name
        )));
    }

    if prop.integer_as_bool && !prop.prop_type.is_boolean() {
        return Err(Error::schema(format!(
            "Prop \"{}\" has integer_as_bool: true, but not a boolean",
            prop_name
        )));
    }

    Ok(())
}

fn verify_enum_values(prop: &Property) -> Result<()> {
    let names = split_enum_values(&prop.enum_values);
    if names.is_empty() {
        return Err(Error::schema(format!(
            "Enum values are empty for API \"{}\"",
            prop.api_name
        )));
    }

    for name in &names {
        if !is_valid_identifier(name) {
            return Err(Error::schema(format!(
                "Invalid enum value \"{}\" for API \"{}\"",
                name, prop.api_name
            )));
        }
    }

    let mut seen = HashSet::new();
    for name in &names {
        if !seen.insert(name.to_ascii_uppercase()) {
            return Err(Error::schema(format!(
                "Duplicated enum value \"{}\" for API \"{}\"",
                name, prop.api_name
            )));
        }
    }

    Ok(())
}

fn verify_namespace(owner: Owner, prop_name: &str) -> Result<()> {
    match owner {
        Owner::Platform => {
            if vendor_pattern().is_match(prop_name) || odm_pattern().is_match(prop_name) {
                return Err(Error::schema(format!(
                    "Prop \"{}\" owned by platform cannot have vendor. or odm. namespace",
                    prop_name
                )));
            }
        }
        Owner::Vendor => {
            if !vendor_pattern().is_match(prop_name) {
                return Err(Error::schema(format!(
                    "Prop \"{}\" owned by vendor should have vendor. namespace",
                    prop_name
                )));
            }
        }
        Owner::Odm => {
            if !odm_pattern().is_match(prop_name) {
                return Err(Error::schema(format!(
                    "Prop \"{}\" owned by odm should have odm. namespace",
                    prop_name
                )));
            }
        }
    }
    Ok(())
}

// ── Phase 4: Uniqueness ───────────────────────────────────

fn verify_unique_api_names(props: &[Property]) -> Result<()> {
    let mut seen = HashSet::new();
    for prop in props {
        if !seen.insert(api_name_to_identifier(&prop.api_name)) {
            return Err(Error::schema(format!(
                "Duplicated API name \"{}\"",
                prop.api_name
            )));
        }
    }
    Ok(())
}
