//! Schema normalizer - fills defaulted fields after verification
//!
//! # Guarantees
//!
//! - **Idempotent**: `normalize(normalize(x)) == normalize(x)`
//! - **Deterministic**: same input always produces same output
//! - **Order preserving**: properties keep their declaration order
//!
//! Normalization is the only place a schema is mutated. It assumes the
//! schema has already passed [`crate::verifier::verify`].

use crate::{Schema, Scope};

/// Normalize a verified schema.
///
/// 1. Blank `prop_name`s are replaced by the derived default store key
/// 2. The deprecated `System` scope is rewritten to `Public`
pub fn normalize(mut schema: Schema) -> Schema {
    let owner = schema.owner;

    for prop in &mut schema.props {
        // ── Step 1: Default store key ──────────────────
        if prop.prop_name.as_deref().map_or(true, str::is_empty) {
            prop.prop_name = Some(prop.store_key(owner));
        }

        // ── Step 2: Deprecated scope ───────────────────
        if prop.scope == Scope::System {
            tracing::warn!(
                api_name = %prop.api_name,
                "Sysprop API {}: System scope is deprecated. Please use Public scope instead.",
                prop.api_name
            );
            prop.scope = Scope::Public;
        }
    }

    schema
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Access, Owner, Property, PropertyType};

    fn schema(owner: Owner, props: Vec<Property>) -> Schema {
        Schema {
            owner,
            module: "vendor.foo.Props".into(),
            props,
        }
    }

    fn prop(api_name: &str, access: Access, scope: Scope) -> Property {
        Property {
            api_name: api_name.into(),
            prop_type: PropertyType::String,
            access,
            scope,
            ..Default::default()
        }
    }

    #[test]
    fn test_normalize_fills_default_prop_names() {
        let s = normalize(schema(
            Owner::Vendor,
            vec![
                prop("a", Access::ReadWrite, Scope::Public),
                prop("b", Access::Readonly, Scope::Internal),
            ],
        ));
        assert_eq!(s.props[0].prop_name.as_deref(), Some("vendor.a"));
        assert_eq!(s.props[1].prop_name.as_deref(), Some("ro.vendor.b"));
    }

    #[test]
    fn test_normalize_keeps_explicit_prop_name() {
        let mut p = prop("a", Access::ReadWrite, Scope::Public);
        p.prop_name = Some("vendor.custom.key".into());
        let s = normalize(schema(Owner::Vendor, vec![p]));
        assert_eq!(s.props[0].prop_name.as_deref(), Some("vendor.custom.key"));
    }

    #[test]
    fn test_normalize_treats_empty_prop_name_as_absent() {
        let mut p = prop("a", Access::Writeonce, Scope::Public);
        p.prop_name = Some(String::new());
        let s = normalize(schema(Owner::Odm, vec![p]));
        assert_eq!(s.props[0].prop_name.as_deref(), Some("ro.odm.a"));
    }

    #[test]
    fn test_normalize_rewrites_system_scope() {
        let s = normalize(schema(
            Owner::Platform,
            vec![
                prop("a", Access::ReadWrite, Scope::System),
                prop("b", Access::ReadWrite, Scope::Internal),
            ],
        ));
        assert_eq!(s.props[0].scope, Scope::Public);
        assert_eq!(s.props[1].scope, Scope::Internal);
    }

    #[test]
    fn test_normalize_preserves_order() {
        let names = ["z", "a", "m"];
        let s = normalize(schema(
            Owner::Platform,
            names
                .iter()
                .map(|n| prop(n, Access::ReadWrite, Scope::Public))
                .collect(),
        ));
        let got: Vec<&str> = s.props.iter().map(|p| p.api_name.as_str()).collect();
        assert_eq!(got, names);
    }

    #[test]
    fn test_normalize_idempotent() {
        let input = schema(
            Owner::Vendor,
            vec![
                prop("a", Access::Readonly, Scope::System),
                prop("b", Access::ReadWrite, Scope::Internal),
            ],
        );
        let once = normalize(input);
        let twice = normalize(once.clone());
        assert_eq!(once, twice);
    }
}
