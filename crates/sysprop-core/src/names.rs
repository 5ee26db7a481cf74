//! Name rules - identifier and property-name predicates, default store keys
//!
//! All functions here are pure and total. ASCII classification only: a
//! non-ASCII character is never a letter or digit for these rules.

use crate::{Access, Owner};

/// True if `name` is a valid identifier: `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

/// True if `name` is non-empty and consists of alphanumerics, `_`, `-` and `.`
pub fn is_valid_property_or_api_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.'))
}

/// Turn an API name into a generated-code identifier.
///
/// `-` and `.` become `_`; a leading digit gets a `_` prefix.
pub fn api_name_to_identifier(api_name: &str) -> String {
    let mut ident = String::with_capacity(api_name.len() + 1);
    if api_name.starts_with(|c: char| c.is_ascii_digit()) {
        ident.push('_');
    }
    ident.extend(
        api_name
            .chars()
            .map(|ch| if ch == '-' || ch == '.' { '_' } else { ch }),
    );
    ident
}

/// Derive the store key for a property without an explicit `prop_name`.
///
/// `ro.` for anything not ReadWrite, then the owner namespace, then the
/// unsanitized API name.
pub fn default_prop_name(owner: Owner, access: Access, api_name: &str) -> String {
    let mut name = String::new();
    if access != Access::ReadWrite {
        name.push_str("ro.");
    }
    match owner {
        Owner::Vendor => name.push_str("vendor."),
        Owner::Odm => name.push_str("odm."),
        Owner::Platform => {}
    }
    name.push_str(api_name);
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_identifier_rules() {
        assert!(is_valid_identifier("a"));
        assert!(is_valid_identifier("_private"));
        assert!(is_valid_identifier("PlatformProperties"));
        assert!(is_valid_identifier("x86_64"));
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("1abc"));
        assert!(!is_valid_identifier("a-b"));
        assert!(!is_valid_identifier("a.b"));
        assert!(!is_valid_identifier("é"));
    }

    #[test]
    fn test_property_name_rules() {
        assert!(is_valid_property_or_api_name("ro.vendor.foo"));
        assert!(is_valid_property_or_api_name("test-x"));
        assert!(is_valid_property_or_api_name("1.2"));
        assert!(!is_valid_property_or_api_name(""));
        assert!(!is_valid_property_or_api_name("foo bar"));
        assert!(!is_valid_property_or_api_name("foo/bar"));
        assert!(!is_valid_property_or_api_name("foo$"));
    }

    #[test]
    fn test_api_name_to_identifier() {
        assert_eq!(api_name_to_identifier("test.string"), "test_string");
        assert_eq!(api_name_to_identifier("test-x"), "test_x");
        assert_eq!(api_name_to_identifier("test.x"), "test_x");
        assert_eq!(api_name_to_identifier("3d.enabled"), "_3d_enabled");
        assert_eq!(api_name_to_identifier("plain"), "plain");
        assert_eq!(api_name_to_identifier(""), "");
    }

    #[test]
    fn test_default_prop_name() {
        assert_eq!(
            default_prop_name(Owner::Platform, Access::ReadWrite, "test_int"),
            "test_int"
        );
        assert_eq!(
            default_prop_name(Owner::Platform, Access::Readonly, "foo"),
            "ro.foo"
        );
        assert_eq!(
            default_prop_name(Owner::Vendor, Access::Writeonce, "foo.bar"),
            "ro.vendor.foo.bar"
        );
        assert_eq!(
            default_prop_name(Owner::Odm, Access::ReadWrite, "foo-bar"),
            "odm.foo-bar"
        );
    }

    proptest! {
        #[test]
        fn sanitized_valid_api_name_is_identifier(name in "[A-Za-z0-9_.-]{1,32}") {
            prop_assert!(is_valid_property_or_api_name(&name));
            prop_assert!(is_valid_identifier(&api_name_to_identifier(&name)));
        }

        #[test]
        fn default_name_is_valid_property_name(name in "[A-Za-z0-9_.-]{1,32}") {
            for owner in [Owner::Platform, Owner::Vendor, Owner::Odm] {
                for access in [Access::Readonly, Access::Writeonce, Access::ReadWrite] {
                    let key = default_prop_name(owner, access, &name);
                    prop_assert!(is_valid_property_or_api_name(&key));
                    prop_assert!(key.ends_with(&name));
                }
            }
        }
    }
}
