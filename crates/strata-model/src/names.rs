//! Type name spellings.
//!
//! The model keys types by binary name (`a.b.Outer$Inner`). Class files use
//! internal names (`a/b/Outer$Inner`); lookups accept either.

/// Converts an internal or binary name to the binary spelling.
pub fn to_binary_name(name: &str) -> String {
    name.replace('/', ".")
}

/// Converts a binary or internal name to the internal spelling.
pub fn to_internal_name(name: &str) -> String {
    name.replace('.', "/")
}

/// `a.b.Outer$Inner` → `Outer$Inner`
pub fn simple_name(binary_name: &str) -> &str {
    binary_name
        .rsplit_once('.')
        .map(|(_, simple)| simple)
        .unwrap_or(binary_name)
}

/// `a.b.C` → `a.b`; the default package is the empty string.
pub fn package_name(binary_name: &str) -> &str {
    binary_name
        .rsplit_once('.')
        .map(|(package, _)| package)
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_between_spellings() {
        assert_eq!(to_binary_name("a/b/Outer$Inner"), "a.b.Outer$Inner");
        assert_eq!(to_internal_name("a.b.C"), "a/b/C");
        assert_eq!(to_binary_name("a.b.C"), "a.b.C");
    }

    #[test]
    fn splits_package_and_simple_name() {
        assert_eq!(simple_name("a.b.Outer$Inner"), "Outer$Inner");
        assert_eq!(package_name("a.b.Outer$Inner"), "a.b");
        assert_eq!(simple_name("Top"), "Top");
        assert_eq!(package_name("Top"), "");
    }
}
