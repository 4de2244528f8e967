//! Tag and attribute name derivation.

/// Property names that are never exposed as attributes.
pub const RESERVED_PROPERTIES: &[&str] = &["body", "context", "parent"];

const TAG_SUFFIX: &str = "Tag";
const SETTER_PREFIX: &str = "set";

/// Bean-style decapitalization.
///
/// The first character is lower-cased unless the first two characters are
/// both upper case, in which case the name is an acronym and kept as is
/// (`URL` stays `URL`, `FooBar` becomes `fooBar`).
pub fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    if first.is_uppercase() && chars.next().is_some_and(char::is_uppercase) {
        return name.to_owned();
    }
    let mut out = String::with_capacity(name.len());
    out.extend(first.to_lowercase());
    out.push_str(&name[first.len_utf8()..]);
    out
}

/// Tag name for a simple class name: strip a trailing `Tag`, then decapitalize.
pub fn tag_name(class_name: &str) -> String {
    decapitalize(class_name.strip_suffix(TAG_SUFFIX).unwrap_or(class_name))
}

/// Attribute name for a method name, if the method is named like a setter.
///
/// Returns `None` for names without the `set` prefix, for a bare `set`, and
/// for reserved property names.
pub fn attribute_name(method_name: &str) -> Option<String> {
    let property = method_name.strip_prefix(SETTER_PREFIX)?;
    if property.is_empty() {
        return None;
    }
    let name = decapitalize(property);
    (!RESERVED_PROPERTIES.contains(&name.as_str())).then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decapitalize() {
        assert_eq!(decapitalize("Foo"), "foo");
        assert_eq!(decapitalize("FooBar"), "fooBar");
        assert_eq!(decapitalize("URL"), "URL");
        assert_eq!(decapitalize("X"), "x");
        assert_eq!(decapitalize("already"), "already");
        assert_eq!(decapitalize(""), "");
    }

    #[test]
    fn test_tag_name() {
        assert_eq!(tag_name("FooTag"), "foo");
        assert_eq!(tag_name("ForEachTag"), "forEach");
        assert_eq!(tag_name("XMLTag"), "XML");
        assert_eq!(tag_name("Set"), "set");
        assert_eq!(tag_name("Tagger"), "tagger");
    }

    #[test]
    fn test_attribute_name() {
        assert_eq!(attribute_name("setBar").as_deref(), Some("bar"));
        assert_eq!(attribute_name("setURI").as_deref(), Some("URI"));
        assert_eq!(attribute_name("setX").as_deref(), Some("x"));
        assert_eq!(attribute_name("getBar"), None);
        assert_eq!(attribute_name("set"), None);
    }

    #[test]
    fn test_reserved_names_excluded() {
        assert_eq!(attribute_name("setBody"), None);
        assert_eq!(attribute_name("setContext"), None);
        assert_eq!(attribute_name("setParent"), None);
        assert_eq!(attribute_name("setParentName").as_deref(), Some("parentName"));
    }
}
