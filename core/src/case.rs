//! Field-name translation between the wire and local naming conventions.
//!
//! # Design
//! The wire uses `lower_snake_case` keys, callers use `lowerCamelCase`. Both
//! functions are total: any string maps to some string, nothing fails.
//!
//! `to_wire` does not special-case a leading uppercase letter, so `"Foo"`
//! becomes `"_foo"`. `to_local` drops empty segments, so `"a__b"`, `"_a_b"`
//! and `"a_b_"` all land on a single canonical camelCase form.

/// Convert a local `lowerCamelCase` name to its `lower_snake_case` wire form.
pub fn to_wire(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_uppercase() {
            out.push('_');
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Convert a `lower_snake_case` wire name to its local `lowerCamelCase` form.
pub fn to_local(name: &str) -> String {
    let mut segments = name.split('_');
    let mut out = String::with_capacity(name.len());
    if let Some(first) = segments.next() {
        out.push_str(first);
    }
    for segment in segments {
        out.push_str(&capitalize(segment));
    }
    out
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_wire_inserts_underscores_before_humps() {
        assert_eq!(to_wire("createdAt"), "created_at");
        assert_eq!(to_wire("someLongFieldName"), "some_long_field_name");
        assert_eq!(to_wire("item"), "item");
    }

    #[test]
    fn to_wire_keeps_digits() {
        assert_eq!(to_wire("line2Text"), "line2_text");
        assert_eq!(to_wire("v1"), "v1");
    }

    #[test]
    fn to_wire_leading_uppercase_yields_leading_underscore() {
        assert_eq!(to_wire("Item"), "_item");
    }

    #[test]
    fn to_wire_each_uppercase_letter_is_split() {
        assert_eq!(to_wire("userID"), "user_i_d");
    }

    #[test]
    fn to_local_capitalizes_later_segments() {
        assert_eq!(to_local("created_at"), "createdAt");
        assert_eq!(to_local("some_long_field_name"), "someLongFieldName");
        assert_eq!(to_local("items"), "items");
    }

    #[test]
    fn to_local_absorbs_repeated_underscores() {
        assert_eq!(to_local("created__at"), "createdAt");
        assert_eq!(to_local("created_at_"), "createdAt");
    }

    #[test]
    fn to_local_leading_underscore_capitalizes_first_word() {
        assert_eq!(to_local("_item"), "Item");
    }

    #[test]
    fn to_local_empty_name() {
        assert_eq!(to_local(""), "");
        assert_eq!(to_wire(""), "");
    }

    #[test]
    fn camel_case_names_round_trip() {
        for name in ["id", "text", "createdAt", "itemsRemoved2", "aBC", "line2Text", "x9y"] {
            assert_eq!(to_local(&to_wire(name)), name, "{name}");
        }
    }
}
