// SPDX-License-Identifier: MIT

//! Symbolic JSONata path expressions
//!
//! A [`JsonataPath`] stands in for a piece of runtime data that does not
//! exist yet. Chaining [`JsonataPath::field`] records the access pattern and
//! rendering the value produces the dotted reference text, e.g.
//! `$states.input.ResourceProperties.BucketName`.
//!
//! Field names are never inspected. Whatever the caller writes is exactly
//! what ends up in the expression.

use serde::{Serialize, Serializer};
use std::fmt;

/// Anything that can be rendered as JSONata expression text
pub trait ToExpression {
    /// Render the expression text
    fn to_expression(&self) -> String;
}

impl ToExpression for str {
    fn to_expression(&self) -> String {
        self.to_string()
    }
}

impl ToExpression for String {
    fn to_expression(&self) -> String {
        self.clone()
    }
}

impl<T: ToExpression + ?Sized> ToExpression for &T {
    fn to_expression(&self) -> String {
        (**self).to_expression()
    }
}

/// An immutable reference expression rooted at an anchor
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JsonataPath {
    anchor: String,
    segments: Vec<String>,
}

/// Shorthand for [`JsonataPath::of`]
pub fn path_of(anchor: impl Into<String>) -> JsonataPath {
    JsonataPath::of(anchor)
}

impl JsonataPath {
    /// Start a new path at `anchor` with no segments
    pub fn of(anchor: impl Into<String>) -> Self {
        Self {
            anchor: anchor.into(),
            segments: Vec::new(),
        }
    }

    /// Derive a new path with `name` appended.
    ///
    /// The receiver is left untouched, so sibling chains built from the same
    /// prefix never observe each other.
    pub fn field(&self, name: impl Into<String>) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(name.into());
        Self {
            anchor: self.anchor.clone(),
            segments,
        }
    }

    /// The root identifier this path was built from
    pub fn anchor(&self) -> &str {
        &self.anchor
    }

    /// Field segments accumulated so far, in access order
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Render the full dotted path
    pub fn to_expression(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for JsonataPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.anchor)?;
        for segment in &self.segments {
            write!(f, ".{}", segment)?;
        }
        Ok(())
    }
}

impl ToExpression for JsonataPath {
    fn to_expression(&self) -> String {
        JsonataPath::to_expression(self)
    }
}

impl From<JsonataPath> for String {
    fn from(path: JsonataPath) -> Self {
        path.to_string()
    }
}

impl From<&JsonataPath> for String {
    fn from(path: &JsonataPath) -> Self {
        path.to_string()
    }
}

// Paths end up embedded in node parameters, so they serialize as their text.
impl Serialize for JsonataPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_anchor_renders_as_is() {
        let path = path_of("$states.input");
        assert_eq!(path.to_expression(), "$states.input");
        assert!(path.segments().is_empty());
    }

    #[test]
    fn test_chained_fields_join_with_dots() {
        let path = path_of("$states.result")
            .field("TagSet")
            .field("Key")
            .field("Value");
        assert_eq!(path.to_string(), "$states.result.TagSet.Key.Value");
        assert_eq!(path.anchor(), "$states.result");
        assert_eq!(path.segments(), ["TagSet", "Key", "Value"]);
    }

    #[test]
    fn test_deep_chain() {
        let mut path = path_of("$root");
        let mut expected = String::from("$root");
        for i in 0..200 {
            path = path.field(format!("f{}", i));
            expected.push_str(&format!(".f{}", i));
        }
        assert_eq!(path.to_expression(), expected);
    }

    #[test]
    fn test_siblings_do_not_alias() {
        let props = path_of("$states.input").field("ResourceProperties");
        let bucket = props.field("BucketName");
        let _deeper = bucket.field("Arn");
        let group = props.field("GroupId");

        assert_eq!(props.to_string(), "$states.input.ResourceProperties");
        assert_eq!(bucket.to_string(), "$states.input.ResourceProperties.BucketName");
        assert_eq!(group.to_string(), "$states.input.ResourceProperties.GroupId");
    }

    #[test]
    fn test_rendering_does_not_append_segments() {
        let path = path_of("$states.input").field("RequestType");
        let _ = path.to_string();
        let _ = format!("{}", path);
        assert_eq!(path.segments().len(), 1);
    }

    #[test]
    fn test_hook_like_names_are_plain_segments() {
        let path = path_of("$x").field("toString").field("fmt");
        assert_eq!(path.to_expression(), "$x.toString.fmt");
    }

    #[test]
    fn test_interpolation_into_templates() {
        let id = path_of("$states.input").field("StackId");
        assert_eq!(format!("{{% {} %}}", id), "{% $states.input.StackId %}");
        let owned: String = id.into();
        assert_eq!(owned, "$states.input.StackId");
    }

    #[test]
    fn test_any_string_is_a_segment() {
        let path = path_of("").field("").field("a b").field("[0]");
        assert_eq!(path.to_expression(), "..a b.[0]");
    }

    #[test]
    fn test_serializes_as_expression_text() {
        let path = path_of("$states.result").field("Policy");
        assert_eq!(serde_json::to_value(&path).unwrap(), json!("$states.result.Policy"));
    }

    #[test]
    fn test_to_expression_trait_for_strings() {
        assert_eq!("$Objects".to_expression(), "$Objects");
        assert_eq!(String::from("$IsTagged").to_expression(), "$IsTagged");
    }
}
