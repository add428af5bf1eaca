// JSDB - JavaScript Debugger
// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Remote value snapshots.
//!
//! Mirrors are produced by the protocol layer and never change afterwards.
//! Proxies hold them behind an [`Arc`](std::sync::Arc) and only read them.

use std::{convert::Infallible, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Runtime type tag reported by the remote debugger.
///
/// Parsing a tag never fails: tags this client does not know about are kept
/// verbatim in [`ValueType::Other`], so newer protocol versions degrade
/// gracefully.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ValueType {
    /// Plain object
    Object,
    /// Number primitive
    Number,
    /// String primitive
    String,
    /// Boolean primitive
    Boolean,
    /// Function object
    Function,
    /// Array object
    Array,
    /// The `undefined` value
    Undefined,
    /// The `null` value
    Null,
    /// Date object
    Date,
    /// RegExp object
    Regexp,
    /// Error object
    Error,
    /// A tag this client does not recognize
    Other(String),
}

impl ValueType {
    /// Parses a wire tag. Matching is exact; tags are lower case on the wire.
    pub fn parse(tag: &str) -> Self {
        match tag {
            "object" => Self::Object,
            "number" => Self::Number,
            "string" => Self::String,
            "boolean" => Self::Boolean,
            "function" => Self::Function,
            "array" => Self::Array,
            "undefined" => Self::Undefined,
            "null" => Self::Null,
            "date" => Self::Date,
            "regexp" => Self::Regexp,
            "error" => Self::Error,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns the wire form of the tag.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Object => "object",
            Self::Number => "number",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Function => "function",
            Self::Array => "array",
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Date => "date",
            Self::Regexp => "regexp",
            Self::Error => "error",
            Self::Other(tag) => tag,
        }
    }

    /// Returns true for tags whose values have remote properties.
    pub fn is_object_like(&self) -> bool {
        matches!(
            self,
            Self::Object | Self::Function | Self::Array | Self::Date | Self::Regexp | Self::Error
        )
    }
}

impl FromStr for ValueType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<String> for ValueType {
    fn from(tag: String) -> Self {
        Self::parse(&tag)
    }
}

impl From<ValueType> for String {
    fn from(value: ValueType) -> Self {
        match value {
            ValueType::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a variable: a textual name or a numeric index.
///
/// Stored as reported and rendered to a string only on demand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::From)]
#[serde(untagged)]
pub enum RawName {
    /// Numeric index, e.g. an array element
    Index(u64),
    /// Textual name
    Name(String),
}

impl RawName {
    /// Returns the numeric index this name denotes, if any.
    ///
    /// Textual names count as indices only in canonical decimal form, so
    /// `"7"` is index 7 but `"07"` and `"+7"` are plain names.
    pub fn as_index(&self) -> Option<u64> {
        match self {
            Self::Index(index) => Some(*index),
            Self::Name(name) => {
                let index = name.parse::<u64>().ok()?;
                (index.to_string() == *name).then_some(index)
            }
        }
    }
}

impl From<&str> for RawName {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<u32> for RawName {
    fn from(index: u32) -> Self {
        Self::Index(index.into())
    }
}

impl fmt::Display for RawName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{index}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// Function metadata attached to mirrors of type `function`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionMirror {
    /// Declared name
    #[serde(default)]
    pub name: Option<String>,
    /// Name inferred by the runtime for anonymous functions
    #[serde(default)]
    pub inferred_name: Option<String>,
    /// Script that contains the function, if known
    #[serde(default)]
    pub script_id: Option<u64>,
    /// Zero-based line of the function in its script
    #[serde(default)]
    pub line: Option<u32>,
    /// Zero-based column of the function in its script
    #[serde(default)]
    pub column: Option<u32>,
}

/// Immutable snapshot of one remote value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueMirror {
    #[serde(rename = "type")]
    value_type: ValueType,
    #[serde(default)]
    handle: Option<u64>,
    #[serde(default)]
    class_name: Option<String>,
    #[serde(default)]
    text: String,
    #[serde(default)]
    full_length: Option<usize>,
    #[serde(default)]
    function: Option<FunctionMirror>,
}

impl ValueMirror {
    /// Creates a mirror with a type tag and textual rendering.
    pub fn new(value_type: ValueType, text: impl Into<String>) -> Self {
        Self {
            value_type,
            handle: None,
            class_name: None,
            text: text.into(),
            full_length: None,
            function: None,
        }
    }

    /// Sets the remote handle used to fetch deep data.
    pub fn with_handle(mut self, handle: u64) -> Self {
        self.handle = Some(handle);
        self
    }

    /// Sets the remote class name.
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Records the full length of a value whose text the remote truncated.
    pub fn with_full_length(mut self, full_length: usize) -> Self {
        self.full_length = Some(full_length);
        self
    }

    /// Attaches function metadata.
    pub fn with_function(mut self, function: FunctionMirror) -> Self {
        self.function = Some(function);
        self
    }

    /// Runtime type tag
    pub fn value_type(&self) -> &ValueType {
        &self.value_type
    }

    /// Remote handle, absent for primitives the remote sent inline
    pub fn handle(&self) -> Option<u64> {
        self.handle
    }

    /// Remote class name, e.g. `Object` or `Date`
    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    /// Textual rendering reported by the remote (possibly truncated)
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Full length of the value when the text is truncated
    pub fn full_length(&self) -> Option<usize> {
        self.full_length
    }

    /// Returns true if the remote sent only a prefix of the text.
    pub fn is_truncated(&self) -> bool {
        self.full_length.is_some_and(|len| len > self.text.chars().count())
    }

    /// Function metadata
    pub fn function(&self) -> Option<&FunctionMirror> {
        self.function.as_ref()
    }
}

/// One property of a remote object.
///
/// Descriptor flags are `None` when the remote did not report them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyMirror {
    /// Property name or index
    pub name: RawName,
    /// Property value
    pub value: ValueMirror,
    /// Accessor getter, if the property has one
    #[serde(default)]
    pub getter: Option<ValueMirror>,
    /// Accessor setter, if the property has one
    #[serde(default)]
    pub setter: Option<ValueMirror>,
    /// Writable flag
    #[serde(default)]
    pub writable: Option<bool>,
    /// Configurable flag
    #[serde(default)]
    pub configurable: Option<bool>,
    /// Enumerable flag
    #[serde(default)]
    pub enumerable: Option<bool>,
}

impl PropertyMirror {
    /// Creates a data property with no descriptor metadata.
    pub fn new(name: impl Into<RawName>, value: ValueMirror) -> Self {
        Self {
            name: name.into(),
            value,
            getter: None,
            setter: None,
            writable: None,
            configurable: None,
            enumerable: None,
        }
    }
}

/// Deep data of an object, as returned by the value loader.
///
/// Both lists keep the order the remote reported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubpropertiesMirror {
    /// Regular properties
    #[serde(default)]
    pub properties: Vec<PropertyMirror>,
    /// Engine-internal properties, such as a bound function's target
    #[serde(default)]
    pub internal_properties: Vec<PropertyMirror>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_type_parse_is_total() {
        for tag in [
            "object",
            "number",
            "string",
            "boolean",
            "function",
            "array",
            "undefined",
            "null",
            "date",
            "regexp",
            "error",
        ] {
            let parsed: ValueType = tag.parse().unwrap();
            assert!(!matches!(parsed, ValueType::Other(_)), "{tag} should be known");
            assert_eq!(parsed.to_string(), tag);
        }

        assert_eq!(ValueType::parse("bigint"), ValueType::Other("bigint".to_string()));
        assert_eq!(ValueType::parse("Object"), ValueType::Other("Object".to_string()));
        assert_eq!(ValueType::parse("").as_str(), "");
    }

    #[test]
    fn test_raw_name_rendering() {
        assert_eq!(RawName::from("count").to_string(), "count");
        assert_eq!(RawName::from(3u64).to_string(), "3");

        assert_eq!(RawName::from(3u64).as_index(), Some(3));
        assert_eq!(RawName::from("12").as_index(), Some(12));
        assert_eq!(RawName::from("012").as_index(), None);
        assert_eq!(RawName::from("length").as_index(), None);
    }

    #[test]
    fn test_mirror_deserialize() {
        let json = r#"{"type":"string","text":"abc","fullLength":10}"#;
        let mirror: ValueMirror = serde_json::from_str(json).unwrap();
        assert_eq!(mirror.value_type(), &ValueType::String);
        assert_eq!(mirror.handle(), None);
        assert!(mirror.is_truncated());

        let json = r#"{"type":"symbol","handle":4,"className":"Symbol"}"#;
        let mirror: ValueMirror = serde_json::from_str(json).unwrap();
        assert_eq!(mirror.value_type(), &ValueType::Other("symbol".to_string()));
        assert_eq!(mirror.handle(), Some(4));
        assert_eq!(mirror.class_name(), Some("Symbol"));
        assert_eq!(mirror.text(), "");
        assert!(!mirror.is_truncated());
    }

    #[test]
    fn test_property_mirror_deserialize() {
        let json = r#"{
            "properties": [
                {"name": "a", "value": {"type": "number", "text": "1"}},
                {"name": 0, "value": {"type": "null", "text": "null"}, "enumerable": false}
            ]
        }"#;
        let data: SubpropertiesMirror = serde_json::from_str(json).unwrap();
        assert_eq!(data.properties.len(), 2);
        assert!(data.internal_properties.is_empty());
        assert_eq!(data.properties[0].name, RawName::from("a"));
        assert_eq!(data.properties[1].name, RawName::Index(0));
        assert_eq!(data.properties[1].enumerable, Some(false));
        assert_eq!(data.properties[1].writable, None);
    }
}
