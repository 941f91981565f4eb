//! Mapping from CDM data-type tags and data formats to canonical scalar kinds.

use cdmgen_corpus::{DataFormat, TypedAttribute};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical scalar kinds every backend knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarType {
    /// Arbitrary-precision integer.
    BigInteger,
    Boolean,
    DateTime,
    DateTimeOffset,
    Decimal,
    /// Floating point.
    Double,
    /// UUID-like identifier.
    Guid,
    Int16,
    Int32,
    Int64,
    /// Homogeneous list.
    List,
    String,
    /// Opaque/untyped.
    Object,
}

impl ScalarType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BigInteger => "big_integer",
            Self::Boolean => "boolean",
            Self::DateTime => "date_time",
            Self::DateTimeOffset => "date_time_offset",
            Self::Decimal => "decimal",
            Self::Double => "double",
            Self::Guid => "guid",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::List => "list",
            Self::String => "string",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a lower-cased data-type tag, or `None` if the tag is not in the table.
pub fn lookup_tag(tag: &str) -> Option<ScalarType> {
    let ty = match tag {
        // Identifiers
        "guid" | "uuid" | "entityid" | "userid" | "uniqueidentifier" | "identifier" => {
            ScalarType::Guid
        }

        // Integers
        "int16" | "smallinteger" | "tinyinteger" | "byte" => ScalarType::Int16,
        "int32" | "integer" | "int" | "listlookup" | "year" | "month" | "week" | "day"
        | "dayofmonth" | "dayofweek" | "dayofyear" | "age" | "duration" | "versionnumber" => {
            ScalarType::Int32
        }
        "int64" | "biginteger" | "long" | "timestamp" => ScalarType::Int64,
        "bignumber" | "largeinteger" | "unboundedinteger" => ScalarType::BigInteger,

        // Fractional
        "decimal" | "currency" | "basecurrency" | "money" | "latitude" | "longitude"
        | "percentage" | "exchangerate" | "numeric" => ScalarType::Decimal,
        "double" | "float" | "real" | "measurement" => ScalarType::Double,

        "boolean" | "bool" | "twooptions" | "yesno" => ScalarType::Boolean,

        // Temporal
        "date" | "datetime" | "time" | "birthdate" | "timeofday" => ScalarType::DateTime,
        "datetimeoffset" => ScalarType::DateTimeOffset,

        // Text
        "string" | "char" | "text" | "paragraph" | "name" | "fullname" | "firstname"
        | "lastname" | "middlename" | "nickname" | "email" | "phone" | "phonecell"
        | "phonefax" | "url" | "uri" | "postalcode" | "zipcode" | "city" | "county"
        | "country" | "countryorregion" | "stateorprovince" | "address" | "addressline"
        | "entityname" | "attributename" | "localizeddisplaytext" | "languagetag"
        | "colorname" | "tickersymbol" => ScalarType::String,

        "list" | "array" | "listlookupmultiple" | "multiselectpicklist" => ScalarType::List,
        "json" | "binary" | "image" | "object" | "any" => ScalarType::Object,

        _ => return None,
    };
    Some(ty)
}

/// Map a data-type tag, falling back to `fallback` for unrecognized tags.
pub fn map_tag(tag: &str, fallback: ScalarType) -> ScalarType {
    lookup_tag(&tag.to_ascii_lowercase()).unwrap_or(fallback)
}

/// Map a data format. `Unknown` has no mapping.
pub fn map_format(format: DataFormat) -> Option<ScalarType> {
    let ty = match format {
        DataFormat::Int16 | DataFormat::Byte => ScalarType::Int16,
        DataFormat::Int32 => ScalarType::Int32,
        DataFormat::Int64 => ScalarType::Int64,
        DataFormat::Float | DataFormat::Double => ScalarType::Double,
        DataFormat::Decimal => ScalarType::Decimal,
        DataFormat::Guid => ScalarType::Guid,
        DataFormat::String | DataFormat::Char => ScalarType::String,
        DataFormat::Binary => ScalarType::List,
        DataFormat::Time | DataFormat::Date | DataFormat::DateTime => ScalarType::DateTime,
        DataFormat::DateTimeOffset => ScalarType::DateTimeOffset,
        DataFormat::Boolean => ScalarType::Boolean,
        DataFormat::Json => ScalarType::Object,
        DataFormat::Unknown => return None,
    };
    Some(ty)
}

/// Scalar type of an attribute.
///
/// A present tag always maps (permissively, via `fallback`). Without a tag
/// the data format decides, and `None` means the attribute has no usable
/// type at all.
pub fn resolve_scalar(attribute: &TypedAttribute, fallback: ScalarType) -> Option<ScalarType> {
    match &attribute.data_type {
        Some(tag) => Some(map_tag(tag, fallback)),
        None => attribute.data_format.and_then(map_format),
    }
}
