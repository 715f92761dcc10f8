//! Column type catalog handed to model modules.

use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    String,
    Char,
    Text,
    Integer,
    BigInt,
    SmallInt,
    Float,
    Real,
    Double,
    Decimal,
    Boolean,
    Date,
    DateOnly,
    Time,
    Uuid,
    Json,
    Jsonb,
    Blob,
    Inet,
    Array,
    Enum,
}

impl DataType {
    pub const ALL: [DataType; 21] = [
        DataType::String,
        DataType::Char,
        DataType::Text,
        DataType::Integer,
        DataType::BigInt,
        DataType::SmallInt,
        DataType::Float,
        DataType::Real,
        DataType::Double,
        DataType::Decimal,
        DataType::Boolean,
        DataType::Date,
        DataType::DateOnly,
        DataType::Time,
        DataType::Uuid,
        DataType::Json,
        DataType::Jsonb,
        DataType::Blob,
        DataType::Inet,
        DataType::Array,
        DataType::Enum,
    ];

    /// Catalog key, e.g. `BIGINT`
    pub fn key(self) -> &'static str {
        match self {
            DataType::String => "STRING",
            DataType::Char => "CHAR",
            DataType::Text => "TEXT",
            DataType::Integer => "INTEGER",
            DataType::BigInt => "BIGINT",
            DataType::SmallInt => "SMALLINT",
            DataType::Float => "FLOAT",
            DataType::Real => "REAL",
            DataType::Double => "DOUBLE",
            DataType::Decimal => "DECIMAL",
            DataType::Boolean => "BOOLEAN",
            DataType::Date => "DATE",
            DataType::DateOnly => "DATEONLY",
            DataType::Time => "TIME",
            DataType::Uuid => "UUID",
            DataType::Json => "JSON",
            DataType::Jsonb => "JSONB",
            DataType::Blob => "BLOB",
            DataType::Inet => "INET",
            DataType::Array => "ARRAY",
            DataType::Enum => "ENUM",
        }
    }

    /// Postgres column type the key maps to
    pub fn sql_type(self) -> &'static str {
        match self {
            DataType::String => "VARCHAR(255)",
            DataType::Char => "CHAR(255)",
            DataType::Text => "TEXT",
            DataType::Integer => "INTEGER",
            DataType::BigInt => "BIGINT",
            DataType::SmallInt => "SMALLINT",
            DataType::Float => "FLOAT",
            DataType::Real => "REAL",
            DataType::Double => "DOUBLE PRECISION",
            DataType::Decimal => "DECIMAL",
            DataType::Boolean => "BOOLEAN",
            DataType::Date => "TIMESTAMP WITH TIME ZONE",
            DataType::DateOnly => "DATE",
            DataType::Time => "TIME",
            DataType::Uuid => "UUID",
            DataType::Json => "JSON",
            DataType::Jsonb => "JSONB",
            DataType::Blob => "BYTEA",
            DataType::Inet => "INET",
            DataType::Array => "ARRAY",
            DataType::Enum => "ENUM",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DataType::ALL
            .into_iter()
            .find(|t| t.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown data type '{}'", s))
    }
}

/// The full catalog; serializes as `{ "STRING": "VARCHAR(255)", ... }`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DataTypes;

impl DataTypes {
    pub fn get(&self, key: &str) -> Option<DataType> {
        key.parse().ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = DataType> {
        DataType::ALL.into_iter()
    }
}

impl Serialize for DataTypes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(DataType::ALL.len()))?;
        for data_type in DataType::ALL {
            map.serialize_entry(data_type.key(), data_type.sql_type())?;
        }
        map.end()
    }
}
