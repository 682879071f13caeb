//! In-memory plan for one generated entity class.

use std::fmt;

use serde::Serialize;

use crate::dump::{ColumnDescriptor, TableSchema};
use crate::naming::pascal_case;
use crate::types::SemanticType;

/// Annotation attached to a generated property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Column(String),
    Key,
    MaxLength(u32),
    Precision { precision: u32, scale: u32 },
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Column(name) => write!(f, "[Column(\"{name}\")]"),
            Self::Key => f.write_str("[Key]"),
            Self::MaxLength(length) => write!(f, "[MaxLength({length})]"),
            Self::Precision { precision, scale } => write!(f, "[Precision({precision}, {scale})]"),
        }
    }
}

/// How a property holds its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Representation {
    /// Nullable column: the property may be absent.
    Optional,
    /// Non-nullable string or byte column: initialized to an empty value.
    DefaultEmpty,
    /// Non-nullable value column: required, no initializer.
    Required,
}

impl Representation {
    #[must_use]
    pub const fn for_column(semantic: SemanticType, nullable: bool) -> Self {
        if nullable {
            return Self::Optional;
        }
        match semantic {
            SemanticType::String { .. } | SemanticType::Bytes => Self::DefaultEmpty,
            _ => Self::Required,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertySpec {
    /// PascalCase property name.
    pub name: String,
    pub column: String,
    pub raw_type: String,
    pub semantic: SemanticType,
    pub nullable: bool,
    pub representation: Representation,
    pub attributes: Vec<Attribute>,
}

impl PropertySpec {
    fn from_column(column: &ColumnDescriptor, is_key: bool) -> Self {
        let mut attributes = vec![Attribute::Column(column.name.clone())];
        if is_key {
            attributes.push(Attribute::Key);
        }
        match column.semantic {
            SemanticType::String {
                max_length: Some(length),
            } => attributes.push(Attribute::MaxLength(length)),
            SemanticType::Decimal {
                precision: Some(precision),
                scale: Some(scale),
            } => attributes.push(Attribute::Precision { precision, scale }),
            _ => {}
        }

        Self {
            name: pascal_case(&column.name),
            column: column.name.clone(),
            raw_type: column.raw_type.clone(),
            semantic: column.semantic,
            nullable: column.nullable,
            representation: Representation::for_column(column.semantic, column.nullable),
            attributes,
        }
    }

    #[must_use]
    pub fn is_key(&self) -> bool {
        self.attributes.contains(&Attribute::Key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityDescriptor {
    pub table: String,
    pub class_name: String,
    /// Properties in column declaration order.
    pub properties: Vec<PropertySpec>,
}

impl EntityDescriptor {
    /// Plan the entity for an extracted table.
    ///
    /// Only a single-column primary key marks its property as `Key`.
    #[must_use]
    pub fn build(schema: &TableSchema) -> Self {
        let key = schema.single_key();
        let properties = schema
            .columns
            .iter()
            .map(|column| PropertySpec::from_column(column, key == Some(column.name.as_str())))
            .collect();

        Self {
            table: schema.name.clone(),
            class_name: pascal_case(&schema.name),
            properties,
        }
    }

    /// Whether any property maps to a fixed-point decimal.
    #[must_use]
    pub fn uses_decimal(&self) -> bool {
        self.properties
            .iter()
            .any(|property| property.semantic.is_decimal())
    }

    /// `<ClassName>.cs`
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.cs", self.class_name)
    }
}
