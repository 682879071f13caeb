//! C# Entity Framework rendering of an [`EntityDescriptor`].

use crate::entity::{EntityDescriptor, PropertySpec, Representation};
use crate::types::SemanticType;

const HEADER: &str = "\
// <auto-generated>
//     Generated by `yas models generate` from the SQL schema dump.
//     Changes to this file will be lost when the code is regenerated.
// </auto-generated>";

const BASE_USINGS: [&str; 3] = [
    "System",
    "System.ComponentModel.DataAnnotations",
    "System.ComponentModel.DataAnnotations.Schema",
];

/// Required by `[Precision]`.
const DECIMAL_USING: &str = "Microsoft.EntityFrameworkCore";

/// Render the complete source file for `entity`.
#[must_use]
pub fn render_csharp(entity: &EntityDescriptor, namespace: &str) -> String {
    let mut usings: Vec<&str> = BASE_USINGS.to_vec();
    if entity.uses_decimal() {
        usings.push(DECIMAL_USING);
    }
    usings.sort_unstable();

    let mut lines = vec![HEADER.to_string()];
    lines.extend(usings.iter().map(|using| format!("using {using};")));
    lines.push(String::new());
    lines.push(format!("namespace {namespace}"));
    lines.push("{".to_string());
    lines.push("    /// <summary>".to_string());
    lines.push(format!(
        "    /// Entity mapping for the `{}` table.",
        entity.table
    ));
    lines.push("    /// </summary>".to_string());
    lines.push(format!("    [Table(\"{}\")]", entity.table));
    lines.push(format!("    public class {}", entity.class_name));
    lines.push("    {".to_string());

    for property in &entity.properties {
        lines.extend(render_property(property));
        lines.push(String::new());
    }

    lines.push("    }".to_string());
    lines.push("}".to_string());

    let mut source = lines.join("\n");
    source.push('\n');
    source
}

fn render_property(property: &PropertySpec) -> Vec<String> {
    let mut lines = vec![
        "        /// <summary>".to_string(),
        format!(
            "        /// Column `{}` ({}).",
            property.column, property.raw_type
        ),
        "        /// </summary>".to_string(),
    ];
    lines.extend(
        property
            .attributes
            .iter()
            .map(|attribute| format!("        {attribute}")),
    );

    let base = property.semantic.csharp_type();
    let (property_type, initializer) = match property.representation {
        Representation::Optional => (format!("{base}?"), ""),
        Representation::DefaultEmpty => (base.to_string(), empty_initializer(property.semantic)),
        Representation::Required => (base.to_string(), ""),
    };
    lines.push(format!(
        "        public {property_type} {} {{ get; set; }}{initializer}",
        property.name
    ));
    lines
}

const fn empty_initializer(semantic: SemanticType) -> &'static str {
    match semantic {
        SemanticType::Bytes => " = Array.Empty<byte>();",
        _ => " = string.Empty;",
    }
}
