//! C# class generation.

use crate::ir::{Declaration, PropertyType};
use crate::sanitize::escape_xml;
use crate::traits::Backend;
use crate::types::ScalarType;
use std::fmt::Write;

/// Static instance of the C# backend for registry.
pub static CSHARP_BACKEND: CSharpBackend = CSharpBackend;

/// C# plain-class backend.
pub struct CSharpBackend;

impl Backend for CSharpBackend {
    fn name(&self) -> &'static str {
        "csharp"
    }

    fn language(&self) -> &'static str {
        "csharp"
    }

    fn extension(&self) -> &'static str {
        "cs"
    }

    fn generate(&self, declaration: &Declaration) -> String {
        generate_csharp(declaration)
    }
}

const INDENT: &str = "    ";

/// C# spelling of a property type.
pub fn csharp_type(ty: &PropertyType) -> String {
    match ty {
        PropertyType::Scalar(scalar) => scalar_type(*scalar).to_string(),
        PropertyType::Entity(name) => name.clone(),
        PropertyType::UnknownEntity => "UnknownEntity".to_string(),
    }
}

fn scalar_type(scalar: ScalarType) -> &'static str {
    match scalar {
        ScalarType::Int16 => "short",
        ScalarType::Int32 => "int",
        ScalarType::Int64 => "long",
        ScalarType::BigInteger => "System.Numerics.BigInteger",
        ScalarType::Boolean => "bool",
        ScalarType::DateTime => "DateTime",
        ScalarType::DateTimeOffset => "DateTimeOffset",
        ScalarType::Decimal => "decimal",
        ScalarType::Double => "double",
        ScalarType::Guid => "Guid",
        ScalarType::List => "List<object>",
        ScalarType::String => "string",
        ScalarType::Object => "object",
    }
}

/// Generate a compilation unit holding one public class.
pub fn generate_csharp(declaration: &Declaration) -> String {
    let mut out = String::new();
    out.push_str("using System;\n");
    out.push_str("using System.Collections.Generic;\n\n");

    let depth = if declaration.namespace.is_empty() {
        0
    } else {
        writeln!(out, "namespace {}", declaration.namespace).unwrap();
        out.push_str("{\n");
        1
    };

    write_summary(&mut out, depth, &declaration.docs);
    writeln!(out, "{}public class {}", INDENT.repeat(depth), declaration.name).unwrap();
    writeln!(out, "{}{{", INDENT.repeat(depth)).unwrap();

    for (i, property) in declaration.properties.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        write_summary(&mut out, depth + 1, &property.docs);
        writeln!(
            out,
            "{}public {} {} {{ get; set; }}",
            INDENT.repeat(depth + 1),
            csharp_type(&property.ty),
            property.name
        )
        .unwrap();
    }

    writeln!(out, "{}}}", INDENT.repeat(depth)).unwrap();
    if depth > 0 {
        out.push_str("}\n");
    }
    out
}

fn write_summary(out: &mut String, depth: usize, docs: &str) {
    if docs.trim().is_empty() {
        return;
    }
    let indent = INDENT.repeat(depth);
    writeln!(out, "{indent}/// <summary>").unwrap();
    for line in docs.lines() {
        writeln!(out, "{indent}/// {}", escape_xml(line.trim_end())).unwrap();
    }
    writeln!(out, "{indent}/// </summary>").unwrap();
}
