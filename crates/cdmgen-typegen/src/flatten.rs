//! Attribute flattening.

use cdmgen_corpus::{Attribute, Entity, TypedAttribute};

/// Doc string used when neither a description nor a display name exists.
pub const NO_DESCRIPTION: &str = "No description available.";

/// Expand an entity's attributes into its leaf typed attributes.
///
/// Group references are replaced in place by the group's typed members.
/// Only one level is expanded: a group nested inside a group is dropped.
pub fn flatten(entity: &Entity) -> Vec<&TypedAttribute> {
    let mut out = Vec::with_capacity(entity.attributes.len());
    for attribute in &entity.attributes {
        match attribute {
            Attribute::Typed(typed) => out.push(typed),
            Attribute::Group(reference) => {
                for member in &reference.group.members {
                    match member {
                        Attribute::Typed(typed) => out.push(typed),
                        Attribute::Group(nested) => {
                            tracing::debug!(
                                entity = %entity.name,
                                group = %reference.group.name,
                                nested = %nested.group.name,
                                "not expanding nested attribute group"
                            );
                        }
                    }
                }
            }
        }
    }
    out
}

/// Description, else display name, else [`NO_DESCRIPTION`].
pub fn docs_for(description: Option<&str>, display_name: Option<&str>) -> String {
    description
        .filter(|d| !d.trim().is_empty())
        .or(display_name.filter(|d| !d.trim().is_empty()))
        .unwrap_or(NO_DESCRIPTION)
        .to_string()
}
