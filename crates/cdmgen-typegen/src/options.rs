//! Options steering a generation run.

use crate::types::ScalarType;
use serde::{Deserialize, Serialize};

/// Knobs for the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Prefixes tried, in order, when looking up a linked entity's document.
    /// The empty prefix searches from the corpus root.
    pub search_prefixes: Vec<String>,
    /// Folders under which a missing manifest is looked for before failing.
    pub manifest_fallbacks: Vec<String>,
    /// Type given to attributes whose data-type tag is not recognized.
    pub unknown_tag_fallback: ScalarType,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            search_prefixes: vec![
                String::new(),
                "core/applicationCommon/".to_string(),
                "core/applicationCommon/foundationCommon/crmCommon/".to_string(),
            ],
            manifest_fallbacks: vec!["core/applicationCommon".to_string()],
            unknown_tag_fallback: ScalarType::String,
        }
    }
}
