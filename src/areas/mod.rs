//! Section-name directory
//!
//! Maps section codes to their display names, loaded from an area list shaped
//! `[{"city": ..., "section": [{"name": ..., "code": ...}]}]`. The directory is
//! built once and passed in where it is needed.

use crate::output::{OutputError, OutputResult};
use crate::record::Record;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// One section of a city
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Section {
    pub name: String,
    pub code: String,
}

/// A city and its sections
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Area {
    pub city: String,

    #[serde(rename = "section")]
    pub sections: Vec<Section>,
}

/// Immutable code-to-name lookup
#[derive(Debug, Clone, Default)]
pub struct SectionDirectory {
    areas: Vec<Area>,
    names: HashMap<String, String>,
}

impl SectionDirectory {
    /// Builds the lookup from a list of areas
    ///
    /// When a code is listed twice, the first entry wins.
    pub fn from_areas(areas: Vec<Area>) -> Self {
        let mut names = HashMap::new();
        for section in areas.iter().flat_map(|area| &area.sections) {
            names
                .entry(section.code.clone())
                .or_insert_with(|| section.name.clone());
        }

        Self { areas, names }
    }

    pub fn from_json(json: &str) -> OutputResult<Self> {
        let areas: Vec<Area> = serde_json::from_str(json)?;
        Ok(Self::from_areas(areas))
    }

    /// Loads an area list file
    pub fn load(path: &Path) -> OutputResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            OutputError::Lookup(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    /// Display name for a section code
    pub fn name(&self, code: &str) -> Option<&str> {
        self.names.get(code).map(String::as_str)
    }

    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Replaces each record's section code with its name
    ///
    /// Codes missing from the directory are left as they are.
    pub fn replace_sections(&self, records: &mut [Record]) {
        for record in records.iter_mut() {
            match self.name(&record.section) {
                Some(name) => record.section = name.to_string(),
                None => tracing::debug!("No name for section code {:?}", record.section),
            }
        }
    }
}
