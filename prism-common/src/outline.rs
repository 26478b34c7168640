//! Outline CSV reader
//!
//! The outline is the authored list of fields a profile is expected to carry:
//! `category,field_name,field_type,description,example`. A row whose category
//! equals its field name describes a top-level field. The outline only feeds
//! coverage reconciliation; it is never written.

use crate::coverage::{FieldGroup, TrackedFields};
use crate::record::FieldPath;
use crate::{Error, Result};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Group name given to top-level outline fields
pub const TOP_LEVEL_GROUP: &str = "Top Level";

#[derive(Debug, Deserialize)]
struct OutlineRow {
    category: String,
    field_name: String,
    #[serde(default)]
    field_type: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    example: String,
}

/// One outline field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineField {
    pub category: String,
    pub path: FieldPath,
    pub field_type: String,
    pub description: String,
    pub example: String,
}

impl OutlineField {
    pub fn is_top_level(&self) -> bool {
        self.path.depth() == 1
    }
}

/// Parsed outline, rows in file order
#[derive(Debug, Clone, Default)]
pub struct Outline {
    fields: Vec<OutlineField>,
}

impl Outline {
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::NotFound(format!("outline {}", path.display())));
        }
        let file = std::fs::File::open(path)?;
        let outline = Self::from_reader(file)?;
        debug!("Read {} outline fields from {}", outline.len(), path.display());
        Ok(outline)
    }

    /// Parse outline CSV with a header row
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut fields = Vec::new();
        for (index, row) in csv_reader.deserialize::<OutlineRow>().enumerate() {
            let row = row?;
            let raw_path = if row.category == row.field_name {
                row.field_name.clone()
            } else {
                format!("{}.{}", row.category, row.field_name)
            };
            let path = FieldPath::parse(&raw_path).map_err(|e| {
                // header is line 1
                Error::InvalidInput(format!("outline line {}: {}", index + 2, e))
            })?;
            fields.push(OutlineField {
                category: row.category,
                path,
                field_type: row.field_type,
                description: row.description,
                example: row.example,
            });
        }
        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[OutlineField] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Tracked groups: one per category in first-seen order, top-level fields together
    pub fn tracked_fields(&self) -> TrackedFields {
        let mut groups: Vec<FieldGroup> = Vec::new();
        for field in &self.fields {
            let name = if field.is_top_level() {
                TOP_LEVEL_GROUP
            } else {
                field.category.as_str()
            };
            match groups.iter_mut().find(|group| group.name == name) {
                Some(group) => {
                    if !group.fields.contains(&field.path) {
                        group.fields.push(field.path.clone());
                    }
                }
                None => groups.push(FieldGroup::new(name, vec![field.path.clone()])),
            }
        }
        TrackedFields::new(groups)
    }
}
