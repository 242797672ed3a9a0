//! Packaging of the three encoded buffers under their canonical roles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The role a buffer plays in the shapefile triple.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FileRole {
    Shape,
    Index,
    Table,
}

impl FileRole {
    /// Roles in the order they are conventionally listed.
    pub const ALL: [FileRole; 3] = [FileRole::Shape, FileRole::Index, FileRole::Table];

    /// The file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Shape => "shp",
            Self::Index => "shx",
            Self::Table => "dbf",
        }
    }
}

impl fmt::Display for FileRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = match self {
            Self::Shape => "shape",
            Self::Index => "index",
            Self::Table => "table",
        };
        f.write_str(key)
    }
}

/// The immutable output of one encode pass.
///
/// The bytes are handed over exactly as the encoders produced them; persisting
/// or archiving them is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputBundle {
    shape: Vec<u8>,
    index: Vec<u8>,
    table: Vec<u8>,
}

impl OutputBundle {
    pub fn new(shape: Vec<u8>, index: Vec<u8>, table: Vec<u8>) -> Self {
        Self { shape, index, table }
    }

    pub fn get(&self, role: FileRole) -> &[u8] {
        match role {
            FileRole::Shape => &self.shape,
            FileRole::Index => &self.index,
            FileRole::Table => &self.table,
        }
    }

    pub fn shape(&self) -> &[u8] {
        &self.shape
    }

    pub fn index(&self) -> &[u8] {
        &self.index
    }

    pub fn table(&self) -> &[u8] {
        &self.table
    }

    /// Yields `(role, bytes)` in shp, shx, dbf order.
    pub fn iter(&self) -> impl Iterator<Item = (FileRole, &[u8])> {
        FileRole::ALL.into_iter().map(move |role| (role, self.get(role)))
    }

    /// Suggested file name for `role` given a caller-chosen base name.
    pub fn file_name(base: &str, role: FileRole) -> String {
        format!("{}.{}", base, role.extension())
    }

    pub fn total_len(&self) -> usize {
        self.shape.len() + self.index.len() + self.table.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles_and_names() {
        let bundle = OutputBundle::new(vec![1], vec![2, 2], vec![3, 3, 3]);
        let roles: Vec<(String, usize)> = bundle
            .iter()
            .map(|(role, bytes)| (OutputBundle::file_name("roads", role), bytes.len()))
            .collect();
        assert_eq!(
            roles,
            vec![
                ("roads.shp".to_string(), 1),
                ("roads.shx".to_string(), 2),
                ("roads.dbf".to_string(), 3),
            ]
        );
        assert_eq!(bundle.total_len(), 6);
        assert_eq!(FileRole::Index.to_string(), "index");
    }
}
