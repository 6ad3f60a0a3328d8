use serde::{Deserialize, Serialize};

use crate::tagger::{auto_tag, merge_tags};

/// One user's project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub description: String,
    #[serde(default)]
    pub updates: Vec<String>,
    /// Older files have no tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ProjectRecord {
    /// Fresh record with tags derived from the description.
    pub fn new(description: impl Into<String>) -> Self {
        let description = description.into();
        let tags = auto_tag(&description);
        Self {
            description,
            updates: Vec::new(),
            tags,
        }
    }

    /// Append an update and fold its tags in.
    pub fn push_update(&mut self, text: impl Into<String>) {
        let text = text.into();
        merge_tags(&mut self.tags, auto_tag(&text));
        self.updates.push(text);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_missing_tags_field() {
        let record: ProjectRecord =
            serde_json::from_str(r#"{"description": "old", "updates": ["a"]}"#).unwrap();
        assert!(record.tags.is_empty());
        assert_eq!(record.updates, vec!["a"]);
    }

    #[test]
    fn test_push_update() {
        let mut record = ProjectRecord::new("Build a dashboard");
        record.push_update("Added SQL support");
        assert_eq!(record.tags, vec!["#DataViz", "#Data"]);
        assert_eq!(record.updates, vec!["Added SQL support"]);
    }
}
