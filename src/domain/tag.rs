use serde::{Deserialize, Serialize};

/// Domain representation of a tag that recipes can be labelled with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    /// Unique identifier of the tag.
    pub id: i32,
    /// Human-readable, unique name of the tag.
    pub name: String,
    /// Unique URL-safe slug used for filtering.
    pub slug: String,
}

/// Payload required to insert a new tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTag {
    /// Human-readable name of the tag.
    pub name: String,
    /// URL-safe slug of the tag.
    pub slug: String,
}

impl NewTag {
    /// Construct a new tag payload with a trimmed name and lowercase slug.
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        let name = name.into().trim().to_string();
        let slug = slug.into().trim().to_lowercase();
        Self { name, slug }
    }
}
