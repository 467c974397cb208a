//! Collection identity.

use serde::{Deserialize, Serialize};

/// A named unit of work: one book, its chapters, and its cover image.
///
/// The name doubles as the directory name under every data root, so it is
/// the key linking text inputs, audio outputs, and video outputs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Collection {
    name: String,
}

impl Collection {
    /// Create a collection from its directory name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The collection name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
