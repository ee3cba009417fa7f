use std::fmt;

use serde::{Deserialize, Serialize};

/// Which per-user recipe list a bookmark belongs to.
///
/// Favourites and shopping carts share the same lifecycle: a row is created
/// on "add", deleted on "remove" and never updated in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookmarkKind {
    Favorite,
    ShoppingCart,
}

impl fmt::Display for BookmarkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookmarkKind::Favorite => f.write_str("favorites"),
            BookmarkKind::ShoppingCart => f.write_str("shopping cart"),
        }
    }
}
