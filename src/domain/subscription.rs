use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Directed follow edge from `user_id` to `subscribing_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subscription {
    pub id: i32,
    /// The follower.
    pub user_id: i32,
    /// The followed author.
    pub subscribing_id: i32,
    pub created_at: NaiveDateTime,
}
