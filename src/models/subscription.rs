use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::subscription::Subscription as DomainSubscription;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::subscriptions)]
pub struct Subscription {
    pub id: i32,
    pub user_id: i32,
    pub subscribing_id: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::subscriptions)]
pub struct NewSubscription {
    pub user_id: i32,
    pub subscribing_id: i32,
}

impl From<Subscription> for DomainSubscription {
    fn from(value: Subscription) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            subscribing_id: value.subscribing_id,
            created_at: value.created_at,
        }
    }
}
