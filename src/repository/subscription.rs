use diesel::dsl::exists;
use diesel::prelude::*;
use diesel::select;
use pushkind_common::pagination::Pagination;

use crate::{
    domain::{subscription::Subscription as DomainSubscription, user::User as DomainUser},
    models::{
        subscription::{NewSubscription as DbNewSubscription, Subscription as DbSubscription},
        user::User as DbUser,
    },
    repository::{
        DieselRepository, RepositoryError, RepositoryResult, SubscriptionReader,
        SubscriptionWriter, offset_and_limit,
    },
};

impl SubscriptionReader for DieselRepository {
    fn is_subscribed(&self, user_id: i32, author_id: i32) -> RepositoryResult<bool> {
        use crate::schema::subscriptions;

        let mut conn = self.conn()?;

        let found = select(exists(
            subscriptions::table
                .filter(subscriptions::user_id.eq(user_id))
                .filter(subscriptions::subscribing_id.eq(author_id)),
        ))
        .get_result::<bool>(&mut conn)?;

        Ok(found)
    }

    fn list_subscribed_ids(&self, user_id: i32, author_ids: &[i32]) -> RepositoryResult<Vec<i32>> {
        use crate::schema::subscriptions;

        if author_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.conn()?;

        let ids = subscriptions::table
            .filter(subscriptions::user_id.eq(user_id))
            .filter(subscriptions::subscribing_id.eq_any(author_ids))
            .select(subscriptions::subscribing_id)
            .load::<i32>(&mut conn)?;

        Ok(ids)
    }

    fn list_subscribed_authors(
        &self,
        user_id: i32,
        pagination: Option<Pagination>,
    ) -> RepositoryResult<(usize, Vec<DomainUser>)> {
        use crate::schema::{subscriptions, users};

        let mut conn = self.conn()?;

        let total = subscriptions::table
            .filter(subscriptions::user_id.eq(user_id))
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let mut ids_query = subscriptions::table
            .filter(subscriptions::user_id.eq(user_id))
            .order(subscriptions::id.asc())
            .select(subscriptions::subscribing_id)
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(pagination) = &pagination {
            let (offset, limit) = offset_and_limit(pagination);
            ids_query = ids_query.offset(offset).limit(limit);
        }

        let author_ids = ids_query.load::<i32>(&mut conn)?;

        if author_ids.is_empty() {
            return Ok((total, Vec::new()));
        }

        let db_users = users::table
            .filter(users::id.eq_any(author_ids.as_slice()))
            .load::<DbUser>(&mut conn)?;

        // Restore follow order, which the `IN` lookup does not preserve.
        let mut authors: Vec<DomainUser> = Vec::with_capacity(author_ids.len());
        for author_id in &author_ids {
            if let Some(user) = db_users.iter().find(|user| user.id == *author_id) {
                authors.push(user.clone().into());
            }
        }

        Ok((total, authors))
    }
}

impl SubscriptionWriter for DieselRepository {
    fn create_subscription(
        &self,
        user_id: i32,
        author_id: i32,
    ) -> RepositoryResult<DomainSubscription> {
        use crate::schema::subscriptions;

        let mut conn = self.conn()?;

        let created = diesel::insert_into(subscriptions::table)
            .values(&DbNewSubscription {
                user_id,
                subscribing_id: author_id,
            })
            .get_result::<DbSubscription>(&mut conn)?;

        Ok(created.into())
    }

    fn delete_subscription(&self, user_id: i32, author_id: i32) -> RepositoryResult<()> {
        use crate::schema::subscriptions;

        let mut conn = self.conn()?;

        let deleted = diesel::delete(
            subscriptions::table
                .filter(subscriptions::user_id.eq(user_id))
                .filter(subscriptions::subscribing_id.eq(author_id)),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
