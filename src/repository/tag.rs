use diesel::prelude::*;

use crate::domain::tag::{NewTag as DomainNewTag, Tag as DomainTag};
use crate::models::tag::{NewTag as DbNewTag, Tag as DbTag};
use crate::repository::{DieselRepository, RepositoryResult, TagReader, TagWriter};

impl TagReader for DieselRepository {
    fn get_tag_by_id(&self, id: i32) -> RepositoryResult<Option<DomainTag>> {
        use crate::schema::tags;

        let mut conn = self.conn()?;
        let tag = tags::table
            .filter(tags::id.eq(id))
            .first::<DbTag>(&mut conn)
            .optional()?;

        Ok(tag.map(Into::into))
    }

    fn get_tags_by_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<DomainTag>> {
        use crate::schema::tags;

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.conn()?;
        let db_tags = tags::table
            .filter(tags::id.eq_any(ids))
            .order(tags::id.asc())
            .load::<DbTag>(&mut conn)?;

        Ok(db_tags.into_iter().map(Into::into).collect())
    }

    fn list_tags(&self) -> RepositoryResult<Vec<DomainTag>> {
        use crate::schema::tags;

        let mut conn = self.conn()?;
        let db_tags = tags::table.order(tags::id.asc()).load::<DbTag>(&mut conn)?;

        Ok(db_tags.into_iter().map(Into::into).collect())
    }
}

impl TagWriter for DieselRepository {
    fn create_tag(&self, new_tag: &DomainNewTag) -> RepositoryResult<DomainTag> {
        use crate::schema::tags;

        let mut conn = self.conn()?;
        let insertable = DbNewTag::from(new_tag);

        let created = diesel::insert_into(tags::table)
            .values(&insertable)
            .get_result::<DbTag>(&mut conn)?;

        Ok(created.into())
    }
}
