use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::reviews::{InsertReviewEntity, ReviewEntity},
        repositories::reviews::ReviewRepository,
    },
    infrastructure::postgres::{postgres_connection::PgPool, schema::reviews},
};

pub struct ReviewPostgres {
    db_pool: Arc<PgPool>,
}

impl ReviewPostgres {
    pub fn new(db_pool: Arc<PgPool>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ReviewRepository for ReviewPostgres {
    async fn create(&self, insert_review_entity: InsertReviewEntity) -> Result<ReviewEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(reviews::table)
            .values(&insert_review_entity)
            .returning(ReviewEntity::as_returning())
            .get_result::<ReviewEntity>(&mut conn)?;

        Ok(result)
    }

    async fn find_by_id(&self, review_id: Uuid) -> Result<Option<ReviewEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = reviews::table
            .filter(reviews::id.eq(review_id))
            .select(ReviewEntity::as_select())
            .first::<ReviewEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn find_by_author_for_mechanic(
        &self,
        user_id: Uuid,
        mechanic_id: Uuid,
    ) -> Result<Option<ReviewEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = reviews::table
            .filter(reviews::user_id.eq(user_id))
            .filter(reviews::mechanic_id.eq(mechanic_id))
            .select(ReviewEntity::as_select())
            .first::<ReviewEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn restore(
        &self,
        review_id: Uuid,
        rating: f64,
        comment: Option<String>,
    ) -> Result<ReviewEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = update(reviews::table.filter(reviews::id.eq(review_id)))
            .set((
                reviews::rating.eq(rating),
                reviews::comment.eq(comment),
                reviews::deleted_at.eq(None::<DateTime<Utc>>),
                reviews::updated_at.eq(Utc::now()),
            ))
            .returning(ReviewEntity::as_returning())
            .get_result::<ReviewEntity>(&mut conn)?;

        Ok(result)
    }

    async fn update_content(
        &self,
        review_id: Uuid,
        rating: Option<f64>,
        comment: Option<String>,
    ) -> Result<ReviewEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = update(reviews::table.filter(reviews::id.eq(review_id)))
            .set((
                rating.map(|value| reviews::rating.eq(value)),
                comment.map(|value| reviews::comment.eq(value)),
                reviews::updated_at.eq(Utc::now()),
            ))
            .returning(ReviewEntity::as_returning())
            .get_result::<ReviewEntity>(&mut conn)?;

        Ok(result)
    }

    async fn soft_delete(&self, review_id: Uuid) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(reviews::table.filter(reviews::id.eq(review_id)))
            .set((
                reviews::deleted_at.eq(Some(Utc::now())),
                reviews::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(())
    }

    async fn list_live_ratings(&self, mechanic_id: Uuid) -> Result<Vec<f64>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = reviews::table
            .filter(reviews::mechanic_id.eq(mechanic_id))
            .filter(reviews::deleted_at.is_null())
            .select(reviews::rating)
            .load::<f64>(&mut conn)?;

        Ok(results)
    }
}
