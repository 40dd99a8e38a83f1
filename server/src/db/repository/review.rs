//! Review Repository
//!
//! 商品上的均分和评论数是冗余字段，评论的增删改之后重新计算。

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Review, ReviewUpdate};

const REVIEW_TABLE: &str = "review";

#[derive(Clone)]
pub struct ReviewRepository {
    base: BaseRepository,
}

impl ReviewRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find the review a user left on an item, if any
    pub async fn find_by_user_and_item(
        &self,
        user: &RecordId,
        menu_item: &RecordId,
    ) -> RepoResult<Option<Review>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM review WHERE user = $user AND menu_item = $menu_item LIMIT 1")
            .bind(("user", user.to_string()))
            .bind(("menu_item", menu_item.to_string()))
            .await?;
        let reviews: Vec<Review> = result.take(0)?;
        Ok(reviews.into_iter().next())
    }

    /// Create a review
    ///
    /// # 错误
    ///
    /// - 同一用户重复评论同一商品返回 Duplicate
    /// - 星级不在 1-5 返回 Validation
    pub async fn create(
        &self,
        user: RecordId,
        user_name: String,
        menu_item: RecordId,
        rating: u8,
        comment: String,
        images: Vec<String>,
    ) -> RepoResult<Review> {
        if !(1..=5).contains(&rating) {
            return Err(RepoError::Validation("rating must be between 1 and 5".into()));
        }

        if self.find_by_user_and_item(&user, &menu_item).await?.is_some() {
            return Err(RepoError::Duplicate(
                "You have already reviewed this item".into(),
            ));
        }

        let review = Review {
            id: None,
            user,
            user_name,
            menu_item,
            rating,
            comment,
            images,
            helpful: Vec::new(),
            created_at: Utc::now(),
        };

        let created: Option<Review> =
            self.base.db().create(REVIEW_TABLE).content(review).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create review".to_string()))
    }

    /// Reviews for one menu item, newest first
    pub async fn find_for_item(&self, menu_item: &RecordId) -> RepoResult<Vec<Review>> {
        let reviews: Vec<Review> = self
            .base
            .db()
            .query("SELECT * FROM review WHERE menu_item = $menu_item ORDER BY created_at DESC")
            .bind(("menu_item", menu_item.to_string()))
            .await?
            .take(0)?;
        Ok(reviews)
    }

    /// Find review by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Review>> {
        let thing = parse_record_id(id)?;
        let review: Option<Review> = self.base.db().select(thing).await?;
        Ok(review)
    }

    /// Update rating, comment or images
    pub async fn update(&self, id: &str, data: ReviewUpdate) -> RepoResult<Review> {
        if let Some(rating) = data.rating
            && !(1..=5).contains(&rating)
        {
            return Err(RepoError::Validation("rating must be between 1 and 5".into()));
        }

        let thing = parse_record_id(id)?;
        let mut set_parts: Vec<&str> = Vec::new();
        if data.rating.is_some() { set_parts.push("rating = $rating"); }
        if data.comment.is_some() { set_parts.push("comment = $comment"); }
        if data.images.is_some() { set_parts.push("images = $images"); }

        if set_parts.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Review {} not found", id)));
        }

        let query_str = format!("UPDATE $thing SET {} RETURN AFTER", set_parts.join(", "));
        let mut query = self.base.db().query(query_str).bind(("thing", thing));
        if let Some(v) = data.rating { query = query.bind(("rating", v)); }
        if let Some(v) = data.comment { query = query.bind(("comment", v)); }
        if let Some(v) = data.images { query = query.bind(("images", v)); }

        let mut result = query.await?;
        let reviews: Vec<Review> = result.take(0)?;
        reviews
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Review {} not found", id)))
    }

    /// Hard delete a review
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let thing = parse_record_id(id)?;
        let deleted: Option<Review> = self.base.db().delete(thing).await?;
        if deleted.is_none() {
            return Err(RepoError::NotFound(format!("Review {} not found", id)));
        }
        Ok(())
    }

    /// Recompute the denormalized average rating on the menu item
    ///
    /// Returns (average, count). 没有评论时均分归零。
    pub async fn recompute_rating(&self, menu_item: &RecordId) -> RepoResult<(f64, i64)> {
        let mut result = self
            .base
            .db()
            .query("SELECT VALUE rating FROM review WHERE menu_item = $menu_item")
            .bind(("menu_item", menu_item.to_string()))
            .await?;
        let ratings: Vec<i64> = result.take(0)?;

        let count = ratings.len() as i64;
        let avg = if count == 0 {
            0.0
        } else {
            let sum: Decimal = ratings.iter().map(|r| Decimal::from(*r)).sum();
            (sum / Decimal::from(count))
                .round_dp(2)
                .to_f64()
                .unwrap_or(0.0)
        };

        self.base
            .db()
            .query("UPDATE $thing SET rating = $rating, review_count = $count")
            .bind(("thing", menu_item.clone()))
            .bind(("rating", avg))
            .bind(("count", count))
            .await?;

        Ok((avg, count))
    }

    /// Toggle a helpful mark, returning the new count
    pub async fn toggle_helpful(&self, id: &str, user: &RecordId) -> RepoResult<usize> {
        let review = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Review {} not found", id)))?;

        let mut helpful = review.helpful;
        if let Some(pos) = helpful.iter().position(|u| u == user) {
            helpful.remove(pos);
        } else {
            helpful.push(user.clone());
        }
        let count = helpful.len();

        let thing = parse_record_id(id)?;
        let helpful: Vec<String> = helpful.iter().map(|u| u.to_string()).collect();
        self.base
            .db()
            .query("UPDATE $thing SET helpful = $helpful")
            .bind(("thing", thing))
            .bind(("helpful", helpful))
            .await?;

        Ok(count)
    }
}
