//! Blog Repository

use chrono::Utc;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Blog, BlogCategory, BlogCreate, BlogUpdate, slugify};

const BLOG_TABLE: &str = "blog";

#[derive(Clone)]
pub struct BlogRepository {
    base: BaseRepository,
}

impl BlogRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Published posts, newest first, with optional category/tag/search filters
    pub async fn find_published(
        &self,
        category: Option<BlogCategory>,
        tag: Option<String>,
        search: Option<String>,
    ) -> RepoResult<Vec<Blog>> {
        let mut clauses = vec!["published = true"];
        if category.is_some() {
            clauses.push("category = $category");
        }
        if tag.is_some() {
            clauses.push("tags CONTAINS $tag");
        }
        if search.is_some() {
            clauses.push(
                "(string::lowercase(title) CONTAINS $search OR string::lowercase(content) CONTAINS $search)",
            );
        }

        let query_str = format!(
            "SELECT * FROM blog WHERE {} ORDER BY created_at DESC",
            clauses.join(" AND ")
        );

        let mut query = self.base.db().query(query_str);
        if let Some(v) = category {
            query = query.bind(("category", v));
        }
        if let Some(v) = tag {
            query = query.bind(("tag", v));
        }
        if let Some(v) = search {
            query = query.bind(("search", v.to_lowercase()));
        }

        let blogs: Vec<Blog> = query.await?.take(0)?;
        Ok(blogs)
    }

    /// All posts including drafts (admin view)
    pub async fn find_all(&self) -> RepoResult<Vec<Blog>> {
        let blogs: Vec<Blog> = self
            .base
            .db()
            .query("SELECT * FROM blog ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(blogs)
    }

    /// Find post by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Blog>> {
        let thing = parse_record_id(id)?;
        let blog: Option<Blog> = self.base.db().select(thing).await?;
        Ok(blog)
    }

    /// Look up by slug and bump the view counter in the same statement
    pub async fn find_by_slug_counting_view(&self, slug: &str) -> RepoResult<Option<Blog>> {
        let slug = slug.to_string();
        let mut result = self
            .base
            .db()
            .query("UPDATE blog SET views += 1 WHERE slug = $slug RETURN AFTER")
            .bind(("slug", slug))
            .await?;
        let blogs: Vec<Blog> = result.take(0)?;
        Ok(blogs.into_iter().next())
    }

    async fn slug_taken(&self, slug: &str) -> RepoResult<bool> {
        let slug = slug.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT VALUE slug FROM blog WHERE slug = $slug LIMIT 1")
            .bind(("slug", slug))
            .await?;
        let found: Vec<String> = result.take(0)?;
        Ok(!found.is_empty())
    }

    /// Create a post, deriving the slug from the title
    pub async fn create(
        &self,
        author: RecordId,
        author_name: String,
        data: BlogCreate,
    ) -> RepoResult<Blog> {
        let slug = slugify(&data.title);
        if slug.is_empty() {
            return Err(RepoError::Validation("title produces an empty slug".into()));
        }
        if self.slug_taken(&slug).await? {
            return Err(RepoError::Duplicate(format!("Slug '{}' already exists", slug)));
        }

        let blog = Blog {
            id: None,
            title: data.title,
            slug,
            author,
            author_name,
            content: data.content,
            excerpt: data.excerpt,
            cover_image: data.cover_image,
            category: data.category,
            tags: data.tags.unwrap_or_default(),
            published: data.published.unwrap_or(false),
            views: 0,
            likes: Vec::new(),
            created_at: Utc::now(),
        };

        let created: Option<Blog> = self.base.db().create(BLOG_TABLE).content(blog).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create blog".to_string()))
    }

    /// Update a post, regenerating the slug when the title changes
    pub async fn update(&self, id: &str, data: BlogUpdate) -> RepoResult<Blog> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Blog {} not found", id)))?;

        let new_slug = match &data.title {
            Some(title) if *title != existing.title => {
                let slug = slugify(title);
                if slug.is_empty() {
                    return Err(RepoError::Validation("title produces an empty slug".into()));
                }
                if slug != existing.slug && self.slug_taken(&slug).await? {
                    return Err(RepoError::Duplicate(format!("Slug '{}' already exists", slug)));
                }
                Some(slug)
            }
            _ => None,
        };

        let thing = parse_record_id(id)?;
        let mut set_parts: Vec<&str> = Vec::new();
        if data.title.is_some() { set_parts.push("title = $title"); }
        if new_slug.is_some() { set_parts.push("slug = $slug"); }
        if data.content.is_some() { set_parts.push("content = $content"); }
        if data.excerpt.is_some() { set_parts.push("excerpt = $excerpt"); }
        if data.cover_image.is_some() { set_parts.push("cover_image = $cover_image"); }
        if data.category.is_some() { set_parts.push("category = $category"); }
        if data.tags.is_some() { set_parts.push("tags = $tags"); }
        if data.published.is_some() { set_parts.push("published = $published"); }

        if set_parts.is_empty() {
            return Ok(existing);
        }

        let query_str = format!("UPDATE $thing SET {} RETURN AFTER", set_parts.join(", "));
        let mut query = self.base.db().query(query_str).bind(("thing", thing));
        if let Some(v) = data.title { query = query.bind(("title", v)); }
        if let Some(v) = new_slug { query = query.bind(("slug", v)); }
        if let Some(v) = data.content { query = query.bind(("content", v)); }
        if let Some(v) = data.excerpt { query = query.bind(("excerpt", v)); }
        if let Some(v) = data.cover_image { query = query.bind(("cover_image", v)); }
        if let Some(v) = data.category { query = query.bind(("category", v)); }
        if let Some(v) = data.tags { query = query.bind(("tags", v)); }
        if let Some(v) = data.published { query = query.bind(("published", v)); }

        let mut result = query.await?;
        let blogs: Vec<Blog> = result.take(0)?;
        blogs
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Blog {} not found", id)))
    }

    /// Hard delete a post
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let thing = parse_record_id(id)?;
        let deleted: Option<Blog> = self.base.db().delete(thing).await?;
        if deleted.is_none() {
            return Err(RepoError::NotFound(format!("Blog {} not found", id)));
        }
        Ok(())
    }

    /// Toggle a like, returning the new count
    pub async fn toggle_like(&self, id: &str, user: &RecordId) -> RepoResult<usize> {
        let blog = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Blog {} not found", id)))?;

        let mut likes = blog.likes;
        if let Some(pos) = likes.iter().position(|u| u == user) {
            likes.remove(pos);
        } else {
            likes.push(user.clone());
        }
        let count = likes.len();

        let thing = parse_record_id(id)?;
        let likes: Vec<String> = likes.iter().map(|u| u.to_string()).collect();
        self.base
            .db()
            .query("UPDATE $thing SET likes = $likes")
            .bind(("thing", thing))
            .bind(("likes", likes))
            .await?;

        Ok(count)
    }
}
