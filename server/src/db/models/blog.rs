//! Blog Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// 文章分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlogCategory {
    Recipes,
    News,
    #[serde(rename = "Behind the Scenes")]
    BehindTheScenes,
    #[serde(rename = "Tips & Tricks")]
    TipsAndTricks,
    Events,
}

/// Blog model matching SurrealDB schema
///
/// slug 由标题生成，建唯一索引。作者名在创建时快照。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blog {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub title: String,
    pub slug: String,
    #[serde(with = "serde_helpers::record_id")]
    pub author: RecordId,
    pub author_name: String,
    pub content: String,
    pub excerpt: String,
    pub cover_image: String,
    pub category: BlogCategory,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub published: bool,
    #[serde(default)]
    pub views: i64,
    /// 点赞用户
    #[serde(default, with = "serde_helpers::vec_record_id")]
    pub likes: Vec<RecordId>,
    pub created_at: DateTime<Utc>,
}

/// Create blog payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogCreate {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub cover_image: String,
    pub category: BlogCategory,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub published: Option<bool>,
}

/// Update blog payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<BlogCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
}

/// 由标题生成 slug: 小写，非字母数字折叠为连字符，去掉首尾连字符
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_dash = true;
    for c in title.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_basic() {
        assert_eq!(slugify("Our New Winter Menu!"), "our-new-winter-menu");
        assert_eq!(slugify("  Tips & Tricks: Latte Art  "), "tips-tricks-latte-art");
        assert_eq!(slugify("100% Arabica"), "100-arabica");
    }

    #[test]
    fn category_wire_names() {
        assert_eq!(
            serde_json::to_string(&BlogCategory::BehindTheScenes).unwrap(),
            "\"Behind the Scenes\""
        );
        assert_eq!(
            serde_json::to_string(&BlogCategory::TipsAndTricks).unwrap(),
            "\"Tips & Tricks\""
        );
    }
}
