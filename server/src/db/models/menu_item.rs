//! Menu Item Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Menu item ID type
pub type MenuItemId = RecordId;

/// 商品分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuCategory {
    Coffee,
    Tea,
    Snacks,
    Pastries,
}

impl Default for MenuCategory {
    fn default() -> Self {
        MenuCategory::Coffee
    }
}

/// 饮食标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dietary {
    Vegetarian,
    Vegan,
    #[serde(rename = "Gluten-Free")]
    GlutenFree,
    #[serde(rename = "Dairy-Free")]
    DairyFree,
    #[serde(rename = "Nut-Free")]
    NutFree,
}

/// 定制选项 (如 "Oat milk" +0.50)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomizationOption {
    pub name: String,
    pub price: f64,
}

/// 定制组 (如 "Milk" 下的多个选项)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customization {
    pub name: String,
    #[serde(default)]
    pub options: Vec<CustomizationOption>,
}

/// Menu item model matching SurrealDB schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<MenuItemId>,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image: String,
    #[serde(default)]
    pub category: MenuCategory,
    #[serde(default = "default_true", deserialize_with = "serde_helpers::bool_true")]
    pub available: bool,
    #[serde(default)]
    pub dietary: Vec<Dietary>,
    #[serde(default)]
    pub customizations: Vec<Customization>,
    /// 评论均分 (0-5)，由评论模块维护
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: i64,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

/// Create menu item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemCreate {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image: String,
    #[serde(default)]
    pub category: Option<MenuCategory>,
    #[serde(default)]
    pub available: Option<bool>,
    #[serde(default)]
    pub dietary: Option<Vec<Dietary>>,
    #[serde(default)]
    pub customizations: Option<Vec<Customization>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Update menu item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<MenuCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dietary: Option<Vec<Dietary>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customizations: Option<Vec<Customization>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dietary_wire_names() {
        assert_eq!(
            serde_json::to_string(&Dietary::GlutenFree).unwrap(),
            "\"Gluten-Free\""
        );
        assert_eq!(
            serde_json::to_string(&MenuCategory::Pastries).unwrap(),
            "\"pastries\""
        );
    }
}
