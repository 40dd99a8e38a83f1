//! Data models matching the SurrealDB tables

pub mod address;
pub mod blog;
pub mod chat;
pub mod contact;
pub mod menu_item;
pub mod order;
pub mod review;
pub mod serde_helpers;
pub mod user;
pub mod wishlist;

pub use address::{Address, AddressCreate, AddressLabel, AddressUpdate};
pub use blog::{Blog, BlogCategory, BlogCreate, BlogUpdate, slugify};
pub use chat::{Chat, ChatMessage, ChatSender, ChatStatus};
pub use contact::{Contact, ContactStatus};
pub use menu_item::{Customization, CustomizationOption, Dietary, MenuCategory, MenuItem, MenuItemCreate, MenuItemUpdate};
pub use order::{Order, OrderCreate, OrderItem, OrderStatus, OrderType, PaymentMethod, PaymentStatus, compute_total, points_for_total};
pub use review::{Review, ReviewCreate, ReviewUpdate};
pub use user::{LoyaltyTier, Role, User};
pub use wishlist::{Wishlist, WishlistItem};
