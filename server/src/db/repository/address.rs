//! Address Repository
//!
//! 每个用户最多一个默认地址：任何把地址设为默认的写入，
//! 先清掉该用户其余地址上的默认标记。

use chrono::Utc;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Address, AddressCreate, AddressUpdate};

const ADDRESS_TABLE: &str = "address";

#[derive(Clone)]
pub struct AddressRepository {
    base: BaseRepository,
}

impl AddressRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// User's addresses, default first
    pub async fn find_for_user(&self, user: &RecordId) -> RepoResult<Vec<Address>> {
        let addresses: Vec<Address> = self
            .base
            .db()
            .query("SELECT * FROM address WHERE user = $user ORDER BY is_default DESC")
            .bind(("user", user.to_string()))
            .await?
            .take(0)?;
        Ok(addresses)
    }

    /// Find address by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Address>> {
        let thing = parse_record_id(id)?;
        let address: Option<Address> = self.base.db().select(thing).await?;
        Ok(address)
    }

    async fn clear_defaults(&self, user: &RecordId) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE address SET is_default = false WHERE user = $user")
            .bind(("user", user.to_string()))
            .await?;
        Ok(())
    }

    /// Create an address for a user
    pub async fn create(&self, user: RecordId, data: AddressCreate) -> RepoResult<Address> {
        let is_default = data.is_default.unwrap_or(false);
        if is_default {
            self.clear_defaults(&user).await?;
        }

        let address = Address {
            id: None,
            user,
            label: data.label,
            full_name: data.full_name,
            phone: data.phone,
            address_line1: data.address_line1,
            address_line2: data.address_line2,
            city: data.city,
            state: data.state,
            pincode: data.pincode,
            landmark: data.landmark,
            is_default,
            created_at: Utc::now(),
        };

        let created: Option<Address> =
            self.base.db().create(ADDRESS_TABLE).content(address).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create address".to_string()))
    }

    /// Update an address (ownership is checked by the caller)
    pub async fn update(&self, id: &str, owner: &RecordId, data: AddressUpdate) -> RepoResult<Address> {
        if data.is_default == Some(true) {
            self.clear_defaults(owner).await?;
        }

        let thing = parse_record_id(id)?;
        let mut set_parts: Vec<&str> = Vec::new();
        if data.label.is_some() { set_parts.push("label = $label"); }
        if data.full_name.is_some() { set_parts.push("full_name = $full_name"); }
        if data.phone.is_some() { set_parts.push("phone = $phone"); }
        if data.address_line1.is_some() { set_parts.push("address_line1 = $address_line1"); }
        if data.address_line2.is_some() { set_parts.push("address_line2 = $address_line2"); }
        if data.city.is_some() { set_parts.push("city = $city"); }
        if data.state.is_some() { set_parts.push("state = $state"); }
        if data.pincode.is_some() { set_parts.push("pincode = $pincode"); }
        if data.landmark.is_some() { set_parts.push("landmark = $landmark"); }
        if data.is_default.is_some() { set_parts.push("is_default = $is_default"); }

        if set_parts.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Address {} not found", id)));
        }

        let query_str = format!("UPDATE $thing SET {} RETURN AFTER", set_parts.join(", "));
        let mut query = self.base.db().query(query_str).bind(("thing", thing));
        if let Some(v) = data.label { query = query.bind(("label", v)); }
        if let Some(v) = data.full_name { query = query.bind(("full_name", v)); }
        if let Some(v) = data.phone { query = query.bind(("phone", v)); }
        if let Some(v) = data.address_line2 { query = query.bind(("address_line2", v)); }
        if let Some(v) = data.address_line1 { query = query.bind(("address_line1", v)); }
        if let Some(v) = data.city { query = query.bind(("city", v)); }
        if let Some(v) = data.state { query = query.bind(("state", v)); }
        if let Some(v) = data.pincode { query = query.bind(("pincode", v)); }
        if let Some(v) = data.landmark { query = query.bind(("landmark", v)); }
        if let Some(v) = data.is_default { query = query.bind(("is_default", v)); }

        let mut result = query.await?;
        let addresses: Vec<Address> = result.take(0)?;
        addresses
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Address {} not found", id)))
    }

    /// Make one address the default for its owner
    pub async fn set_default(&self, id: &str, owner: &RecordId) -> RepoResult<Address> {
        self.clear_defaults(owner).await?;

        let thing = parse_record_id(id)?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET is_default = true RETURN AFTER")
            .bind(("thing", thing))
            .await?;
        result
            .take::<Option<Address>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Address {} not found", id)))
    }

    /// Hard delete an address
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let thing = parse_record_id(id)?;
        let deleted: Option<Address> = self.base.db().delete(thing).await?;
        if deleted.is_none() {
            return Err(RepoError::NotFound(format!("Address {} not found", id)));
        }
        Ok(())
    }
}
