//! Records shared by the integration tests

use castguard::Schema;
use chrono::{DateTime, Utc};

#[derive(Schema, Default, Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: i32,
    pub item: String,
    pub status: String,
    #[column_name = "user_id"]
    pub buyer_id: i32,
}

#[derive(Schema, Default, Debug, Clone, PartialEq)]
pub struct Address {
    pub id: i32,
    pub user_id: Option<i32>,
    pub street: String,
    pub notes: String,
    pub flagged: Option<bool>,
}

#[derive(Schema, Default, Debug, Clone, PartialEq)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub age: i32,
    #[has_many]
    pub transactions: Vec<Transaction>,
    #[has_one]
    pub address: Address,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Schema, Default, Debug, Clone, PartialEq)]
pub struct Article {
    #[primary_key]
    pub slug: String,
    pub title: String,
    pub state: String,
    pub user_id: i64,
}
