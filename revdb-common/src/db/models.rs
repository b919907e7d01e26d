//! Row models shared across the service
//!
//! These mirror the table layouts in `schema.rs`. Response shaping
//! (author names instead of ids, formatted timestamps, absolute photo
//! URLs) happens in the API layer, not here.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub password_salt: String,
    pub photo: Option<String>,
    pub is_staff: bool,
}

impl User {
    /// Owner-or-admin predicate used by mutation permission checks
    pub fn may_mutate(&self, resource_author_id: i64) -> bool {
        self.is_staff || self.id == resource_author_id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Genre {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct Title {
    pub id: i64,
    pub name: String,
    pub year: i64,
    pub description: Option<String>,
    pub photo: Option<String>,
    pub category_id: Option<i64>,
}

#[derive(Debug, Clone, FromRow)]
pub struct Review {
    pub id: i64,
    pub title_id: i64,
    pub author_id: i64,
    /// Author username, joined in for response shaping
    pub author: String,
    pub text: String,
    pub score: i64,
    pub pub_date: NaiveDateTime,
}

#[derive(Debug, Clone, FromRow)]
pub struct Comment {
    pub id: i64,
    pub review_id: i64,
    pub author_id: i64,
    /// Author username, joined in for response shaping
    pub author: String,
    pub text: String,
    pub pub_date: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_may_mutate_own_resource() {
        let user = User {
            id: 7,
            username: "u".into(),
            email: "u@example.com".into(),
            password_hash: String::new(),
            password_salt: String::new(),
            photo: None,
            is_staff: false,
        };
        assert!(user.may_mutate(7));
        assert!(!user.may_mutate(8));
    }

    #[test]
    fn staff_may_mutate_any_resource() {
        let admin = User {
            id: 1,
            username: "admin".into(),
            email: "a@example.com".into(),
            password_hash: String::new(),
            password_salt: String::new(),
            photo: None,
            is_staff: true,
        };
        assert!(admin.may_mutate(99));
    }
}
