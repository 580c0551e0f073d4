use rusqlite::Connection;
use serde::Serialize;

use crate::db::{contact_repo, method_repo};
use crate::error::AbookResult;
use crate::model::MethodKind;

#[derive(Debug, Clone, Serialize)]
pub struct ContactStats {
    pub total_contacts: i64,
    pub favorite_contacts: i64,
    pub phone_methods: i64,
    pub email_methods: i64,
    pub social_methods: i64,
    pub address_methods: i64,
}

pub fn stats(conn: &Connection) -> AbookResult<ContactStats> {
    Ok(ContactStats {
        total_contacts: contact_repo::count(conn)?,
        favorite_contacts: contact_repo::count_favorites(conn)?,
        phone_methods: method_repo::count_by_kind(conn, MethodKind::Phone)?,
        email_methods: method_repo::count_by_kind(conn, MethodKind::Email)?,
        social_methods: method_repo::count_by_kind(conn, MethodKind::Social)?,
        address_methods: method_repo::count_by_kind(conn, MethodKind::Address)?,
    })
}
