use rusqlite::Connection;

use crate::db::contact_repo;
use crate::error::AbookResult;
use crate::model::{Contact, Id};

pub fn all_contacts(conn: &Connection) -> AbookResult<Vec<Contact>> {
    contact_repo::find_all(conn)
}

pub fn get_contact(conn: &Connection, id: Id<Contact>) -> AbookResult<Option<Contact>> {
    contact_repo::find_by_id(conn, id)
}

pub fn favorites(conn: &Connection) -> AbookResult<Vec<Contact>> {
    contact_repo::find_favorites(conn)
}

pub fn search(conn: &Connection, keyword: &str) -> AbookResult<Vec<Contact>> {
    contact_repo::search(conn, keyword)
}
