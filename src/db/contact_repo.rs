use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::method_repo;
use crate::error::{AbookError, AbookResult};
use crate::model::{Contact, Id};

pub fn insert(
    conn: &Connection,
    id: Id<Contact>,
    name: &str,
    notes: Option<&str>,
    is_favorite: bool,
) -> AbookResult<()> {
    conn.execute(
        "INSERT INTO contacts (id, name, notes, is_favorite) VALUES (?1, ?2, ?3, ?4)",
        params![id.value.to_string(), name, notes, is_favorite as i32],
    )?;
    Ok(())
}

pub fn update(
    conn: &Connection,
    id: Id<Contact>,
    name: &str,
    notes: Option<&str>,
) -> AbookResult<()> {
    conn.execute(
        "UPDATE contacts SET name = ?1, notes = ?2, updated_at = datetime('now')
         WHERE id = ?3",
        params![name, notes, id.value.to_string()],
    )?;
    Ok(())
}

pub fn set_favorite(conn: &Connection, id: Id<Contact>, is_favorite: bool) -> AbookResult<()> {
    conn.execute(
        "UPDATE contacts SET is_favorite = ?1, updated_at = datetime('now')
         WHERE id = ?2",
        params![is_favorite as i32, id.value.to_string()],
    )?;
    Ok(())
}

/// Delete a contact. Method rows go with it via the cascade.
/// Returns false when no such contact exists.
pub fn delete(conn: &Connection, id: Id<Contact>) -> AbookResult<bool> {
    let affected = conn.execute(
        "DELETE FROM contacts WHERE id = ?1",
        params![id.value.to_string()],
    )?;
    Ok(affected > 0)
}

pub fn find_by_id(conn: &Connection, id: Id<Contact>) -> AbookResult<Option<Contact>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, notes, is_favorite, created_at, updated_at
         FROM contacts WHERE id = ?1",
    )?;

    let result = stmt.query_row(params![id.value.to_string()], |row| {
        Ok(row_to_contact(row))
    });

    match result {
        Ok(contact) => {
            let mut contact = contact?;
            contact.methods = method_repo::find_by_contact(conn, contact.id)?;
            Ok(Some(contact))
        }
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn find_all(conn: &Connection) -> AbookResult<Vec<Contact>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, notes, is_favorite, created_at, updated_at
         FROM contacts ORDER BY created_at DESC, rowid DESC",
    )?;

    collect_with_methods(conn, &mut stmt, [])
}

pub fn find_favorites(conn: &Connection) -> AbookResult<Vec<Contact>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, notes, is_favorite, created_at, updated_at
         FROM contacts WHERE is_favorite = 1 ORDER BY updated_at DESC, rowid DESC",
    )?;

    collect_with_methods(conn, &mut stmt, [])
}

/// Case-insensitive substring search over name, notes, and method values.
/// Each matching contact is returned once.
pub fn search(conn: &Connection, keyword: &str) -> AbookResult<Vec<Contact>> {
    let pattern = format!("%{}%", keyword.to_lowercase());
    let mut stmt = conn.prepare(
        "SELECT c.id, c.name, c.notes, c.is_favorite, c.created_at, c.updated_at
         FROM contacts c
         LEFT JOIN contact_methods m ON m.contact_id = c.id
         WHERE LOWER(c.name) LIKE ?1
            OR LOWER(COALESCE(c.notes, '')) LIKE ?1
            OR LOWER(COALESCE(m.value, '')) LIKE ?1
         GROUP BY c.id
         ORDER BY c.created_at DESC, c.rowid DESC",
    )?;

    collect_with_methods(conn, &mut stmt, params![pattern])
}

pub fn count(conn: &Connection) -> AbookResult<i64> {
    let count = conn.query_row("SELECT COUNT(*) FROM contacts", [], |row| row.get(0))?;
    Ok(count)
}

pub fn count_favorites(conn: &Connection) -> AbookResult<i64> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM contacts WHERE is_favorite = 1",
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}

fn collect_with_methods<P: rusqlite::Params>(
    conn: &Connection,
    stmt: &mut rusqlite::Statement,
    params: P,
) -> AbookResult<Vec<Contact>> {
    let mut contacts = stmt
        .query_map(params, |row| Ok(row_to_contact(row)))?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    for contact in &mut contacts {
        contact.methods = method_repo::find_by_contact(conn, contact.id)?;
    }

    Ok(contacts)
}

fn row_to_contact(row: &rusqlite::Row) -> AbookResult<Contact> {
    let id_str: String = row.get(0).map_err(rusqlite::Error::from)?;
    let created_str: String = row.get(4).map_err(rusqlite::Error::from)?;
    let updated_str: String = row.get(5).map_err(rusqlite::Error::from)?;

    Ok(Contact {
        id: Id::new(Uuid::parse_str(&id_str).map_err(|e| {
            AbookError::Other(format!("Invalid UUID: {}", e))
        })?),
        name: row.get(1).map_err(rusqlite::Error::from)?,
        notes: row.get(2).map_err(rusqlite::Error::from)?,
        is_favorite: row.get::<_, i32>(3).map_err(rusqlite::Error::from)? != 0,
        methods: Vec::new(),
        created_at: parse_timestamp(&created_str)?,
        updated_at: parse_timestamp(&updated_str)?,
    })
}

fn parse_timestamp(s: &str) -> AbookResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map_err(|e| AbookError::Other(format!("Invalid timestamp '{}': {}", s, e)))
}
