use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::error::AbookResult;
use crate::model::{Contact, ContactMethod, Id, MethodKind};

pub fn insert(
    conn: &Connection,
    contact_id: Id<Contact>,
    method: &ContactMethod,
) -> AbookResult<()> {
    conn.execute(
        "INSERT INTO contact_methods (id, contact_id, kind, value, label)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            method.id.value.to_string(),
            contact_id.value.to_string(),
            method.kind.as_str(),
            method.value,
            method.label,
        ],
    )?;
    Ok(())
}

pub fn find_by_contact(
    conn: &Connection,
    contact_id: Id<Contact>,
) -> AbookResult<Vec<ContactMethod>> {
    let mut stmt = conn.prepare(
        "SELECT id, kind, value, label FROM contact_methods
         WHERE contact_id = ?1 ORDER BY rowid",
    )?;

    let methods = stmt
        .query_map(params![contact_id.value.to_string()], |row| {
            Ok(row_to_method(row))
        })?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(methods)
}

pub fn delete_by_contact(conn: &Connection, contact_id: Id<Contact>) -> AbookResult<()> {
    conn.execute(
        "DELETE FROM contact_methods WHERE contact_id = ?1",
        params![contact_id.value.to_string()],
    )?;
    Ok(())
}

pub fn count_by_kind(conn: &Connection, kind: MethodKind) -> AbookResult<i64> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM contact_methods WHERE kind = ?1",
        params![kind.as_str()],
        |row| row.get(0),
    )?;
    Ok(count)
}

fn row_to_method(row: &rusqlite::Row) -> AbookResult<ContactMethod> {
    let id_str: String = row.get(0).map_err(rusqlite::Error::from)?;
    let kind_str: String = row.get(1).map_err(rusqlite::Error::from)?;

    Ok(ContactMethod {
        id: Id::new(Uuid::parse_str(&id_str).map_err(|e| {
            crate::error::AbookError::Other(format!("Invalid UUID: {}", e))
        })?),
        kind: MethodKind::parse(&kind_str).ok_or_else(|| {
            crate::error::AbookError::UnknownMethodKind { value: kind_str }
        })?,
        value: row.get(2).map_err(rusqlite::Error::from)?,
        label: row.get(3).map_err(rusqlite::Error::from)?,
    })
}
