use rusqlite::Connection;

use crate::db::{contact_repo, method_repo};
use crate::error::{AbookError, AbookResult};
use crate::model::{Contact, ContactDraft, ContactMethod, Id, MethodDraft};
use crate::validation::{self, trim_optional};

/// Create a contact with its methods. Returns the stored row, timestamps
/// included.
pub fn create_contact(conn: &Connection, draft: &ContactDraft) -> AbookResult<Contact> {
    let name = validation::non_blank(&draft.name, "name")?;
    let methods = build_methods(&draft.methods)?;
    let notes = trim_optional(draft.notes.as_deref());

    let id = Id::generate();
    contact_repo::insert(conn, id, &name, notes.as_deref(), draft.is_favorite)?;
    for method in &methods {
        method_repo::insert(conn, id, method)?;
    }

    fetch(conn, id)
}

/// Update name, notes, and the full method set. Methods are replaced, not
/// merged; the favorite flag is untouched.
pub fn update_contact(
    conn: &Connection,
    id: Id<Contact>,
    name: &str,
    notes: Option<&str>,
    methods: &[MethodDraft],
) -> AbookResult<Contact> {
    ensure_exists(conn, id)?;

    let name = validation::non_blank(name, "name")?;
    let new_methods = build_methods(methods)?;
    let notes = trim_optional(notes);

    contact_repo::update(conn, id, &name, notes.as_deref())?;
    method_repo::delete_by_contact(conn, id)?;
    for method in &new_methods {
        method_repo::insert(conn, id, method)?;
    }

    fetch(conn, id)
}

pub fn set_favorite(conn: &Connection, id: Id<Contact>, is_favorite: bool) -> AbookResult<Contact> {
    ensure_exists(conn, id)?;
    contact_repo::set_favorite(conn, id, is_favorite)?;
    fetch(conn, id)
}

/// Delete a contact and its methods. Returns false when absent.
pub fn delete_contact(conn: &Connection, id: Id<Contact>) -> AbookResult<bool> {
    contact_repo::delete(conn, id)
}

fn build_methods(drafts: &[MethodDraft]) -> AbookResult<Vec<ContactMethod>> {
    drafts
        .iter()
        .map(|d| {
            let value = validation::non_blank(&d.value, "value")?;
            Ok(ContactMethod::new(d.kind, value, trim_optional(d.label.as_deref())))
        })
        .collect()
}

fn ensure_exists(conn: &Connection, id: Id<Contact>) -> AbookResult<()> {
    contact_repo::find_by_id(conn, id)?
        .ok_or_else(|| AbookError::NotFound {
            entity_type: "Contact".into(),
            id: id.to_string(),
        })?;
    Ok(())
}

fn fetch(conn: &Connection, id: Id<Contact>) -> AbookResult<Contact> {
    contact_repo::find_by_id(conn, id)?.ok_or_else(|| AbookError::NotFound {
        entity_type: "Contact".into(),
        id: id.to_string(),
    })
}
