//! Tabular record codec: Contact to and from a flat [`Row`].
//!
//! Column matching on import goes through ordered synonym lists so a sheet
//! produced by another tool (or another locale) still resolves. Export
//! always emits the canonical labels; synonyms are import-only.

use serde::{Deserialize, Serialize};

use crate::model::{Contact, ContactDraft, MethodDraft, MethodKind};
use crate::sheet::table::Row;

/// Column synonym lists, canonical export labels, and token sets for the
/// tabular exchange layer. The defaults match the sheets the original web
/// UI produced; a deployment can deserialize its own table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// Ordered header synonyms per logical field, tried first to last.
    pub name_keys: Vec<String>,
    pub notes_keys: Vec<String>,
    pub favorite_keys: Vec<String>,
    pub phone_keys: Vec<String>,
    pub email_keys: Vec<String>,
    pub social_keys: Vec<String>,
    pub address_keys: Vec<String>,

    /// Canonical column labels used on export.
    pub name_label: String,
    pub phone_label: String,
    pub email_label: String,
    pub social_label: String,
    pub address_label: String,
    pub notes_label: String,
    pub favorite_label: String,

    /// Lowercased cell values that parse as "favorite".
    pub affirmative_tokens: Vec<String>,
    /// Rendered favorite-flag tokens.
    pub yes_token: String,
    pub no_token: String,

    /// Separator between joined method values on export.
    pub join_separator: String,
}

impl Default for SheetConfig {
    fn default() -> Self {
        fn strings(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }

        Self {
            name_keys: strings(&["姓名", "名字", "Name", "name", "联系人"]),
            notes_keys: strings(&["备注", "Notes", "notes", "说明"]),
            favorite_keys: strings(&["是否收藏", "收藏", "favorite", "Favorite"]),
            phone_keys: strings(&["电话", "Phone", "phone", "手机"]),
            email_keys: strings(&["邮箱", "Email", "email", "邮件"]),
            social_keys: strings(&["社交媒体", "Social", "social", "微信", "微博"]),
            address_keys: strings(&["地址", "Address", "address", "住址"]),
            name_label: "姓名".to_string(),
            phone_label: "电话".to_string(),
            email_label: "邮箱".to_string(),
            social_label: "社交媒体".to_string(),
            address_label: "地址".to_string(),
            notes_label: "备注".to_string(),
            favorite_label: "是否收藏".to_string(),
            affirmative_tokens: strings(&["是", "yes", "true", "1"]),
            yes_token: "是".to_string(),
            no_token: "否".to_string(),
            join_separator: "; ".to_string(),
        }
    }
}

impl SheetConfig {
    /// The seven canonical export columns.
    pub fn export_columns(&self) -> Vec<String> {
        vec![
            self.name_label.clone(),
            self.phone_label.clone(),
            self.email_label.clone(),
            self.social_label.clone(),
            self.address_label.clone(),
            self.notes_label.clone(),
            self.favorite_label.clone(),
        ]
    }

    pub fn kind_label(&self, kind: MethodKind) -> &str {
        match kind {
            MethodKind::Phone => &self.phone_label,
            MethodKind::Email => &self.email_label,
            MethodKind::Social => &self.social_label,
            MethodKind::Address => &self.address_label,
        }
    }

    pub fn kind_keys(&self, kind: MethodKind) -> &[String] {
        match kind {
            MethodKind::Phone => &self.phone_keys,
            MethodKind::Email => &self.email_keys,
            MethodKind::Social => &self.social_keys,
            MethodKind::Address => &self.address_keys,
        }
    }
}

/// Flatten a contact into a row over the seven canonical columns. Every
/// column is always present; missing data renders as an empty cell.
pub fn flatten(contact: &Contact, config: &SheetConfig) -> Row {
    let mut row = Row::new();
    row.set(&config.name_label, contact.name.clone());
    for kind in MethodKind::ALL {
        row.set(
            config.kind_label(kind),
            contact.method_values(kind).join(&config.join_separator),
        );
    }
    row.set(&config.notes_label, contact.notes.clone().unwrap_or_default());
    row.set(
        &config.favorite_label,
        if contact.is_favorite {
            config.yes_token.clone()
        } else {
            config.no_token.clone()
        },
    );
    row
}

/// Reconstruct a contact draft from a parsed row. Returns `None` when no
/// usable name can be resolved; the caller counts rows in against drafts
/// out to detect the skip.
pub fn unflatten(row: &Row, config: &SheetConfig) -> Option<ContactDraft> {
    let name = resolve_name(row, config)?;

    let mut draft = ContactDraft::new(name);

    // Notes and favorite stop at the first synonym key present, even when
    // its value is empty.
    if let Some(value) = first_present(row, &config.notes_keys) {
        draft.notes = Some(value.to_string()).filter(|s| !s.is_empty());
    }
    if let Some(value) = first_present(row, &config.favorite_keys) {
        let lowered = value.to_lowercase();
        draft.is_favorite = config.affirmative_tokens.iter().any(|t| *t == lowered);
    }

    for kind in MethodKind::ALL {
        if let Some(cell) = first_present(row, config.kind_keys(kind)) {
            for value in split_values(cell) {
                draft.methods.push(MethodDraft::new(kind, value));
            }
        }
    }

    Some(draft)
}

/// Name resolution: first synonym with a non-empty value wins; otherwise
/// fall back to the first non-empty cell in header order.
fn resolve_name(row: &Row, config: &SheetConfig) -> Option<String> {
    for key in &config.name_keys {
        if let Some(value) = row.get(key) {
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }

    row.iter()
        .find(|(_, value)| !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// First synonym key that exists in the row. Presence of the key, not a
/// non-empty value, terminates the scan.
fn first_present<'a>(row: &'a Row, keys: &[String]) -> Option<&'a str> {
    keys.iter().find_map(|key| row.get(key))
}

/// Split a multi-value cell on `;` or `,`, trimming fragments and dropping
/// empty ones.
fn split_values(cell: &str) -> Vec<String> {
    cell.replace(';', ",")
        .split(',')
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(str::to_string)
        .collect()
}
