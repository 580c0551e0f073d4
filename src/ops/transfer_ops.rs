//! Bulk import/export orchestrator for the tabular exchange layer.
//!
//! Export flattens every stored contact and renders one sheet. Import is
//! record-level best-effort: the extension check is the only fatal error;
//! un-nameable rows are skipped silently, and per-record persistence
//! failures are collected without aborting the batch.

use chrono::Local;
use log::{debug, info, warn};
use rusqlite::Connection;
use serde::Serialize;

use crate::db::contact_repo;
use crate::error::{AbookError, AbookResult};
use crate::ops::contact_ops;
use crate::sheet::{codec, table, Row, SheetConfig};

/// Filename extensions accepted by import. The bytes are always treated as
/// delimited text; spreadsheet extensions are allowed because that is what
/// the export side claims to produce.
const ALLOWED_EXTENSIONS: [&str; 3] = [".xlsx", ".xls", ".csv"];

/// A rendered sheet ready to hand to the caller.
#[derive(Debug, Clone)]
pub struct SheetFile {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub mime: &'static str,
}

/// One failed record during import.
#[derive(Debug, Clone, Serialize)]
pub struct ImportIssue {
    /// Sheet line number, header line counted as 1.
    pub row: usize,
    pub name: String,
    pub error: String,
}

/// Outcome of a best-effort import.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportReport {
    /// Data rows parsed from the sheet.
    pub rows: usize,
    /// Drafts that reached the store (rows minus silent skips).
    pub attempted: usize,
    /// Contacts actually persisted.
    pub imported: usize,
    pub errors: Vec<ImportIssue>,
}

impl ImportReport {
    /// Rows dropped because no usable name resolved.
    pub fn skipped(&self) -> usize {
        self.rows - self.attempted
    }
}

/// Export every stored contact as a CSV sheet. An empty store yields a
/// header-only sheet over the canonical columns.
pub fn export_contacts(conn: &Connection, config: &SheetConfig) -> AbookResult<SheetFile> {
    let contacts = contact_repo::find_all(conn)?;
    let rows: Vec<Row> = contacts.iter().map(|c| codec::flatten(c, config)).collect();

    let bytes = table::render_with_columns(&config.export_columns(), &rows)?;
    let filename = format!("通讯录_{}.csv", Local::now().format("%Y%m%d_%H%M%S"));
    info!("exported {} contacts to {}", contacts.len(), filename);

    Ok(SheetFile {
        bytes,
        filename,
        mime: "text/csv",
    })
}

/// The import template: two sample contacts rendered through the same
/// serializer the real export uses.
pub fn export_template(config: &SheetConfig) -> AbookResult<SheetFile> {
    let mut zhang = Row::new();
    zhang.set(&config.name_label, "张三");
    zhang.set(&config.phone_label, "13800138000; 13900139000");
    zhang.set(&config.email_label, "zhangsan@example.com");
    zhang.set(&config.social_label, "@zhangsan");
    zhang.set(&config.address_label, "北京市海淀区");
    zhang.set(&config.notes_label, "同事");
    zhang.set(&config.favorite_label, config.yes_token.clone());

    let mut li = Row::new();
    li.set(&config.name_label, "李四");
    li.set(&config.phone_label, "13600136000");
    li.set(&config.email_label, "lisi@example.com");
    li.set(&config.social_label, "");
    li.set(&config.address_label, "上海市浦东新区");
    li.set(&config.notes_label, "朋友");
    li.set(&config.favorite_label, config.no_token.clone());

    let bytes = table::render_with_columns(&config.export_columns(), &[zhang, li])?;

    Ok(SheetFile {
        bytes,
        filename: "通讯录模板.csv".to_string(),
        mime: "text/csv",
    })
}

/// Import contacts from sheet bytes. The extension allow-list is checked
/// before any parsing; everything after that is per-record.
pub fn import_contacts(
    conn: &Connection,
    config: &SheetConfig,
    bytes: &[u8],
    filename: &str,
) -> AbookResult<ImportReport> {
    if !ALLOWED_EXTENSIONS.iter().any(|ext| filename.ends_with(ext)) {
        return Err(AbookError::UnsupportedFormat {
            filename: filename.to_string(),
        });
    }

    let rows = table::parse(bytes)?;
    let mut report = ImportReport {
        rows: rows.len(),
        ..Default::default()
    };

    for (index, row) in rows.iter().enumerate() {
        // Header is line 1, so the first data row is line 2.
        let line = index + 2;

        let draft = match codec::unflatten(row, config) {
            Some(draft) => draft,
            None => {
                debug!("line {}: no usable name, skipping", line);
                continue;
            }
        };

        report.attempted += 1;
        match contact_ops::create_contact(conn, &draft) {
            Ok(contact) => {
                debug!("line {}: imported {}", line, contact.name);
                report.imported += 1;
            }
            Err(e) => {
                warn!("line {}: failed to import {}: {}", line, draft.name, e);
                report.errors.push(ImportIssue {
                    row: line,
                    name: draft.name.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    info!(
        "import {}: {} rows, {} skipped, {} imported, {} failed",
        filename,
        report.rows,
        report.skipped(),
        report.imported,
        report.errors.len()
    );

    Ok(report)
}
