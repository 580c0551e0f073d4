use std::path::{Path, PathBuf};

use crate::cli::context::CliContext;
use crate::ops::transfer_ops;

pub fn export(ctx: &CliContext, args: &str) {
    let sheet = match transfer_ops::export_contacts(&ctx.conn, &ctx.config) {
        Ok(sheet) => sheet,
        Err(e) => {
            ctx.print_error(&e);
            return;
        }
    };

    let path = target_path(args, &sheet.filename);
    match std::fs::write(&path, &sheet.bytes) {
        Ok(()) => println!("Exported to {}", path.display()),
        Err(e) => println!("Error writing {}: {}", path.display(), e),
    }
}

pub fn template(ctx: &CliContext, args: &str) {
    let sheet = match transfer_ops::export_template(&ctx.config) {
        Ok(sheet) => sheet,
        Err(e) => {
            ctx.print_error(&e);
            return;
        }
    };

    let path = target_path(args, &sheet.filename);
    match std::fs::write(&path, &sheet.bytes) {
        Ok(()) => println!("Template written to {}", path.display()),
        Err(e) => println!("Error writing {}: {}", path.display(), e),
    }
}

pub fn import(ctx: &CliContext, args: &str) {
    let path = args.trim();
    if path.is_empty() {
        println!("Usage: import <file.csv>");
        return;
    }

    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) => {
            println!("Error reading {}: {}", path, e);
            return;
        }
    };

    let filename = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string());

    match transfer_ops::import_contacts(&ctx.conn, &ctx.config, &bytes, &filename) {
        Ok(report) => {
            println!(
                "Imported {} of {} rows ({} skipped, {} failed).",
                report.imported,
                report.rows,
                report.skipped(),
                report.errors.len()
            );
            if !report.errors.is_empty() {
                match serde_json::to_string_pretty(&report.errors) {
                    Ok(json) => println!("{}", json),
                    Err(e) => println!("Error formatting report: {}", e),
                }
            }
        }
        Err(e) => ctx.print_error(&e),
    }
}

/// Use the given path, or fall back to the sheet's suggested filename in
/// the current directory.
fn target_path(args: &str, suggested: &str) -> PathBuf {
    let trimmed = args.trim();
    if trimmed.is_empty() {
        PathBuf::from(suggested)
    } else {
        PathBuf::from(trimmed)
    }
}
