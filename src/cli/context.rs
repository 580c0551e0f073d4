use rusqlite::Connection;
use std::io::{self, Write};

use crate::error::AbookError;
use crate::model::Contact;
use crate::queries::contact_queries;
use crate::sheet::SheetConfig;

pub struct CliContext {
    pub conn: Connection,
    pub config: SheetConfig,
}

impl CliContext {
    pub fn new(conn: Connection, config: SheetConfig) -> Self {
        Self { conn, config }
    }

    /// Prompt and read a line from stdin. Returns None on EOF.
    pub fn read_line(&self, prompt: &str) -> Option<String> {
        print!("{}", prompt);
        io::stdout().flush().ok();
        let mut buf = String::new();
        match io::stdin().read_line(&mut buf) {
            Ok(0) => None,
            Ok(_) => Some(buf.trim_end_matches('\n').trim_end_matches('\r').to_string()),
            Err(_) => None,
        }
    }

    /// Read a line, trimmed.
    pub fn prompt(&self, prompt: &str) -> Option<String> {
        self.read_line(prompt).map(|s| s.trim().to_string())
    }

    pub fn print_error(&self, error: &AbookError) {
        println!("Error: {}", error);
    }

    /// Find a contact by name query. Prints error if not found or ambiguous.
    pub fn find_contact(&self, args: &str) -> Option<Contact> {
        let query = args.trim();
        if query.is_empty() {
            println!("Usage: provide a contact name.");
            return None;
        }

        let contacts = contact_queries::all_contacts(&self.conn).unwrap_or_default();
        let lower = query.to_lowercase();
        let matches: Vec<&Contact> = contacts
            .iter()
            .filter(|c| c.name.to_lowercase().contains(&lower))
            .collect();

        match matches.len() {
            0 => {
                println!("No contact found matching '{}'", query);
                None
            }
            1 => Some(matches[0].clone()),
            _ => {
                // Check for exact match
                if let Some(exact) = matches.iter().find(|c| c.name == query) {
                    return Some((*exact).clone());
                }
                println!("Multiple matches found:");
                for c in &matches {
                    println!("  {}", c.name);
                }
                println!("Please be more specific.");
                None
            }
        }
    }
}
