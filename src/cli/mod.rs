pub mod contact_commands;
pub mod context;
pub mod transfer_commands;

use std::path::Path;

use rusqlite::Connection;

use crate::db::schema;
use crate::sheet::SheetConfig;
use context::CliContext;

/// Run the interactive REPL.
pub fn run(db_path: &Path) {
    println!("Address Book");
    println!("Type 'help' for commands, 'exit' to quit.");
    println!();

    let conn = match Connection::open(db_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error opening database: {}", e);
            return;
        }
    };

    if let Err(e) = schema::initialize(&conn) {
        eprintln!("Error initializing database: {}", e);
        return;
    }

    let ctx = CliContext::new(conn, SheetConfig::default());
    repl_loop(&ctx);
}

fn repl_loop(ctx: &CliContext) {
    loop {
        let input = match ctx.read_line("> ") {
            Some(s) => s,
            None => break,
        };

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let (command, args) = parse_command(input);

        match command {
            "help" | "?" => print_help(),
            "quit" | "exit" | "q" => break,

            "list" | "ls" => contact_commands::list(ctx),
            "favorites" | "favs" => contact_commands::favorites(ctx),
            "show" | "view" => contact_commands::show(ctx, args),
            "add" => contact_commands::add(ctx, args),
            "edit" => contact_commands::edit(ctx, args),
            "delete" | "rm" => contact_commands::delete(ctx, args),
            "fav" => contact_commands::set_favorite(ctx, args, true),
            "unfav" => contact_commands::set_favorite(ctx, args, false),
            "find" | "search" => contact_commands::find(ctx, args),
            "stats" => contact_commands::print_stats(ctx),

            "export" => transfer_commands::export(ctx, args),
            "import" => transfer_commands::import(ctx, args),
            "template" => transfer_commands::template(ctx, args),

            _ => println!("Unknown command: {}. Type 'help' for commands.", command),
        }
    }
}

/// Parse input into command and args.
fn parse_command(input: &str) -> (&str, &str) {
    let input = input.trim();
    match input.find(|c: char| c == ' ' || c == '\t') {
        Some(pos) => (&input[..pos], input[pos..].trim()),
        None => (input, ""),
    }
}

fn print_help() {
    println!(
        r#"
COMMANDS:

  Contacts:
    list                    List all contacts
    favorites               List favorite contacts
    add [name]              Add a new contact (interactive)
    show <name>             Show contact details
    edit <name>             Edit a contact
    delete <name>           Delete a contact
    fav <name>              Mark a contact as favorite
    unfav <name>            Unmark a favorite
    find <keyword>          Search names, notes, and method values

  Import / Export:
    export [path]           Export all contacts as CSV
    import <path>           Import contacts from a CSV sheet
    template [path]         Write the import template

  Other:
    stats                   Show statistics
    help                    Show this help
    exit / quit / q         Exit

TIPS:
  - Names are case-insensitive and partial matches work
  - Import accepts .csv/.xls/.xlsx files containing delimited text"#
    );
}
