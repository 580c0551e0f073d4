use crate::cli::context::CliContext;
use crate::model::{Contact, ContactDraft, MethodDraft, MethodKind};
use crate::ops::contact_ops;
use crate::queries::{contact_queries, stats_queries};

pub fn list(ctx: &CliContext) {
    let contacts = contact_queries::all_contacts(&ctx.conn).unwrap_or_default();
    if contacts.is_empty() {
        println!("No contacts yet. Use 'add' to create one.");
        return;
    }

    println!("Contacts ({}):", contacts.len());
    println!();
    for contact in &contacts {
        print_line(contact);
    }
}

pub fn favorites(ctx: &CliContext) {
    let contacts = contact_queries::favorites(&ctx.conn).unwrap_or_default();
    if contacts.is_empty() {
        println!("No favorites yet. Use 'fav <name>' to mark one.");
        return;
    }

    println!("Favorites ({}):", contacts.len());
    println!();
    for contact in &contacts {
        print_line(contact);
    }
}

pub fn show(ctx: &CliContext, args: &str) {
    let contact = match ctx.find_contact(args) {
        Some(c) => c,
        None => return,
    };

    println!("{}{}", contact.name, if contact.is_favorite { " *" } else { "" });
    if let Some(notes) = &contact.notes {
        println!("  Notes: {}", notes);
    }
    for method in &contact.methods {
        println!("  {} ({}): {}", method.kind, method.label, method.value);
    }
    println!("  Created: {}", contact.created_at);
    println!("  Updated: {}", contact.updated_at);
}

pub fn add(ctx: &CliContext, args: &str) {
    println!("Adding a new contact (press Enter to skip optional fields)");
    println!();

    let name = if !args.is_empty() {
        args.to_string()
    } else {
        match ctx.prompt("Name (required): ") {
            Some(s) if s.is_empty() => {
                println!("Name is required.");
                return;
            }
            Some(s) => s,
            None => return,
        }
    };

    let notes = match ctx.prompt("Notes: ") {
        Some(s) => s,
        None => return,
    };

    let favorite = match ctx.prompt("Favorite? (y/n): ") {
        Some(s) => s.eq_ignore_ascii_case("y"),
        None => return,
    };

    let methods = match prompt_methods(ctx) {
        Some(m) => m,
        None => return,
    };

    let mut draft = ContactDraft::new(name);
    draft.notes = if notes.is_empty() { None } else { Some(notes) };
    draft.is_favorite = favorite;
    draft.methods = methods;

    match contact_ops::create_contact(&ctx.conn, &draft) {
        Ok(contact) => println!("Added {}", contact.name),
        Err(e) => ctx.print_error(&e),
    }
}

pub fn edit(ctx: &CliContext, args: &str) {
    let contact = match ctx.find_contact(args) {
        Some(c) => c,
        None => return,
    };

    println!("Editing {} (press Enter to keep the current value)", contact.name);

    let name = match ctx.prompt(&format!("Name [{}]: ", contact.name)) {
        Some(s) if s.is_empty() => contact.name.clone(),
        Some(s) => s,
        None => return,
    };

    let current_notes = contact.notes.clone().unwrap_or_default();
    let notes = match ctx.prompt(&format!("Notes [{}]: ", current_notes)) {
        Some(s) if s.is_empty() => contact.notes.clone(),
        Some(s) => Some(s),
        None => return,
    };

    let replace = match ctx.prompt("Replace contact methods? (y/n): ") {
        Some(s) => s.eq_ignore_ascii_case("y"),
        None => return,
    };

    let methods: Vec<MethodDraft> = if replace {
        match prompt_methods(ctx) {
            Some(m) => m,
            None => return,
        }
    } else {
        contact
            .methods
            .iter()
            .map(|m| MethodDraft {
                kind: m.kind,
                value: m.value.clone(),
                label: Some(m.label.clone()),
            })
            .collect()
    };

    match contact_ops::update_contact(&ctx.conn, contact.id, &name, notes.as_deref(), &methods) {
        Ok(updated) => println!("Updated {}", updated.name),
        Err(e) => ctx.print_error(&e),
    }
}

pub fn delete(ctx: &CliContext, args: &str) {
    let contact = match ctx.find_contact(args) {
        Some(c) => c,
        None => return,
    };

    let confirm = match ctx.prompt(&format!("Delete {}? (y/n): ", contact.name)) {
        Some(s) => s,
        None => return,
    };
    if !confirm.eq_ignore_ascii_case("y") {
        println!("Cancelled.");
        return;
    }

    match contact_ops::delete_contact(&ctx.conn, contact.id) {
        Ok(true) => println!("Deleted {}", contact.name),
        Ok(false) => println!("Contact no longer exists."),
        Err(e) => ctx.print_error(&e),
    }
}

pub fn set_favorite(ctx: &CliContext, args: &str, is_favorite: bool) {
    let contact = match ctx.find_contact(args) {
        Some(c) => c,
        None => return,
    };

    match contact_ops::set_favorite(&ctx.conn, contact.id, is_favorite) {
        Ok(updated) => {
            if is_favorite {
                println!("{} is now a favorite.", updated.name);
            } else {
                println!("{} is no longer a favorite.", updated.name);
            }
        }
        Err(e) => ctx.print_error(&e),
    }
}

pub fn find(ctx: &CliContext, args: &str) {
    let keyword = args.trim();
    if keyword.is_empty() {
        println!("Usage: find <keyword>");
        return;
    }

    let contacts = contact_queries::search(&ctx.conn, keyword).unwrap_or_default();
    if contacts.is_empty() {
        println!("No contacts match '{}'", keyword);
        return;
    }

    println!("Matches ({}):", contacts.len());
    for contact in &contacts {
        print_line(contact);
    }
}

pub fn print_stats(ctx: &CliContext) {
    match stats_queries::stats(&ctx.conn) {
        Ok(stats) => {
            println!("Contacts:  {} ({} favorites)", stats.total_contacts, stats.favorite_contacts);
            println!("Phones:    {}", stats.phone_methods);
            println!("Emails:    {}", stats.email_methods);
            println!("Social:    {}", stats.social_methods);
            println!("Addresses: {}", stats.address_methods);
        }
        Err(e) => ctx.print_error(&e),
    }
}

fn print_line(contact: &Contact) {
    let star = if contact.is_favorite { " *" } else { "" };
    let methods = if contact.methods.is_empty() {
        String::new()
    } else {
        let summary: Vec<String> = contact
            .methods
            .iter()
            .map(|m| format!("{}: {}", m.kind, m.value))
            .collect();
        format!(" ({})", summary.join(", "))
    };
    println!("  {}{}{}", contact.name, star, methods);
}

/// Interactive loop collecting method drafts. Returns None on EOF.
fn prompt_methods(ctx: &CliContext) -> Option<Vec<MethodDraft>> {
    let mut methods = Vec::new();
    loop {
        let kind = match ctx.prompt("Method type (phone/email/social/address, Enter to finish): ") {
            Some(s) if s.is_empty() => break,
            Some(s) => match MethodKind::parse(&s) {
                Some(k) => k,
                None => {
                    println!("Unknown type '{}'.", s);
                    continue;
                }
            },
            None => return None,
        };

        let value = match ctx.prompt("Value: ") {
            Some(s) if s.is_empty() => {
                println!("Value is required.");
                continue;
            }
            Some(s) => s,
            None => return None,
        };

        let label = match ctx.prompt("Label (optional): ") {
            Some(s) => s,
            None => return None,
        };

        let mut draft = MethodDraft::new(kind, value);
        if !label.is_empty() {
            draft.label = Some(label);
        }
        methods.push(draft);
    }
    Some(methods)
}
