//! CLI entry points for reading and removing contacts.
//!
//! Each command opens the configured store, performs one contract operation
//! and prints the result to stdout. Group and gender are shown with their
//! display labels next to the stored key.

use anyhow::{bail, Result};
use std::sync::Arc;

use crate::config::{Config, StorageBackend};
use crate::models::{Contact, ContactFilters};
use crate::store::{open_store, ContactStore};

/// The CLI runs one operation per process, so an in-memory store would
/// always start out empty.
async fn open_cli_store(config: &Config) -> Result<Arc<dyn ContactStore>> {
    if config.storage.backend == StorageBackend::Memory {
        bail!(
            "the memory backend does not persist between runs; \
             set [storage] backend = \"sqlite\" to use list, get or delete"
        );
    }
    open_store(config).await
}

/// `contacts list`: print every contact matching `filters`.
pub async fn run_list(config: &Config, filters: &ContactFilters) -> Result<()> {
    let store = open_cli_store(config).await?;
    let contacts = store.list(filters).await?;

    if contacts.is_empty() {
        println!("No contacts.");
        return Ok(());
    }

    for c in &contacts {
        println!(
            "{:>5}  {:<30} {:<16} {} ({})",
            c.id,
            c.full_name(),
            c.phone_number,
            c.group.label(),
            c.group
        );
    }
    println!("\n{} contact(s)", contacts.len());
    Ok(())
}

/// `contacts get <id>`: print one contact in full.
pub async fn run_get(config: &Config, id: i64) -> Result<()> {
    let store = open_cli_store(config).await?;
    let contact = match store.get(id).await? {
        Some(c) => c,
        None => bail!("contact not found: {}", id),
    };
    print!("{}", format_details(&contact));
    Ok(())
}

/// `contacts delete <id>`.
pub async fn run_delete(config: &Config, id: i64) -> Result<()> {
    let store = open_cli_store(config).await?;
    if !store.delete(id).await? {
        bail!("contact not found: {}", id);
    }
    println!("Deleted contact {}.", id);
    Ok(())
}

fn format_details(c: &Contact) -> String {
    let mut out = String::new();
    out.push_str("--- Contact ---\n");
    out.push_str(&format!("id:           {}\n", c.id));
    out.push_str(&format!("name:         {}\n", c.full_name()));
    out.push_str(&format!("phone:        {}\n", c.phone_number));
    out.push_str(&format!("group:        {} ({})\n", c.group.label(), c.group));
    out.push_str(&format!("gender:       {} ({})\n", c.gender.label(), c.gender));

    let optional = [
        ("position:     ", &c.position),
        ("office/home:  ", &c.office_home_number),
        ("phone 2:      ", &c.additional_phone1),
        ("phone 3:      ", &c.additional_phone2),
        ("phone 4:      ", &c.additional_phone3),
        ("email:        ", &c.email),
        ("address:      ", &c.address),
        ("notes:        ", &c.notes),
    ];
    for (label, value) in optional {
        if let Some(v) = value {
            out.push_str(label);
            out.push_str(v);
            out.push('\n');
        }
    }
    out
}
