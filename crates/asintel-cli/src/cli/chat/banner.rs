//! Welcome banner display for chat sessions.

use console::style;

use asintel_types::retrieval::{Domain, RequestedField};

/// Print the welcome banner at the start of a chat session.
pub fn print_welcome_banner(domain: Domain, default_fields: &[RequestedField], session_id: &str) {
    let fields = default_fields
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join(", ");

    println!();
    println!("  {}", style("Asintel").cyan().bold());
    println!(
        "  {}",
        style("ASIN batch analysis over Keepa product data").dim()
    );
    println!();
    println!(
        "  {}     {}",
        style("Marketplace:").bold(),
        style(domain).dim()
    );
    println!(
        "  {}  {}",
        style("Default fields:").bold(),
        style(fields).dim()
    );
    println!(
        "  {}         {}",
        style("Session:").bold(),
        style(&session_id[..8.min(session_id.len())]).dim()
    );
    println!();
    println!(
        "  {}",
        style("Type /help for commands, Ctrl+D to exit").dim()
    );
    println!("  {}", style("---").dim());
    println!();
}
