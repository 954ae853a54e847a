//! One-shot `asintel fetch` command.
//!
//! Builds a batch straight from command-line ASINs, runs one retrieval,
//! and renders the records as a table (or JSON).

use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, Table};
use console::style;

use asintel_core::provider::ProductProvider;
use asintel_types::asin::Asin;
use asintel_types::batch::{Batch, BatchSource};
use asintel_types::retrieval::{
    Domain, RequestedField, RetrievalRequest, RetrievalResponse,
};

use crate::state::AppState;

/// Fetch product fields for the given ASINs and print them.
pub async fn run(
    state: &AppState,
    asins: &[String],
    fields: &[String],
    domain: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let mut identifiers: Vec<Asin> = Vec::with_capacity(asins.len());
    for raw in asins {
        let asin = raw
            .parse::<Asin>()
            .map_err(|e| anyhow::anyhow!("'{raw}': {e}"))?;
        if !identifiers.contains(&asin) {
            identifiers.push(asin);
        }
    }

    let fields = resolve_fields(fields, &state.config.default_fields)?;
    let domain = resolve_domain(domain, state.config.default_domain)?;

    let batch = Batch::new(identifiers, BatchSource::PastedText, 0);
    let request = RetrievalRequest::new(batch, fields.clone(), domain);
    let provider = state.provider()?;

    let spinner = indicatif::ProgressBar::new_spinner();
    if !json {
        spinner.set_style(
            indicatif::ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("static spinner template"),
        );
        spinner.set_message(format!("querying {}...", provider.name()));
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    }

    let result = provider.fetch(&request).await;
    spinner.finish_and_clear();

    let response = result.map_err(|e| anyhow::anyhow!("{e}"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    print_table(&response, &fields);
    if let Some(tokens) = response.tokens_left {
        println!("  {}", style(format!("provider tokens left: {tokens}")).dim());
        println!();
    }

    Ok(())
}

fn resolve_fields(
    raw: &[String],
    defaults: &[RequestedField],
) -> anyhow::Result<Vec<RequestedField>> {
    if raw.is_empty() {
        return Ok(defaults.to_vec());
    }
    let mut fields = Vec::with_capacity(raw.len());
    for name in raw {
        let field = name
            .parse::<RequestedField>()
            .map_err(|e| anyhow::anyhow!(e))?;
        if !fields.contains(&field) {
            fields.push(field);
        }
    }
    Ok(fields)
}

fn resolve_domain(raw: Option<String>, default: Domain) -> anyhow::Result<Domain> {
    match raw {
        Some(code) => code.parse::<Domain>().map_err(|e| anyhow::anyhow!(e)),
        None => Ok(default),
    }
}

fn print_table(response: &RetrievalResponse, fields: &[RequestedField]) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);

    let mut header = vec![Cell::new("ASIN")];
    header.extend(fields.iter().map(|f| Cell::new(f.label())));
    table.set_header(header);

    for record in &response.records {
        let mut row = vec![record.asin.to_string()];
        for field in fields {
            let cell = match record.values.get(field) {
                Some(serde_json::Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => "-".to_string(),
            };
            row.push(cell);
        }
        table.add_row(row);
    }

    println!();
    println!("{table}");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_fields_defaults_when_empty() {
        let defaults = vec![RequestedField::Title, RequestedField::Price];
        assert_eq!(resolve_fields(&[], &defaults).unwrap(), defaults);
    }

    #[test]
    fn test_resolve_fields_parses_and_dedups() {
        let raw = vec!["rating".to_string(), "bsr".to_string(), "rating".to_string()];
        assert_eq!(
            resolve_fields(&raw, &[]).unwrap(),
            vec![RequestedField::Rating, RequestedField::SalesRank]
        );
    }

    #[test]
    fn test_resolve_fields_rejects_unknown() {
        let raw = vec!["frobnicate".to_string()];
        assert!(resolve_fields(&raw, &[]).is_err());
    }

    #[test]
    fn test_resolve_domain() {
        assert_eq!(resolve_domain(None, Domain::De).unwrap(), Domain::De);
        assert_eq!(
            resolve_domain(Some("jp".to_string()), Domain::Us).unwrap(),
            Domain::Jp
        );
        assert!(resolve_domain(Some("xx".to_string()), Domain::Us).is_err());
    }
}
