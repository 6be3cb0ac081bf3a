//! Vitrine CLI Application
//!
//! Command-line interface for the Vitrine resource formatting engine.

mod args;
mod loader;

use anyhow::{bail, Context, Result};
use args::{Args, Commands};
use clap::Parser;
use log::info;
use vitrine_core::{AggregatorRef, FormatterEngineBuilder, FormatterRef, Record};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        schema,
        definitions,
        data,
        command,
    } = Args::parse();

    let schema_path = schema.context("--schema is required")?;
    let engine = FormatterEngineBuilder::new()
        .with_schema(loader::load_schema(&schema_path)?)
        .with_definitions(loader::load_definitions(definitions.as_deref())?)
        .with_store(loader::load_store(data.as_deref())?)
        .build()
        .context("Failed to build formatting engine")?;

    info!("Vitrine started");

    match command {
        Commands::Format {
            table,
            id,
            formatter,
            try_best,
        } => {
            let record = Record::new(table, Some(id));
            let requested = formatter.map(FormatterRef::Named);
            match engine.format(&record, requested, try_best).await? {
                Some(text) => println!("{text}"),
                None => bail!("record {} #{id} not found", record.table),
            }
        }
        Commands::Aggregate {
            table,
            ids,
            aggregator,
        } => {
            let members: Vec<Record> = ids
                .into_iter()
                .map(|id| Record::new(table.clone(), Some(id)))
                .collect();
            let requested = aggregator.map(AggregatorRef::Named);
            println!("{}", engine.aggregate(&members, requested).await?);
        }
        Commands::Pattern { name, value } => {
            let pattern = engine
                .definitions()
                .pattern(&name)
                .with_context(|| format!("unknown pattern formatter '{name}'"))?;
            match pattern.format(&value) {
                Some(canonical) => println!("{canonical}"),
                None => bail!(
                    "'{value}' does not match pattern formatter '{name}' (expected {})",
                    pattern.pattern().unwrap_or_else(|| pattern.value_or_wild())
                ),
            }
        }
    }

    Ok(())
}
