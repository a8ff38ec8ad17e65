//! # Query Subcommand
//!
//! Prints the values a path query reaches in a JSON document, as a JSON
//! array. Useful for writing check suites against a captured response.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use assay_query::{traverse_object, QueryPath};

/// Arguments for the `assay query` subcommand.
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Path query, e.g. `data[].id`.
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// JSON document to query.
    #[arg(value_name = "DOC")]
    pub document: PathBuf,

    /// Reject a query that does not parse instead of printing `[]`.
    #[arg(long)]
    pub strict: bool,

    /// Print the matches on one line.
    #[arg(long)]
    pub compact: bool,
}

/// Execute the query subcommand.
///
/// Returns exit code 0. Matching nothing is not a failure.
pub fn run_query(args: &QueryArgs) -> Result<u8> {
    let document = crate::read_json(&args.document)?;
    let matches = select(&document, args)?;
    tracing::info!(query = %args.query, matches = matches.len(), "query evaluated");

    let output = if args.compact {
        serde_json::to_string(&matches)?
    } else {
        serde_json::to_string_pretty(&matches)?
    };
    println!("{output}");
    Ok(0)
}

fn select<'v>(document: &'v Value, args: &QueryArgs) -> Result<Vec<&'v Value>> {
    if args.strict {
        let path = QueryPath::parse(&args.query)
            .with_context(|| format!("invalid query {:?}", args.query))?;
        Ok(path.evaluate(document))
    } else {
        Ok(traverse_object(document, &args.query))
    }
}
