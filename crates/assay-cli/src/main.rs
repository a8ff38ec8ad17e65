//! # assay CLI entry point
//!
//! Parses command-line arguments, loads configuration, and dispatches to
//! subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use assay_cli::check::{run_check, CheckArgs};
use assay_cli::config::AssayConfig;
use assay_cli::query::{run_query, QueryArgs};
use assay_cli::validate::{run_validate, ValidateArgs};

/// assay: JSON Schema validation and path-query checks for HTTP responses.
#[derive(Parser, Debug)]
#[command(name = "assay", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate JSON documents against a JSON Schema.
    Validate(ValidateArgs),

    /// Print the values a path query reaches in a JSON document.
    Query(QueryArgs),

    /// Run a YAML check suite against a JSON response body.
    Check(CheckArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match AssayConfig::load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
    };

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args, &config),
        Commands::Query(args) => run_query(&args),
        Commands::Check(args) => run_check(&args, &config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parse_validate_multiple_documents() {
        let cli =
            Cli::try_parse_from(["assay", "validate", "--schema", "s.json", "a.json", "b.json"])
                .unwrap();
        if let Commands::Validate(args) = cli.command {
            assert_eq!(args.schema, PathBuf::from("s.json"));
            assert_eq!(args.documents.len(), 2);
        } else {
            panic!("expected validate");
        }
    }

    #[test]
    fn cli_parse_validate_requires_document() {
        assert!(Cli::try_parse_from(["assay", "validate", "--schema", "s.json"]).is_err());
    }

    #[test]
    fn cli_parse_validate_requires_schema() {
        assert!(Cli::try_parse_from(["assay", "validate", "a.json"]).is_err());
    }

    #[test]
    fn cli_parse_query() {
        let cli = Cli::try_parse_from(["assay", "query", "data[].id", "r.json", "--strict"]).unwrap();
        if let Commands::Query(args) = cli.command {
            assert_eq!(args.query, "data[].id");
            assert_eq!(args.document, PathBuf::from("r.json"));
            assert!(args.strict);
            assert!(!args.compact);
        } else {
            panic!("expected query");
        }
    }

    #[test]
    fn cli_parse_check() {
        let cli = Cli::try_parse_from(["assay", "check", "--checks", "suite.yaml", "r.json"]).unwrap();
        assert!(matches!(cli.command, Commands::Check(_)));
    }

    #[test]
    fn cli_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "assay", "query", "a", "r.json", "-vv", "--config", "assay.yaml",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("assay.yaml")));
    }

    #[test]
    fn cli_parse_unknown_subcommand_rejected() {
        assert!(Cli::try_parse_from(["assay", "lint"]).is_err());
    }
}
