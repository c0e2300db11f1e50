//! Command-line interface for the sift query engine.
//!
//! Runs the full pipeline over a query given on the command line and
//! prints the result envelope, or a focused view of it, to stdout.

use std::process::ExitCode;

use clap::Parser;
use sift_typeahead::{FieldResolver, ResolverRegistry, TextOption};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sift")]
#[command(about = "Scan, parse, suggest, and serialize a search query")]
/// Top-level CLI options.
struct Cli {
    /// The query to run, e.g. 'marina +section:commentisfree'
    query: String,

    /// Print the token stream instead of the JSON envelope
    #[arg(long)]
    tokens: bool,

    /// Print the parsed tree instead of the JSON envelope
    #[arg(long)]
    tree: bool,

    /// Register a text field with fixed values: 'id=value,value,...'
    #[arg(long = "field", value_name = "SPEC")]
    fields: Vec<String>,

    /// Register a date field with the given id
    #[arg(long = "date-field", value_name = "ID")]
    date_fields: Vec<String>,
}

/// Parses one `--field` spec of the form `id=value,value,...`.
fn parse_field_spec(spec: &str) -> Result<FieldResolver, String> {
    let (id, values) = spec
        .split_once('=')
        .ok_or_else(|| format!("invalid --field spec '{spec}', expected 'id=value,value,...'"))?;

    if id.is_empty() {
        return Err(format!("invalid --field spec '{spec}', the id is empty"));
    }

    let options = values
        .split(',')
        .filter(|value| !value.is_empty())
        .map(TextOption::plain)
        .collect();

    Ok(FieldResolver::fixed(
        id,
        id,
        format!("Values for the '{id}' field"),
        options,
    ))
}

/// Builds the resolver registry from the CLI flags, in flag order.
fn build_registry(cli: &Cli) -> Result<ResolverRegistry, String> {
    let mut resolvers = Vec::new();

    for spec in &cli.fields {
        resolvers.push(parse_field_spec(spec)?);
    }
    for id in &cli.date_fields {
        resolvers.push(FieldResolver::date(
            id,
            id,
            format!("Date values for the '{id}' field"),
        ));
    }

    Ok(ResolverRegistry::new(resolvers))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let registry = match build_registry(&cli) {
        Ok(registry) => registry,
        Err(message) => {
            eprintln!("error: {message}");
            return ExitCode::FAILURE;
        }
    };

    let envelope = sift::run(&cli.query, &registry, &CancellationToken::new()).await;

    if cli.tokens {
        for token in &envelope.tokens {
            println!("{token}");
        }
    } else if cli.tree {
        match &envelope.ast {
            Some(ast) => print!("{ast}"),
            None => println!("no tree: the query did not parse"),
        }
    } else {
        match serde_json::to_string_pretty(&envelope) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("error: could not serialize envelope: {err}");
                return ExitCode::FAILURE;
            }
        }
    }

    if let Some(error) = &envelope.error {
        match error {
            sift_query::QueryError::Parse(parse_error) => {
                eprintln!("{}", parse_error.format_with_context(&cli.query));
            }
            sift_query::QueryError::Serialization(serialization_error) => {
                eprintln!("{serialization_error}");
            }
        }
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_spec_with_values() {
        let resolver = parse_field_spec("section=sport,culture").unwrap();
        assert_eq!(resolver.id, "section");
        match &resolver.source {
            sift_typeahead::ResolverSource::Static(options) => {
                assert_eq!(options.len(), 2);
                assert_eq!(options[0].label, "sport");
            }
            sift_typeahead::ResolverSource::Lookup(_) => panic!("expected static source"),
        }
    }

    #[test]
    fn field_spec_without_equals_is_rejected() {
        assert!(parse_field_spec("section").is_err());
        assert!(parse_field_spec("=a,b").is_err());
    }
}
