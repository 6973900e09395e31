//! custref-to-sql CLI - Convert a customer reference export to SQL
//!
//! ```bash
//! custref-to-sql export.csv export.sql --create   # file to file, with DDL
//! custref-to-sql < export.csv > export.sql         # stdin to stdout
//! custref-to-sql export.csv --dump-json            # inspect the parsed hierarchy
//! ```
//!
//! Set `RUST_LOG=debug` to trace the record state machine on stderr.

use clap::Parser;
use custref::{convert_file, convert_reader, ConvertOptions, OutputFormat};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "custref-to-sql")]
#[command(about = "Convert proprietary customer reference data to SQL", long_about = None)]
struct Cli {
    /// Input export (default: stdin)
    input: Option<PathBuf>,

    /// Output file (default: stdout)
    output: Option<PathBuf>,

    /// Include SQL "CREATE TABLE" commands
    #[arg(long)]
    create: bool,

    /// Field delimiter
    #[arg(short, long, default_value = ";")]
    delimiter: char,

    /// Input encoding (auto-detect if not specified)
    #[arg(short, long, env = "CUSTREF_ENCODING")]
    encoding: Option<String>,

    /// Write the parsed customers as JSON instead of SQL
    #[arg(long)]
    dump_json: bool,
}

impl Cli {
    fn options(&self) -> Result<ConvertOptions, Box<dyn std::error::Error>> {
        let delimiter = u8::try_from(self.delimiter)
            .map_err(|_| format!("delimiter must be a single-byte character: {:?}", self.delimiter))?;
        Ok(ConvertOptions {
            create_tables: self.create,
            delimiter,
            encoding: self.encoding.clone(),
            format: if self.dump_json {
                OutputFormat::Json
            } else {
                OutputFormat::Sql
            },
        })
    }
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let options = cli.options()?;

    match (&cli.input, &cli.output) {
        (Some(input), Some(output)) => convert_file(input, output, &options)?,
        (Some(input), None) => convert_reader(File::open(input)?, io::stdout().lock(), &options)?,
        (None, _) => convert_reader(io::stdin().lock(), io::stdout().lock(), &options)?,
    };
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["custref-to-sql", "--encoding", "utf-8"]).unwrap();
        assert!(cli.input.is_none());
        assert!(cli.output.is_none());
        let options = cli.options().unwrap();
        assert!(!options.create_tables);
        assert_eq!(options.delimiter, b';');
        assert_eq!(options.format, OutputFormat::Sql);
    }

    #[test]
    fn test_positional_files_and_flags() {
        let cli = Cli::try_parse_from(["custref-to-sql", "in.csv", "out.sql", "--create", "--dump-json"])
            .unwrap();
        assert_eq!(cli.input, Some(PathBuf::from("in.csv")));
        assert_eq!(cli.output, Some(PathBuf::from("out.sql")));
        let options = cli.options().unwrap();
        assert!(options.create_tables);
        assert_eq!(options.format, OutputFormat::Json);
    }

    #[test]
    fn test_multibyte_delimiter_rejected() {
        let cli = Cli::try_parse_from(["custref-to-sql", "--delimiter", "€"]).unwrap();
        assert!(cli.options().is_err());
    }

    const EXPORT: &str = "H;x;x;x;x;x;x;d1;d2\nH_CUST\n\
        CUST;C001;Acme;;12;Main Street;;;;;Jo;;EN;English;yes;HQ;555 0100;555 0101";

    fn cli_for(input: &std::path::Path, output: &std::path::Path) -> Cli {
        Cli::try_parse_from([
            "custref-to-sql",
            input.to_str().unwrap(),
            output.to_str().unwrap(),
            "--encoding",
            "utf-8",
        ])
        .unwrap()
    }

    #[test]
    fn test_run_writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("export.csv");
        let output = dir.path().join("export.sql");
        std::fs::write(&input, EXPORT).unwrap();

        run(&cli_for(&input, &output)).unwrap();
        let sql = std::fs::read_to_string(&output).unwrap();
        assert!(sql.starts_with("BEGIN TRANSACTION;"));
        assert!(sql.contains("VALUES ('C001', 'Acme'"));
    }

    #[test]
    fn test_run_leaves_no_output_on_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("export.csv");
        let output = dir.path().join("export.sql");
        std::fs::write(&input, "H;x;x;x;x;x;x;d1;d2\nCUST;C001").unwrap();

        assert!(run(&cli_for(&input, &output)).is_err());
        assert!(!output.exists());
    }
}
