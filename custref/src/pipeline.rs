//! High-level conversion API.
//!
//! Combines all steps: decoding, record splitting, the state machine, and
//! SQL (or JSON) rendering. Output is rendered completely in memory before
//! anything is written, so a failing conversion never leaves partial output.
//!
//! # Example
//!
//! ```rust,ignore
//! use custref::{convert_file, ConvertOptions};
//! use std::path::Path;
//!
//! let options = ConvertOptions { create_tables: true, ..Default::default() };
//! let summary = convert_file(Path::new("export.csv"), Path::new("export.sql"), &options)?;
//! println!("Converted {} customers", summary.customers);
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use tracing::info;

use crate::aggregate::ProcessingState;
use crate::emit::render_sql;
use crate::error::{ConvertError, ConvertResult};
use crate::machine::process;
use crate::parser::{decode_input, records, DEFAULT_DELIMITER};

/// What to write once the export has been read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// SQL script wrapped in a transaction.
    #[default]
    Sql,
    /// The customer hierarchy as pretty-printed JSON.
    Json,
}

/// Options for a conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Include `CREATE TABLE` statements.
    pub create_tables: bool,

    /// Field separator.
    pub delimiter: u8,

    /// Input encoding label; detected when absent.
    pub encoding: Option<String>,

    /// Output format.
    pub format: OutputFormat,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            create_tables: false,
            delimiter: DEFAULT_DELIMITER,
            encoding: None,
            format: OutputFormat::Sql,
        }
    }
}

/// Result of converting one export.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// Aggregated customers and references.
    pub state: ProcessingState,
    /// Rendered output.
    pub output: String,
    /// Encoding the input was decoded with.
    pub encoding: String,
    /// Number of records read before the run ended.
    pub records: usize,
}

/// Counts reported after writing a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConvertSummary {
    pub records: usize,
    pub customers: usize,
    pub references: usize,
}

impl Conversion {
    pub fn summary(&self) -> ConvertSummary {
        ConvertSummary {
            records: self.records,
            customers: self.state.customers.len(),
            references: self.state.reference_count(),
        }
    }
}

/// Convert raw export bytes.
pub fn convert_bytes(bytes: &[u8], options: &ConvertOptions) -> ConvertResult<Conversion> {
    let (content, encoding) = decode_input(bytes, options.encoding.as_deref())?;
    let (state, fed) = process(
        records(&content, options.delimiter).map(|record| record.map_err(ConvertError::from)),
    )?;

    let output = render(&state, options)?;
    info!(
        records = fed,
        customers = state.customers.len(),
        references = state.reference_count(),
        encoding = %encoding,
        "converted export"
    );

    Ok(Conversion {
        state,
        output,
        encoding,
        records: fed,
    })
}

/// Render the finished state in the requested format.
pub fn render(state: &ProcessingState, options: &ConvertOptions) -> ConvertResult<String> {
    Ok(match options.format {
        OutputFormat::Sql => render_sql(state, options.create_tables)?,
        OutputFormat::Json => serde_json::to_string_pretty(&state.customers)?,
    })
}

/// Read an export from `input` and write the result to `output`.
///
/// The streams stay owned by the caller.
pub fn convert_reader<R: Read, W: Write>(
    mut input: R,
    mut output: W,
    options: &ConvertOptions,
) -> ConvertResult<ConvertSummary> {
    let mut bytes = Vec::new();
    input.read_to_end(&mut bytes)?;

    let conversion = convert_bytes(&bytes, options)?;
    output.write_all(conversion.output.as_bytes())?;
    output.flush()?;
    Ok(conversion.summary())
}

/// Convert the export at `input` into the file at `output`.
pub fn convert_file(
    input: &Path,
    output: &Path,
    options: &ConvertOptions,
) -> ConvertResult<ConvertSummary> {
    let bytes = fs::read(input)?;
    let conversion = convert_bytes(&bytes, options)?;
    fs::write(output, &conversion.output)?;
    Ok(conversion.summary())
}
