//! Reading the raw export.
//!
//! Decodes the input bytes (auto-detecting legacy encodings) and splits the
//! text into records. No knowledge of record types here.

use csv::ReaderBuilder;
use tracing::{debug, warn};

use crate::error::{ParseError, ParseResult};

/// Field separator used by the export.
pub const DEFAULT_DELIMITER: u8 = b';';

/// Detect the encoding of raw bytes using chardet.
///
/// Falls back to UTF-8 when the detected charset has no decoder.
pub fn detect_encoding(bytes: &[u8]) -> String {
    let (charset, confidence, _) = chardet::detect(bytes);
    debug!(charset = %charset, confidence, "detected encoding");

    let normalized = match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    };

    if encoding_rs::Encoding::for_label(normalized.as_bytes()).is_some() {
        normalized
    } else {
        "utf-8".to_string()
    }
}

/// Decode bytes to a string using the given encoding label.
pub fn decode_content(bytes: &[u8], encoding: &str) -> ParseResult<String> {
    let encoding = encoding_rs::Encoding::for_label(encoding.trim().as_bytes())
        .ok_or_else(|| ParseError::UnknownEncoding(encoding.to_string()))?;
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        warn!(
            encoding = used.name(),
            "input contained undecodable bytes, replaced with U+FFFD"
        );
    }
    Ok(text.into_owned())
}

/// Lazily split decoded text into records of fields.
///
/// Blank lines are skipped and records may have differing lengths.
pub fn records(content: &str, delimiter: u8) -> impl Iterator<Item = ParseResult<Vec<String>>> + '_ {
    ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes())
        .into_records()
        .map(|record| -> ParseResult<Vec<String>> {
            let record = record?;
            Ok(record.iter().map(str::to_string).collect())
        })
}

/// Decode raw bytes, detecting the encoding unless one is given.
///
/// Returns the text and the encoding label it was decoded with.
pub fn decode_input(bytes: &[u8], encoding: Option<&str>) -> ParseResult<(String, String)> {
    let encoding = match encoding {
        Some(label) => label.to_string(),
        None => detect_encoding(bytes),
    };
    let content = decode_content(bytes, &encoding)?;
    Ok((content, encoding))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_records(content: &str, delimiter: u8) -> ParseResult<Vec<Vec<String>>> {
        records(content, delimiter).collect()
    }

    #[test]
    fn test_simple_records() {
        let records = read_records("H;a;b\nCUST;C001;Acme", b';').unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], vec!["H", "a", "b"]);
        assert_eq!(records[1], vec!["CUST", "C001", "Acme"]);
    }

    #[test]
    fn test_quoted_fields() {
        let records = read_records("REF;\"semi;colon\";\"say \"\"hi\"\"\"", b';').unwrap();
        assert_eq!(records[0], vec!["REF", "semi;colon", "say \"hi\""]);
    }

    #[test]
    fn test_empty_lines_skipped() {
        let records = read_records("A;1\n\nB;2\n", b';').unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_missing_values_kept() {
        let records = read_records("A;;3;", b';').unwrap();
        assert_eq!(records[0], vec!["A", "", "3", ""]);
    }

    #[test]
    fn test_other_delimiter() {
        let records = read_records("A|1|2", b'|').unwrap();
        assert_eq!(records[0], vec!["A", "1", "2"]);
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_content(bytes, "iso-8859-1").unwrap();
        assert_eq!(decoded, "Société");
    }

    #[test]
    fn test_unknown_encoding() {
        let err = decode_content(b"abc", "klingon").unwrap_err();
        assert!(matches!(err, ParseError::UnknownEncoding(_)));
    }

    #[test]
    fn test_ascii_is_utf8() {
        assert_eq!(detect_encoding(b"CUST;C001;Acme"), "utf-8");
    }

    #[test]
    fn test_explicit_encoding_wins() {
        let bytes: &[u8] = &[b'C', b';', 0xE9];
        let (content, encoding) = decode_input(bytes, Some("latin1")).unwrap();
        assert_eq!(encoding, "latin1");
        assert_eq!(read_records(&content, b';').unwrap()[0], vec!["C", "é"]);
    }

    #[test]
    fn test_detected_encoding_reported() {
        let (content, encoding) = decode_input(b"CUST;C001", None).unwrap();
        assert_eq!(encoding, "utf-8");
        assert_eq!(content, "CUST;C001");
    }

    #[test]
    fn test_wrong_encoding_replaces_bytes() {
        // Latin-1 "é" read as UTF-8
        let decoded = decode_content(&[b'C', b';', 0xE9], "utf-8").unwrap();
        assert_eq!(decoded, "C;\u{FFFD}");
    }
}
