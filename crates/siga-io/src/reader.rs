//! SIGA CSV loader.
//!
//! ANEEL publishes the registry as a semicolon-delimited file encoded in
//! Latin-1. This module decodes the bytes, splits the rows and hands back
//! [`RawRecord`]s with every field still as text; interpretation is left to
//! `siga-core`.

use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use serde::{Deserialize, Serialize};
use siga_core::RawRecord;
use thiserror::Error;
use tracing::{debug, warn};

/// Text encoding of the source file.
///
/// `Latin1` decodes with windows-1252, the WHATWG mapping for the `latin1`
/// label; it agrees with ISO-8859-1 on every printable character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceEncoding {
    #[default]
    Latin1,
    Utf8,
}

#[derive(Debug, Error)]
#[error("unknown encoding '{0}' (expected latin1 or utf8)")]
pub struct UnknownEncoding(String);

impl FromStr for SourceEncoding {
    type Err = UnknownEncoding;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "latin1" | "latin-1" | "iso-8859-1" | "windows-1252" | "cp1252" => Ok(Self::Latin1),
            "utf8" | "utf-8" => Ok(Self::Utf8),
            other => Err(UnknownEncoding(other.to_string())),
        }
    }
}

impl fmt::Display for SourceEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latin1 => write!(f, "latin1"),
            Self::Utf8 => write!(f, "utf8"),
        }
    }
}

impl SourceEncoding {
    fn encoding(self) -> &'static Encoding {
        match self {
            Self::Latin1 => WINDOWS_1252,
            Self::Utf8 => UTF_8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvSourceOptions {
    pub delimiter: u8,
    pub encoding: SourceEncoding,
}

impl Default for CsvSourceOptions {
    fn default() -> Self {
        Self {
            delimiter: b';',
            encoding: SourceEncoding::Latin1,
        }
    }
}

/// Header plus rows, exactly as found in the file.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub header: Vec<String>,
    pub rows: Vec<RawRecord>,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Read and split a SIGA export from disk.
pub fn read_raw_table(path: &Path, options: &CsvSourceOptions) -> Result<RawTable> {
    let bytes =
        fs::read(path).with_context(|| format!("reading source file '{}'", path.display()))?;
    debug!(path = %path.display(), bytes = bytes.len(), "loaded source file");
    parse_raw_table(&bytes, options)
        .with_context(|| format!("parsing source file '{}'", path.display()))
}

/// Decode and split in-memory CSV bytes.
///
/// Header names are trimmed. Empty cells and cells missing from short rows
/// become absent values; cells beyond the header width are dropped.
pub fn parse_raw_table(bytes: &[u8], options: &CsvSourceOptions) -> Result<RawTable> {
    let text = decode(bytes, options.encoding);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(text.as_bytes());

    let header: Vec<String> = reader
        .headers()
        .context("reading CSV header")?
        .iter()
        .map(str::to_string)
        .collect();
    if header.iter().all(|h| h.is_empty()) {
        bail!("source file has no header row");
    }

    let mut rows = Vec::new();
    let mut ragged = 0usize;
    for (idx, result) in reader.records().enumerate() {
        // +2: one-based line numbers and the header line
        let record = result.with_context(|| format!("reading CSV line {}", idx + 2))?;
        if record.len() != header.len() {
            ragged += 1;
        }
        let raw = RawRecord::from_pairs(header.iter().enumerate().map(|(i, column)| {
            let value = record
                .get(i)
                .filter(|v| !v.is_empty())
                .map(str::to_string);
            (column.clone(), value)
        }));
        rows.push(raw);
    }

    if ragged > 0 {
        warn!(
            rows = ragged,
            columns = header.len(),
            "rows with a cell count different from the header"
        );
    }
    debug!(rows = rows.len(), columns = header.len(), "parsed source table");

    Ok(RawTable { header, rows })
}

fn decode(bytes: &[u8], encoding: SourceEncoding) -> Cow<'_, str> {
    // A byte-order mark overrides the configured encoding.
    let (encoding, bom_len) = Encoding::for_bom(bytes).unwrap_or((encoding.encoding(), 0));
    let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
    if had_errors {
        warn!(
            encoding = encoding.name(),
            "source contained malformed sequences; replaced with U+FFFD"
        );
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "NomEmpreendimento;SigUFPrincipal;SigTipoGeracao;MdaPotenciaFiscalizadaKw";

    fn latin1(text: &str) -> Vec<u8> {
        let (bytes, _, unmappable) = WINDOWS_1252.encode(text);
        assert!(!unmappable);
        bytes.into_owned()
    }

    #[test]
    fn test_latin1_decoding() {
        let csv = format!("{HEADER}\nUsina São João;SP;UHE;1500,5\n");
        let table = parse_raw_table(&latin1(&csv), &CsvSourceOptions::default()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0].get("NomEmpreendimento"), Some("Usina São João"));
        assert_eq!(table.rows[0].get("MdaPotenciaFiscalizadaKw"), Some("1500,5"));
    }

    #[test]
    fn test_utf8_with_bom_is_detected() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(format!("{HEADER}\nEólica Açu;RN;EOL;10\n").as_bytes());
        let table = parse_raw_table(&bytes, &CsvSourceOptions::default()).unwrap();
        assert_eq!(table.header[0], "NomEmpreendimento");
        assert_eq!(table.rows[0].get("NomEmpreendimento"), Some("Eólica Açu"));
    }

    #[test]
    fn test_header_trimmed_values_kept() {
        let csv = " NomEmpreendimento ; SigTipoGeracao \n  Usina A ; UFV \n";
        let options = CsvSourceOptions {
            encoding: SourceEncoding::Utf8,
            ..CsvSourceOptions::default()
        };
        let table = parse_raw_table(csv.as_bytes(), &options).unwrap();
        assert_eq!(table.header, vec!["NomEmpreendimento", "SigTipoGeracao"]);
        // value trimming belongs to the normalizer
        assert_eq!(table.rows[0].get("SigTipoGeracao"), Some(" UFV "));
    }

    #[test]
    fn test_empty_and_missing_cells_are_absent() {
        let csv = format!("{HEADER}\nUsina A;;UTE\n");
        let table = parse_raw_table(csv.as_bytes(), &CsvSourceOptions::default()).unwrap();
        let row = &table.rows[0];
        assert_eq!(row.get("SigUFPrincipal"), None);
        assert_eq!(row.get("MdaPotenciaFiscalizadaKw"), None);
        assert!(row.has_column("MdaPotenciaFiscalizadaKw"));
        assert_eq!(row.get("SigTipoGeracao"), Some("UTE"));
    }

    #[test]
    fn test_quoted_semicolons_survive() {
        let csv = "Nome;DscMuniBanhado\nUsina;\"Campinas - SP;Hortolandia - SP\"\n";
        let table = parse_raw_table(csv.as_bytes(), &CsvSourceOptions::default()).unwrap();
        assert_eq!(
            table.rows[0].get("DscMuniBanhado"),
            Some("Campinas - SP;Hortolandia - SP")
        );
    }

    #[test]
    fn test_custom_delimiter() {
        let options = CsvSourceOptions {
            delimiter: b',',
            encoding: SourceEncoding::Utf8,
        };
        let table = parse_raw_table(b"A,B\n1,2\n", &options).unwrap();
        assert_eq!(table.rows[0].get("B"), Some("2"));
    }

    #[test]
    fn test_empty_input_is_an_error() {
        assert!(parse_raw_table(b"", &CsvSourceOptions::default()).is_err());
    }

    #[test]
    fn test_header_only() {
        let table = parse_raw_table(HEADER.as_bytes(), &CsvSourceOptions::default()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.header.len(), 4);
    }

    #[test]
    fn test_encoding_from_str() {
        assert_eq!("LATIN1".parse::<SourceEncoding>().unwrap(), SourceEncoding::Latin1);
        assert_eq!("iso-8859-1".parse::<SourceEncoding>().unwrap(), SourceEncoding::Latin1);
        assert_eq!("utf-8".parse::<SourceEncoding>().unwrap(), SourceEncoding::Utf8);
        assert!("ebcdic".parse::<SourceEncoding>().is_err());
        assert_eq!(SourceEncoding::Utf8.to_string(), "utf8");
    }

    #[test]
    fn test_read_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("siga.csv");
        fs::write(&path, latin1(&format!("{HEADER}\nUsina Ibirité;MG;UTE;0\n"))).unwrap();
        let table = read_raw_table(&path, &CsvSourceOptions::default()).unwrap();
        assert_eq!(table.rows[0].get("NomEmpreendimento"), Some("Usina Ibirité"));

        let missing = read_raw_table(&dir.path().join("nope.csv"), &CsvSourceOptions::default());
        assert!(missing.unwrap_err().to_string().contains("nope.csv"));
    }
}
