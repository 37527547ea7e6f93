use std::collections::HashMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use reqwest::Url;

use super::model::{CellValue, Dataset, Row};

/// Header given to a column whose header cell is empty.
const EMPTY_HEADER: &str = "__EMPTY";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Fetch `source` and decode its first sheet into a [`Dataset`].
///
/// `source` may be an `http(s)://` URL, a `file://` URL or a plain path.
/// Decoding dispatches on the extension of the source path:
/// * `.csv` – comma-separated text, all fields kept as text
/// * anything else – xlsx / xlsm / xlsb / xls / ods, sniffed by calamine
pub fn load_source(source: &str, timeout: Duration) -> Result<Dataset> {
    let bytes = fetch_bytes(source, timeout)?;
    let ext = source_extension(source);
    decode(bytes, ext.as_deref()).with_context(|| format!("decoding {source}"))
}

// ---------------------------------------------------------------------------
// Fetch
// ---------------------------------------------------------------------------

/// Retrieve the raw bytes behind `source`.
pub fn fetch_bytes(source: &str, timeout: Duration) -> Result<Vec<u8>> {
    let source = source.trim();
    if source.is_empty() {
        bail!("no file URL given");
    }

    if let Ok(url) = Url::parse(source) {
        match url.scheme() {
            "http" | "https" => return fetch_http(url, timeout),
            "file" => {
                let path = url
                    .to_file_path()
                    .map_err(|_| anyhow!("invalid file URL: {source}"))?;
                return read_file(&path);
            }
            // Windows drive letters parse as a one-letter scheme.
            scheme if scheme.len() > 1 => bail!("unsupported URL scheme: {scheme}"),
            _ => {}
        }
    }

    read_file(Path::new(source))
}

fn fetch_http(url: Url, timeout: Duration) -> Result<Vec<u8>> {
    log::debug!("fetching {url}");
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .context("building HTTP client")?;

    let response = client
        .get(url.clone())
        .send()
        .with_context(|| format!("requesting {url}"))?
        .error_for_status()
        .with_context(|| format!("fetching {url}"))?;

    let bytes = response
        .bytes()
        .with_context(|| format!("reading response body of {url}"))?;
    Ok(bytes.to_vec())
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("reading {}", path.display()))
}

/// Lower-cased extension of the path component of `source`, if any.
pub fn source_extension(source: &str) -> Option<String> {
    let path = match Url::parse(source) {
        Ok(url) if url.scheme().len() > 1 => PathBuf::from(url.path()),
        _ => PathBuf::from(source),
    };
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

// ---------------------------------------------------------------------------
// Decode
// ---------------------------------------------------------------------------

/// Decode raw bytes into a dataset. `ext` selects the CSV reader; all other
/// inputs are handed to calamine, which detects the workbook format itself.
pub fn decode(bytes: Vec<u8>, ext: Option<&str>) -> Result<Dataset> {
    match ext {
        Some("csv") => decode_csv(&bytes),
        _ => decode_workbook(bytes),
    }
}

fn decode_workbook(bytes: Vec<u8>) -> Result<Dataset> {
    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes)).context("opening workbook")?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .context("workbook has no sheets")?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("reading sheet '{sheet_name}'"))?;

    let mut rows = range.rows();
    let Some(header_cells) = rows.next() else {
        return Ok(Dataset::default());
    };
    let headers = unique_headers(header_cells.iter().map(|c| c.to_string()));

    let records = rows.map(|cells| {
        cells.iter().map(cell_value).collect::<Vec<_>>()
    });
    build_dataset(&headers, records)
}

fn decode_csv(bytes: &[u8]) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers = unique_headers(
        reader
            .headers()
            .context("reading CSV headers")?
            .iter()
            .map(str::to_string),
    );

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        records.push(
            record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        CellValue::Null
                    } else {
                        CellValue::Text(field.to_string())
                    }
                })
                .collect::<Vec<_>>(),
        );
    }
    build_dataset(&headers, records)
}

/// Zip each record with the headers. Cells past the end of a short record are
/// materialized as NULL; records without any value are skipped.
fn build_dataset<I>(headers: &[String], records: I) -> Result<Dataset>
where
    I: IntoIterator<Item = Vec<CellValue>>,
{
    let mut rows = Vec::new();
    for values in records {
        if values.iter().all(CellValue::is_null) {
            continue;
        }
        let mut values = values.into_iter();
        let row: Row = headers
            .iter()
            .map(|h| (h.as_str(), values.next().unwrap_or(CellValue::Null)))
            .collect();
        rows.push(row);
    }

    let dataset = Dataset::from_rows(rows)?;
    log::debug!(
        "decoded {} rows x {} columns",
        dataset.len(),
        headers.len()
    );
    Ok(dataset)
}

/// Turn raw header texts into unique column names: blanks become `__EMPTY`,
/// repeats get `_1`, `_2`, … appended.
fn unique_headers<I>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut headers = Vec::new();

    for text in raw {
        let base = if text.is_empty() {
            EMPTY_HEADER.to_string()
        } else {
            text
        };

        let name = match seen.get(&base).copied() {
            None => base.clone(),
            Some(mut counter) => {
                let mut candidate = format!("{base}_{counter}");
                while seen.contains_key(&candidate) {
                    counter += 1;
                    candidate = format!("{base}_{counter}");
                }
                seen.insert(base.clone(), counter + 1);
                seen.insert(candidate.clone(), 1);
                candidate
            }
        };
        seen.entry(base).or_insert(1);
        headers.push(name);
    }
    headers
}

/// Convert a calamine cell. Dates stay as their serial number; error cells
/// (`#DIV/0!`, `#N/A`, ...) carry no value and become NULL.
fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(_) => CellValue::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filtered_indices, FilterMode};
    use calamine::CellErrorType;
    use rust_xlsxwriter::Workbook;
    use std::io::Write;

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn sample_xlsx() -> Vec<u8> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "A").unwrap();
        sheet.write_string(0, 1, "B").unwrap();
        sheet.write_number(1, 0, 1.0).unwrap();
        sheet.write_number(2, 1, 2.0).unwrap();
        sheet.write_number(3, 0, 3.0).unwrap();
        sheet.write_number(3, 1, 4.5).unwrap();
        // Row 4 left blank on purpose.
        sheet.write_string(5, 0, "x").unwrap();
        sheet.write_boolean(5, 1, true).unwrap();

        let other = workbook.add_worksheet();
        other.set_name("Ignored").unwrap();
        other.write_string(0, 0, "Z").unwrap();

        workbook.save_to_buffer().unwrap()
    }

    fn rendered(ds: &Dataset) -> Vec<Vec<String>> {
        ds.rows()
            .iter()
            .map(|r| r.values().map(|v| v.to_string()).collect())
            .collect()
    }

    #[test]
    fn decodes_first_sheet_with_null_cells() {
        let ds = decode(sample_xlsx(), Some("xlsx")).unwrap();
        assert_eq!(ds.column_names(), &["A".to_string(), "B".to_string()]);
        assert_eq!(
            rendered(&ds),
            vec![
                vec!["1", "NULL"],
                vec!["NULL", "2"],
                vec!["3", "4.5"],
                vec!["x", "true"],
            ]
        );
        assert_eq!(ds.rows()[0].get("B"), Some(&CellValue::Null));
    }

    #[test]
    fn workbook_format_is_sniffed_without_extension() {
        let ds = decode(sample_xlsx(), None).unwrap();
        assert_eq!(ds.len(), 4);
    }

    #[test]
    fn error_cells_decode_as_null() {
        assert_eq!(cell_value(&Data::Error(CellErrorType::Div0)), CellValue::Null);
        assert_eq!(cell_value(&Data::Error(CellErrorType::NA)), CellValue::Null);

        let headers = vec!["A".to_string(), "B".to_string()];
        let records = vec![
            vec![cell_value(&Data::Float(1.0)), cell_value(&Data::Error(CellErrorType::Div0))],
            vec![cell_value(&Data::Float(2.0)), cell_value(&Data::Float(3.0))],
        ];
        let ds = build_dataset(&headers, records).unwrap();
        assert_eq!(ds.rows()[0].get("B").map(|v| v.to_string()).as_deref(), Some("NULL"));

        let idx = filtered_indices(&ds, &["B".to_string()], FilterMode::RequireNull).unwrap();
        assert_eq!(idx, vec![0]);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(decode(b"definitely not a workbook".to_vec(), Some("xlsx")).is_err());
    }

    #[test]
    fn header_only_sheet_is_empty_dataset() {
        let mut workbook = Workbook::new();
        workbook.add_worksheet().write_string(0, 0, "only").unwrap();
        let ds = decode(workbook.save_to_buffer().unwrap(), None).unwrap();
        assert!(ds.is_empty());
    }

    #[test]
    fn csv_fields_are_text_and_blanks_are_null() {
        let csv = b"name,score\nann,3\nbob,\n,\ncid,7\n".to_vec();
        let ds = decode(csv, Some("csv")).unwrap();
        assert_eq!(
            rendered(&ds),
            vec![vec!["ann", "3"], vec!["bob", "NULL"], vec!["cid", "7"]]
        );
        assert_eq!(ds.rows()[0].get("score"), Some(&CellValue::Text("3".into())));
    }

    #[test]
    fn short_csv_records_are_padded_with_null() {
        let ds = decode(b"a,b,c\n1\n".to_vec(), Some("csv")).unwrap();
        assert_eq!(rendered(&ds), vec![vec!["1", "NULL", "NULL"]]);
    }

    #[test]
    fn blank_and_duplicate_headers_are_renamed() {
        let headers = unique_headers(
            ["id", "", "id", "", "id", "id_1"].iter().map(|s| s.to_string()),
        );
        assert_eq!(
            headers,
            vec!["id", "__EMPTY", "id_1", "__EMPTY_1", "id_2", "id_1_1"]
        );
    }

    #[test]
    fn loads_from_plain_path_and_file_url() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(b"k,v\n1,\n").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let ds = load_source(&path, TIMEOUT).unwrap();
        assert_eq!(ds.rows()[0].get("v"), Some(&CellValue::Null));

        let url = Url::from_file_path(file.path()).unwrap().to_string();
        let ds = load_source(&url, TIMEOUT).unwrap();
        assert_eq!(ds.len(), 1);
    }

    #[test]
    fn empty_or_missing_source_fails() {
        assert!(load_source("", TIMEOUT).is_err());
        assert!(load_source("/definitely/not/here.xlsx", TIMEOUT).is_err());
        assert!(fetch_bytes("ftp://host/data.xlsx", TIMEOUT).is_err());
    }

    #[test]
    fn extension_ignores_query_string() {
        assert_eq!(
            source_extension("https://host/data.CSV?token=1").as_deref(),
            Some("csv")
        );
        assert_eq!(source_extension("/tmp/book.xlsx").as_deref(), Some("xlsx"));
        assert_eq!(source_extension("https://host/export"), None);
    }
}
