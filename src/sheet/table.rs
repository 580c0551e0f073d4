//! Delimited-text serializer: flat string rows to and from CSV bytes.
//!
//! Rendering sorts the union of all column names so output is deterministic
//! regardless of row shape. Parsing is line-oriented and lenient: a BOM is
//! stripped, blank lines are discarded, short rows are padded. One record
//! per physical line; a quoted field containing a line break will not
//! survive the line split.

use log::debug;

use crate::error::{AbookError, AbookResult};

/// A flat column-name to cell-value mapping that remembers first-insertion
/// order. `set` on an existing key replaces the value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: Vec<(String, String)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.cells.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value,
            None => self.cells.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (k, v) in iter {
            row.set(&k.into(), v);
        }
        row
    }
}

/// Render rows as CSV bytes with a leading UTF-8 BOM. Columns are the
/// lexicographically sorted union of all row keys.
pub fn render(rows: &[Row]) -> AbookResult<Vec<u8>> {
    render_with_columns(&[], rows)
}

/// Like [`render`], with a baseline column set that is always present.
/// An empty input still yields a header line over the baseline columns.
pub fn render_with_columns(baseline: &[String], rows: &[Row]) -> AbookResult<Vec<u8>> {
    let mut columns: Vec<String> = baseline.to_vec();
    for row in rows {
        for key in row.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.to_string());
            }
        }
    }
    columns.sort();

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&columns)?;
    for row in rows {
        writer.write_record(columns.iter().map(|c| row.get(c).unwrap_or("")))?;
    }

    let body = writer
        .into_inner()
        .map_err(|e| AbookError::Other(format!("CSV buffer error: {}", e)))?;

    let mut bytes = Vec::with_capacity(body.len() + 3);
    bytes.extend_from_slice(b"\xef\xbb\xbf");
    bytes.extend_from_slice(&body);
    Ok(bytes)
}

/// Parse CSV bytes into one [`Row`] per data line, keyed by the header
/// line's (trimmed) fields. Decoding never fails: invalid UTF-8 falls back
/// to a lossy decode.
pub fn parse(bytes: &[u8]) -> AbookResult<Vec<Row>> {
    let content = match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => String::from_utf8_lossy(bytes).into_owned(),
    };
    let content = content.trim_matches('\u{feff}');

    let lines: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if lines.len() < 2 {
        return Ok(Vec::new());
    }

    let headers = split_fields(lines[0])?;
    debug!("parsed header: {:?}", headers);

    let mut rows = Vec::with_capacity(lines.len() - 1);
    for line in &lines[1..] {
        let mut values = split_fields(line)?;
        while values.len() < headers.len() {
            values.push(String::new());
        }

        // Surplus fields beyond the header are dropped by the zip.
        let row: Row = headers.iter().cloned().zip(values).collect();
        rows.push(row);
    }

    debug!("parsed {} data rows", rows.len());
    Ok(rows)
}

/// CSV-parse a single line into trimmed fields.
fn split_fields(line: &str) -> AbookResult<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());

    let mut record = csv::StringRecord::new();
    if reader.read_record(&mut record)? {
        Ok(record.iter().map(|f| f.trim().to_string()).collect())
    } else {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> Row {
        pairs.iter().map(|&(k, v)| (k, v)).collect()
    }

    #[test]
    fn row_set_replaces_in_place() {
        let mut r = Row::new();
        r.set("a", "1");
        r.set("b", "2");
        r.set("a", "3");
        assert_eq!(r.get("a"), Some("3"));
        assert_eq!(r.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn render_sorts_union_of_columns() {
        let rows = vec![row(&[("zeta", "1"), ("alpha", "2")]), row(&[("mid", "3")])];
        let bytes = render(&rows).unwrap();
        let text = std::str::from_utf8(&bytes[3..]).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(header, "alpha,mid,zeta");
    }

    #[test]
    fn render_emits_bom() {
        let bytes = render(&[row(&[("a", "1")])]).unwrap();
        assert_eq!(&bytes[..3], b"\xef\xbb\xbf");
    }

    #[test]
    fn render_fills_missing_cells() {
        let rows = vec![row(&[("a", "1")]), row(&[("b", "2")])];
        let bytes = render(&rows).unwrap();
        let text = std::str::from_utf8(&bytes[3..]).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["a,b", "1,", ",2"]);
    }

    #[test]
    fn render_quotes_embedded_delimiters() {
        let bytes = render(&[row(&[("a", "x, y"), ("b", "say \"hi\"")])]).unwrap();
        let text = std::str::from_utf8(&bytes[3..]).unwrap();
        assert_eq!(text.lines().nth(1).unwrap(), "\"x, y\",\"say \"\"hi\"\"\"");
    }

    #[test]
    fn render_with_columns_keeps_baseline_on_empty_input() {
        let baseline = vec!["b".to_string(), "a".to_string()];
        let bytes = render_with_columns(&baseline, &[]).unwrap();
        let text = std::str::from_utf8(&bytes[3..]).unwrap();
        assert_eq!(text.trim(), "a,b");
    }

    #[test]
    fn parse_strips_bom_and_blank_lines() {
        let input = "\u{feff}name,phone\n\nAlice,123\n\n\n".as_bytes();
        let rows = parse(input).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("name"), Some("Alice"));
        assert_eq!(rows[0].get("phone"), Some("123"));
    }

    #[test]
    fn parse_pads_short_rows() {
        let rows = parse(b"a,b,c\n1,2\n").unwrap();
        assert_eq!(rows[0].get("c"), Some(""));
    }

    #[test]
    fn parse_drops_surplus_fields() {
        let rows = parse(b"a,b\n1,2,3\n").unwrap();
        assert_eq!(rows[0].len(), 2);
    }

    #[test]
    fn parse_trims_headers_and_values() {
        let rows = parse(b" a , b \n 1 , 2 \n").unwrap();
        assert_eq!(rows[0].get("a"), Some("1"));
        assert_eq!(rows[0].get("b"), Some("2"));
    }

    #[test]
    fn parse_handles_quoted_fields() {
        let rows = parse(b"a,b\n\"x, y\",\"say \"\"hi\"\"\"\n").unwrap();
        assert_eq!(rows[0].get("a"), Some("x, y"));
        assert_eq!(rows[0].get("b"), Some("say \"hi\""));
    }

    #[test]
    fn parse_accepts_crlf() {
        let rows = parse(b"a,b\r\n1,2\r\n").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("b"), Some("2"));
    }

    #[test]
    fn parse_header_only_yields_no_rows() {
        assert!(parse(b"a,b\n").unwrap().is_empty());
        assert!(parse(b"").unwrap().is_empty());
    }

    #[test]
    fn parse_survives_invalid_utf8() {
        let rows = parse(b"a,b\n1,\xff2\n").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("a"), Some("1"));
    }
}
