//! Coordinate-format (Matrix Market style) loader
//!
//! The input is read in two passes. The first pass validates every entry and
//! counts entries per row, which gives `row_ptr` by prefix sum. The reader is
//! then rewound to the first data line and the second pass drops each entry
//! into the next free slot of its row. Entries keep file order within a row,
//! and repeated coordinates are kept as separate entries.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;

use crate::config::CsrConfig;
use crate::error::{try_filled, Result, SparseError};
use crate::matrix::SparseMatrixCSR;

/// Loads a matrix from a coordinate-format file
///
/// ```text
/// % comment lines
/// rows cols nnz
/// row col value      (nnz lines, 1-based indices)
/// ```
///
/// # Errors
///
/// - [`SparseError::Io`] if the file cannot be opened or read
/// - [`SparseError::Format`] for a malformed header, malformed or
///   out-of-range entries, or an entry count different from `nnz`
/// - [`SparseError::Allocation`] if the header's row count needs more storage than
///   can be allocated
pub fn load<P: AsRef<Path>>(path: P) -> Result<SparseMatrixCSR<f64>> {
    load_with_config(path, &CsrConfig::default())
}

/// Loads a matrix from a file using the comment marker from `config`
pub fn load_with_config<P: AsRef<Path>>(path: P, config: &CsrConfig) -> Result<SparseMatrixCSR<f64>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| SparseError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let matrix = read_matrix(BufReader::new(file), config, path)?;
    log::debug!(
        "loaded {}: {}×{}, nnz {}",
        path.display(),
        matrix.n_rows,
        matrix.n_cols,
        matrix.nnz()
    );
    Ok(matrix)
}

/// Loads a matrix from any seekable buffered source
///
/// I/O errors are reported with the placeholder path `<reader>`.
pub fn load_from_reader<R: BufRead + Seek>(reader: R, config: &CsrConfig) -> Result<SparseMatrixCSR<f64>> {
    read_matrix(reader, config, Path::new("<reader>"))
}

/// Line source that tracks 1-based line numbers and byte offsets
struct Lines<'p, R> {
    reader: R,
    path: &'p Path,
    buf: String,
    line_no: usize,
    offset: u64,
}

impl<'p, R: BufRead + Seek> Lines<'p, R> {
    fn new(reader: R, path: &'p Path) -> Self {
        Self {
            reader,
            path,
            buf: String::new(),
            line_no: 0,
            offset: 0,
        }
    }

    fn io_error(&self, source: io::Error) -> SparseError {
        SparseError::Io {
            path: self.path.to_path_buf(),
            source,
        }
    }

    /// Reads the next line without its terminator, with its line number;
    /// `None` at end of input
    fn next_line(&mut self) -> Result<Option<(usize, &str)>> {
        self.buf.clear();
        let n = match self.reader.read_line(&mut self.buf) {
            Ok(n) => n,
            Err(e) => return Err(self.io_error(e)),
        };
        if n == 0 {
            return Ok(None);
        }
        self.line_no += 1;
        self.offset += n as u64;
        Ok(Some((self.line_no, self.buf.trim_end_matches(&['\n', '\r'][..]))))
    }

    fn rewind_to(&mut self, offset: u64, line_no: usize) -> Result<()> {
        if let Err(e) = self.reader.seek(SeekFrom::Start(offset)) {
            return Err(self.io_error(e));
        }
        self.offset = offset;
        self.line_no = line_no;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Header {
    n_rows: usize,
    n_cols: usize,
    nnz: usize,
}

fn parse_header(line: &str, line_no: usize) -> Result<Header> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != 3 {
        return Err(SparseError::format(
            line_no,
            format!("expected header `rows cols nnz`, found {:?}", line),
        ));
    }

    let field = |token: &str, name: &str| {
        token
            .parse::<usize>()
            .map_err(|_| SparseError::format(line_no, format!("invalid {} {:?} in header", name, token)))
    };

    Ok(Header {
        n_rows: field(tokens[0], "row count")?,
        n_cols: field(tokens[1], "column count")?,
        nnz: field(tokens[2], "entry count")?,
    })
}

/// Parses `row col value` into 0-based indices; `None` for a blank line
fn parse_entry(line: &str, line_no: usize, header: &Header) -> Result<Option<(usize, usize, f64)>> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.is_empty() {
        return Ok(None);
    }
    if tokens.len() != 3 {
        return Err(SparseError::format(
            line_no,
            format!("expected entry `row col value`, found {:?}", line),
        ));
    }

    let index = |token: &str, name: &str, bound: usize| -> Result<usize> {
        let idx = token
            .parse::<usize>()
            .map_err(|_| SparseError::format(line_no, format!("invalid {} index {:?}", name, token)))?;
        if idx == 0 || idx > bound {
            return Err(SparseError::format(
                line_no,
                format!("{} index {} out of range 1..={}", name, idx, bound),
            ));
        }
        Ok(idx - 1)
    };

    let row = index(tokens[0], "row", header.n_rows)?;
    let col = index(tokens[1], "column", header.n_cols)?;
    let val = tokens[2]
        .parse::<f64>()
        .map_err(|_| SparseError::format(line_no, format!("invalid value {:?}", tokens[2])))?;

    Ok(Some((row, col, val)))
}

fn read_matrix<R: BufRead + Seek>(reader: R, config: &CsrConfig, path: &Path) -> Result<SparseMatrixCSR<f64>> {
    let mut lines = Lines::new(reader, path);

    // Skip comments and read header
    let header = loop {
        match lines.next_line()? {
            Some((_, line)) if line.starts_with(config.comment_marker) => continue,
            Some((line_no, line)) => break parse_header(line, line_no)?,
            None => {
                return Err(SparseError::format(
                    lines.line_no + 1,
                    "missing header `rows cols nnz`",
                ))
            }
        }
    };
    let header_line = lines.line_no;
    let data_offset = lines.offset;

    let ptr_len = header
        .n_rows
        .checked_add(1)
        .ok_or_else(|| SparseError::format(header_line, "row count too large"))?;
    let mut row_ptr = try_filled(ptr_len, 0usize, "row_ptr")?;

    // First pass: validate and count entries per row
    let mut count = 0;
    while let Some((line_no, line)) = lines.next_line()? {
        if let Some((row, _, _)) = parse_entry(line, line_no, &header)? {
            count += 1;
            if count > header.nnz {
                return Err(SparseError::format(
                    line_no,
                    format!("more entries than the {} announced in the header", header.nnz),
                ));
            }
            row_ptr[row + 1] += 1;
        }
    }
    if count != header.nnz {
        return Err(SparseError::format(
            lines.line_no,
            format!("expected {} entries, found {}", header.nnz, count),
        ));
    }
    for i in 1..ptr_len {
        row_ptr[i] += row_ptr[i - 1];
    }
    log::trace!("first pass over {}: {} entries counted", path.display(), count);

    // Entry storage is sized from the lines actually present, not the header
    let mut col_idx = try_filled(count, 0usize, "col_idx")?;
    let mut values = try_filled(count, 0.0f64, "values")?;

    // Second pass: place each entry at the next free slot of its row
    lines.rewind_to(data_offset, header_line)?;
    let mut cursor = row_ptr.clone();
    while let Some((line_no, line)) = lines.next_line()? {
        if let Some((row, col, val)) = parse_entry(line, line_no, &header)? {
            let pos = cursor[row];
            if pos >= row_ptr[row + 1] {
                return Err(SparseError::format(line_no, "input changed between passes"));
            }
            cursor[row] += 1;
            col_idx[pos] = col;
            values[pos] = val;
        }
    }
    log::trace!("second pass over {}: {} entries placed", path.display(), count);

    Ok(SparseMatrixCSR {
        n_rows: header.n_rows,
        n_cols: header.n_cols,
        row_ptr,
        col_idx,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn load_str(input: &str) -> Result<SparseMatrixCSR<f64>> {
        load_from_reader(Cursor::new(input.as_bytes()), &CsrConfig::default())
    }

    #[test]
    fn test_load_basic() {
        let input = "%%MatrixMarket matrix coordinate real general\n\
                     % a comment\n\
                     3 4 4\n\
                     3 1 4.0\n\
                     1 2 1.5\n\
                     3 4 -2\n\
                     1 1 7\n";
        let matrix = load_str(input).unwrap();

        assert_eq!(matrix.shape(), (3, 4));
        assert_eq!(matrix.row_ptr, vec![0, 2, 2, 4]);
        // file order within each row
        assert_eq!(matrix.col_idx, vec![1, 0, 0, 3]);
        assert_eq!(matrix.values, vec![1.5, 7.0, 4.0, -2.0]);
        assert!(matrix.validate().is_ok());
    }

    #[test]
    fn test_duplicates_are_kept() {
        let matrix = load_str("2 2 3\n1 1 1.0\n1 1 2.0\n2 2 3.0\n").unwrap();
        assert_eq!(matrix.nnz(), 3);
        assert_eq!(matrix.row_ptr, vec![0, 2, 3]);
        assert_eq!(matrix.col_idx, vec![0, 0, 1]);
        assert_eq!(matrix.values, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_blank_data_lines_and_crlf() {
        let matrix = load_str("2 2 2\r\n1 1 1.0\r\n\r\n2 2 2.0\r\n").unwrap();
        assert_eq!(matrix.values, vec![1.0, 2.0]);
    }

    #[test]
    fn test_no_trailing_newline() {
        let matrix = load_str("1 1 1\n1 1 9.5").unwrap();
        assert_eq!(matrix.values, vec![9.5]);
    }

    #[test]
    fn test_custom_comment_marker() {
        let config = CsrConfig::default().with_comment_marker('#');
        let matrix = load_from_reader(Cursor::new("# hello\n1 1 1\n1 1 2\n".as_bytes()), &config).unwrap();
        assert_eq!(matrix.values, vec![2.0]);
    }

    #[test]
    fn test_header_errors() {
        for (input, line) in [
            ("a b c\n", 1),
            ("% c\n3 3\n", 2),
            ("3 3 -1\n", 1),
            ("3 3 1 1\n", 1),
            ("\n1 1 1\n1 1 1\n", 1),
        ] {
            match load_str(input) {
                Err(SparseError::Format { line: l, .. }) => assert_eq!(l, line, "input {:?}", input),
                other => panic!("expected format error for {:?}, got {:?}", input, other),
            }
        }
    }

    #[test]
    fn test_missing_header() {
        assert!(matches!(load_str(""), Err(SparseError::Format { line: 1, .. })));
        assert!(matches!(load_str("% only\n"), Err(SparseError::Format { line: 2, .. })));
    }

    #[test]
    fn test_entry_errors() {
        for input in [
            "2 2 1\n0 1 1.0\n",
            "2 2 1\n3 1 1.0\n",
            "2 2 1\n1 3 1.0\n",
            "2 2 1\n1 1 x\n",
            "2 2 1\n1 1\n",
            "2 2 1\n% late comment\n",
            "2 2 2\n1 1 1.0\n",
            "2 2 1\n1 1 1.0\n2 2 2.0\n",
        ] {
            assert!(
                matches!(load_str(input), Err(SparseError::Format { .. })),
                "input {:?}",
                input
            );
        }
    }

    #[test]
    fn test_entry_error_reports_line() {
        let err = load_str("% c\n2 2 2\n1 1 1.0\n1 9 1.0\n").unwrap_err();
        assert!(matches!(err, SparseError::Format { line: 4, .. }));
        assert!(err.to_string().contains("column index 9 out of range 1..=2"));
    }

    #[test]
    fn test_overstated_entry_count_is_format_error() {
        let input = format!("1 1 {}\n1 1 1.0\n", usize::MAX);
        assert!(matches!(load_str(&input), Err(SparseError::Format { line: 2, .. })));

        let err = load_str("1 1 100000000\n1 1 1.0\n").unwrap_err();
        assert!(matches!(err, SparseError::Format { line: 2, .. }));
        assert!(err.to_string().contains("expected 100000000 entries, found 1"));
    }

    #[test]
    fn test_huge_row_count_is_allocation_error() {
        let input = format!("{} 1 0\n", usize::MAX / 2);
        assert!(matches!(load_str(&input), Err(SparseError::Allocation { what: "row_ptr", .. })));
    }

    #[test]
    fn test_empty_matrix() {
        let matrix = load_str("3 2 0\n").unwrap();
        assert_eq!(matrix.shape(), (3, 2));
        assert_eq!(matrix.row_ptr, vec![0, 0, 0, 0]);
        assert!(matrix.is_empty());
    }

    #[test]
    fn test_missing_file() {
        let err = load("/nonexistent/csrkit/matrix.mtx").unwrap_err();
        assert!(matches!(err, SparseError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/csrkit/matrix.mtx"));
    }
}
