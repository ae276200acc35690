/// Structural tag of a single feed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Name,
    Data1,
    Data2,
}

/// Classify by prefix only. Checksums and column widths are not checked here;
/// a malformed data line still counts as a data line.
pub fn classify(line: &str) -> LineKind {
    if line.starts_with("1 ") {
        LineKind::Data1
    } else if line.starts_with("2 ") {
        LineKind::Data2
    } else {
        LineKind::Name
    }
}

/// Strip formatting artifacts left by CRLF feeds and padded columns.
pub fn clean_data(line: &str) -> &str {
    line.trim_end()
}

pub fn clean_name(line: &str) -> &str {
    line.trim()
}
