use crate::error::{CatalogError, Result};
use crate::tle::CatalogId;

/// Catalog number field of line 1, columns 3-7 (one-based).
const FIELD: std::ops::Range<usize> = 2..7;

/// Parse the catalog number out of a line 1.
///
/// Legacy padding (`"    5"`) is trimmed. Alpha-5 numbers replace the leading
/// digit with a letter standing for 10..=33, `I` and `O` skipped, so
/// `A0001` is 100001 and `Z9999` is 339999.
pub fn extract(line1: &str) -> Result<CatalogId> {
    let field = line1
        .get(FIELD)
        .ok_or_else(|| CatalogError::MalformedRecord(format!("line 1 too short: {line1:?}")))?
        .trim();

    let mut chars = field.chars();
    let Some(first) = chars.next() else {
        return Err(CatalogError::MalformedRecord(format!(
            "empty catalog number: {line1:?}"
        )));
    };

    let (high, rest) = match alpha5_value(first) {
        Some(v) => (v, chars.as_str()),
        None => (0, field),
    };

    if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CatalogError::MalformedRecord(format!(
            "invalid catalog number {field:?}"
        )));
    }
    let low: CatalogId = rest
        .parse()
        .map_err(|_| CatalogError::MalformedRecord(format!("invalid catalog number {field:?}")))?;

    if high == 0 {
        Ok(low)
    } else {
        // Alpha-5 always carries exactly four digits after the letter.
        if rest.len() != 4 {
            return Err(CatalogError::MalformedRecord(format!(
                "invalid alpha-5 catalog number {field:?}"
            )));
        }
        Ok(high * 10_000 + low)
    }
}

fn alpha5_value(c: char) -> Option<CatalogId> {
    match c {
        'A'..='H' => Some(10 + (c as u32 - 'A' as u32)),
        'J'..='N' => Some(18 + (c as u32 - 'J' as u32)),
        'P'..='Z' => Some(23 + (c as u32 - 'P' as u32)),
        _ => None,
    }
}
