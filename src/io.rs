//! Reference-sequence input helpers for external drivers.
//!
//! The core never parses text itself; these helpers turn the textual form a
//! front end collects into the page sequence the manager consumes.

use std::fs;
use std::path::Path;

use crate::Page;
use crate::error::SimError;

/// Parse a reference string into a page sequence.
///
/// Pages are separated by commas and/or whitespace; empty fields are
/// ignored, so trailing commas and stray blanks are fine.
pub fn parse_reference_string(input: &str) -> Result<Vec<Page>, SimError> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| {
            token.parse::<Page>().map_err(|_| SimError::Parse {
                token: token.to_string(),
            })
        })
        .collect()
}

/// Read a reference sequence from a file.
pub fn read_reference_file<P: AsRef<Path>>(path: P) -> Result<Vec<Page>, SimError> {
    let content = fs::read_to_string(path.as_ref())?;
    parse_reference_string(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_comma_separated() {
        assert_eq!(parse_reference_string("1,2,3").unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_parse_mixed_separators() {
        assert_eq!(
            parse_reference_string(" 7, 0 3,,4\n2 ").unwrap(),
            vec![7, 0, 3, 4, 2]
        );
    }

    #[test]
    fn test_parse_empty_input_is_empty_sequence() {
        assert_eq!(parse_reference_string("").unwrap(), Vec::<Page>::new());
        assert_eq!(parse_reference_string(" , ,\n").unwrap(), Vec::<Page>::new());
    }

    #[test]
    fn test_parse_rejects_bad_tokens() {
        let err = parse_reference_string("1,two,3").unwrap_err();
        assert!(matches!(err, SimError::Parse { token } if token == "two"));

        // Pages are non-negative
        let err = parse_reference_string("1,-2").unwrap_err();
        assert!(matches!(err, SimError::Parse { token } if token == "-2"));
    }

    #[test]
    fn test_read_reference_file_missing_path() {
        let err = read_reference_file("/nonexistent/refs.txt").unwrap_err();
        assert!(matches!(err, SimError::Io(_)));
    }
}
