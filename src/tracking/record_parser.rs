//! Parse individual lines of a tracked file into [`Record`]s.
//!
//! A line holds exactly three comma-separated decimal numbers:
//!
//! ```text
//! <time>,<current>,<voltage>
//! 0.5,1.25,3.3
//! ```

use super::types::Record;
use std::num::ParseFloatError;
use thiserror::Error;

/// Field names in line order, used in error messages.
const FIELD_NAMES: [&str; 3] = ["time", "current", "voltage"];

/// Why a line could not be turned into a [`Record`].
#[derive(Debug, Error, PartialEq)]
pub enum RecordParseError {
    #[error("expected 3 comma-separated fields, found {0}")]
    WrongFieldCount(usize),
    #[error("invalid {field} value '{token}': {source}")]
    InvalidNumber {
        field: &'static str,
        token: String,
        #[source]
        source: ParseFloatError,
    },
}

/// Parse one line. Surrounding whitespace (including a trailing `\r`) is ignored,
/// on the line and on each token.
pub fn parse_record_line(line: &str) -> Result<Record, RecordParseError> {
    let tokens: Vec<&str> = line.trim().split(',').collect();
    if tokens.len() != FIELD_NAMES.len() {
        return Err(RecordParseError::WrongFieldCount(tokens.len()));
    }

    let mut values = [0.0f64; 3];
    for (i, token) in tokens.iter().enumerate() {
        let token = token.trim();
        values[i] = token.parse().map_err(|source| RecordParseError::InvalidNumber {
            field: FIELD_NAMES[i],
            token: token.to_string(),
            source,
        })?;
    }

    Ok(Record::new(values[0], values[1], values[2]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_line() {
        assert_eq!(parse_record_line("1.0,2.0,3.0"), Ok(Record::new(1.0, 2.0, 3.0)));
        assert_eq!(parse_record_line("0,1,2"), Ok(Record::new(0.0, 1.0, 2.0)));
    }

    #[test]
    fn test_parse_tolerates_whitespace_and_crlf() {
        assert_eq!(parse_record_line(" 0.5, -1.25 ,3e2\r\n"), Ok(Record::new(0.5, -1.25, 300.0)));
    }

    #[test]
    fn test_parse_wrong_field_count() {
        assert_eq!(parse_record_line("1.0,2.0"), Err(RecordParseError::WrongFieldCount(2)));
        assert_eq!(parse_record_line("1,2,3,4"), Err(RecordParseError::WrongFieldCount(4)));
        // An empty line splits into one empty token
        assert_eq!(parse_record_line(""), Err(RecordParseError::WrongFieldCount(1)));
    }

    #[test]
    fn test_parse_invalid_number_names_the_field() {
        match parse_record_line("abc,2.0,3.0") {
            Err(RecordParseError::InvalidNumber { field, token, .. }) => {
                assert_eq!(field, "time");
                assert_eq!(token, "abc");
            }
            other => panic!("Expected InvalidNumber, got {:?}", other),
        }
        match parse_record_line("1.0,2.0,") {
            Err(RecordParseError::InvalidNumber { field, .. }) => assert_eq!(field, "voltage"),
            other => panic!("Expected InvalidNumber, got {:?}", other),
        }
    }
}
