//! Parsers for remote-console response text.
//!
//! The game server answers administrative commands with loosely formatted
//! prose, e.g.:
//!
//! ```text
//! There are 2 of a max of 20 players online: Alice, Bob
//! Alice has the following entity data: [1.0d, 2.0d, 3.0d]
//! Alice has the following entity data: the_end
//! ```
//!
//! These functions extract the typed values the poll cycle needs. All
//! three are pure: same input, same output, no I/O.

use crate::ParseError;

/// Extracts the player names from a `list` response.
///
/// The leading number anywhere before the data is the player count. A
/// count of zero short-circuits to an empty list without looking at the
/// rest of the text. Otherwise the text after the first `:` is split on
/// commas and each name is trimmed.
pub fn parse_player_list(text: &str) -> Result<Vec<String>, ParseError> {
    let count = leading_count(text)
        .ok_or_else(|| ParseError::MissingCount(text.to_string()))?;

    if count == 0 {
        return Ok(Vec::new());
    }

    let (_, names) = text
        .split_once(':')
        .ok_or_else(|| ParseError::MissingDelimiter(text.to_string()))?;

    Ok(names.split(',').map(|name| name.trim().to_string()).collect())
}

/// Extracts an `{x, y, z}` triple from a `data get entity <name> Pos`
/// response.
///
/// The payload after the first `:` looks like `[1.0d, 2.0d, 3.0d]`; the
/// brackets, spaces, and `d` type suffixes are stripped before parsing.
/// Extra tokens beyond the third are ignored.
pub fn parse_coordinates(text: &str) -> Result<(f64, f64, f64), ParseError> {
    let (_, payload) = text
        .split_once(':')
        .ok_or_else(|| ParseError::MissingDelimiter(text.to_string()))?;

    let cleaned: String = payload
        .chars()
        .filter(|c| !matches!(c, 'd' | ' ' | '[' | ']'))
        .collect();

    let tokens: Vec<&str> =
        cleaned.split(',').filter(|t| !t.is_empty()).collect();
    if tokens.len() < 3 {
        return Err(ParseError::MissingCoordinates {
            found: tokens.len(),
        });
    }

    let mut coords = [0.0f64; 3];
    for (slot, token) in coords.iter_mut().zip(&tokens) {
        *slot = token.parse().map_err(|source| {
            ParseError::InvalidCoordinate {
                token: token.to_string(),
                source,
            }
        })?;
    }

    Ok((coords[0], coords[1], coords[2]))
}

/// Extracts the dimension label from a `data get entity <name> Dimension`
/// response: everything after the first `:`, trimmed, verbatim.
pub fn parse_dimension(text: &str) -> Result<String, ParseError> {
    let (_, label) = text
        .split_once(':')
        .ok_or_else(|| ParseError::MissingDelimiter(text.to_string()))?;
    Ok(label.trim().to_string())
}

/// Finds the first contiguous run of ASCII digits and parses it.
fn leading_count(text: &str) -> Option<u32> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let digits: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}
