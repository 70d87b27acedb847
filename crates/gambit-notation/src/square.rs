//! Algebraic square notation ("e2") to engine coordinates and back.

use crate::{FormatError, Position};

/// Parses a square like `"e2"` into a [`Position`].
///
/// The square must be exactly two characters after trimming surrounding
/// whitespace: a file letter `a`-`h` (either case) then a rank digit
/// `1`-`8`. `file = letter - 'a'`, `rank = digit - 1`.
///
/// # Errors
/// - [`FormatError::WrongLength`] — not two characters
/// - [`FormatError::InvalidFile`] — first character outside `a`-`h`
/// - [`FormatError::InvalidRank`] — second character outside `1`-`8`
///
/// ```rust
/// use gambit_notation::parse_square;
///
/// let pos = parse_square("e2").unwrap();
/// assert_eq!((pos.file(), pos.rank()), (4, 1));
/// ```
pub fn parse_square(s: &str) -> Result<Position, FormatError> {
    let trimmed = s.trim();
    let mut chars = trimmed.chars();
    let (Some(file), Some(rank), None) =
        (chars.next(), chars.next(), chars.next())
    else {
        return Err(FormatError::WrongLength(s.to_string()));
    };

    let file_lower = file.to_ascii_lowercase();
    if !('a'..='h').contains(&file_lower) {
        return Err(FormatError::InvalidFile(file));
    }
    if !('1'..='8').contains(&rank) {
        return Err(FormatError::InvalidRank(rank));
    }

    // Both characters are ASCII at this point, so the byte arithmetic is exact.
    Position::new(file_lower as u8 - b'a', rank as u8 - b'1')
}

/// Formats a [`Position`] as a lower-case square like `"e2"`.
pub fn to_square(pos: Position) -> String {
    let file = char::from(b'a' + pos.file());
    let rank = char::from(b'1' + pos.rank());
    format!("{file}{rank}")
}
