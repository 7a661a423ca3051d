//! SGF point lists.
//!
//! Tree properties store points as two letters (`aa` is the top-left corner)
//! and may compress rectangles as `aa:cc`. An empty value is a pass.

use gtpsync_types::{Coord, Vertex};

/// Parse a single two-letter SGF point.
///
/// `a`–`z` map to 0–25 and `A`–`Z` to 26–51.
pub fn parse_point(point: &str) -> Option<Vertex> {
    let bytes = point.as_bytes();
    if bytes.len() != 2 {
        return None;
    }
    Some(Vertex::new(letter_index(bytes[0])?, letter_index(bytes[1])?))
}

fn letter_index(byte: u8) -> Option<usize> {
    match byte {
        b'a'..=b'z' => Some((byte - b'a') as usize),
        b'A'..=b'Z' => Some((byte - b'A') as usize + 26),
        _ => None,
    }
}

/// Expand one property value into the moves it describes.
///
/// A point that can't be parsed is a pass. A rectangle with an unparseable
/// corner yields nothing.
pub fn expand(compressed: &str) -> Vec<Coord> {
    let Some((from, to)) = compressed.split_once(':') else {
        return vec![parse_point(compressed).map_or(Coord::Pass, Coord::Point)];
    };

    let (Some(a), Some(b)) = (parse_point(from), parse_point(to)) else {
        return Vec::new();
    };

    let mut result = Vec::new();
    for x in a.x.min(b.x)..=a.x.max(b.x) {
        for y in a.y.min(b.y)..=a.y.max(b.y) {
            result.push(Coord::Point(Vertex::new(x, y)));
        }
    }
    result
}

/// Expand every value of a property.
pub fn expand_all<S: AsRef<str>>(values: &[S]) -> Vec<Coord> {
    values.iter().flat_map(|v| expand(v.as_ref())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lower_and_upper_case() {
        assert_eq!(parse_point("aa"), Some(Vertex::new(0, 0)));
        assert_eq!(parse_point("cg"), Some(Vertex::new(2, 6)));
        assert_eq!(parse_point("Ab"), Some(Vertex::new(26, 1)));
        assert_eq!(parse_point("a"), None);
        assert_eq!(parse_point("a1"), None);
    }

    #[test]
    fn empty_value_is_pass() {
        assert_eq!(expand(""), vec![Coord::Pass]);
    }

    #[test]
    fn rectangle_expands_column_by_column() {
        let coords = expand("ba:ab");
        assert_eq!(
            coords,
            vec![
                Coord::Point(Vertex::new(0, 0)),
                Coord::Point(Vertex::new(0, 1)),
                Coord::Point(Vertex::new(1, 0)),
                Coord::Point(Vertex::new(1, 1)),
            ]
        );
    }

    #[test]
    fn broken_rectangle_is_empty() {
        assert!(expand("aa:z").is_empty());
    }

    #[test]
    fn expand_all_concatenates() {
        let coords = expand_all(&["aa", "cc:cd"]);
        assert_eq!(coords.len(), 3);
    }
}
