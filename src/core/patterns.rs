//! Line patterns recognised by the duplicate verifier.
//!
//! Patterns are plain functions kept in a priority-ordered list. The first
//! one that yields two non-empty tokens wins.

/// Parses one trimmed line into two raw tokens
pub type LinePattern = fn(&str) -> Option<(String, String)>;

/// Patterns in priority order
pub const LINE_PATTERNS: &[(&str, LinePattern)] = &[
    ("table_row", table_row),
    ("bullet", bullet_pair),
    ("dash", dash_pair),
];

/// Characters a bullet token may not contain
const BULLET_FORBIDDEN: [char; 3] = ['-', '&', '|'];

/// A successfully parsed line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub pattern: &'static str,
    pub first: String,
    pub second: String,
}

/// Try every pattern in order and return the first successful parse
pub fn parse_line(line: &str) -> Option<ParsedLine> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    LINE_PATTERNS.iter().find_map(|&(name, pattern)| {
        pattern(line).map(|(first, second)| ParsedLine {
            pattern: name,
            first,
            second,
        })
    })
}

/// Trim both tokens; either being empty fails the pattern
fn tokens(a: &str, b: &str) -> Option<(String, String)> {
    let (a, b) = (a.trim(), b.trim());
    if a.is_empty() || b.is_empty() {
        return None;
    }
    Some((a.to_string(), b.to_string()))
}

/// `| A | B |` or `| 3 | A | B |`
///
/// `\|` inside a cell is an escaped pipe and becomes `|` in the token.
pub fn table_row(line: &str) -> Option<(String, String)> {
    if line.len() < 2 || !line.starts_with('|') || !line.ends_with('|') || line.ends_with("\\|") {
        return None;
    }

    let cells = split_cells(&line[1..line.len() - 1]);
    match cells.as_slice() {
        [a, b] => tokens(a, b),
        [index, a, b] if is_index(index) => tokens(a, b),
        _ => None,
    }
}

fn is_index(cell: &str) -> bool {
    let cell = cell.trim();
    !cell.is_empty() && cell.chars().all(|c| c.is_ascii_digit())
}

fn split_cells(inner: &str) -> Vec<String> {
    let mut cells = vec![String::new()];
    let mut chars = inner.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                chars.next();
                push_char(&mut cells, '|');
            }
            '|' => cells.push(String::new()),
            _ => push_char(&mut cells, c),
        }
    }
    cells
}

fn push_char(cells: &mut [String], c: char) {
    if let Some(cell) = cells.last_mut() {
        cell.push(c);
    }
}

/// `- A & B` with `&`, `-`, `vs` or `|` as separator
///
/// The first token is the shortest prefix that leaves a valid separator and
/// second token behind.
pub fn bullet_pair(line: &str) -> Option<(String, String)> {
    let mut chars = line.chars();
    if !matches!(chars.next(), Some('-') | Some('*')) {
        return None;
    }
    let after_bullet = chars.as_str();
    if !after_bullet.starts_with(char::is_whitespace) {
        return None;
    }
    let rest = after_bullet.trim_start();

    for (i, c) in rest.char_indices() {
        if i > 0 {
            let after = rest[i..].trim_start();
            if let Some(tail) = strip_separator(after) {
                if !tail.is_empty() && !tail.contains(&BULLET_FORBIDDEN[..]) {
                    return tokens(&rest[..i], tail);
                }
            }
        }
        if BULLET_FORBIDDEN.contains(&c) {
            break;
        }
    }
    None
}

fn strip_separator(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    match bytes.first()? {
        b'&' | b'-' | b'|' => Some(&s[1..]),
        b'v' | b'V' if matches!(bytes.get(1), Some(b's') | Some(b'S')) => Some(&s[2..]),
        _ => None,
    }
}

/// `A - B` with a single dash and no `|` or `#` anywhere on the line
pub fn dash_pair(line: &str) -> Option<(String, String)> {
    if line.contains(&['|', '#'][..]) || line.matches('-').count() != 1 {
        return None;
    }
    let (a, b) = line.split_once('-')?;
    tokens(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(line: &str) -> Option<(&'static str, String, String)> {
        parse_line(line).map(|p| (p.pattern, p.first, p.second))
    }

    fn hit(pattern: &'static str, a: &str, b: &str) -> Option<(&'static str, String, String)> {
        Some((pattern, a.to_string(), b.to_string()))
    }

    #[test]
    fn test_table_rows() {
        assert_eq!(parsed("| 1 | Alice | Bob |"), hit("table_row", "Alice", "Bob"));
        assert_eq!(parsed("|Alice|Bob|"), hit("table_row", "Alice", "Bob"));
        assert_eq!(parsed("  | 12 | Ann Lee | Bo |  "), hit("table_row", "Ann Lee", "Bo"));
    }

    #[test]
    fn test_table_row_escaped_pipe() {
        assert_eq!(parsed(r"| 2 | A\|B | C |"), hit("table_row", "A|B", "C"));
    }

    #[test]
    fn test_table_headers_are_skipped() {
        assert_eq!(parsed("| Table # | Name 1 | Name 2 |"), None);
        assert_eq!(parsed("|--------:|--------|--------|"), None);
        assert_eq!(parsed("# Round 1"), None);
        assert_eq!(parsed("| Name |"), None);
    }

    #[test]
    fn test_empty_cell_is_unparsable() {
        assert_eq!(parsed("| 1 |   | Bob |"), None);
    }

    #[test]
    fn test_bullet_separators() {
        assert_eq!(parsed("- alice & bob"), hit("bullet", "alice", "bob"));
        assert_eq!(parsed("* alice - bob"), hit("bullet", "alice", "bob"));
        assert_eq!(parsed("- alice VS bob"), hit("bullet", "alice", "bob"));
        assert_eq!(parsed("- alice vs bob vs carol"), hit("bullet", "alice", "bob vs carol"));
    }

    #[test]
    fn test_bullet_first_token_is_shortest() {
        assert_eq!(parsed("- evsa & bob"), hit("bullet", "evsa", "bob"));
    }

    #[test]
    fn test_bullet_requires_space_after_marker() {
        assert_eq!(bullet_pair("-alice & bob"), None);
        assert_eq!(bullet_pair("- alice"), None);
    }

    #[test]
    fn test_dash_fallback() {
        assert_eq!(parsed("alice - bob"), hit("dash", "alice", "bob"));
        assert_eq!(parsed("alice-bob"), hit("dash", "alice", "bob"));
        assert_eq!(parsed("mary-jane - bob"), None);
        assert_eq!(parsed("# alice - bob"), None);
    }

    #[test]
    fn test_pattern_priority() {
        // A bullet line also fits the dash fallback shape; bullet wins
        assert_eq!(parse_line("- alice - bob").map(|p| p.pattern), Some("bullet"));
    }

    #[test]
    fn test_blank_and_prose_lines() {
        assert_eq!(parsed(""), None);
        assert_eq!(parsed("   "), None);
        assert_eq!(parsed("Generated rounds for the spring meetup"), None);
    }
}
