/// Similarity of two category codes (0 to code length)
///
/// Counts positions holding the same character, ignoring case and
/// surrounding whitespace. Codes of different length, or empty codes, score 0.
/// For 4-character codes such as "INTJ" the range is 0-4.
pub fn code_similarity(a: &str, b: &str) -> u32 {
    let a = a.trim();
    let b = b.trim();
    if a.is_empty() || a.chars().count() != b.chars().count() {
        return 0;
    }

    a.chars()
        .zip(b.chars())
        .filter(|(ca, cb)| ca.to_lowercase().eq(cb.to_lowercase()))
        .count() as u32
}
