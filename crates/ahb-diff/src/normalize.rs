/// Comparison key for a section name: the input with every whitespace
/// character removed. Never stored or displayed.
pub fn normalize(text: &str) -> String {
    text.chars().filter(|ch| !ch.is_whitespace()).collect()
}
