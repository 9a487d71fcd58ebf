pub mod clock;
pub mod create;
pub mod dashboard;
pub mod geocode;
pub mod list;
pub mod login;
pub mod map;
pub mod show;
pub mod status;
pub mod track;
pub mod update;

/// Char-safe column truncation for table output.
pub(crate) fn truncate(s: &str, max_chars: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_chars {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}
