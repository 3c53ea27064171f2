use crate::registry::AppEntry;

/// Case-insensitive match against name, description, category and id.
/// A blank query matches everything.
pub fn matches_search(entry: &AppEntry, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }
    let needle = query.to_ascii_lowercase();
    [&entry.name, &entry.description, &entry.category, &entry.id]
        .iter()
        .any(|field| field.to_ascii_lowercase().contains(&needle))
}

pub fn truncate_with_ellipsis(input: &str, max_chars: usize) -> String {
    if max_chars == 0 {
        return String::new();
    }

    let chars: Vec<char> = input.chars().collect();
    if chars.len() <= max_chars {
        return input.to_string();
    }
    if max_chars == 1 {
        return "…".to_string();
    }

    let mut out = chars[..max_chars - 1].iter().collect::<String>();
    out.push('…');
    out
}
