/// Longest filename stem produced by [`sanitize_filename`], in characters
pub const MAX_FILENAME_LEN: usize = 150;

const ILLEGAL_CHARS: [char; 8] = ['\\', '/', '*', '?', '"', '<', '>', '|'];

/// Turns a post title into something safe to use as a filename stem.
///
/// Colons become hyphens, the other characters Windows rejects are dropped and
/// whitespace runs collapse to a single underscore. Long titles are cut at the
/// last underscore before the limit when that keeps more than half of it.
/// An empty result means the caller has to pick its own name.
pub fn sanitize_filename(title: &str) -> String {
    let mut sanitized = String::with_capacity(title.len());
    let mut in_whitespace = false;

    for c in title.chars() {
        if is_title_whitespace(c) {
            if !in_whitespace {
                sanitized.push('_');
                in_whitespace = true;
            }
            continue;
        }
        if ILLEGAL_CHARS.contains(&c) {
            continue;
        }
        in_whitespace = false;
        sanitized.push(if c == ':' { '-' } else { c });
    }

    let truncated = truncate_at_word(&sanitized, MAX_FILENAME_LEN);
    truncated.trim_matches('_').to_string()
}

/// Unicode whitespace plus the ASCII separators U+001C..=U+001F, which
/// `char::is_whitespace` leaves out but title text can still contain.
fn is_title_whitespace(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

fn truncate_at_word(s: &str, max_len: usize) -> &str {
    let Some((cap, _)) = s.char_indices().nth(max_len) else {
        return s;
    };
    let head = &s[..cap];

    match head.rfind('_') {
        Some(cut) if head[..cut].chars().count() > max_len / 2 => &head[..cut],
        _ => head,
    }
}
