use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Terminal columns taken by `s`
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Wrap a string into lines no wider than `max_width` columns, preferring
/// to break at spaces. Existing line breaks are kept.
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let max_width = max_width.max(1);
    let mut lines = Vec::new();

    for raw_line in text.lines() {
        let mut remaining = raw_line;
        if remaining.is_empty() {
            lines.push(String::new());
            continue;
        }

        while !remaining.is_empty() {
            if display_width(remaining) <= max_width {
                lines.push(remaining.to_string());
                break;
            }

            let mut last_space = None;
            let mut cut = 0;
            let mut width = 0;
            for (pos, ch) in remaining.char_indices() {
                let w = ch.width().unwrap_or(0);
                if width + w > max_width {
                    break;
                }
                if ch == ' ' {
                    last_space = Some(pos);
                }
                width += w;
                cut = pos + ch.len_utf8();
            }
            // a single glyph wider than the limit still has to go somewhere
            if cut == 0 {
                cut = remaining.chars().next().map(char::len_utf8).unwrap_or(1);
            }

            match last_space {
                Some(pos) if pos > 0 => {
                    lines.push(remaining[..pos].to_string());
                    remaining = remaining[pos + 1..].trim_start();
                }
                _ => {
                    lines.push(remaining[..cut].to_string());
                    remaining = &remaining[cut..];
                }
            }
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
