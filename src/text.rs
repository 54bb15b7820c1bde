// Text heuristics: no glyph metrics are available at layout time

/// Average glyph width as a fraction of the font size
pub const CHAR_WIDTH_EM: f64 = 0.6;

/// Rough width of `text` set at `font_size`
pub fn estimate_text_width(text: &str, font_size: f64) -> f64 {
    text.chars().count() as f64 * font_size * CHAR_WIDTH_EM
}

/// How many characters fit on one category label line under a bar
pub fn max_chars_for_width(width: f64, font_size: f64) -> usize {
    let char_px = (CHAR_WIDTH_EM * font_size).max(6.0);
    ((width / char_px).floor() as usize).max(5)
}

/// Greedy word wrap.
///
/// Breaks on whitespace only; a word longer than `max_chars` gets a line of its
/// own and is never split. Lines past `max_lines` are dropped without an ellipsis.
pub fn wrap_label(text: &str, max_chars: usize, max_lines: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let trial_len = if line.is_empty() { word_len } else { line_len + 1 + word_len };

        if trial_len <= max_chars {
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
            line_len = trial_len;
        } else {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            line.push_str(word);
            line_len = word_len;
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }

    lines.truncate(max_lines);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_text_width() {
        assert_eq!(estimate_text_width("abcde", 10.0), 30.0);
        assert_eq!(estimate_text_width("", 10.0), 0.0);
        // Counted in characters, not bytes
        assert_eq!(estimate_text_width("āč", 10.0), 12.0);
    }

    #[test]
    fn test_max_chars_for_width() {
        // 0.6 * 20 = 12px per char
        assert_eq!(max_chars_for_width(120.0, 20.0), 10);
        // Small fonts bottom out at 6px per char
        assert_eq!(max_chars_for_width(60.0, 5.0), 10);
        // Never fewer than 5
        assert_eq!(max_chars_for_width(10.0, 20.0), 5);
    }

    #[test]
    fn test_wrap_fits_on_one_line() {
        assert_eq!(wrap_label("SIA Stockmann", 20, 3), vec!["SIA Stockmann"]);
    }

    #[test]
    fn test_wrap_breaks_on_whitespace() {
        assert_eq!(
            wrap_label("SIA WEEKEND LATVIA", 11, 3),
            vec!["SIA WEEKEND", "LATVIA"]
        );
    }

    #[test]
    fn test_wrap_long_word_kept_whole() {
        assert_eq!(
            wrap_label("a Sabiedrība b", 5, 3),
            vec!["a", "Sabiedrība", "b"]
        );
    }

    #[test]
    fn test_wrap_drops_lines_past_cap() {
        let lines = wrap_label("one two three four five", 5, 3);
        assert_eq!(lines, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_wrap_collapses_whitespace() {
        assert_eq!(wrap_label("  a \t b\n c ", 20, 3), vec!["a b c"]);
        assert!(wrap_label("", 10, 3).is_empty());
        assert!(wrap_label("   ", 10, 3).is_empty());
    }

    #[test]
    fn test_wrap_is_idempotent() {
        let text = "Sabiedrība ar ierobežotu atbildību \"New Yorker Latvija\"";
        let once = wrap_label(text, 12, 3);
        let twice = wrap_label(&once.join(" "), 12, 3);
        assert_eq!(once, twice);
    }
}
