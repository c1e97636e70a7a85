//! Terminal output sanitization.
//!
//! Previews are clipboard text and may carry ANSI escape sequences or other
//! control characters. `list` prints them to a terminal, so they are cleaned
//! first. The line cache itself stores previews unmodified.

/// Strip CSI escape sequences and control characters from `text`, turning
/// tabs into single spaces.
///
/// ```
/// use scm::utils::sanitize_for_terminal;
///
/// assert_eq!(sanitize_for_terminal("\x1b[31mred\x1b[0m\tok"), "red ok");
/// ```
pub fn sanitize_for_terminal(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            // ESC [ params final-byte
            '\x1b' if chars.peek() == Some(&'[') => {
                chars.next();
                for next in chars.by_ref() {
                    if next.is_ascii_alphabetic() || next == '~' {
                        break;
                    }
                }
            }
            '\t' => result.push(' '),
            c if c.is_control() => {}
            c => result.push(c),
        }
    }

    result
}
