use std::fmt::Write;

/// Serialize `value` as a CSS identifier, as `CSS.escape` does.
///
/// The result can be dropped after `#` or `.` in a selector and will match
/// the input string exactly.
pub fn css_escape(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let mut out = String::with_capacity(value.len());

    for (i, &c) in chars.iter().enumerate() {
        let leading_digit =
            c.is_ascii_digit() && (i == 0 || (i == 1 && chars[0] == '-'));
        match c {
            '\0' => out.push('\u{FFFD}'),
            '\u{1}'..='\u{1f}' | '\u{7f}' => push_code_point(&mut out, c),
            _ if leading_digit => push_code_point(&mut out, c),
            '-' if i == 0 && chars.len() == 1 => out.push_str("\\-"),
            _ if !c.is_ascii() || c.is_ascii_alphanumeric() || c == '-' || c == '_' => out.push(c),
            _ => {
                out.push('\\');
                out.push(c);
            }
        }
    }
    out
}

fn push_code_point(out: &mut String, c: char) {
    let _ = write!(out, "\\{:x} ", c as u32);
}
