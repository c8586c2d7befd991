/// Greedily wraps `text` on whitespace so no line exceeds `width` columns,
/// unless a single word is longer than that. Lines after the first are
/// prefixed with `indent_subsequent` spaces.
pub fn wordwrap(text: &str, width: usize, indent_subsequent: usize) -> String {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let indent = if lines.is_empty() { 0 } else { indent_subsequent };
        let at_line_start = line.len() <= indent;

        if !at_line_start && line.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut line));
            line.push_str(&" ".repeat(indent_subsequent));
        } else if !at_line_start {
            line.push(' ');
        }

        line.push_str(word);
    }

    if !line.trim().is_empty() {
        lines.push(line);
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::wordwrap;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(wordwrap("<Widget name=\"a\">", 60, 2), "<Widget name=\"a\">");
    }

    #[test]
    fn long_text_wraps_with_indent() {
        let text = "<Widget aaaa bbbb cccc dddd>";
        assert_eq!(wordwrap(text, 13, 2), "<Widget aaaa\n  bbbb cccc\n  dddd>");
    }

    #[test]
    fn long_word_gets_its_own_line() {
        assert_eq!(wordwrap("a bcdefghij k", 4, 1), "a\n bcdefghij\n k");
    }

    #[test]
    fn whitespace_is_collapsed() {
        assert_eq!(wordwrap("  a   b  ", 80, 0), "a b");
        assert_eq!(wordwrap("", 80, 0), "");
    }
}
