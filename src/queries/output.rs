//! Queries over the rendered output buffer.

use unicode_width::UnicodeWidthChar;

use crate::data::state::OutputBuffer;
use crate::fragment::{FragmentLine, FragmentSpan};

/// Split a line into rows no wider than `width` terminal columns.
///
/// A wide character never straddles two rows.
pub fn wrap_line(line: &FragmentLine, width: usize) -> Vec<FragmentLine> {
    if width == 0 || line.width() <= width {
        return vec![line.clone()];
    }

    let mut rows = Vec::new();
    let mut row = FragmentLine::default();
    let mut row_width = 0;

    for span in &line.spans {
        let mut piece = String::new();
        for c in span.text.chars() {
            let char_width = c.width().unwrap_or(0);
            if row_width > 0 && row_width + char_width > width {
                if !piece.is_empty() {
                    row.spans.push(FragmentSpan {
                        text: std::mem::take(&mut piece),
                        classes: span.classes.clone(),
                    });
                }
                rows.push(std::mem::take(&mut row));
                row_width = 0;
            }
            piece.push(c);
            row_width += char_width;
        }
        if !piece.is_empty() {
            row.spans.push(FragmentSpan {
                text: piece,
                classes: span.classes.clone(),
            });
        }
    }
    if !row.spans.is_empty() {
        rows.push(row);
    }
    rows
}

fn wrapped_rows(output: &OutputBuffer, width: usize) -> Vec<FragmentLine> {
    output
        .lines()
        .iter()
        .flat_map(|line| wrap_line(line, width))
        .collect()
}

/// Furthest the pane can scroll back: wrapped rows beyond one screenful.
pub fn max_scroll_back(output: &OutputBuffer, width: usize, height: usize) -> usize {
    let rows: usize = output
        .lines()
        .iter()
        .map(|line| wrap_line(line, width).len())
        .sum();
    rows.saturating_sub(height)
}

/// Rows visible in a pane of `height` x `width`, honouring the scroll
/// offset. Returns the rows and the clamped offset actually applied.
pub fn visible_rows(output: &OutputBuffer, width: usize, height: usize) -> (Vec<FragmentLine>, usize) {
    let rows = wrapped_rows(output, width);

    let max_back = rows.len().saturating_sub(height);
    let back = output.scroll_back.min(max_back);
    let end = rows.len() - back;
    let start = end.saturating_sub(height);
    (rows[start..end].to_vec(), back)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::Fragment;

    fn texts(rows: &[FragmentLine]) -> Vec<String> {
        rows.iter().map(|r| r.text()).collect()
    }

    #[test]
    fn test_wrap_short_line_untouched() {
        let line = &Fragment::parse("abc").lines[0];
        assert_eq!(texts(&wrap_line(line, 10)), vec!["abc"]);
    }

    #[test]
    fn test_wrap_keeps_span_classes() {
        let fragment = Fragment::parse(r#"ab<span class="ansi-red">cdef</span>g"#);
        let rows = wrap_line(&fragment.lines[0], 3);
        assert_eq!(texts(&rows), vec!["abc", "def", "g"]);
        assert_eq!(rows[0].spans[1].classes, vec!["ansi-red"]);
        assert_eq!(rows[1].spans[0].classes, vec!["ansi-red"]);
        assert!(rows[2].spans[0].classes.is_empty());
    }

    #[test]
    fn test_wrap_by_display_width() {
        let line = &Fragment::parse("a📁b📁").lines[0];
        let rows = wrap_line(line, 3);
        assert_eq!(texts(&rows), vec!["a📁", "b📁"]);
        assert!(rows.iter().all(|r| r.width() <= 3));

        // A wide character moves whole to the next row.
        let rows = wrap_line(&Fragment::parse("ab📁").lines[0], 3);
        assert_eq!(texts(&rows), vec!["ab", "📁"]);
    }

    #[test]
    fn test_max_scroll_back_counts_wrapped_rows() {
        let mut output = OutputBuffer::new(100);
        output.append(Fragment::parse(&"x".repeat(100)));
        assert_eq!(max_scroll_back(&output, 10, 5), 5);
        assert_eq!(max_scroll_back(&output, 200, 5), 0);
    }

    #[test]
    fn test_visible_rows_follow_end() {
        let mut output = OutputBuffer::new(100);
        output.append(Fragment::parse("1\n2\n3\n4\n5"));
        let (rows, back) = visible_rows(&output, 80, 2);
        assert_eq!(texts(&rows), vec!["4", "5"]);
        assert_eq!(back, 0);
    }

    #[test]
    fn test_visible_rows_scrolled_back_and_clamped() {
        let mut output = OutputBuffer::new(100);
        output.append(Fragment::parse("1\n2\n3\n4\n5"));
        output.scroll_back = 2;
        let (rows, _) = visible_rows(&output, 80, 2);
        assert_eq!(texts(&rows), vec!["2", "3"]);

        output.scroll_back = 50;
        let (rows, back) = visible_rows(&output, 80, 2);
        assert_eq!(texts(&rows), vec!["1", "2"]);
        assert_eq!(back, 3);
    }

    #[test]
    fn test_visible_rows_short_output() {
        let mut output = OutputBuffer::new(100);
        output.append(Fragment::parse("only"));
        let (rows, back) = visible_rows(&output, 80, 10);
        assert_eq!(texts(&rows), vec!["only"]);
        assert_eq!(back, 0);
    }
}
