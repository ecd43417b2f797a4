use lsp_types::Position;

/// Number of chars (Unicode scalar values) in `source`.
pub fn char_len(source: &str) -> usize {
    source.chars().count()
}

/// Number of lines in `source`. A trailing newline opens one more (empty) line.
pub fn line_count(source: &str) -> usize {
    source.chars().filter(|&c| c == '\n').count() + 1
}

/// Char length of line `line`, not counting its terminating newline.
pub fn line_len(source: &str, line: usize) -> Option<usize> {
    source.split('\n').nth(line).map(char_len)
}

/// Convert a char offset into (line, column).
///
/// `offset == char_len(source)` is the end of the document. An offset that
/// lands on a newline maps to the end of that line.
pub fn char_offset_to_line_column(source: &str, offset: usize) -> Option<(usize, usize)> {
    let mut line = 0;
    let mut current_offset = 0;

    for l in source.split('\n') {
        let len = char_len(l);
        if offset <= current_offset + len {
            return Some((line, offset - current_offset));
        }
        current_offset += len + 1; // account for newline
        line += 1;
    }

    None
}

/// Convert (line, column) back into a char offset.
pub fn line_column_to_char_offset(source: &str, line: usize, column: usize) -> Option<usize> {
    let mut offset = 0;
    let mut lines = source.split('\n');

    for _ in 0..line {
        offset += char_len(lines.next()?) + 1; // +1 for newline
    }

    let target_line = lines.next()?;
    if column > char_len(target_line) {
        return None; // out of bounds
    }

    Some(offset + column)
}

pub fn to_position(line: usize, column: usize) -> Position {
    Position::new(line as u32, column as u32)
}
