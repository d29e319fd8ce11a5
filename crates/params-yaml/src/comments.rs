//! Line-level comment scanning.
//!
//! yaml-rust2 drops comments during scanning, so they are recovered from the
//! source text: every line is classified once up front, and the document
//! builder claims lines as it walks the event stream.

/// What a single source line contributes outside of the data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LineKind {
    /// Empty or whitespace-only line.
    Blank,
    /// Line holding nothing but a comment (`# text`).
    Comment(String),
    /// Data, possibly followed by an end-of-line comment.
    Content { trailing: Option<String> },
}

/// Source text split into lines, with a char-offset index for event markers.
pub(crate) struct SourceLines {
    kinds: Vec<LineKind>,
    /// Char offset at which each line starts.
    starts: Vec<usize>,
    chars: Vec<char>,
}

impl SourceLines {
    pub(crate) fn new(source: &str) -> Self {
        let chars: Vec<char> = source.chars().collect();
        let mut starts = vec![0];
        for (index, c) in chars.iter().enumerate() {
            if *c == '\n' {
                starts.push(index + 1);
            }
        }
        let kinds = source.split('\n').map(classify).collect();
        Self {
            kinds,
            starts,
            chars,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.kinds.len()
    }

    pub(crate) fn kind(&self, line: usize) -> Option<&LineKind> {
        self.kinds.get(line)
    }

    /// 0-based line containing the given char offset.
    pub(crate) fn line_of(&self, offset: usize) -> usize {
        self.starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1)
    }

    pub(crate) fn char_at(&self, offset: usize) -> Option<char> {
        self.chars.get(offset).copied()
    }

    pub(crate) fn line_starts(&self) -> &[usize] {
        &self.starts
    }

    /// First non-whitespace character of a line.
    pub(crate) fn first_char(&self, line: usize) -> Option<char> {
        let start = *self.starts.get(line)?;
        self.chars
            .get(start..)?
            .iter()
            .copied()
            .take_while(|&c| c != '\n')
            .find(|c| !c.is_whitespace())
    }

    /// Offset of the closing quote of a quoted scalar that opens at or after
    /// `offset` on the same line.
    pub(crate) fn quoted_end(&self, offset: usize, quote: char) -> Option<usize> {
        let mut index = offset;
        loop {
            match *self.chars.get(index)? {
                c if c == quote => break,
                '\n' => return None,
                _ => index += 1,
            }
        }
        index += 1;
        while let Some(&c) = self.chars.get(index) {
            if quote == '"' && c == '\\' {
                index += 1;
            } else if c == quote {
                // `''` is an escaped quote inside single quotes.
                if quote == '\'' && self.chars.get(index + 1) == Some(&'\'') {
                    index += 1;
                } else {
                    return Some(index);
                }
            }
            index += 1;
        }
        None
    }
}

fn classify(line: &str) -> LineKind {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let trimmed = line.trim();
    if trimmed.is_empty() {
        LineKind::Blank
    } else if trimmed.starts_with('#') {
        LineKind::Comment(trimmed.to_string())
    } else {
        LineKind::Content {
            trailing: trailing_comment(line),
        }
    }
}

/// Find an end-of-line comment: a `#` preceded by whitespace and outside quotes.
fn trailing_comment(line: &str) -> Option<String> {
    let mut quote: Option<char> = None;
    let mut prev: Option<char> = None;
    // Last non-blank character outside quotes, and the first character of the
    // word it belongs to.
    let mut last_mark: Option<char> = None;
    let mut word_start: Option<char> = None;
    let mut chars = line.char_indices().peekable();

    while let Some((index, c)) = chars.next() {
        match quote {
            Some('"') => {
                if c == '\\' {
                    chars.next();
                } else if c == '"' {
                    quote = None;
                }
            }
            Some(_) => {
                // `''` is an escaped quote, not the end of the scalar.
                if c == '\'' && chars.next_if(|&(_, next)| next == '\'').is_none() {
                    quote = None;
                }
            }
            None => {
                if c == '#' && prev.is_some_and(char::is_whitespace) {
                    return Some(line[index..].trim_end().to_string());
                }
                if (c == '"' || c == '\'') && opens_quote(prev, last_mark, word_start) {
                    quote = Some(c);
                }
                if !c.is_whitespace() {
                    if prev.is_none_or(char::is_whitespace) {
                        word_start = Some(c);
                    }
                    last_mark = Some(c);
                }
            }
        }
        prev = Some(c);
    }
    None
}

/// Whether a quote character starts a quoted scalar rather than sitting
/// inside a plain one.
fn opens_quote(prev: Option<char>, last_mark: Option<char>, word_start: Option<char>) -> bool {
    match prev {
        Some(p) if "[{,".contains(p) => true,
        Some(p) if !p.is_whitespace() => false,
        _ => {
            last_mark.is_none_or(|mark| ":-,[{?".contains(mark))
                || word_start.is_some_and(|start| start == '!' || start == '&')
        }
    }
}
