//! Canonical layout for HCL text.
//!
//! Lines are re-indented to two spaces per open `{`, `[` or `(`, the `=` of consecutive
//! attributes at the same level are aligned, trailing whitespace is dropped and the file ends
//! with exactly one newline. Heredoc bodies and the text inside block comments, trailing
//! whitespace included, are copied verbatim. Running the formatter on its own output returns
//! it unchanged.

const INDENT: &str = "  ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lexical {
    String,
    Interpolation { braces: usize },
}

#[derive(Debug, Default)]
struct Scanner {
    depth: usize,
    stack: Vec<Lexical>,
    in_block_comment: bool,
    heredoc: Option<String>,
}

impl Scanner {
    fn in_code(&self) -> bool {
        self.stack.is_empty() && !self.in_block_comment && self.heredoc.is_none()
    }

    fn set_braces(&mut self, count: usize) {
        if let Some(Lexical::Interpolation { braces }) = self.stack.last_mut() {
            *braces = count;
        }
    }

    /// Track bracket depth and lexical state across one line of text.
    fn scan(&mut self, line: &str) {
        let bytes = line.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            let byte = bytes[i];
            let next = bytes.get(i + 1).copied();

            if self.in_block_comment {
                if byte == b'*' && next == Some(b'/') {
                    self.in_block_comment = false;
                    i += 2;
                } else {
                    i += 1;
                }
                continue;
            }

            match self.stack.last().copied() {
                Some(Lexical::String) => match byte {
                    b'\\' => {
                        i += 2;
                        continue;
                    }
                    b'"' => {
                        self.stack.pop();
                    }
                    b'$' | b'%' if next == Some(byte) => {
                        i += 2;
                        continue;
                    }
                    b'$' | b'%' if next == Some(b'{') => {
                        self.stack.push(Lexical::Interpolation { braces: 0 });
                        i += 2;
                        continue;
                    }
                    _ => {}
                },
                Some(Lexical::Interpolation { braces }) => match byte {
                    b'"' => self.stack.push(Lexical::String),
                    b'{' => self.set_braces(braces + 1),
                    b'}' if braces == 0 => {
                        self.stack.pop();
                    }
                    b'}' => self.set_braces(braces - 1),
                    _ => {}
                },
                None => match byte {
                    b'#' => break,
                    b'/' if next == Some(b'/') => break,
                    b'/' if next == Some(b'*') => {
                        self.in_block_comment = true;
                        i += 2;
                        continue;
                    }
                    b'"' => self.stack.push(Lexical::String),
                    b'{' | b'[' | b'(' => self.depth += 1,
                    b'}' | b']' | b')' => self.depth = self.depth.saturating_sub(1),
                    b'<' if next == Some(b'<') => {
                        let mut j = i + 2;
                        if bytes.get(j) == Some(&b'-') {
                            j += 1;
                        }
                        let start = j;
                        while j < bytes.len()
                            && (bytes[j].is_ascii_alphanumeric() || bytes[j] == b'_')
                        {
                            j += 1;
                        }
                        if j > start {
                            self.heredoc = Some(line[start..j].to_string());
                        }
                        i = j;
                        continue;
                    }
                    _ => {}
                },
            }
            i += 1;
        }
    }
}

#[derive(Debug)]
struct Line {
    text: String,
    /// `None` for lines copied verbatim.
    indent: Option<usize>,
    /// The line leaves a bracket or heredoc open.
    opens: bool,
}

/// Produce the canonical layout of `source`.
pub fn format(source: &str) -> String {
    let mut scanner = Scanner::default();
    let mut lines: Vec<Line> = Vec::new();

    for raw in source.split('\n') {
        if let Some(marker) = scanner.heredoc.clone() {
            if raw.trim() == marker {
                scanner.heredoc = None;
            }
            lines.push(Line {
                text: raw.to_string(),
                indent: None,
                opens: false,
            });
            continue;
        }
        if !scanner.in_code() {
            let in_comment = scanner.in_block_comment;
            scanner.scan(raw);
            let text = if in_comment { raw } else { raw.trim_end() };
            lines.push(Line {
                text: text.to_string(),
                indent: None,
                opens: false,
            });
            continue;
        }

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            lines.push(Line {
                text: String::new(),
                indent: None,
                opens: false,
            });
            continue;
        }
        let leading_closers = trimmed
            .bytes()
            .take_while(|b| matches!(b, b'}' | b']' | b')'))
            .count();
        let indent = scanner.depth.saturating_sub(leading_closers);
        let depth_before = scanner.depth;
        scanner.scan(trimmed);
        // A comment opened on this line keeps its trailing text as written.
        let text = if scanner.in_block_comment {
            raw.trim_start()
        } else {
            trimmed
        };
        lines.push(Line {
            text: text.to_string(),
            indent: Some(indent),
            opens: scanner.depth > depth_before || !scanner.in_code(),
        });
    }

    align_attributes(&mut lines);

    let mut output = String::with_capacity(source.len());
    for line in &lines {
        if let Some(indent) = line.indent {
            output.push_str(&INDENT.repeat(indent));
        }
        output.push_str(&line.text);
        output.push('\n');
    }
    let kept = output.trim_end_matches(|c: char| c == '\n' || c == ' ' || c == '\t').len();
    output.truncate(kept);
    if !output.is_empty() {
        output.push('\n');
    }
    output
}

/// Split `key = value` into its key and value text.
fn split_attribute(text: &str) -> Option<(&str, &str)> {
    let first = text.chars().next()?;
    if !(first.is_ascii_alphabetic() || first == '_') {
        return None;
    }
    let key_len = text
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
        .unwrap_or(text.len());
    let rest = text[key_len..].trim_start();
    let value = rest.strip_prefix('=')?;
    if value.starts_with('=') || value.starts_with('>') {
        return None;
    }
    Some((&text[..key_len], value.trim_start()))
}

/// Normalize `key = value` spacing and pad the keys of consecutive single-line attributes at
/// the same level to a common width. An attribute that opens a multi-line value ends the run.
fn align_attributes(lines: &mut [Line]) {
    let mut start = 0;
    while start < lines.len() {
        let Some(indent) = alignable_indent(&lines[start]) else {
            normalize_spacing(&mut lines[start], 0);
            start += 1;
            continue;
        };
        let mut end = start + 1;
        while end < lines.len() && alignable_indent(&lines[end]) == Some(indent) {
            end += 1;
        }

        let width = lines[start..end]
            .iter()
            .filter_map(|line| split_attribute(&line.text))
            .map(|(key, _)| key.len())
            .max()
            .unwrap_or(0);
        for line in &mut lines[start..end] {
            normalize_spacing(line, width);
        }
        start = end;
    }
}

fn normalize_spacing(line: &mut Line, width: usize) {
    if line.indent.is_none() {
        return;
    }
    if let Some((key, value)) = split_attribute(&line.text) {
        line.text = if value.is_empty() {
            format!("{:<width$} =", key, width = width)
        } else {
            format!("{:<width$} = {}", key, value, width = width)
        };
    }
}

fn alignable_indent(line: &Line) -> Option<usize> {
    let indent = line.indent?;
    if line.opens {
        return None;
    }
    split_attribute(&line.text).map(|_| indent)
}
