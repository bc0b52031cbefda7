//! Splitting of multi-document manifests
//!
//! A manifest file can hold any number of resources separated by `---` lines.
//! [`split_documents`] walks the text lazily and yields one [`Document`] per
//! non-empty fragment, borrowing from the input.

use crate::error::SplitError;

/// One resource document inside a manifest file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Document<'a> {
    /// Position among the non-empty documents of the file, starting at 0
    pub index: usize,
    /// 1-based line of the first non-blank character of the fragment
    pub line: usize,
    /// Raw text of the fragment
    pub text: &'a str,
}

/// Lazy iterator over the documents of one manifest
///
/// Created by [`split_documents`]. It is finite and cannot be restarted.
#[derive(Debug, Clone)]
pub struct Documents<'a> {
    rest: Option<&'a str>,
    line: usize,
    index: usize,
}

/// Split manifest text into its documents
pub fn split_documents(text: &str) -> Documents<'_> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    Documents {
        rest: Some(text),
        line: 1,
        index: 0,
    }
}

/// Split raw manifest bytes, rejecting input that is not UTF-8
pub fn split_bytes(bytes: &[u8]) -> Result<Documents<'_>, SplitError> {
    let text = std::str::from_utf8(bytes).map_err(|e| SplitError::InvalidUtf8 {
        offset: e.valid_up_to(),
    })?;
    Ok(split_documents(text))
}

impl<'a> Iterator for Documents<'a> {
    type Item = Document<'a>;

    fn next(&mut self) -> Option<Document<'a>> {
        loop {
            let rest = self.rest?;
            let start_line = self.line;

            let (fragment, tail) = match find_separator(rest) {
                Some(at) => (&rest[..at], Some(&rest[at + 3..])),
                None => (rest, None),
            };
            self.rest = tail;
            // The text after `---` stays on the separator's line
            self.line = start_line + count_newlines(fragment);

            if is_blank(fragment) {
                continue;
            }

            let leading = fragment.len() - fragment.trim_start().len();
            let document = Document {
                index: self.index,
                line: start_line + count_newlines(&fragment[..leading]),
                text: fragment,
            };
            self.index += 1;
            return Some(document);
        }
    }
}

impl std::iter::FusedIterator for Documents<'_> {}

/// Byte offset of the first separator line in `text`
fn find_separator(text: &str) -> Option<usize> {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if is_separator(line.trim_end_matches(['\n', '\r'])) {
            return Some(offset);
        }
        offset += line.len();
    }
    None
}

fn is_separator(line: &str) -> bool {
    match line.strip_prefix("---") {
        Some(rest) => rest.is_empty() || rest.starts_with([' ', '\t']),
        None => false,
    }
}

/// Whitespace-only or comment-only fragments carry no resource
fn is_blank(fragment: &str) -> bool {
    fragment.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#')
    })
}

fn count_newlines(text: &str) -> usize {
    text.bytes().filter(|b| *b == b'\n').count()
}
