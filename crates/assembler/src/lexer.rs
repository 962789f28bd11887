//! Tokenizer for SVM assembly text.
//!
//! Tokens are separated by whitespace and by `.`, so `mov.eq r0 r1` yields
//! `mov`, `eq`, `r0`, `r1`. A `#` starts a comment running to end of line.
//! The cursor works on index ranges into the source and offers a peek, so
//! an absent optional suffix costs nothing to look for.

/// A position-tracking token cursor over assembly source.
pub(crate) struct Cursor<'s> {
    src: &'s str,
    pos: usize,
}

fn is_separator(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\r' | b'\n' | b'.')
}

impl<'s> Cursor<'s> {
    pub(crate) fn new(src: &'s str) -> Self {
        Self { src, pos: 0 }
    }

    /// Consume and return the next token, or `None` at end of input.
    pub(crate) fn next_token(&mut self) -> Option<&'s str> {
        let src = self.src;
        let bytes = src.as_bytes();

        loop {
            match bytes.get(self.pos) {
                Some(&b) if is_separator(b) => self.pos += 1,
                Some(b'#') => {
                    while let Some(&b) = bytes.get(self.pos) {
                        if b == b'\n' {
                            break;
                        }
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }

        let start = self.pos;
        while let Some(&b) = bytes.get(self.pos) {
            if is_separator(b) || b == b'#' {
                break;
            }
            self.pos += 1;
        }

        if self.pos == start {
            None
        } else {
            Some(&src[start..self.pos])
        }
    }

    /// Return the next token without consuming it.
    pub(crate) fn peek_token(&mut self) -> Option<&'s str> {
        let saved = self.pos;
        let token = self.next_token();
        self.pos = saved;
        token
    }
}
