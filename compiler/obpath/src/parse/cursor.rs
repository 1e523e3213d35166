//! Byte cursor over a path expression.
//!
//! Every token of the path grammar is ASCII, so the parser moves through
//! the expression byte-by-byte. Non-ASCII bytes only ever appear inside
//! names and string literals, which are consumed whole, so every position
//! the cursor stops at is a character boundary.

/// Cursor over the bytes of an expression.
///
/// The cursor is [`Copy`], so a saved copy is a free snapshot.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Cursor<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor at the start of `source`.
    pub(crate) fn new(source: &'a str) -> Self {
        Cursor { source, pos: 0 }
    }

    /// Returns the byte at the current position, or `0x00` at EOF.
    ///
    /// Interior null bytes also return `0x00`; use [`is_eof()`](Self::is_eof)
    /// to distinguish.
    #[inline]
    pub(crate) fn current(&self) -> u8 {
        self.source.as_bytes().get(self.pos).copied().unwrap_or(0)
    }

    /// Returns `true` once every byte has been consumed.
    #[inline]
    pub(crate) fn is_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Current byte offset.
    #[inline]
    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    /// Advance by one byte, stopping at EOF.
    #[inline]
    pub(crate) fn advance(&mut self) {
        if !self.is_eof() {
            self.pos += 1;
        }
    }

    /// Consume `byte` if it is next.
    #[inline]
    pub(crate) fn eat(&mut self, byte: u8) -> bool {
        if !self.is_eof() && self.current() == byte {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consume one leading `+` or `-`.
    pub(crate) fn eat_sign(&mut self) -> bool {
        self.eat(b'-') || self.eat(b'+')
    }

    /// Advance while `pred` holds for the current byte.
    #[inline]
    pub(crate) fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while !self.is_eof() && pred(self.current()) {
            self.pos += 1;
        }
    }

    /// Skip spaces.
    #[inline]
    pub(crate) fn eat_spaces(&mut self) {
        self.eat_while(|b| b == b' ');
    }

    /// Advance until `byte` is the current byte.
    ///
    /// Returns `false` (with the cursor at EOF) if `byte` never occurs.
    pub(crate) fn eat_until(&mut self, byte: u8) -> bool {
        let remaining = &self.source.as_bytes()[self.pos..];
        match remaining.iter().position(|&b| b == byte) {
            Some(offset) => {
                self.pos += offset;
                true
            }
            None => {
                self.pos = self.source.len();
                false
            }
        }
    }

    /// The source text from `start` to the current position.
    pub(crate) fn slice_from(&self, start: usize) -> &'a str {
        self.source.get(start..self.pos).unwrap_or_default()
    }

    /// The character at the current position, if any.
    pub(crate) fn current_char(&self) -> Option<char> {
        self.source.get(self.pos..).and_then(|rest| rest.chars().next())
    }
}
