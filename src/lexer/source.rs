/// Character stream over a source text with arbitrary lookahead.
///
/// `next_char` consumes one character; `inspect_char(n)` peeks at the n-th
/// character after the one most recently returned without consuming anything.
#[derive(Debug, Clone)]
pub struct SourceFile {
    chars: Vec<char>,
    pos: usize,
}

impl SourceFile {
    pub fn new(source: &str) -> Self {
        SourceFile {
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    /// Returns the next character, or `None` at end of input.
    pub fn next_char(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    /// Returns the `nth` character after the last one handed out by `next_char`.
    pub fn inspect_char(&self, nth: usize) -> Option<char> {
        if nth == 0 {
            return None;
        }
        self.chars.get(self.pos + nth - 1).copied()
    }
}
