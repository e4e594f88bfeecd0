//! Output frame stack.
//!
//! [`SqlWriter`] accumulates SQL text and tracks nested lexical scopes
//! (function calls, lists, parenthesized sub-queries, windows). Each frame
//! remembers its closing bracket and item separator, and whether an item has
//! been written yet so the first separator is suppressed.
//!
//! Whitespace is managed here too: words are separated by a single space,
//! nothing follows an opening bracket, nothing precedes a closing bracket
//! or a comma.

use crate::error::UnparseError;

/// What a frame is for. Checked on close to catch mismatched pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameKind {
    /// A whole query or sub-query body.
    Query,
    /// `NAME(arg, ...)`
    FunCall,
    /// Parenthesized expression or operand list.
    Parens,
    /// Comma list without brackets (SELECT list, GROUP BY, ORDER BY ...).
    List,
    /// `OVER (...)`
    Window,
    /// `CASE ... END`
    Case,
    /// `VALUES (...), (...)`
    Values,
}

/// Handle returned when a frame is opened; must be passed back to close it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a frame must be closed with end_list"]
pub struct FrameId {
    depth: usize,
    kind: FrameKind,
}

impl FrameId {
    pub fn kind(&self) -> FrameKind {
        self.kind
    }
}

#[derive(Debug, Clone)]
struct Frame {
    kind: FrameKind,
    close: &'static str,
    sep: &'static str,
    empty: bool,
}

/// Scope-tracking SQL text emitter.
#[derive(Debug, Default)]
pub struct SqlWriter {
    buf: String,
    frames: Vec<Frame>,
    need_ws: bool,
}

impl SqlWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of currently open frames.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    // =========================================================================
    // Frames
    // =========================================================================

    /// Open a frame. `open` is written now, `close` when the frame ends and
    /// `sep` between items (see [`SqlWriter::sep`]).
    pub fn start_list(
        &mut self,
        kind: FrameKind,
        open: &'static str,
        close: &'static str,
        sep: &'static str,
    ) -> FrameId {
        if !open.is_empty() {
            self.write_word(open);
            self.need_ws = !open.ends_with('(');
        }
        self.push_frame(kind, close, sep)
    }

    /// Open `NAME(` with `,` as separator.
    pub fn start_fun_call(&mut self, name: &str) -> FrameId {
        self.write_word(name);
        self.buf.push('(');
        self.need_ws = false;
        self.push_frame(FrameKind::FunCall, ")", ",")
    }

    fn push_frame(&mut self, kind: FrameKind, close: &'static str, sep: &'static str) -> FrameId {
        self.frames.push(Frame {
            kind,
            close,
            sep,
            empty: true,
        });
        FrameId {
            depth: self.frames.len() - 1,
            kind,
        }
    }

    /// Start the next item of the innermost frame, writing its separator
    /// unless this is the first item.
    pub fn sep(&mut self) -> Result<(), UnparseError> {
        let frame = self
            .frames
            .last_mut()
            .ok_or_else(|| UnparseError::internal("separator written outside of any frame"))?;
        if frame.empty {
            frame.empty = false;
            return Ok(());
        }
        let sep = frame.sep;
        match sep {
            "" => {}
            "," => {
                self.buf.push(',');
                self.need_ws = true;
            }
            "\n" => self.newline(),
            word => self.keyword(word),
        }
        Ok(())
    }

    /// Close the innermost frame, which must be `id`.
    pub fn end_list(&mut self, id: FrameId) -> Result<(), UnparseError> {
        let top = self.frames.len().checked_sub(1).ok_or_else(|| {
            UnparseError::internal(format!("closing {:?} frame on an empty stack", id.kind))
        })?;
        if top != id.depth || self.frames[top].kind != id.kind {
            return Err(UnparseError::internal(format!(
                "closing {:?} frame at depth {} but innermost is {:?} at depth {}",
                id.kind, id.depth, self.frames[top].kind, top
            )));
        }
        if let Some(frame) = self.frames.pop() {
            if !frame.close.is_empty() {
                if frame.close.starts_with(')') {
                    self.buf.push_str(frame.close);
                } else {
                    self.write_word(frame.close);
                }
                self.need_ws = true;
            }
        }
        Ok(())
    }

    /// Open an anonymous `(` frame.
    pub fn open_paren(&mut self) -> FrameId {
        self.start_list(FrameKind::Parens, "(", ")", ",")
    }

    // =========================================================================
    // Text
    // =========================================================================

    /// Write a keyword, identifier, literal or operator, preceded by a space
    /// when one is needed.
    pub fn keyword(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.write_word(text);
        self.need_ws = true;
    }

    /// Write a prefix symbol (`-`, `+`) that binds to what follows without a space.
    pub fn prefix(&mut self, text: &str) {
        self.write_word(text);
        self.need_ws = false;
    }

    /// Request a space before the next word.
    pub fn space(&mut self) {
        self.need_ws = true;
    }

    /// Start a new line.
    pub fn newline(&mut self) {
        while self.buf.ends_with(' ') {
            self.buf.pop();
        }
        self.buf.push('\n');
        self.need_ws = false;
    }

    fn write_word(&mut self, text: &str) {
        let at_line_start = self.buf.is_empty() || self.buf.ends_with('\n');
        if self.need_ws && !at_line_start {
            self.buf.push(' ');
        } else if self.buf.ends_with('-') && text.starts_with('-') {
            // `- -1` must not become a line comment
            self.buf.push(' ');
        }
        self.buf.push_str(text);
    }

    /// Text written so far.
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// Finish writing; every frame must be closed.
    pub fn finish(self) -> Result<String, UnparseError> {
        if let Some(frame) = self.frames.last() {
            return Err(UnparseError::internal(format!(
                "{} frame(s) left open, innermost {:?}",
                self.frames.len(),
                frame.kind
            )));
        }
        Ok(self.buf)
    }
}
