use std::{io::BufRead, rc::Rc};

use crate::Position;

/// A pull-based supplier of source characters.
///
/// `next_char` yields `None` once the input is exhausted and keeps yielding
/// `None` on every later call.
pub trait CharacterSource {
    fn next_char(&mut self) -> Option<char>;

    /// Position of the character most recently returned by `next_char`.
    fn position(&self) -> Position;
}

/// Line and column bookkeeping shared by the sources.
#[derive(Debug, Clone)]
struct Cursor {
    line: u32,
    column: u32,
    file: Rc<String>,
}

impl Cursor {
    fn new(file: Option<String>) -> Self {
        Cursor {
            line: 1,
            column: 0,
            file: Rc::new(file.unwrap_or_else(|| String::from("shell"))),
        }
    }

    fn advance(&mut self, c: char) {
        if c == '\n' || c == '\r' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.column, Rc::clone(&self.file))
    }
}

/// Reads characters out of an in-memory string.
#[derive(Debug, Clone)]
pub struct StrSource {
    chars: Vec<char>,
    pos: usize,
    cursor: Cursor,
}

impl StrSource {
    pub fn new(source: &str, file: Option<String>) -> Self {
        StrSource {
            chars: source.chars().collect(),
            pos: 0,
            cursor: Cursor::new(file),
        }
    }
}

impl CharacterSource for StrSource {
    fn next_char(&mut self) -> Option<char> {
        let c = *self.chars.get(self.pos)?;
        self.pos += 1;
        self.cursor.advance(c);
        Some(c)
    }

    fn position(&self) -> Position {
        self.cursor.position()
    }
}

/// Reads characters from a buffered reader one line at a time, so an
/// interactive session only blocks when the current line is used up.
///
/// Read failures are treated as end of input.
pub struct ReaderSource<R: BufRead> {
    reader: R,
    line: Vec<char>,
    pos: usize,
    exhausted: bool,
    cursor: Cursor,
}

impl<R: BufRead> ReaderSource<R> {
    pub fn new(reader: R, file: Option<String>) -> Self {
        ReaderSource {
            reader,
            line: vec![],
            pos: 0,
            exhausted: false,
            cursor: Cursor::new(file),
        }
    }

    fn fill_line(&mut self) -> bool {
        if self.exhausted {
            return false;
        }

        let mut buffer = String::new();
        match self.reader.read_line(&mut buffer) {
            Ok(0) | Err(_) => {
                self.exhausted = true;
                false
            }
            Ok(_) => {
                self.line = buffer.chars().collect();
                self.pos = 0;
                true
            }
        }
    }
}

impl<R: BufRead> CharacterSource for ReaderSource<R> {
    fn next_char(&mut self) -> Option<char> {
        while self.pos >= self.line.len() {
            if !self.fill_line() {
                return None;
            }
        }

        let c = self.line[self.pos];
        self.pos += 1;
        self.cursor.advance(c);
        Some(c)
    }

    fn position(&self) -> Position {
        self.cursor.position()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor as IoCursor;

    use super::{CharacterSource, ReaderSource, StrSource};

    fn drain<S: CharacterSource>(source: &mut S) -> String {
        let mut out = String::new();
        while let Some(c) = source.next_char() {
            out.push(c);
        }
        out
    }

    #[test]
    fn test_str_source_tracks_lines() {
        let mut source = StrSource::new("ab\ncd", None);

        assert_eq!(source.next_char(), Some('a'));
        assert_eq!((source.position().line, source.position().column), (1, 1));
        assert_eq!(source.next_char(), Some('b'));
        assert_eq!(source.next_char(), Some('\n'));
        assert_eq!((source.position().line, source.position().column), (2, 0));
        assert_eq!(source.next_char(), Some('c'));
        assert_eq!((source.position().line, source.position().column), (2, 1));
        assert_eq!(source.next_char(), Some('d'));
        assert_eq!(source.next_char(), None);
        assert_eq!(source.next_char(), None);
    }

    #[test]
    fn test_carriage_return_starts_line() {
        let mut source = StrSource::new("a\rb", Some("cr.ks".to_string()));
        drain(&mut source);

        assert_eq!(source.position().line, 2);
        assert_eq!(source.position().file.as_str(), "cr.ks");
    }

    #[test]
    fn test_reader_source_matches_str_source() {
        let text = "def f(x)\n  x*2\nf(3);\n";
        let mut reader = ReaderSource::new(IoCursor::new(text.as_bytes()), None);
        let mut string = StrSource::new(text, None);

        assert_eq!(drain(&mut reader), drain(&mut string));
        assert_eq!(reader.position(), string.position());
        assert_eq!(reader.next_char(), None);
    }
}
