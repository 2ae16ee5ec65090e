use super::token::{self, Keyword};
use super::Error;
use crate::error;
use crate::mach::{Double, Mbf, Single, Val};

type Result<T> = std::result::Result<T, Error>;

const BLANKS: &[u8] = b" \t\n";
const SIGILS: &[u8] = b"$%!#";

/// ## Reading position in tokenised text
///
/// Nothing is ever copied out of the token stream except names,
/// string literals and number payloads.

#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(bytes: &'a [u8]) -> Cursor<'a> {
        Cursor { bytes, pos: 0 }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn set_pos(&mut self, pos: usize) {
        self.pos = pos.min(self.bytes.len());
    }

    pub fn remaining(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }

    pub fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    pub fn read(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    /// Skip blanks then peek.
    pub fn skip_blank(&mut self) -> Option<u8> {
        while let Some(byte) = self.peek() {
            if !BLANKS.contains(&byte) {
                break;
            }
            self.pos += 1;
        }
        self.peek()
    }

    pub fn skip_blank_read(&mut self) -> Option<u8> {
        self.skip_blank();
        self.read()
    }

    /// Skip blanks and consume the next byte if it is one of `set`.
    pub fn skip_blank_read_if(&mut self, set: &[u8]) -> Option<u8> {
        match self.skip_blank() {
            Some(byte) if set.contains(&byte) => {
                self.pos += 1;
                Some(byte)
            }
            _ => None,
        }
    }

    pub fn require_read(&mut self, set: &[u8]) -> Result<u8> {
        match self.skip_blank_read_if(set) {
            Some(byte) => Ok(byte),
            None => Err(error!(SyntaxError)),
        }
    }

    /// The next token as a keyword, two bytes after a prefix byte.
    /// Plain characters come back as their own byte value.
    pub fn peek_keyword(&self) -> Option<Keyword> {
        let first = self.peek()?;
        if token::is_prefix(first) {
            let second = self.bytes.get(self.pos + 1).copied().unwrap_or(0);
            Some(Keyword::from_be_bytes([first, second]))
        } else {
            Some(first as Keyword)
        }
    }

    pub fn read_keyword(&mut self) -> Option<Keyword> {
        let keyword = self.peek_keyword()?;
        self.pos = (self.pos + keyword_len(keyword)).min(self.bytes.len());
        Some(keyword)
    }

    /// Letters, digits and dots with an optional type sigil.
    /// Names are folded to upper case.
    pub fn read_name(&mut self) -> Result<String> {
        let mut name = String::new();
        match self.skip_blank() {
            Some(c) if c.is_ascii_alphabetic() => {}
            _ => return Err(error!(SyntaxError)),
        }
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == b'.' {
                name.push(c.to_ascii_uppercase() as char);
                self.pos += 1;
            } else {
                break;
            }
        }
        if let Some(c) = self.peek() {
            if SIGILS.contains(&c) {
                name.push(c as char);
                self.pos += 1;
            }
        }
        Ok(name)
    }

    /// Bytes of a quoted literal without the quotes. A missing closing
    /// quote ends the literal at the end of the line.
    pub fn read_string_literal(&mut self) -> Vec<u8> {
        let mut literal = vec![];
        if self.peek() != Some(b'"') {
            return literal;
        }
        self.pos += 1;
        while let Some(c) = self.peek() {
            if c == 0 {
                break;
            }
            self.pos += 1;
            if c == b'"' {
                break;
            }
            literal.push(c);
        }
        literal
    }

    /// Number token or plain ASCII digits.
    pub fn read_number(&mut self) -> Result<Val> {
        let lead = match self.peek() {
            Some(c) => c,
            None => return Err(error!(SyntaxError)),
        };
        if lead.is_ascii_digit() {
            return self.read_ascii_number();
        }
        let len = match token::number_payload(lead) {
            Some(len) => len,
            None => return Err(error!(SyntaxError)),
        };
        let payload = match self.bytes.get(self.pos + 1..self.pos + 1 + len) {
            Some(payload) => payload,
            None => return Err(error!(SyntaxError; "TRUNCATED NUMBER")),
        };
        self.pos += 1 + len;
        Ok(match lead {
            token::C_0..=token::C_10 => Val::Integer((lead - token::C_0) as i16),
            token::T_BYTE => Val::Integer(payload[0] as i16),
            token::T_OCT | token::T_HEX | token::T_INT => {
                Val::Integer(i16::from_le_bytes([payload[0], payload[1]]))
            }
            // line numbers read as numbers are unsigned
            token::T_UINT => Val::Single(Single::from_int(
                u16::from_le_bytes([payload[0], payload[1]]) as i64,
            )),
            token::T_SINGLE => Val::Single(Single::from_slice(payload)),
            _ => Val::Double(Double::from_slice(payload)),
        })
    }

    fn read_ascii_number(&mut self) -> Result<Val> {
        let start = self.pos;
        let mut have_point = false;
        let mut have_exp = false;
        while let Some(c) = self.peek() {
            let upper = c.to_ascii_uppercase();
            let prev = if self.pos > start {
                self.bytes[self.pos - 1].to_ascii_uppercase()
            } else {
                0
            };
            match upper {
                b'.' if !have_point && !have_exp => have_point = true,
                b'E' | b'D' if !have_exp => {
                    // ELSE and EQV written without a blank
                    let next = self.bytes.get(self.pos + 1).map(u8::to_ascii_uppercase);
                    if upper == b'E' && matches!(next, Some(b'L') | Some(b'Q')) {
                        break;
                    }
                    have_exp = true;
                }
                b'+' | b'-' if prev == b'E' || prev == b'D' => {}
                b'!' | b'#' if !have_exp => {
                    self.pos += 1;
                    break;
                }
                b'%' => {
                    self.pos += 1;
                    return Val::from_repr(&self.bytes[start..self.pos - 1], false);
                }
                _ if c.is_ascii_digit() || BLANKS.contains(&c) => {}
                _ => break,
            }
            self.pos += 1;
        }
        while self.pos > start && BLANKS.contains(&self.bytes[self.pos - 1]) {
            self.pos -= 1;
        }
        Val::from_repr(&self.bytes[start..self.pos], false)
    }
}

fn keyword_len(keyword: Keyword) -> usize {
    if keyword > 0xff {
        2
    } else {
        1
    }
}
