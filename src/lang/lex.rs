use super::token;
use super::Error;
use crate::mach::Val;

type Result<T> = std::result::Result<T, Error>;

/// Convert BASIC source text to tokenised form.
///
/// Keywords become their token bytes, numbers become number tokens and
/// everything else is copied through. A leading sign is never part of
/// a number; it stays a unary operator.
pub fn tokenise(s: &str) -> Result<Vec<u8>> {
    BasicLexer {
        chars: s.as_bytes(),
        pos: 0,
        allow_number: true,
    }
    .tokenise()
}

fn is_basic_whitespace(c: u8) -> bool {
    c == b' ' || c == b'\t' || c == b'\n'
}

fn is_name_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'.'
}

const ASCII_OPERATORS: &[u8] = b"+-=/\\^*<>";

struct BasicLexer<'a> {
    chars: &'a [u8],
    pos: usize,
    // numbers directly after a name are not tokenised, as in OPTION BASE 1
    allow_number: bool,
}

impl<'a> BasicLexer<'a> {
    fn peek(&self) -> Option<u8> {
        self.chars.get(self.pos).copied()
    }

    fn tokenise(mut self) -> Result<Vec<u8>> {
        let mut out = vec![];
        while let Some(c) = self.peek() {
            if c == 0 || c == b'\r' {
                break;
            } else if is_basic_whitespace(c) {
                self.pos += 1;
                out.push(c);
            } else if c == b'"' {
                self.string(&mut out);
            } else if c == b'&' || (self.allow_number && (c.is_ascii_digit() || c == b'.')) {
                self.number(&mut out)?;
            } else if ASCII_OPERATORS.contains(&c) {
                self.pos += 1;
                out.extend(keyword_for(&[c]));
                self.allow_number = true;
            } else if c.is_ascii_alphabetic() {
                self.word(&mut out);
            } else {
                self.pos += 1;
                self.allow_number = matches!(c, b',' | b'#' | b';' | b'(' | b'[');
                out.push(if (32..=127).contains(&c) { c } else { b' ' });
            }
        }
        Ok(out)
    }

    fn string(&mut self, out: &mut Vec<u8>) {
        let start = self.pos;
        self.pos += 1;
        while let Some(c) = self.peek() {
            if c == 0 || c == b'\r' {
                break;
            }
            self.pos += 1;
            if c == b'"' {
                break;
            }
        }
        out.extend_from_slice(&self.chars[start..self.pos]);
    }

    fn word(&mut self, out: &mut Vec<u8>) {
        let start = self.pos;
        let mut word = String::new();
        while let Some(c) = self.peek() {
            self.pos += 1;
            word.push(c.to_ascii_uppercase() as char);
            if let Some(keyword) = token::keyword_from_str(&word) {
                // part of a longer name
                if self.peek().map_or(false, is_name_char) {
                    continue;
                }
                if keyword == token::ELSE {
                    out.push(b':');
                }
                out.extend(token::keyword_bytes(keyword));
                self.allow_number = true;
                return;
            }
            if !is_name_char(c) {
                // a sigil ends a name; anything else is left for the caller
                if !matches!(c, b'$' | b'%' | b'!' | b'#') || word.len() == 1 {
                    self.pos -= 1;
                }
                break;
            }
        }
        out.extend_from_slice(&self.chars[start..self.pos]);
        self.allow_number = false;
    }

    fn number(&mut self, out: &mut Vec<u8>) -> Result<()> {
        let start = self.pos;
        let upper = |c: Option<u8>| c.map(|c| c.to_ascii_uppercase());
        if self.peek() == Some(b'&') {
            self.pos += 1;
            let hex = upper(self.peek()) == Some(b'H');
            if hex || upper(self.peek()) == Some(b'O') {
                self.pos += 1;
            }
            while let Some(c) = self.peek() {
                let digit = if hex {
                    c.is_ascii_hexdigit()
                } else {
                    (b'0'..=b'7').contains(&c) || is_basic_whitespace(c)
                };
                if !digit {
                    break;
                }
                self.pos += 1;
            }
            while self.pos > start && is_basic_whitespace(self.chars[self.pos - 1]) {
                self.pos -= 1;
            }
            let n = Val::from_repr(&self.chars[start..self.pos], false)?;
            out.push(if hex { token::T_HEX } else { token::T_OCT });
            out.extend(n.to_bytes());
            self.allow_number = false;
            return Ok(());
        }
        let mut have_point = false;
        let mut have_exp = false;
        let mut end = None;
        while let Some(c) = self.peek() {
            let prev = upper(self.pos.checked_sub(1).and_then(|i| self.chars.get(i).copied()));
            match c.to_ascii_uppercase() {
                b'.' if !have_point && !have_exp => have_point = true,
                b'E' | b'D' if !have_exp => {
                    let next = upper(self.chars.get(self.pos + 1).copied());
                    if c.to_ascii_uppercase() == b'E' && matches!(next, Some(b'L') | Some(b'Q')) {
                        break;
                    }
                    have_exp = true;
                }
                b'+' | b'-' if self.pos > start && matches!(prev, Some(b'E') | Some(b'D')) => {}
                b'!' | b'#' if !have_exp => {
                    self.pos += 1;
                    break;
                }
                b'%' => {
                    end = Some(self.pos);
                    self.pos += 1;
                    break;
                }
                _ if c.is_ascii_digit() || is_basic_whitespace(c) => {}
                _ => break,
            }
            self.pos += 1;
        }
        if end.is_none() {
            while self.pos > start && is_basic_whitespace(self.chars[self.pos - 1]) {
                self.pos -= 1;
            }
        }
        let text = &self.chars[start..end.unwrap_or(self.pos)];
        let n = match Val::from_repr(text, false) {
            Ok(n) => n,
            Err(e) if e.is_soft() => e.replacement().unwrap_or_default(),
            Err(e) => return Err(e),
        };
        out.extend(n.to_token()?);
        self.allow_number = false;
        Ok(())
    }
}

fn keyword_for(s: &[u8]) -> Vec<u8> {
    std::str::from_utf8(s)
        .ok()
        .and_then(token::keyword_from_str)
        .map(token::keyword_bytes)
        .unwrap_or_else(|| s.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::token::*;

    #[test]
    fn test_operators_and_numbers() {
        assert_eq!(
            tokenise("1+2*30").unwrap(),
            vec![C_0 + 1, O_PLUS as u8, C_0 + 2, O_TIMES as u8, T_BYTE, 30]
        );
        assert_eq!(
            tokenise("-1000").unwrap(),
            vec![O_MINUS as u8, T_INT, 0xe8, 0x03]
        );
        assert_eq!(tokenise("&HFF").unwrap(), vec![T_HEX, 0xff, 0x00]);
        assert_eq!(tokenise("&17").unwrap(), vec![T_OCT, 0x0f, 0x00]);
        assert_eq!(tokenise("1!").unwrap(), vec![T_SINGLE, 0, 0, 0, 0x81]);
    }

    #[test]
    fn test_keywords() {
        assert_eq!(
            tokenise("mid$(a$,2)").unwrap(),
            vec![0xff, 0x83, b'(', b'a', b'$', b',', C_0 + 2, b')']
        );
        assert_eq!(tokenise("a and b").unwrap(), vec![b'a', b' ', AND as u8, b' ', b'b']);
        // keywords inside a longer name stay letters
        assert_eq!(tokenise("tool").unwrap(), b"tool".to_vec());
        assert_eq!(tokenise("NOTE").unwrap(), b"NOTE".to_vec());
    }

    #[test]
    fn test_strings_and_names() {
        assert_eq!(tokenise("\"a+b\"").unwrap(), b"\"a+b\"".to_vec());
        assert_eq!(tokenise("x1").unwrap(), b"x1".to_vec());
        assert_eq!(tokenise("x% 1").unwrap(), b"x% 1".to_vec());
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(
            tokenise("a<>b").unwrap(),
            vec![b'a', O_LT as u8, O_GT as u8, b'b']
        );
        assert_eq!(
            tokenise("1E2ELSE").unwrap(),
            vec![T_SINGLE, 0x00, 0x00, 0x48, 0x87, 0x3a, ELSE as u8]
        );
    }
}
