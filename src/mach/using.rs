use super::format::{to_str_fixed, to_str_scientific};
use super::heap::StringSpace;
use super::mbf::{Double, Mbf, Single};
use super::val::Val;
use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// ## PRINT USING
///
/// Fields are found by scanning the template; everything between them
/// is copied through. When there are more values than fields the
/// template starts over, but literal text ahead of the first field is
/// only written if another value follows.

pub fn format_with_template(
    template: &[u8],
    values: &[Val],
    strings: &dyn StringSpace,
) -> Result<Vec<u8>> {
    if template.is_empty() {
        return Err(error!(IllegalFunctionCall));
    }
    let mut out = vec![];
    let mut values = values.iter();
    let mut pos = 0;
    let mut has_fields = false;
    let mut start_cycle = true;
    let mut initial_literal = vec![];
    loop {
        if pos >= template.len() {
            if !has_fields {
                break;
            }
            start_cycle = true;
            initial_literal.clear();
            pos = 0;
            continue;
        }
        let literal = if template[pos] == b'_' {
            // the underscore itself when it ends the template
            let c = template[(pos + 1).min(template.len() - 1)];
            pos += 2;
            Some(c)
        } else if let Some((field, len)) = Field::parse(&template[pos..]) {
            has_fields = true;
            pos += len;
            let val = match values.next() {
                Some(val) => *val,
                None => break,
            };
            if start_cycle {
                out.append(&mut initial_literal);
                start_cycle = false;
            }
            out.extend(field.format(val, strings)?);
            None
        } else {
            pos += 1;
            Some(template[pos - 1])
        };
        if let Some(c) = literal {
            if start_cycle {
                initial_literal.push(c);
            } else {
                out.push(c);
            }
        }
    }
    if !has_fields {
        return Err(error!(IllegalFunctionCall));
    }
    Ok(out)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    String(StringField),
    Number(NumberField),
}

impl Field {
    /// A field at the start of `template` and the bytes it spans.
    pub fn parse(template: &[u8]) -> Option<(Field, usize)> {
        if let Some(field) = StringField::parse(template) {
            let len = field.width();
            return Some((Field::String(field), len));
        }
        NumberField::parse(template).map(|field| {
            let len = field.width();
            (Field::Number(field), len)
        })
    }

    pub fn format(&self, val: Val, strings: &dyn StringSpace) -> Result<Vec<u8>> {
        match self {
            Field::String(field) => field.format(val, strings),
            Field::Number(field) => field.format(val),
        }
    }
}

/// `!` first character, `&` whole string, `\  \` fixed width.
#[derive(Debug, Clone, PartialEq)]
pub struct StringField {
    token: Vec<u8>,
}

impl StringField {
    pub fn parse(template: &[u8]) -> Option<StringField> {
        match template.first()? {
            b'!' | b'&' => Some(StringField {
                token: template[..1].to_vec(),
            }),
            b'\\' => {
                for (i, c) in template.iter().enumerate().skip(1) {
                    match c {
                        b'\\' => {
                            return Some(StringField {
                                token: template[..=i].to_vec(),
                            })
                        }
                        b' ' => continue,
                        _ => return None,
                    }
                }
                None
            }
            _ => None,
        }
    }

    pub fn width(&self) -> usize {
        self.token.len()
    }

    pub fn format(&self, val: Val, strings: &dyn StringSpace) -> Result<Vec<u8>> {
        let mut s = strings.copy(val.pass_string()?);
        if self.token != b"&" {
            s.resize(self.width(), b' ');
        }
        Ok(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumberField {
    token: Vec<u8>,
    digits_before: usize,
    decimals: usize,
    comma: bool,
}

impl NumberField {
    pub fn parse(template: &[u8]) -> Option<NumberField> {
        let peek = |i: usize| template.get(i).copied();
        let mut pos = 0;
        let mut digits_before = 0;
        let mut decimals = 0;
        let leading_plus = peek(0) == Some(b'+');
        if leading_plus {
            pos += 1;
        }
        if let Some(c @ b'$') | Some(c @ b'*') = peek(pos) {
            if peek(pos + 1) != Some(c) {
                return None;
            }
            pos += 2;
            if c == b'*' {
                digits_before += 2;
                if peek(pos) == Some(b'$') {
                    pos += 1;
                }
            } else {
                digits_before += 1;
            }
        }
        let mut dot = peek(pos) == Some(b'.');
        let mut comma = false;
        if matches!(peek(pos), Some(b'.') | Some(b'#')) {
            if dot {
                pos += 1;
            }
            loop {
                match peek(pos) {
                    Some(b'.') if !dot => dot = true,
                    Some(b'#') if dot => decimals += 1,
                    Some(b'#') => digits_before += 1,
                    Some(b',') if !dot => {
                        digits_before += 1;
                        comma = true;
                    }
                    _ => break,
                }
                pos += 1;
            }
        }
        if digits_before + decimals == 0 {
            return None;
        }
        if template[pos..].starts_with(b"^^^^") {
            pos += 4;
        }
        if !leading_plus && matches!(peek(pos), Some(b'-') | Some(b'+')) {
            pos += 1;
        }
        Some(NumberField {
            token: template[..pos].to_vec(),
            digits_before,
            decimals,
            comma,
        })
    }

    pub fn width(&self) -> usize {
        self.token.len()
    }

    pub fn format(&self, val: Val) -> Result<Vec<u8>> {
        match val.pass_float()? {
            Val::Double(n) => self.format_float::<Double>(n),
            Val::Single(n) => self.format_float::<Single>(n),
            _ => Err(error!(InternalError; "NOT A FLOAT")),
        }
    }

    fn format_float<F: Mbf>(&self, x: F) -> Result<Vec<u8>> {
        let token = &self.token[..];
        let mut digits_before = self.digits_before;
        if digits_before + self.decimals > 24 {
            return Err(error!(IllegalFunctionCall));
        }
        let has_dollar = token.contains(&b'$');
        let force_dot = token.contains(&b'.');
        let neg = x.is_neg();
        let mut out = vec![];
        let mut post_sign = None;
        if token.first() == Some(&b'+') {
            out.push(if neg { b'-' } else { b'+' });
        } else if token.last() == Some(&b'+') {
            post_sign = Some(if neg { b'-' } else { b'+' });
        } else if token.last() == Some(&b'-') {
            post_sign = Some(if neg { b'-' } else { b' ' });
        } else {
            if neg {
                out.push(b'-');
            }
            // the sign takes a digit position
            if !has_dollar {
                digits_before = digits_before.saturating_sub(1);
            }
        }
        if has_dollar {
            out.push(b'$');
        }
        let x = x.abs();
        if token.contains(&b'^') {
            out.extend(to_str_scientific(
                x,
                digits_before,
                self.decimals,
                force_dot,
                self.comma,
            ));
        } else {
            out.extend(to_str_fixed(x, self.decimals, force_dot, self.comma));
        }
        out.extend(post_sign);
        if out.len() < token.len() {
            if out.starts_with(b".") {
                out.insert(0, b'0');
            } else if out.starts_with(b"+.") || out.starts_with(b"-.") {
                out.insert(1, b'0');
            }
        }
        if out.len() > token.len() {
            out.insert(0, b'%');
            return Ok(out);
        }
        let fill = if token.contains(&b'*') { b'*' } else { b' ' };
        let mut padded = vec![fill; token.len() - out.len()];
        padded.extend(out);
        Ok(padded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::ErrorCode;
    use crate::mach::Heap;

    fn using(template: &str, values: &[Val], heap: &Heap) -> String {
        let out = format_with_template(template.as_bytes(), values, heap).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn num(text: &str) -> Val {
        Val::from_repr(text.as_bytes(), false).unwrap()
    }

    #[test]
    fn test_number_fields() {
        let heap = Heap::default();
        assert_eq!(using("##.##", &[num("3.14159")], &heap), " 3.14");
        assert_eq!(using("##.##", &[num("-3.14159")], &heap), "-3.14");
        assert_eq!(using("+##.##", &[num("3.14159")], &heap), " +3.14");
        assert_eq!(using("##.##-", &[num("-3.14159")], &heap), " 3.14-");
        assert_eq!(using("#,###", &[Val::Integer(1234)], &heap), "1,234");
        assert_eq!(using("##", &[num("1234")], &heap), "%1234");
        assert_eq!(using("#####.#", &[num("-0.25")], &heap), "   -0.3");
        assert_eq!(using("##.##", &[Val::Double(Double::TEN)], &heap), "10.00");
    }

    #[test]
    fn test_fill_and_currency() {
        let heap = Heap::default();
        assert_eq!(using("**#.#", &[num("1.25")], &heap), "**1.3");
        assert_eq!(using("$$##.##", &[num("12.5")], &heap), " $12.50");
        assert_eq!(using("**$##.##", &[num("12.5")], &heap), "**$12.50");
        assert_eq!(using("##.##^^^^", &[num("1234.5")], &heap), " 1.23E+03");
    }

    #[test]
    fn test_leading_zero() {
        let heap = Heap::default();
        assert_eq!(using(".##", &[num("0.5")], &heap), ".50");
        assert_eq!(using("#.##", &[num("0.5")], &heap), "0.50");
    }

    #[test]
    fn test_string_fields() {
        let mut heap = Heap::default();
        let hello = Val::String(heap.store(b"HELLO").unwrap());
        assert_eq!(using("!", &[hello], &heap), "H");
        assert_eq!(using("\\  \\", &[hello], &heap), "HELL");
        assert_eq!(using("&", &[hello], &heap), "HELLO");
        assert_eq!(using("[\\     \\]", &[hello], &heap), "[HELLO  ]");
        let err = format_with_template(b"!", &[Val::Integer(1)], &heap).unwrap_err();
        assert!(err.is(ErrorCode::TypeMismatch));
    }

    #[test]
    fn test_template_cycles() {
        let heap = Heap::default();
        let values = [Val::Integer(1), Val::Integer(2), Val::Integer(3)];
        assert_eq!(using("A## ", &values, &heap), "A 1 A 2 A 3 ");
        assert_eq!(using("_###", &[Val::Integer(5)], &heap), "# 5");
    }

    #[test]
    fn test_bad_templates() {
        let heap = Heap::default();
        let empty = format_with_template(b"", &[Val::Integer(1)], &heap).unwrap_err();
        assert!(empty.is(ErrorCode::IllegalFunctionCall));
        let literal = format_with_template(b"abc", &[Val::Integer(1)], &heap).unwrap_err();
        assert!(literal.is(ErrorCode::IllegalFunctionCall));
        let wide = format_with_template(&[b'#'; 25], &[Val::Integer(1)], &heap).unwrap_err();
        assert!(wide.is(ErrorCode::IllegalFunctionCall));
    }
}
