//! Byte values of tokenised BASIC text.
//!
//! Keywords below 0x100 take one byte. Larger values are two bytes,
//! a 0xFD, 0xFE or 0xFF prefix followed by the low byte.

pub type Keyword = u16;

pub const T_OCT: u8 = 0x0b;
pub const T_HEX: u8 = 0x0c;
pub const T_UINT: u8 = 0x0e;
pub const T_BYTE: u8 = 0x0f;
pub const C_0: u8 = 0x11;
pub const C_10: u8 = 0x1b;
pub const T_INT: u8 = 0x1c;
pub const T_SINGLE: u8 = 0x1d;
pub const T_DOUBLE: u8 = 0x1f;

pub const GOTO: Keyword = 0x89;
pub const GOSUB: Keyword = 0x8d;
pub const ELSE: Keyword = 0xa1;
pub const TO: Keyword = 0xcc;
pub const THEN: Keyword = 0xcd;
pub const STEP: Keyword = 0xcf;
pub const NOT: Keyword = 0xd3;
pub const STRING: Keyword = 0xd6;
pub const USING: Keyword = 0xd7;
pub const INSTR: Keyword = 0xd8;

pub const O_GT: Keyword = 0xe6;
pub const O_EQ: Keyword = 0xe7;
pub const O_LT: Keyword = 0xe8;
pub const O_PLUS: Keyword = 0xe9;
pub const O_MINUS: Keyword = 0xea;
pub const O_TIMES: Keyword = 0xeb;
pub const O_DIV: Keyword = 0xec;
pub const O_CARET: Keyword = 0xed;
pub const AND: Keyword = 0xee;
pub const OR: Keyword = 0xef;
pub const XOR: Keyword = 0xf0;
pub const EQV: Keyword = 0xf1;
pub const IMP: Keyword = 0xf2;
pub const MOD: Keyword = 0xf3;
pub const O_INTDIV: Keyword = 0xf4;

pub const CVI: Keyword = 0xfd81;
pub const CVS: Keyword = 0xfd82;
pub const CVD: Keyword = 0xfd83;
pub const MKI: Keyword = 0xfd84;
pub const MKS: Keyword = 0xfd85;
pub const MKD: Keyword = 0xfd86;

pub const TIMER: Keyword = 0xfe94;

pub const LEFT: Keyword = 0xff81;
pub const RIGHT: Keyword = 0xff82;
pub const MID: Keyword = 0xff83;
pub const SGN: Keyword = 0xff84;
pub const INT: Keyword = 0xff85;
pub const ABS: Keyword = 0xff86;
pub const SQR: Keyword = 0xff87;
pub const RND: Keyword = 0xff88;
pub const SIN: Keyword = 0xff89;
pub const LOG: Keyword = 0xff8a;
pub const EXP: Keyword = 0xff8b;
pub const COS: Keyword = 0xff8c;
pub const TAN: Keyword = 0xff8d;
pub const ATN: Keyword = 0xff8e;
pub const LEN: Keyword = 0xff92;
pub const STR: Keyword = 0xff93;
pub const VAL: Keyword = 0xff94;
pub const ASC: Keyword = 0xff95;
pub const CHR: Keyword = 0xff96;
pub const PEEK: Keyword = 0xff97;
pub const SPACE: Keyword = 0xff98;
pub const OCT: Keyword = 0xff99;
pub const HEX: Keyword = 0xff9a;
pub const CINT: Keyword = 0xff9c;
pub const CSNG: Keyword = 0xff9d;
pub const CDBL: Keyword = 0xff9e;
pub const FIX: Keyword = 0xff9f;

/// Spelling of every keyword the tokeniser knows.
pub const KEYWORDS: &[(Keyword, &str)] = &[
    (GOTO, "GOTO"),
    (GOSUB, "GOSUB"),
    (ELSE, "ELSE"),
    (TO, "TO"),
    (THEN, "THEN"),
    (STEP, "STEP"),
    (NOT, "NOT"),
    (STRING, "STRING$"),
    (USING, "USING"),
    (INSTR, "INSTR"),
    (O_GT, ">"),
    (O_EQ, "="),
    (O_LT, "<"),
    (O_PLUS, "+"),
    (O_MINUS, "-"),
    (O_TIMES, "*"),
    (O_DIV, "/"),
    (O_CARET, "^"),
    (AND, "AND"),
    (OR, "OR"),
    (XOR, "XOR"),
    (EQV, "EQV"),
    (IMP, "IMP"),
    (MOD, "MOD"),
    (O_INTDIV, "\\"),
    (CVI, "CVI"),
    (CVS, "CVS"),
    (CVD, "CVD"),
    (MKI, "MKI$"),
    (MKS, "MKS$"),
    (MKD, "MKD$"),
    (TIMER, "TIMER"),
    (LEFT, "LEFT$"),
    (RIGHT, "RIGHT$"),
    (MID, "MID$"),
    (SGN, "SGN"),
    (INT, "INT"),
    (ABS, "ABS"),
    (SQR, "SQR"),
    (RND, "RND"),
    (SIN, "SIN"),
    (LOG, "LOG"),
    (EXP, "EXP"),
    (COS, "COS"),
    (TAN, "TAN"),
    (ATN, "ATN"),
    (LEN, "LEN"),
    (STR, "STR$"),
    (VAL, "VAL"),
    (ASC, "ASC"),
    (CHR, "CHR$"),
    (PEEK, "PEEK"),
    (SPACE, "SPACE$"),
    (OCT, "OCT$"),
    (HEX, "HEX$"),
    (CINT, "CINT"),
    (CSNG, "CSNG"),
    (CDBL, "CDBL"),
    (FIX, "FIX"),
];

pub fn keyword_from_str(s: &str) -> Option<Keyword> {
    KEYWORDS
        .iter()
        .find(|(_, name)| *name == s)
        .map(|(keyword, _)| *keyword)
}

pub fn keyword_name(keyword: Keyword) -> Option<&'static str> {
    KEYWORDS
        .iter()
        .find(|(k, _)| *k == keyword)
        .map(|(_, name)| *name)
}

pub fn keyword_bytes(keyword: Keyword) -> Vec<u8> {
    if keyword > 0xff {
        keyword.to_be_bytes().to_vec()
    } else {
        vec![keyword as u8]
    }
}

/// Bytes that start a two byte keyword.
pub fn is_prefix(byte: u8) -> bool {
    byte >= 0xfd
}

/// End of a statement ends any expression.
pub fn is_end_statement(byte: Option<u8>) -> bool {
    matches!(byte, None | Some(0) | Some(b':'))
}

pub fn is_end_expression(byte: Option<u8>) -> bool {
    is_end_statement(byte) || matches!(byte, Some(b')') | Some(b']') | Some(b',') | Some(b';'))
}

/// Length of the payload that follows a number token.
pub fn number_payload(byte: u8) -> Option<usize> {
    match byte {
        T_OCT | T_HEX | T_UINT | T_INT => Some(2),
        T_BYTE => Some(1),
        T_SINGLE => Some(4),
        T_DOUBLE => Some(8),
        C_0..=C_10 => Some(0),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup() {
        assert_eq!(keyword_from_str("MID$"), Some(MID));
        assert_eq!(keyword_from_str("MID"), None);
        assert_eq!(keyword_name(O_INTDIV), Some("\\"));
        assert_eq!(keyword_bytes(TIMER), vec![0xfe, 0x94]);
        assert_eq!(keyword_bytes(NOT), vec![0xd3]);
    }

    #[test]
    fn test_terminators() {
        assert!(is_end_statement(None));
        assert!(is_end_statement(Some(b':')));
        assert!(!is_end_statement(Some(b')')));
        assert!(is_end_expression(Some(b',')));
        assert_eq!(number_payload(T_DOUBLE), Some(8));
        assert_eq!(number_payload(C_0 + 3), Some(0));
        assert_eq!(number_payload(b'A'), None);
    }
}
