use crate::mach::Val;

pub struct Error {
    code: u16,
    message: &'static str,
    replacement: Option<Val>,
}

#[doc(hidden)]
#[macro_export]
macro_rules! error {
    ($err:ident) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
    };
    ($err:ident; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).message($msg)
    };
    ($err:ident, $val:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).replace_with($val)
    };
}

impl Error {
    pub fn new(code: ErrorCode) -> Error {
        Error {
            code: code as u16,
            message: "",
            replacement: None,
        }
    }

    pub fn message(&self, message: &'static str) -> Error {
        debug_assert_eq!(self.message.len(), 0);
        Error {
            code: self.code,
            message,
            replacement: self.replacement,
        }
    }

    /// Attach the value a caller may continue with after a soft fault.
    pub fn replace_with(&self, val: Val) -> Error {
        log::debug!("{} RAISED; REPLACEMENT {:?}", self, val);
        Error {
            code: self.code,
            message: self.message,
            replacement: Some(val),
        }
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn is(&self, code: ErrorCode) -> bool {
        self.code == code as u16
    }

    /// Float overflow and division by zero may be reported and then
    /// ignored by continuing with the replacement value.
    pub fn is_soft(&self) -> bool {
        self.replacement.is_some()
            && (self.is(ErrorCode::Overflow) || self.is(ErrorCode::DivisionByZero))
    }

    pub fn replacement(&self) -> Option<Val> {
        self.replacement
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    SyntaxError = 2,
    IllegalFunctionCall = 5,
    Overflow = 6,
    OutOfMemory = 7,
    SubscriptOutOfRange = 9,
    DivisionByZero = 11,
    TypeMismatch = 13,
    OutOfStringSpace = 14,
    StringTooLong = 15,
    MissingOperand = 22,
    FieldOverflow = 50,
    InternalError = 51,
    BadFileMode = 54,
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error {{ {} }}", self.to_string())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let code_str = match self.code {
            2 => "SYNTAX ERROR",
            5 => "ILLEGAL FUNCTION CALL",
            6 => "OVERFLOW",
            7 => "OUT OF MEMORY",
            9 => "SUBSCRIPT OUT OF RANGE",
            11 => "DIVISION BY ZERO",
            13 => "TYPE MISMATCH",
            14 => "OUT OF STRING SPACE",
            15 => "STRING TOO LONG",
            22 => "MISSING OPERAND",
            50 => "FIELD OVERFLOW",
            51 => "INTERNAL ERROR",
            54 => "BAD FILE MODE",
            _ => "",
        };
        let mut suffix = String::new();
        if !self.message.is_empty() {
            suffix.push_str(&format!("; {}", self.message));
        }
        if code_str.is_empty() {
            write!(f, "PROGRAM ERROR {}{}", self.code, suffix)
        } else {
            write!(f, "{}{}", code_str, suffix)
        }
    }
}
