use super::{Operation, StringSpace, Val};
use crate::error;
use crate::lang::token::{self, Keyword};
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// ## Expression operators
///
/// Each operator knows its arity and binding strength. `^` binds
/// tightest, `IMP` loosest. Comparisons may be written as two adjacent
/// tokens such as `<` `>`, in either order.

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Pow,
    Neg,
    Pos,
    Mul,
    Div,
    DivInt,
    Mod,
    Add,
    Sub,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Not,
    And,
    Or,
    Xor,
    Eqv,
    Imp,
}

impl Op {
    /// Tokens that begin an operator.
    pub fn is_operator(keyword: Keyword) -> bool {
        keyword == token::NOT || (token::O_GT..=token::O_INTDIV).contains(&keyword)
    }

    /// `<`, `=` and `>` pair up with a following comparison token.
    pub fn is_combinable(keyword: Keyword) -> bool {
        matches!(keyword, token::O_LT | token::O_EQ | token::O_GT)
    }

    pub fn unary(keyword: Keyword, second: Option<Keyword>) -> Option<Op> {
        if second.is_some() {
            return None;
        }
        match keyword {
            token::O_MINUS => Some(Op::Neg),
            token::O_PLUS => Some(Op::Pos),
            token::NOT => Some(Op::Not),
            _ => None,
        }
    }

    pub fn binary(keyword: Keyword, second: Option<Keyword>) -> Option<Op> {
        use token::*;
        Some(match (keyword, second) {
            (O_CARET, None) => Op::Pow,
            (O_TIMES, None) => Op::Mul,
            (O_DIV, None) => Op::Div,
            (O_INTDIV, None) => Op::DivInt,
            (MOD, None) => Op::Mod,
            (O_PLUS, None) => Op::Add,
            (O_MINUS, None) => Op::Sub,
            (O_EQ, None) => Op::Eq,
            (O_LT, None) => Op::Lt,
            (O_GT, None) => Op::Gt,
            (O_LT, Some(O_GT)) | (O_GT, Some(O_LT)) => Op::NotEq,
            (O_LT, Some(O_EQ)) | (O_EQ, Some(O_LT)) => Op::LtEq,
            (O_GT, Some(O_EQ)) | (O_EQ, Some(O_GT)) => Op::GtEq,
            (AND, None) => Op::And,
            (OR, None) => Op::Or,
            (XOR, None) => Op::Xor,
            (EQV, None) => Op::Eqv,
            (IMP, None) => Op::Imp,
            _ => return None,
        })
    }

    pub fn precedence(self) -> u8 {
        use Op::*;
        match self {
            Pow => 13,
            Neg | Pos => 12,
            Mul | Div => 11,
            DivInt => 10,
            Mod => 9,
            Add | Sub => 8,
            Eq | NotEq | Lt | LtEq | Gt | GtEq => 7,
            Not => 6,
            And => 5,
            Or => 4,
            Xor => 3,
            Eqv => 2,
            Imp => 1,
        }
    }

    pub fn arity(self) -> usize {
        match self {
            Op::Neg | Op::Pos | Op::Not => 1,
            _ => 2,
        }
    }

    /// Operands in written order.
    pub fn apply(self, strings: &mut dyn StringSpace, args: &[Val]) -> Result<Val> {
        use Op::*;
        match (self, args) {
            (Neg, [x]) => Operation::negate(*x),
            (Pos, [x]) => Operation::identity(*x),
            (Not, [x]) => Operation::not(*x),
            (Pow, [l, r]) => Operation::power(*l, *r),
            (Mul, [l, r]) => Operation::multiply(*l, *r),
            (Div, [l, r]) => Operation::divide(*l, *r),
            (DivInt, [l, r]) => Operation::divide_int(*l, *r),
            (Mod, [l, r]) => Operation::modulus(*l, *r),
            (Add, [l, r]) => Operation::sum(strings, *l, *r),
            (Sub, [l, r]) => Operation::subtract(*l, *r),
            (Eq, [l, r]) => Operation::equal(strings, *l, *r),
            (NotEq, [l, r]) => Operation::not_equal(strings, *l, *r),
            (Lt, [l, r]) => Operation::less(strings, *l, *r),
            (LtEq, [l, r]) => Operation::less_equal(strings, *l, *r),
            (Gt, [l, r]) => Operation::greater(strings, *l, *r),
            (GtEq, [l, r]) => Operation::greater_equal(strings, *l, *r),
            (And, [l, r]) => Operation::and(*l, *r),
            (Or, [l, r]) => Operation::or(*l, *r),
            (Xor, [l, r]) => Operation::xor(*l, *r),
            (Eqv, [l, r]) => Operation::eqv(*l, *r),
            (Imp, [l, r]) => Operation::imp(*l, *r),
            _ => Err(error!(InternalError; "OPERAND COUNT")),
        }
    }
}

impl std::fmt::Debug for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_string())
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Op::*;
        let s = match self {
            Pow => "^",
            Neg => "NEG",
            Pos => "POS",
            Mul => "*",
            Div => "/",
            DivInt => "\\",
            Mod => "MOD",
            Add => "+",
            Sub => "-",
            Eq => "=",
            NotEq => "<>",
            Lt => "<",
            LtEq => "<=",
            Gt => ">",
            GtEq => ">=",
            Not => "NOT",
            And => "AND",
            Or => "OR",
            Xor => "XOR",
            Eqv => "EQV",
            Imp => "IMP",
        };
        write!(f, "{}", s)
    }
}
