use super::function::{Arguments, Function};
use super::op::Op;
use super::stack::Stack;
use super::{AddressSpace, Config, Heap, Rnd, StringSpace, Val, Var, Variables};
use crate::error;
use crate::lang::token::{self, Keyword};
use crate::lang::{tokenise, Cursor, Error, ErrorCode};

type Result<T> = std::result::Result<T, Error>;

const MAX_DEPTH: usize = 255;

/// ## Shunting-yard expression evaluator
///
/// Reads one expression from a token cursor and leaves the cursor on
/// the first token that is not part of it. Nothing is kept between
/// calls; every collaborator is borrowed for the duration.

pub struct Evaluator<'a> {
    pub strings: &'a mut dyn StringSpace,
    pub vars: &'a mut dyn Variables,
    pub memory: &'a mut AddressSpace,
    pub rnd: &'a mut Rnd,
    depth: usize,
}

impl<'a> Evaluator<'a> {
    pub fn new(
        strings: &'a mut dyn StringSpace,
        vars: &'a mut dyn Variables,
        memory: &'a mut AddressSpace,
        rnd: &'a mut Rnd,
    ) -> Evaluator<'a> {
        Evaluator {
            strings,
            vars,
            memory,
            rnd,
            depth: 0,
        }
    }

    pub fn evaluate(&mut self, cursor: &mut Cursor) -> Result<Val> {
        if self.depth > MAX_DEPTH {
            return Err(error!(OutOfMemory; "EXPRESSION TOO COMPLEX"));
        }
        self.depth += 1;
        let result = self.evaluate_inner(cursor);
        self.depth -= 1;
        result
    }

    fn evaluate_inner(&mut self, cursor: &mut Cursor) -> Result<Val> {
        let mut operations: Stack<Op> = Stack::new("EXPRESSION TOO COMPLEX");
        let mut units: Stack<Val> = Stack::new("EXPRESSION TOO COMPLEX");
        let mut expect_operand = true;
        let mut is_final = true;
        loop {
            let keyword = match cursor.skip_blank().and(cursor.peek_keyword()) {
                Some(keyword) => keyword,
                None => break,
            };
            if keyword == token::NOT && !expect_operand {
                break;
            }
            if Op::is_operator(keyword) {
                cursor.read_keyword();
                let mut second = None;
                if Op::is_combinable(keyword) {
                    cursor.skip_blank();
                    if let Some(next) = cursor.peek_keyword().filter(|k| Op::is_combinable(*k)) {
                        cursor.read_keyword();
                        second = Some(next);
                    }
                }
                if expect_operand || keyword == token::NOT {
                    match Op::unary(keyword, second) {
                        Some(op) => operations.push(op)?,
                        None => return Err(error!(SyntaxError)),
                    }
                } else {
                    let op = match Op::binary(keyword, second) {
                        Some(op) => op,
                        None => return Err(error!(SyntaxError)),
                    };
                    self.drain(op.precedence(), &mut operations, &mut units)?;
                    operations.push(op)?;
                }
                expect_operand = true;
                continue;
            }
            if !expect_operand {
                // two operands in a row end the expression
                break;
            }
            let byte = cursor.peek();
            if token::is_end_statement(byte) {
                break;
            }
            if token::is_end_expression(byte) {
                // a missing operand inside brackets or before a comma
                is_final = false;
                break;
            }
            let unit = if keyword == b'(' as Keyword {
                cursor.read();
                let val = self.evaluate(cursor)?;
                cursor.require_read(b")")?;
                val
            } else if keyword < 0x80 && (keyword as u8).is_ascii_alphabetic() {
                let name = cursor.read_name()?;
                let indices = self.parse_array_indices(cursor)?;
                self.vars.get_variable(&name, &indices)?
            } else if let Some(arguments) = Function::arguments(keyword) {
                cursor.read_keyword();
                self.function(cursor, keyword, arguments)?
            } else if keyword == b'"' as Keyword {
                let literal = cursor.read_string_literal();
                Val::String(self.strings.store(&literal)?)
            } else {
                cursor.read_number()?
            };
            units.push(unit)?;
            expect_operand = false;
        }
        self.drain(0, &mut operations, &mut units)
            .and_then(|_| units.pop())
            .map_err(|e| {
                let missing = e.is(ErrorCode::MissingOperand) || e.is(ErrorCode::InternalError);
                match (missing, is_final) {
                    (true, true) => error!(MissingOperand),
                    (true, false) => error!(SyntaxError),
                    (false, _) => e,
                }
            })
    }

    /// Apply stacked operators while they bind at least as tightly.
    fn drain(
        &mut self,
        precedence: u8,
        operations: &mut Stack<Op>,
        units: &mut Stack<Val>,
    ) -> Result<()> {
        while let Some(op) = operations.last().copied() {
            if precedence > op.precedence() {
                break;
            }
            operations.pop()?;
            if units.len() < op.arity() {
                return Err(error!(MissingOperand));
            }
            let args = units.pop_n(op.arity())?;
            units.push(op.apply(&mut *self.strings, &args)?)?;
        }
        Ok(())
    }

    /// Subscripts in round or square brackets. No brackets means a scalar.
    pub fn parse_array_indices(&mut self, cursor: &mut Cursor) -> Result<Vec<i16>> {
        let mut indices = vec![];
        if cursor.skip_blank_read_if(b"([").is_some() {
            loop {
                indices.push(self.evaluate(cursor)?.pass_integer()?);
                if cursor.skip_blank_read_if(b",").is_none() {
                    break;
                }
            }
            cursor.require_read(b")]")?;
        }
        Ok(indices)
    }

    fn arguments(&mut self, cursor: &mut Cursor, arguments: Arguments) -> Result<Vec<Option<Val>>> {
        let mut args = vec![];
        match arguments {
            Arguments::None => {}
            Arguments::Optional => {
                if cursor.skip_blank_read_if(b"(").is_some() {
                    args.push(Some(self.evaluate(cursor)?));
                    cursor.require_read(b")")?;
                } else {
                    args.push(None);
                }
            }
            Arguments::Fixed(len) => {
                cursor.require_read(b"(")?;
                for i in 0..len {
                    if i > 0 {
                        cursor.require_read(b",")?;
                    }
                    args.push(Some(self.evaluate(cursor)?));
                }
                cursor.require_read(b")")?;
            }
            Arguments::OptionalLast(len) => {
                cursor.require_read(b"(")?;
                for i in 0..len - 1 {
                    if i > 0 {
                        cursor.require_read(b",")?;
                    }
                    args.push(Some(self.evaluate(cursor)?));
                }
                if cursor.skip_blank_read_if(b",").is_some() {
                    args.push(Some(self.evaluate(cursor)?));
                } else {
                    args.push(None);
                }
                cursor.require_read(b")")?;
            }
            Arguments::Instr => {
                cursor.require_read(b"(")?;
                let first = self.evaluate(cursor)?;
                if first.is_string() {
                    args.push(None);
                    args.push(Some(first));
                } else {
                    args.push(Some(first));
                    cursor.require_read(b",")?;
                    args.push(Some(self.evaluate(cursor)?));
                }
                cursor.require_read(b",")?;
                args.push(Some(self.evaluate(cursor)?));
                cursor.require_read(b")")?;
            }
        }
        Ok(args)
    }

    fn function(&mut self, cursor: &mut Cursor, keyword: Keyword, arguments: Arguments) -> Result<Val> {
        use token::*;
        let args = self.arguments(cursor, arguments)?;
        let strings = &mut *self.strings;
        match (keyword, args.as_slice()) {
            (TIMER, []) => Function::timer(),
            (RND, [x]) => Ok(Val::Single(self.rnd.rnd(*x)?)),
            (PEEK, [Some(x)]) => Ok(Val::Integer(self.memory.peek(x.pass_unsigned()?)? as i16)),
            (SGN, [Some(x)]) => Function::sgn(*x),
            (INT, [Some(x)]) => Function::int(*x),
            (ABS, [Some(x)]) => Function::abs(*x),
            (FIX, [Some(x)]) => Function::fix(*x),
            (CINT, [Some(x)]) => Function::cint(*x),
            (CSNG, [Some(x)]) => Function::csng(*x),
            (CDBL, [Some(x)]) => Function::cdbl(*x),
            (SQR, [Some(x)]) => Function::sqr(*x),
            (EXP, [Some(x)]) => Function::exp(*x),
            (LOG, [Some(x)]) => Function::log(*x),
            (SIN, [Some(x)]) => Function::sin(*x),
            (COS, [Some(x)]) => Function::cos(*x),
            (TAN, [Some(x)]) => Function::tan(*x),
            (ATN, [Some(x)]) => Function::atn(*x),
            (LEN, [Some(x)]) => Function::len(*x),
            (ASC, [Some(x)]) => Function::asc(strings, *x),
            (CHR, [Some(x)]) => Function::chr(strings, *x),
            (SPACE, [Some(x)]) => Function::space(strings, *x),
            (STR, [Some(x)]) => Function::str(strings, *x),
            (VAL, [Some(x)]) => Function::val(strings, *x),
            (OCT, [Some(x)]) => Function::oct(strings, *x),
            (HEX, [Some(x)]) => Function::hex(strings, *x),
            (MKI, [Some(x)]) => Function::mki(strings, *x),
            (MKS, [Some(x)]) => Function::mks(strings, *x),
            (MKD, [Some(x)]) => Function::mkd(strings, *x),
            (CVI, [Some(x)]) => Function::cvi(strings, *x),
            (CVS, [Some(x)]) => Function::cvs(strings, *x),
            (CVD, [Some(x)]) => Function::cvd(strings, *x),
            (LEFT, [Some(s), Some(n)]) => Function::left(strings, *s, *n),
            (RIGHT, [Some(s), Some(n)]) => Function::right(strings, *s, *n),
            (MID, [Some(s), Some(start), n]) => Function::mid(strings, *s, *start, *n),
            (STRING, [Some(n), Some(c)]) => Function::string(strings, *n, *c),
            (INSTR, [start, Some(big), Some(small)]) => Function::instr(strings, *start, *big, *small),
            _ => Err(error!(InternalError; "FUNCTION ARGUMENTS")),
        }
    }
}

/// ## A machine to evaluate in
///
/// Owns string space, variables, the address space and the random
/// generator, the state an expression can read or change.

#[derive(Default)]
pub struct Machine {
    pub heap: Heap,
    pub vars: Var,
    pub memory: AddressSpace,
    pub rnd: Rnd,
}

impl Machine {
    pub fn new(config: Config) -> Machine {
        Machine {
            memory: AddressSpace::new(config),
            ..Machine::default()
        }
    }

    pub fn evaluator(&mut self) -> Evaluator<'_> {
        Evaluator::new(&mut self.heap, &mut self.vars, &mut self.memory, &mut self.rnd)
    }

    /// Tokenise and evaluate text. Anything left over after the
    /// expression is a syntax error.
    pub fn eval_str(&mut self, text: &str) -> Result<Val> {
        let tokens = tokenise(text)?;
        let mut cursor = Cursor::new(&tokens);
        let val = self.evaluator().evaluate(&mut cursor)?;
        if !token::is_end_statement(cursor.skip_blank()) {
            return Err(error!(SyntaxError));
        }
        Ok(val)
    }

    /// Bytes of a string value, or the PRINT form of a number.
    pub fn display(&self, val: Val) -> Result<Vec<u8>> {
        match val {
            Val::String(desc) => Ok(self.heap.copy(desc)),
            _ => super::format_for_display(val, super::DisplayMode::Print),
        }
    }

    /// Start over as after CLEAR, keeping the address space settings.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.vars.clear();
        self.rnd.clear();
        self.memory.reset();
    }
}
