use crate::lang::{tokenise, Cursor, ErrorCode};
use crate::mach::{Machine, Val, Variables};

fn eval(machine: &mut Machine, text: &str) -> String {
    match machine.eval_str(text).and_then(|val| machine.display(val)) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(error) => format!("?{}", error),
    }
}

fn error_of(text: &str) -> ErrorCode {
    let mut machine = Machine::default();
    let error = machine.eval_str(text).unwrap_err();
    for code in &[
        ErrorCode::SyntaxError,
        ErrorCode::IllegalFunctionCall,
        ErrorCode::Overflow,
        ErrorCode::OutOfMemory,
        ErrorCode::SubscriptOutOfRange,
        ErrorCode::DivisionByZero,
        ErrorCode::TypeMismatch,
        ErrorCode::MissingOperand,
    ] {
        if error.is(*code) {
            return *code;
        }
    }
    panic!("unexpected {}", error);
}

#[test]
fn test_precedence() {
    let mut m = Machine::default();
    assert_eq!(eval(&mut m, "2+3*4"), " 14 ");
    assert_eq!(eval(&mut m, "2+3*4^2"), " 50 ");
    assert_eq!(eval(&mut m, "(2+3)*4"), " 20 ");
    assert_eq!(eval(&mut m, "-2^2"), "-4 ");
    assert_eq!(eval(&mut m, "2^-1"), " .5 ");
    assert_eq!(eval(&mut m, "7\\2*3"), " 1 ");
    assert_eq!(eval(&mut m, "10-2-3"), " 5 ");
}

#[test]
fn test_logic_and_comparison() {
    let mut m = Machine::default();
    assert_eq!(eval(&mut m, "NOT 1=1"), " 0 ");
    assert_eq!(eval(&mut m, "1<2 AND 2<3"), "-1 ");
    assert_eq!(eval(&mut m, "1 <> 1"), " 0 ");
    assert_eq!(eval(&mut m, "2 >= 2"), "-1 ");
    assert_eq!(eval(&mut m, "2 => 3"), " 0 ");
    assert_eq!(eval(&mut m, "\"AB\"<\"ABC\""), "-1 ");
    assert_eq!(eval(&mut m, "\"B\"=\"B\""), "-1 ");
}

#[test]
fn test_promotion() {
    let mut m = Machine::default();
    assert_eq!(eval(&mut m, "32767+1"), " 32768 ");
    assert_eq!(eval(&mut m, "10/4"), " 2.5 ");
    assert_eq!(eval(&mut m, "&HFF"), " 255 ");
    assert_eq!(m.eval_str("2*3").unwrap(), Val::Integer(6));
}

#[test]
fn test_strings() {
    let mut m = Machine::default();
    assert_eq!(eval(&mut m, "\"A\"+\"B\""), "AB");
    assert_eq!(eval(&mut m, "MID$(\"HELLO\",2,3)"), "ELL");
    assert_eq!(eval(&mut m, "MID$(\"HELLO\",4)"), "LO");
    assert_eq!(eval(&mut m, "LEFT$(\"HELLO\",2)+RIGHT$(\"HELLO\",1)"), "HEO");
    assert_eq!(eval(&mut m, "LEN(\"HELLO\")"), " 5 ");
    assert_eq!(eval(&mut m, "INSTR(\"HELLO\",\"L\")"), " 3 ");
    assert_eq!(eval(&mut m, "INSTR(4,\"HELLO\",\"L\")"), " 4 ");
    assert_eq!(eval(&mut m, "STR$(5)"), " 5");
    assert_eq!(eval(&mut m, "STRING$(3,\"*\")"), "***");
}

#[test]
fn test_errors() {
    assert_eq!(error_of("1==2"), ErrorCode::SyntaxError);
    assert_eq!(error_of("1+"), ErrorCode::MissingOperand);
    assert_eq!(error_of("(1+)"), ErrorCode::SyntaxError);
    assert_eq!(error_of(")"), ErrorCode::SyntaxError);
    assert_eq!(error_of("1 2"), ErrorCode::SyntaxError);
    assert_eq!(error_of("\"A\"+1"), ErrorCode::TypeMismatch);
    assert_eq!(error_of("-\"A\""), ErrorCode::TypeMismatch);
    assert_eq!(error_of("1/0"), ErrorCode::DivisionByZero);
    assert_eq!(error_of("LEN(1)"), ErrorCode::TypeMismatch);
    assert_eq!(error_of("MID$(\"A\")"), ErrorCode::SyntaxError);
}

#[test]
fn test_nesting_limit() {
    let deep = format!("{}1{}", "(".repeat(300), ")".repeat(300));
    assert_eq!(error_of(&deep), ErrorCode::OutOfMemory);
    let mut m = Machine::default();
    let shallow = format!("{}1{}", "(".repeat(50), ")".repeat(50));
    assert_eq!(eval(&mut m, &shallow), " 1 ");
}

#[test]
fn test_variables_and_arrays() {
    let mut m = Machine::default();
    m.vars.set_variable("A%", &[3], Val::Integer(7)).unwrap();
    m.vars.set_variable("B", &[], Val::Integer(2)).unwrap();
    assert_eq!(eval(&mut m, "A%(1+2)*B"), " 14 ");
    assert_eq!(eval(&mut m, "A%[3]"), " 7 ");
    assert_eq!(eval(&mut m, "C"), " 0 ");
    assert_eq!(eval(&mut m, "A%(11)"), "?SUBSCRIPT OUT OF RANGE");
}

#[test]
fn test_rnd_and_peek() {
    let mut m = Machine::default();
    let first = m.eval_str("RND(1)").unwrap();
    assert_eq!(m.eval_str("RND(0)").unwrap(), first);
    assert_ne!(m.eval_str("RND").unwrap(), first);
    assert_eq!(eval(&mut m, "PEEK(2)"), " 16 ");
    m.memory.def_seg(Some(Val::Integer(0))).unwrap();
    assert_eq!(eval(&mut m, "PEEK(1040)"), " 38 ");
}

#[test]
fn test_cursor_left_after_expression() {
    let tokens = tokenise("1+2,3").unwrap();
    let mut cursor = Cursor::new(&tokens);
    let mut m = Machine::default();
    let val = m.evaluator().evaluate(&mut cursor).unwrap();
    assert_eq!(val, Val::Integer(3));
    assert_eq!(cursor.peek(), Some(b','));
}
