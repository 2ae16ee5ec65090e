mod common;
use basic::mach::{format_for_display, DisplayMode, Machine, Val};
use common::*;

#[test]
fn test_print_form() {
    let mut m = Machine::default();
    assert_eq!(eval(&mut m, "1/3"), " .3333334 ");
    assert_eq!(eval(&mut m, "1#/3"), " .3333333333333333 ");
    assert_eq!(eval(&mut m, "1E20"), " 1E+20 ");
    assert_eq!(eval(&mut m, "123456789012"), " 123456789012 ");
    assert_eq!(eval(&mut m, ".001"), " .001 ");
    assert_eq!(eval(&mut m, "1E39"), " 1.701412E+38 ");
    assert_eq!(eval(&mut m, "-0.5"), "-.5 ");
}

#[test]
fn test_str_and_listing() {
    let str_form = format_for_display(Val::Integer(5), DisplayMode::Str).unwrap();
    assert_eq!(str_form, b" 5");
    let write_form = format_for_display(Val::Integer(-5), DisplayMode::Write).unwrap();
    assert_eq!(write_form, b"-5");
    let mut m = Machine::default();
    let half = m.eval_str("1/2").unwrap();
    assert_eq!(format_for_display(half, DisplayMode::Listing).unwrap(), b".5");
    let string = m.eval_str("\"X\"").unwrap();
    assert!(format_for_display(string, DisplayMode::Print).is_err());
}

#[test]
fn test_using_numbers() {
    let mut m = Machine::default();
    assert_eq!(using(&mut m, "##.##", &["3.14159"]), " 3.14");
    assert_eq!(using(&mut m, "+#.#^^^^", &["12345"]), "+1.2E+04");
    assert_eq!(using(&mut m, "**$##.##", &["12.5"]), "**$12.50");
    assert_eq!(using(&mut m, "##.##", &["123.456"]), "%123.46");
    assert_eq!(using(&mut m, "##.##-", &["-1.5"]), " 1.50-");
    assert_eq!(using(&mut m, "#,###", &["1234"]), "1,234");
}

#[test]
fn test_using_strings() {
    let mut m = Machine::default();
    assert_eq!(using(&mut m, "!", &["\"HELLO\""]), "H");
    assert_eq!(using(&mut m, "& and &", &["\"A\"", "\"B\""]), "A and B");
    assert_eq!(using(&mut m, "\\ \\", &["\"HELLO\""]), "HE");
    assert_eq!(using(&mut m, "!", &["1"]), "?TYPE MISMATCH");
    assert_eq!(using(&mut m, "NONE", &["1"]), "?ILLEGAL FUNCTION CALL");
}
