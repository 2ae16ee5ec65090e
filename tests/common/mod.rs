#![allow(dead_code)]

use basic::mach::{format_with_template, Machine, Val};

/// What PRINT would show, or the error line.
pub fn eval(machine: &mut Machine, text: &str) -> String {
    match machine.eval_str(text).and_then(|val| machine.display(val)) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(error) => format!("?{}", error),
    }
}

pub fn using(machine: &mut Machine, template: &str, values: &[&str]) -> String {
    let values: Vec<Val> = values
        .iter()
        .map(|text| machine.eval_str(text).unwrap())
        .collect();
    match format_with_template(template.as_bytes(), &values, &machine.heap) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(error) => format!("?{}", error),
    }
}
