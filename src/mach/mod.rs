/*!
## Rust Machine Module

Values and the machinery that works on them: packed floats, number
formatting, operators, functions, the expression evaluator and the
emulated address space.

*/

mod config;
mod expr;
mod format;
mod function;
mod heap;
mod math;
mod mbf;
mod memory;
mod op;
mod operation;
mod rnd;
mod stack;
mod using;
mod val;
mod var;

pub use config::Config;
pub use config::Syntax;
pub use expr::Evaluator;
pub use expr::Machine;
pub use format::format_for_display;
pub use format::DisplayMode;
pub use function::Arguments;
pub use function::Function;
pub use heap::Heap;
pub use heap::StringSpace;
pub use mbf::Double;
pub use mbf::Mbf;
pub use mbf::Single;
pub use memory::AddressSpace;
pub use memory::DataStore;
pub use memory::ProgramImage;
pub use memory::VideoMemory;
pub use op::Op;
pub use operation::Operation;
pub use rnd::Rnd;
pub use stack::Stack;
pub use using::format_with_template;
pub use val::StrDesc;
pub use val::Val;
pub use var::Var;
pub use var::Variables;

#[cfg(test)]
mod tests;
