/*!
## Rust Language Module

Tokenised BASIC text: keyword codes, the text tokeniser, a cursor for
reading tokens back, and the error type shared by the whole crate.

*/

#[macro_use]
mod error;
mod cursor;
mod lex;
pub mod token;

pub use cursor::Cursor;
pub use error::Error;
pub use error::ErrorCode;
pub use lex::tokenise;
