//! A small interactive shell: builtins run in-process, anything else is
//! looked up on `PATH` and run as a child process that is always waited for.

pub mod builtin;
pub mod context;
pub mod dispatcher;
pub mod launcher;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod search_path;
pub mod shell;

pub use builtin::BUILTIN_COMMANDS;
pub use context::Context;
pub use dispatcher::{Dispatcher, Flow, Output};
pub use shell::Shell;
