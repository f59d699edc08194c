use crate::builtin;
use crate::context::Context;
use crate::launcher;
use crate::parser::tokenize;
use crate::print_to;
use bytes::{BufMut, Bytes, BytesMut};
use std::io;

/// What the REPL should do after a line has been dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit(i32),
}

/// Standard output and standard error text produced in-process.
///
/// External commands write straight to the inherited descriptors and never
/// pass through here.
#[derive(Debug, Default)]
pub struct Output {
    stdout: BytesMut,
    stderr: BytesMut,
}

impl Output {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stdout(&mut self) -> impl io::Write + '_ {
        (&mut self.stdout).writer()
    }

    pub fn stderr(&mut self) -> impl io::Write + '_ {
        (&mut self.stderr).writer()
    }

    pub fn take_stdout(&mut self) -> Bytes {
        self.stdout.split().freeze()
    }

    pub fn take_stderr(&mut self) -> Bytes {
        self.stderr.split().freeze()
    }
}

/// Routes each input line to a builtin or an external program.
pub struct Dispatcher {
    context: Context,
}

impl Dispatcher {
    pub fn new(context: Context) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Runs one line to completion, waiting for any child it starts.
    ///
    /// Failures are reported through `out` and never stop the loop; the only
    /// `Err` is a failed write into `out` itself.
    pub fn dispatch(&mut self, line: &str, out: &mut Output) -> io::Result<Flow> {
        let args = tokenize(line);
        let Some(name) = args.first() else {
            return Ok(Flow::Continue);
        };
        log::debug!("dispatching {args:?}");

        if let Some(builtin) = builtin::lookup(name) {
            log::debug!("{name} is a builtin");
            return (builtin.run)(&args[1..], &mut self.context, out);
        }

        let Some(path) = self.context.resolve(name) else {
            print_to!(out.stdout(), "{}: command not found\n", name);
            return Ok(Flow::Continue);
        };
        log::debug!("{name} resolved to {}", path.display());

        match launcher::launch(&path, &args) {
            Ok(status) => log::debug!("{name} finished with status {status}"),
            Err(err) => print_to!(out.stderr(), "{}: {}\n", name, err),
        }

        Ok(Flow::Continue)
    }
}
