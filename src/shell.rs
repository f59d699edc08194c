use crate::context::Context;
use crate::dispatcher::{Dispatcher, Flow, Output};
use anyhow::Context as _;
use std::io::{BufRead, Write};

pub const PROMPT: &str = "$ ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    Terminated(i32),
}

/// Prompt, read, dispatch, repeat.
///
/// Builtin output is written to `stdout`/`stderr` after each line, while
/// external commands write to the process descriptors directly. Pass the real
/// standard streams to keep the two in order.
pub struct Shell<R, W, E> {
    input: R,
    stdout: W,
    stderr: E,
    input_buffer: String,
    dispatcher: Dispatcher,
    output: Output,
    state: State,
}

impl<R: BufRead, W: Write, E: Write> Shell<R, W, E> {
    pub fn new(input: R, stdout: W, stderr: E, context: Context) -> Self {
        Self {
            input,
            stdout,
            stderr,
            input_buffer: String::new(),
            dispatcher: Dispatcher::new(context),
            output: Output::new(),
            state: State::Running,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Runs until `exit` or end of input and returns the shell's exit status.
    pub fn repl(&mut self) -> anyhow::Result<i32> {
        while self.state == State::Running {
            self.print()?;

            if !self.read() {
                self.state = State::Terminated(0);
                break;
            }

            self.eval()?;
        }

        match self.state {
            State::Terminated(status) => Ok(status),
            State::Running => Ok(0),
        }
    }

    pub fn into_output(self) -> (W, E) {
        (self.stdout, self.stderr)
    }

    fn print(&mut self) -> anyhow::Result<()> {
        self.stdout
            .write_all(PROMPT.as_bytes())
            .context("write prompt")?;
        self.stdout.flush().context("flush prompt")?;

        Ok(())
    }

    /// False on end of input; a read error counts as end of input.
    fn read(&mut self) -> bool {
        self.input_buffer.clear();
        match self.input.read_line(&mut self.input_buffer) {
            Ok(0) => false,
            Ok(_) => true,
            Err(err) => {
                log::debug!("stopping after read error: {err}");
                false
            }
        }
    }

    fn eval(&mut self) -> anyhow::Result<()> {
        let flow = self
            .dispatcher
            .dispatch(&self.input_buffer, &mut self.output)
            .context("dispatch")?;

        self.stdout
            .write_all(&self.output.take_stdout())
            .context("write output")?;
        self.stdout.flush().context("flush output")?;
        self.stderr
            .write_all(&self.output.take_stderr())
            .context("write errors")?;
        self.stderr.flush().context("flush errors")?;

        if let Flow::Exit(status) = flow {
            self.state = State::Terminated(status);
        }

        Ok(())
    }
}
