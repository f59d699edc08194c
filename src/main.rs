use minish::{Context, Shell};
use std::io;
use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    env_logger::init();

    let mut shell = Shell::new(
        io::stdin().lock(),
        io::stdout(),
        io::stderr(),
        Context::from_process(),
    );
    let status = shell.repl()?;

    Ok(ExitCode::from(u8::try_from(status).unwrap_or(u8::MAX)))
}
