use crate::context::{Context, ContextError};
use crate::dispatcher::{Flow, Output};
use crate::print_to;
use std::io;
use std::path::PathBuf;

/// Handler signature shared by every builtin. Receives the arguments after
/// the command name.
pub type Handler = fn(&[String], &mut Context, &mut Output) -> io::Result<Flow>;

pub struct Builtin {
    pub name: &'static str,
    pub run: Handler,
}

pub static BUILTIN_COMMANDS: &[Builtin] = &[
    Builtin {
        name: "exit",
        run: exit_builtin,
    },
    Builtin {
        name: "echo",
        run: echo_builtin,
    },
    Builtin {
        name: "type",
        run: type_builtin,
    },
    Builtin {
        name: "pwd",
        run: pwd_builtin,
    },
    Builtin {
        name: "cd",
        run: cd_builtin,
    },
];

pub fn lookup(name: &str) -> Option<&'static Builtin> {
    BUILTIN_COMMANDS.iter().find(|builtin| builtin.name == name)
}

pub fn is_builtin(name: &str) -> bool {
    lookup(name).is_some()
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ExitError {
    #[error("{0}: numeric argument required")]
    NotNumeric(String),
    #[error("too many arguments")]
    TooManyArguments,
}

/// Status requested by `exit`: none means 0, otherwise an integer in 0..=255.
pub fn exit_status(args: &[String]) -> Result<i32, ExitError> {
    match args {
        [] => Ok(0),
        [code] => code
            .parse::<u8>()
            .map(i32::from)
            .map_err(|_| ExitError::NotNumeric(code.clone())),
        _ => Err(ExitError::TooManyArguments),
    }
}

fn exit_builtin(args: &[String], _ctx: &mut Context, out: &mut Output) -> io::Result<Flow> {
    match exit_status(args) {
        Ok(status) => Ok(Flow::Exit(status)),
        Err(err) => {
            print_to!(out.stderr(), "exit: {}\n", err);
            Ok(Flow::Continue)
        }
    }
}

fn echo_builtin(args: &[String], _ctx: &mut Context, out: &mut Output) -> io::Result<Flow> {
    print_to!(out.stdout(), "{}\n", args.join(" "));
    Ok(Flow::Continue)
}

fn type_builtin(args: &[String], ctx: &mut Context, out: &mut Output) -> io::Result<Flow> {
    for name in args {
        if is_builtin(name) {
            print_to!(out.stdout(), "{} is a shell builtin\n", name);
        } else if let Some(path) = ctx.resolve(name) {
            print_to!(out.stdout(), "{} is {}\n", name, path.display());
        } else {
            print_to!(out.stdout(), "{}: not found\n", name);
        }
    }

    Ok(Flow::Continue)
}

fn pwd_builtin(_args: &[String], ctx: &mut Context, out: &mut Output) -> io::Result<Flow> {
    match ctx.current_dir() {
        Ok(dir) => print_to!(out.stdout(), "{}\n", dir.display()),
        Err(err) => print_to!(out.stderr(), "pwd: {}\n", err),
    }

    Ok(Flow::Continue)
}

fn cd_builtin(args: &[String], ctx: &mut Context, out: &mut Output) -> io::Result<Flow> {
    let arg = match args {
        [arg] => arg,
        [] => {
            print_to!(out.stderr(), "cd: missing operand\n");
            return Ok(Flow::Continue);
        }
        _ => {
            print_to!(out.stderr(), "cd: too many arguments\n");
            return Ok(Flow::Continue);
        }
    };

    let result = expand_tilde(arg, ctx).and_then(|target| ctx.change_dir(&target, arg));
    if let Err(err) = result {
        print_to!(out.stderr(), "cd: {}\n", err);
    }

    Ok(Flow::Continue)
}

/// Expands `~` and `~/rest` to the home directory. `~user` is left alone.
fn expand_tilde(arg: &str, ctx: &Context) -> Result<PathBuf, ContextError> {
    if arg == "~" {
        return ctx.home_dir();
    }

    match arg.strip_prefix("~/") {
        Some(rest) => Ok(ctx.home_dir()?.join(rest)),
        None => Ok(PathBuf::from(arg)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::tests::text;
    use crate::search_path::tests::stub;
    use nix::unistd::{User, getuid};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    fn run(name: &str, argv: &[&str], ctx: &mut Context) -> (Flow, String, String) {
        let builtin = lookup(name).unwrap();
        let mut out = Output::new();
        let flow = (builtin.run)(&args(argv), ctx, &mut out).unwrap();
        (flow, text(out.take_stdout()), text(out.take_stderr()))
    }

    fn empty_context(cwd: &Path) -> Context {
        Context::isolated(Vec::<(String, String)>::new(), cwd)
    }

    #[rstest]
    #[case(&[], "\n")]
    #[case(&["hello"], "hello\n")]
    #[case(&["hello", "world"], "hello world\n")]
    #[case(&["'quoted", "text'"], "'quoted text'\n")]
    fn echo(#[case] argv: &[&str], #[case] expected: &str) {
        let mut ctx = empty_context(Path::new("/"));
        assert_eq!(
            run("echo", argv, &mut ctx),
            (Flow::Continue, String::from(expected), String::new())
        );
    }

    #[rstest]
    #[case("exit")]
    #[case("echo")]
    #[case("type")]
    #[case("pwd")]
    #[case("cd")]
    fn type_reports_builtins(#[case] name: &str) {
        let mut ctx = empty_context(Path::new("/"));
        assert_eq!(
            run("type", &[name], &mut ctx).1,
            format!("{name} is a shell builtin\n")
        );
    }

    #[test]
    fn type_reports_path_and_not_found() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let expected = stub(first.path(), "tool", 0o755);
        stub(second.path(), "tool", 0o755);
        let path = format!("{}:{}", first.path().display(), second.path().display());
        let mut ctx = Context::isolated([("PATH", path)], "/");

        assert_eq!(
            run("type", &["tool", "nonexistent_cmd_xyz"], &mut ctx),
            (
                Flow::Continue,
                format!(
                    "tool is {}\nnonexistent_cmd_xyz: not found\n",
                    expected.display()
                ),
                String::new()
            )
        );
    }

    #[test]
    fn type_without_arguments_prints_nothing() {
        let mut ctx = empty_context(Path::new("/"));
        assert_eq!(
            run("type", &[], &mut ctx),
            (Flow::Continue, String::new(), String::new())
        );
    }

    #[rstest]
    #[case(&[], Ok(0))]
    #[case(&["0"], Ok(0))]
    #[case(&["1"], Ok(1))]
    #[case(&["255"], Ok(255))]
    #[case(&["256"], Err(ExitError::NotNumeric(String::from("256"))))]
    #[case(&["-1"], Err(ExitError::NotNumeric(String::from("-1"))))]
    #[case(&["abc"], Err(ExitError::NotNumeric(String::from("abc"))))]
    #[case(&["1", "2"], Err(ExitError::TooManyArguments))]
    fn exit_policy(#[case] argv: &[&str], #[case] expected: Result<i32, ExitError>) {
        assert_eq!(exit_status(&args(argv)), expected);
    }

    #[test]
    fn invalid_exit_keeps_running() {
        let mut ctx = empty_context(Path::new("/"));
        assert_eq!(
            run("exit", &["abc"], &mut ctx),
            (
                Flow::Continue,
                String::new(),
                String::from("exit: abc: numeric argument required\n")
            )
        );
    }

    #[test]
    fn pwd_prints_current_dir() {
        let dir = TempDir::new().unwrap();
        let mut ctx = empty_context(dir.path());
        assert_eq!(
            run("pwd", &[], &mut ctx),
            (
                Flow::Continue,
                format!("{}\n", dir.path().display()),
                String::new()
            )
        );
    }

    #[test]
    fn cd_tilde_uses_home_variable() {
        let home = TempDir::new().unwrap();
        fs::create_dir(home.path().join("projects")).unwrap();
        let mut ctx = Context::isolated([("HOME", home.path().display().to_string())], "/");

        assert_eq!(
            run("cd", &["~"], &mut ctx),
            (Flow::Continue, String::new(), String::new())
        );
        assert_eq!(
            ctx.current_dir().unwrap(),
            fs::canonicalize(home.path()).unwrap()
        );

        run("cd", &["/"], &mut ctx);
        run("cd", &["~/projects"], &mut ctx);
        assert_eq!(
            ctx.current_dir().unwrap(),
            fs::canonicalize(home.path().join("projects")).unwrap()
        );
    }

    #[test]
    fn cd_tilde_without_home_uses_user_database() {
        let mut ctx = empty_context(Path::new("/"));
        let expected = User::from_uid(getuid()).unwrap().unwrap().dir;

        run("cd", &["~"], &mut ctx);

        assert_eq!(
            ctx.current_dir().unwrap(),
            fs::canonicalize(expected).unwrap()
        );
    }

    #[rstest]
    #[case(&["nonexistent_dir_xyz"], "cd: nonexistent_dir_xyz: No such file or directory\n")]
    #[case(&[], "cd: missing operand\n")]
    #[case(&["a", "b"], "cd: too many arguments\n")]
    #[case(&["~someone_else"], "cd: ~someone_else: No such file or directory\n")]
    fn cd_failure_keeps_cwd(#[case] argv: &[&str], #[case] expected: &str) {
        let dir = TempDir::new().unwrap();
        let mut ctx = empty_context(dir.path());

        assert_eq!(
            run("cd", argv, &mut ctx),
            (Flow::Continue, String::new(), String::from(expected))
        );
        assert_eq!(ctx.current_dir().unwrap(), dir.path());
    }
}
