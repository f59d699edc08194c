use nix::errno::Errno;
use nix::libc::{self, c_char};
use nix::sys::signal::{SigHandler, Signal, signal};
use nix::sys::wait::{WaitStatus, waitpid};
use nix::unistd::{ForkResult, Pid, fork, write};
use std::ffi::{CStr, CString, NulError};
use std::io;
use std::os::fd::AsFd;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use std::ptr;

/// Exit status of a child that could not execute its program.
pub const EXEC_FAILURE_STATUS: i32 = 127;

#[derive(thiserror::Error, Debug)]
pub enum LaunchError {
    #[error("argument contains a NUL byte")]
    Nul(#[from] NulError),
    #[error("failed to create process: {}", .0.desc())]
    Fork(Errno),
    #[error("failed to wait for process: {}", .0.desc())]
    Wait(Errno),
}

/// A started child that has not been reaped yet.
#[derive(Debug)]
#[must_use = "a child must be waited for"]
pub struct Child {
    pid: Pid,
}

impl Child {
    /// Blocks until the child terminates and returns its status; a signal
    /// `s` maps to `128 + s`.
    pub fn wait(self) -> Result<i32, LaunchError> {
        loop {
            match waitpid(self.pid, None) {
                Ok(WaitStatus::Exited(_, code)) => return Ok(code),
                Ok(WaitStatus::Signaled(_, signal, _)) => return Ok(128 + signal as i32),
                Ok(_) | Err(Errno::EINTR) => continue,
                Err(errno) => return Err(LaunchError::Wait(errno)),
            }
        }
    }
}

/// Starts `path` in a new process with `args` as its argument vector.
///
/// The child inherits the standard streams, the environment and the working
/// directory. When `execv` fails inside the child it prints
/// `<name>: <reason>` to standard error and exits with
/// [`EXEC_FAILURE_STATUS`]. SIGPIPE is restored to its default action in
/// the child, since this process ignores it.
pub fn spawn(path: &Path, args: &[String]) -> Result<Child, LaunchError> {
    let program = CString::new(path.as_os_str().as_bytes())?;
    let argv = args
        .iter()
        .map(|arg| CString::new(arg.as_bytes()))
        .collect::<Result<Vec<_>, _>>()?;
    let mut argv_ptrs: Vec<*const c_char> = argv.iter().map(|arg| arg.as_ptr()).collect();
    argv_ptrs.push(ptr::null());
    let name = args.first().map(String::as_str).unwrap_or_default();
    let prefix = format!("{name}: ");

    // SAFETY: the child only calls signal, execv, write and _exit, all of
    // which are async-signal-safe, and it allocates nothing: the C strings
    // and the null-terminated pointer array are built above.
    match unsafe { fork() } {
        Ok(ForkResult::Parent { child }) => Ok(Child { pid: child }),
        Ok(ForkResult::Child) => exec_child(&program, &argv_ptrs, prefix.as_bytes()),
        Err(errno) => Err(LaunchError::Fork(errno)),
    }
}

/// Spawns and waits; the returned status is only informational.
pub fn launch(path: &Path, args: &[String]) -> Result<i32, LaunchError> {
    spawn(path, args)?.wait()
}

/// `argv` must be null-terminated and point into strings that outlive the
/// call.
fn exec_child(program: &CStr, argv: &[*const c_char], prefix: &[u8]) -> ! {
    // SAFETY: runs in the freshly forked child; installing SIG_DFL has no
    // handler to race with.
    let _ = unsafe { signal(Signal::SIGPIPE, SigHandler::SigDfl) };

    // SAFETY: `program` is a valid C string and `argv` is null-terminated.
    unsafe { libc::execv(program.as_ptr(), argv.as_ptr()) };
    let errno = Errno::last();

    let stderr = io::stderr();
    let fd = stderr.as_fd();
    let _ = write(fd, prefix);
    let _ = write(fd, errno.desc().as_bytes());
    let _ = write(fd, b"\n");

    // SAFETY: _exit skips atexit handlers and stdio flushing that belong to
    // the parent.
    unsafe { libc::_exit(EXEC_FAILURE_STATUS) }
}
