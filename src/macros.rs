/// Formats into any `io::Write` and propagates the write error with `?`.
#[macro_export]
macro_rules! print_to {
    ($out:expr, $fmt:expr) => {{
        ::std::io::Write::write_fmt(&mut $out, format_args!($fmt))?;
    }};
    ($out:expr, $fmt:expr, $($args:tt)*) => {{
        ::std::io::Write::write_fmt(&mut $out, format_args!($fmt, $($args)*))?;
    }};
}
