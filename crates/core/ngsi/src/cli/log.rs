#[macro_export]
macro_rules! warning {
    ($($arg:tt)+) => ({
        use yansi::Paint as _; eprintln!("{} {}", "warning:".yellow().bold(), format_args!($($arg)+))
    });
}
