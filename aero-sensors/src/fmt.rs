#![macro_use]
#![allow(unused_macros)]

// Driver code logs through these so the same source builds for the target
// (`defmt`) and for host tools (`log`). With neither feature the arguments
// are still evaluated by reference to keep unused-variable lints quiet.
macro_rules! forward_log {
    ($level:ident, $s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "log")]
            ::log::$level!($s $(, $x)*);

            #[cfg(feature = "defmt")]
            ::defmt::$level!($s $(, $x)*);

            #[cfg(not(any(feature = "log", feature = "defmt")))]
            {
                $(let _ = &$x;)*
            }
        }
    };
}

macro_rules! log_trace {
    ($($arg:tt)*) => {
        forward_log!(trace, $($arg)*)
    };
}

macro_rules! log_debug {
    ($($arg:tt)*) => {
        forward_log!(debug, $($arg)*)
    };
}

macro_rules! log_info {
    ($($arg:tt)*) => {
        forward_log!(info, $($arg)*)
    };
}

macro_rules! log_warn {
    ($($arg:tt)*) => {
        forward_log!(warn, $($arg)*)
    };
}

macro_rules! log_error {
    ($($arg:tt)*) => {
        forward_log!(error, $($arg)*)
    };
}
