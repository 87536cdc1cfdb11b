//! Logging shim.
//!
//! Forwards to `defmt` when the `defmt` feature is enabled, to `log` when the
//! `log` feature is enabled, and compiles to nothing otherwise. Format strings
//! must stay within the subset both backends accept (`{}` and `{:?}`).

#![allow(unused_macros)]

#[cfg(all(feature = "defmt", feature = "log"))]
compile_error!("the `defmt` and `log` features are mutually exclusive");

macro_rules! __log {
    ($level:ident, $s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "defmt")]
            ::defmt::$level!($s $(, $x)*);
            #[cfg(feature = "log")]
            ::log::$level!($s $(, $x)*);
            #[cfg(not(any(feature = "defmt", feature = "log")))]
            let _ = ($( & $x ),*);
        }
    };
}

macro_rules! trace {
    ($($arg:tt)*) => { __log!(trace, $($arg)*) };
}

macro_rules! debug {
    ($($arg:tt)*) => { __log!(debug, $($arg)*) };
}

macro_rules! info {
    ($($arg:tt)*) => { __log!(info, $($arg)*) };
}

macro_rules! warn {
    ($($arg:tt)*) => { __log!(warn, $($arg)*) };
}

macro_rules! error {
    ($($arg:tt)*) => { __log!(error, $($arg)*) };
}
