//! Thin logging facade so call sites in the engine read uniformly, mirroring
//! the teacher's `phoenix_log!` macro without the Solana cluster target gate
//! this crate has no use for.

#[macro_export]
macro_rules! engine_log {
    ($($arg:tt)*) => {
        log::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! engine_warn {
    ($($arg:tt)*) => {
        log::warn!($($arg)*)
    };
}
