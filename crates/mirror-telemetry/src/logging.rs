//! Structured event macros.
//!
//! Every event carries a `subsystem` field (`mn-02`, `mn-04`, ...); file
//! events also carry the stream file name so one file's lifecycle can be
//! followed across subsystems.

/// Event with a subsystem field.
#[macro_export]
macro_rules! log_event {
    (info, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };

    (warn, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::warn!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };

    (error, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::error!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };

    (debug, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::debug!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };
}

/// Event about one stream file.
#[macro_export]
macro_rules! log_file_event {
    ($level:ident, $subsystem:expr, $msg:expr, $file:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            subsystem = $subsystem,
            file = %$file,
            $($($field)*,)?
            $msg
        )
    };
}
