use std::{env, ffi::OsStr};

use tracing::{dispatcher, Subscriber};
use tracing_subscriber::{
    layer::SubscriberExt, registry::LookupSpan, util::SubscriberInitExt, Layer, Registry,
};

fn init_once_subscriber() {
    // Skip init if has been set
    if dispatcher::has_been_set() {
        return;
    }

    fn init_layer_env_filter<S>() -> impl Layer<S>
    where
        S: Subscriber + for<'span> LookupSpan<'span>,
    {
        ::tracing_subscriber::EnvFilter::from_default_env()
    }

    fn init_layer_stdfmt<S>() -> impl Layer<S>
    where
        S: Subscriber + for<'span> LookupSpan<'span>,
    {
        ::tracing_subscriber::fmt::layer().with_writer(::std::io::stderr)
    }

    Registry::default()
        .with(init_layer_env_filter())
        .with(init_layer_stdfmt())
        .try_init()
        .ok();
}

pub fn init_once_with(level: impl AsRef<OsStr>) {
    // Skip init if has been set
    if dispatcher::has_been_set() {
        return;
    }

    // set custom tracing level
    env::set_var(KEY, level);

    init_once_subscriber()
}

pub fn init_once_with_level_int(level: u8) {
    init_once_with(level_of(level))
}

/// Maps the number of `--debug` flags onto a tracing level.
pub fn level_of(level: u8) -> &'static str {
    match level {
        0 => "WARN",
        1 => "INFO",
        2 => "DEBUG",
        _ => "TRACE",
    }
}

const KEY: &str = "RUST_LOG";
