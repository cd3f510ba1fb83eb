//! HTTP session and request handling

mod core;

pub use self::core::{Client, METHOD_OVERRIDE};
