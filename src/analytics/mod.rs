//! Request log for `/wave-ai` and the `wave stats` reporter.
pub mod logger;
pub mod reporter;
