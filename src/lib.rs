//! Quill library exports for testing.

pub mod core;
pub mod extract;
pub mod gateway;
pub mod study;
pub mod tui;

#[cfg(test)]
pub mod test_support;
