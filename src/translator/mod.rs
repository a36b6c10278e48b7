//! Translator module for pseudoc
//!
//! Single-pass recursive descent translation, parameterised over the
//! target [`crate::codegen::Backend`].

mod translator;

pub use translator::Translator;
