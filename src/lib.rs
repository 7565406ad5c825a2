pub mod classify;
pub mod codegen;
pub mod config;
pub mod dax;
pub mod error;
pub mod ir;
pub mod lower;
pub mod parse;
pub mod pipeline;
pub mod wrap;
