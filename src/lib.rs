//! Transpiler for the A scripting language: lexes and parses A source line
//! by line, type-directs code generation through a flat symbol table, and
//! emits self-contained C (runtime blob + generated body) for a downstream
//! C compiler to build into a native executable.

pub mod blocks;
pub mod context;
pub mod diagnostics;
pub mod driver;
pub mod emitter;
pub mod handlers;
pub mod lexer;
pub mod logger;
pub mod mode;
pub mod statement;
pub mod symbols;
pub mod types;
