//! PalmTree: a minimal expression-oriented scripting language
//!
//! Immutable-by-default bindings, first-class lambdas, a pipe operator and a
//! handful of numeric builtins.
//!
//! # Architecture
//!
//! ```text
//! Source → Lexer → Tokens → Parser → Program (AST + lambda arena) → Interpreter
//! ```
//!
//! # Example
//!
//! ```text
//! let add = (x, y) => x + y;
//! let total mut = add(4, 3);
//! total = total |> double;
//! print(total, PI());
//! ```

pub mod ast;
pub mod common;
pub mod config;
pub mod diagnostics;
pub mod interp;
pub mod lexer;
pub mod parser;

// Re-export diagnostics for convenience
pub use diagnostics::{Error, Result, SourceFile};

// Re-exports for convenience
pub use ast::Program;
pub use config::{Config, Scoping, UnknownChars};
pub use interp::{Builtins, Interpreter, Value};
pub use lexer::{Token, TokenKind};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tokenize source code
pub fn lex(source: &str) -> Result<Vec<Token>> {
    lexer::lex(source)
}

/// Parse source code to a program
pub fn parse(source: &str) -> Result<Program> {
    let tokens = lexer::lex(source)?;
    parser::parse(&tokens)
}

/// Run source code with the default configuration, returning the lines it
/// printed
pub fn run(source: &str) -> Result<Vec<String>> {
    run_with(source, &Config::default())
}

/// Run source code under an explicit configuration
pub fn run_with(source: &str, config: &Config) -> Result<Vec<String>> {
    let tokens = lexer::lex_with(source, config.unknown_chars)?;
    let program = parser::parse(&tokens)?;
    let mut interpreter = Interpreter::with_config(&program, config.clone());
    interpreter.run()?;
    Ok(interpreter.into_output())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_run_with_honours_unknown_chars() {
        let source = "let x = 1 # ; print(x);";
        let config = Config::default().quiet();
        assert!(matches!(
            run_with(source, &config),
            Err(Error::UnexpectedCharacter { ch: '#', .. })
        ));

        let config = Config {
            unknown_chars: UnknownChars::Skip,
            ..config
        };
        assert_eq!(run_with(source, &config).unwrap(), vec!["1".to_string()]);
    }
}
