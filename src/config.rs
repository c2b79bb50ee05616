//! Run configuration

/// How lambda parameters are bound during a call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scoping {
    /// Each call pushes a parameter scope; parameters shadow outer bindings
    #[default]
    Stack,
    /// Parameters are written into the single global namespace and erased
    /// after the call. A parameter that collides with an existing binding is
    /// rejected with `DuplicateDeclaration`.
    Flat,
}

/// What the lexer does with characters outside the language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownChars {
    /// Fail with `UnexpectedCharacter`
    #[default]
    Reject,
    /// Drop the character and keep scanning
    Skip,
}

/// Options for one run of the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub scoping: Scoping,
    pub unknown_chars: UnknownChars,
    /// Maximum nesting of lambda calls
    pub max_call_depth: usize,
    /// Echo `print` output to stdout in addition to capturing it
    pub echo: bool,
}

impl Config {
    pub const DEFAULT_MAX_CALL_DEPTH: usize = 256;

    /// Bug-compatible settings: flat namespace, unknown characters skipped
    pub fn legacy() -> Self {
        Self {
            scoping: Scoping::Flat,
            unknown_chars: UnknownChars::Skip,
            ..Self::default()
        }
    }

    /// Same configuration with console echo disabled
    pub fn quiet(self) -> Self {
        Self { echo: false, ..self }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scoping: Scoping::default(),
            unknown_chars: UnknownChars::default(),
            max_call_depth: Self::DEFAULT_MAX_CALL_DEPTH,
            echo: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_keeps_other_defaults() {
        let legacy = Config::legacy();
        assert_eq!(legacy.scoping, Scoping::Flat);
        assert_eq!(legacy.unknown_chars, UnknownChars::Skip);
        assert_eq!(legacy.max_call_depth, Config::DEFAULT_MAX_CALL_DEPTH);
        assert!(legacy.echo);
        assert!(!legacy.quiet().echo);
    }
}
