//! Command-line tokenization for the interactive shell
//!
//! A token is a maximal run of non-whitespace characters; whitespace runs of
//! any length, anywhere on the line, are bare separators and never produce
//! empty tokens. Tokenization is pure and total -- an empty or
//! all-whitespace line yields an empty command line. Quoting for multi-word
//! arguments is a command-interpretation concern layered above this and
//! deliberately absent here.

/// A tokenized command line with positional argument access
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLine {
    tokens: Vec<String>,
}

impl CommandLine {
    /// Tokenize a raw line.
    pub fn parse(line: &str) -> Self {
        Self {
            tokens: line.split_whitespace().map(str::to_owned).collect(),
        }
    }

    /// All tokens, in input order.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Number of tokens, the command word included.
    pub fn num_args(&self) -> usize {
        self.tokens.len()
    }

    /// The nth token; the command word sits at index 0.
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(String::as_str)
    }

    /// The command word, if the line had one.
    pub fn command(&self) -> Option<&str> {
        self.arg(0)
    }

    /// True for an empty or all-whitespace line.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
