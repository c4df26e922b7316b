// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command-line splitting for job commands.
//!
//! Job files carry commands as single strings. They are never handed to a
//! shell; instead they are split into an argument vector here. Words are
//! separated by unquoted whitespace. Single quotes preserve their content
//! literally, double quotes honour `\"` and `\\`, and an unquoted backslash
//! escapes the following character.

use thiserror::Error;

/// Errors produced while splitting a command line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgsError {
    #[error("unterminated single quote starting at byte {0}")]
    UnterminatedSingleQuote(usize),

    #[error("unterminated double quote starting at byte {0}")]
    UnterminatedDoubleQuote(usize),

    #[error("trailing backslash at byte {0}")]
    TrailingBackslash(usize),
}

/// Split `line` into words.
///
/// An empty or all-whitespace line yields an empty vector.
pub fn split(line: &str) -> Result<Vec<String>, ArgsError> {
    let mut words = Vec::new();
    let mut current = String::new();
    // Distinguishes `''` (an empty word) from no word at all.
    let mut in_word = false;
    let mut chars = line.char_indices().peekable();

    while let Some((pos, ch)) = chars.next() {
        match ch {
            c if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            '\'' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some((_, '\'')) => break,
                        Some((_, c)) => current.push(c),
                        None => return Err(ArgsError::UnterminatedSingleQuote(pos)),
                    }
                }
            }
            '"' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some((_, '"')) => break,
                        Some((esc, '\\')) => match chars.peek() {
                            Some(&(_, next @ ('"' | '\\'))) => {
                                current.push(next);
                                chars.next();
                            }
                            Some(_) => current.push('\\'),
                            None => return Err(ArgsError::TrailingBackslash(esc)),
                        },
                        Some((_, c)) => current.push(c),
                        None => return Err(ArgsError::UnterminatedDoubleQuote(pos)),
                    }
                }
            }
            '\\' => {
                let Some((_, next)) = chars.next() else {
                    return Err(ArgsError::TrailingBackslash(pos));
                };
                current.push(next);
                in_word = true;
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if in_word {
        words.push(current);
    }
    Ok(words)
}

#[cfg(test)]
#[path = "args_tests.rs"]
mod tests;
