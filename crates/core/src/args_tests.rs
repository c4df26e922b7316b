// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    single_word = { "true", &["true"] },
    plain_words = { "echo a b", &["echo", "a", "b"] },
    repeated_spaces = { "  echo \t a   b  ", &["echo", "a", "b"] },
    single_quoted = { "sh -c 'echo hi >&2'", &["sh", "-c", "echo hi >&2"] },
    double_quoted = { r#"echo "a b" c"#, &["echo", "a b", "c"] },
    escaped_quote = { r#"echo "say \"hi\"""#, &["echo", r#"say "hi""#] },
    other_escape_kept = { r#"echo "a\nb""#, &["echo", r"a\nb"] },
    bare_backslash = { r"echo a\ b", &["echo", "a b"] },
    adjacent_quotes_join = { r#"echo 'a'"b"c"#, &["echo", "abc"] },
    empty_quoted_word = { "printf '' x", &["printf", "", "x"] },
    single_quote_in_double = { r#"echo "it's""#, &["echo", "it's"] },
)]
fn splits_words(line: &str, expected: &[&str]) {
    assert_eq!(split(line).unwrap(), expected);
}

#[test]
fn empty_line_has_no_words() {
    assert!(split("").unwrap().is_empty());
    assert!(split("   \t").unwrap().is_empty());
}

#[yare::parameterized(
    open_single = { "echo 'abc", ArgsError::UnterminatedSingleQuote(5) },
    open_double = { "echo \"abc", ArgsError::UnterminatedDoubleQuote(5) },
    trailing_backslash = { "echo abc\\", ArgsError::TrailingBackslash(8) },
    backslash_in_open_double = { "echo \"a\\", ArgsError::TrailingBackslash(7) },
)]
fn rejects_unbalanced(line: &str, expected: ArgsError) {
    assert_eq!(split(line).unwrap_err(), expected);
}

#[test]
fn error_messages_name_position() {
    let err = split("x 'y").unwrap_err();
    assert_eq!(err.to_string(), "unterminated single quote starting at byte 2");
}

proptest::proptest! {
    #[test]
    fn single_quoted_words_split_back(words in proptest::collection::vec("[^']*", 0..8)) {
        let line = words.iter().map(|w| format!("'{w}'")).collect::<Vec<_>>().join(" ");
        proptest::prop_assert_eq!(split(&line).unwrap(), words);
    }
}
