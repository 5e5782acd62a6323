use serde::{Deserialize, Serialize};

use crate::utils::normalizer::{normalize, NormalizeOptions};
use crate::vectorizer::Token;

/// n-gram size used when none is given
pub const DEFAULT_NGRAM_SIZE: usize = 3;
/// n-gram sizes are clamped to this upper bound
pub const MAX_NGRAM_SIZE: usize = 10;

/// n-gram生成のオプション
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NgramOptions {
    /// apply `normalize` with `normalize_opts` first (default: true)
    pub normalize: bool,
    /// pad both ends with `pad_char` repeated `n - 1` times (default: false)
    pub pad: bool,
    pub pad_char: char,
    /// keep whitespace inside the string; otherwise every whitespace is removed (default: false)
    pub preserve_whitespace: bool,
    pub normalize_opts: NormalizeOptions,
}

impl Default for NgramOptions {
    fn default() -> Self {
        Self {
            normalize: true,
            pad: false,
            pad_char: '_',
            preserve_whitespace: false,
            normalize_opts: NormalizeOptions::default(),
        }
    }
}

/// 複数サイズのn-gram生成オプション
/// `max_n: None` means `min(10, char length of the input)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllNgramsOptions {
    pub min_n: usize,
    pub max_n: Option<usize>,
    pub ngram_options: NgramOptions,
}

impl Default for AllNgramsOptions {
    fn default() -> Self {
        Self {
            min_n: 1,
            max_n: None,
            ngram_options: NgramOptions::default(),
        }
    }
}

impl AllNgramsOptions {
    /// `min_n..=max_n` with default n-gram options
    pub fn range(min_n: usize, max_n: usize) -> Self {
        Self {
            min_n,
            max_n: Some(max_n),
            ngram_options: NgramOptions::default(),
        }
    }
}

/// 文字n-gramを生成する
///
/// Pipeline: optional normalization, size clamping to
/// `[1, min(10, len)]`, optional whitespace removal, optional padding, then a
/// sliding window of width `n`. A string no longer than `n` is a single token;
/// an empty string gives no token.
///
/// # Arguments
/// * `s` - 入力文字列
/// * `n` - n-gramのサイズ
/// * `opts` - 生成オプション
///
/// # Returns
/// * `Vec<Token>` - 出現順のn-gram
///
/// # Examples
/// ```
/// use ngram_vectorizer::vectorizer::ngram::{ngrams, NgramOptions};
/// assert_eq!(ngrams("abcde", 3, &NgramOptions::default()), vec!["abc", "bcd", "cde"]);
/// ```
pub fn ngrams(s: &str, n: usize, opts: &NgramOptions) -> Vec<Token> {
    let base = if opts.normalize {
        normalize(s, &opts.normalize_opts)
    } else {
        s.to_string()
    };
    let upper = base.chars().count().min(MAX_NGRAM_SIZE).max(1);
    let size = n.clamp(1, upper);

    let mut chars: Vec<char> = if opts.preserve_whitespace {
        base.chars().collect()
    } else {
        base.chars().filter(|c| !c.is_whitespace()).collect()
    };

    if opts.pad {
        let pad = std::iter::repeat(opts.pad_char).take(size - 1);
        chars = pad.clone().chain(chars).chain(pad).collect();
    }

    if chars.is_empty() {
        return Vec::new();
    }
    if chars.len() <= size {
        return vec![chars.into_iter().collect()];
    }
    chars.windows(size).map(|w| w.iter().collect()).collect()
}

/// `min_n..=max_n` の全サイズのn-gramを連結する
/// Tokens of size `min_n` come first in window order, then `min_n + 1`, etc.
/// Empty input or `min_n > max_n` yields an empty sequence.
pub fn all_ngrams(s: &str, opts: &AllNgramsOptions) -> Vec<Token> {
    let len = s.chars().count();
    if len == 0 {
        return Vec::new();
    }
    let max_n = opts.max_n.unwrap_or_else(|| len.min(MAX_NGRAM_SIZE));
    if opts.min_n > max_n {
        return Vec::new();
    }
    (opts.min_n..=max_n)
        .flat_map(|n| ngrams(s, n, &opts.ngram_options))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn padded() -> NgramOptions {
        NgramOptions {
            pad: true,
            pad_char: '_',
            ..NgramOptions::default()
        }
    }

    #[test]
    fn sliding_window() {
        assert_eq!(ngrams("abcde", 3, &NgramOptions::default()), vec!["abc", "bcd", "cde"]);
    }

    #[test]
    fn padding_adds_borders() {
        assert_eq!(
            ngrams("abc", 3, &padded()),
            vec!["__a", "_ab", "abc", "bc_", "c__"]
        );
    }

    #[test]
    fn removes_whitespace_and_normalizes_by_default() {
        assert_eq!(
            ngrams("Écôle  1", 2, &NgramOptions::default()),
            vec!["ec", "co", "ol", "le", "e1"]
        );
    }

    #[test]
    fn preserve_whitespace_keeps_spaces() {
        let opts = NgramOptions {
            preserve_whitespace: true,
            ..NgramOptions::default()
        };
        assert_eq!(ngrams("a b c", 2, &opts), vec!["a ", " b", "b ", " c"]);
    }

    #[test]
    fn short_string_is_single_token() {
        assert_eq!(ngrams("ab", 3, &NgramOptions::default()), vec!["ab"]);
        assert_eq!(ngrams("abc", 3, &NgramOptions::default()), vec!["abc"]);
    }

    #[test]
    fn size_is_clamped() {
        // n = 0 becomes 1
        assert_eq!(ngrams("abc", 0, &NgramOptions::default()), vec!["a", "b", "c"]);
        // n above the string length becomes the length, so padding uses len - 1
        assert_eq!(ngrams("ab", 5, &padded()), vec!["_a", "ab", "b_"]);
        // upper bound of 10
        let long = "abcdefghijkl";
        let grams = ngrams(long, 50, &NgramOptions::default());
        assert_eq!(grams.len(), 3);
        assert!(grams.iter().all(|g| g.chars().count() == MAX_NGRAM_SIZE));
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(ngrams("", 3, &NgramOptions::default()).is_empty());
        assert!(ngrams("  ...  ", 2, &NgramOptions::default()).is_empty());
        assert!(all_ngrams("", &AllNgramsOptions::default()).is_empty());
    }

    #[test]
    fn raw_input_without_normalization() {
        let opts = NgramOptions {
            normalize: false,
            ..NgramOptions::default()
        };
        assert_eq!(ngrams("Ab-C", 2, &opts), vec!["Ab", "b-", "-C"]);
    }

    #[test]
    fn all_ngrams_orders_by_size() {
        let out = all_ngrams("abc", &AllNgramsOptions::default());
        assert_eq!(out, vec!["a", "b", "c", "ab", "bc", "abc"]);

        let out = all_ngrams("abcd", &AllNgramsOptions::range(2, 3));
        assert_eq!(out, vec!["ab", "bc", "cd", "abc", "bcd"]);
    }

    #[test]
    fn all_ngrams_empty_range() {
        assert!(all_ngrams("abcd", &AllNgramsOptions::range(3, 2)).is_empty());
    }
}
