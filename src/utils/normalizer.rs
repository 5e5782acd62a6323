use serde::{Deserialize, Serialize};
use unicode_categories::UnicodeCategories;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// 文字列正規化のオプション
/// Each stage is independent. Enabled stages always run in this order:
/// 1. `remove_diacritics`
/// 2. `to_lower_case`
/// 3. `remove_punctuation`
/// 4. `collapse_whitespace`
///
/// Every stage defaults to `true`. Missing fields in a deserialized config
/// fall back to their default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeOptions {
    /// NFD decompose then drop combining marks ("École" -> "Ecole")
    pub remove_diacritics: bool,
    pub to_lower_case: bool,
    /// replace every run of characters outside the Letter (L*) and Number (N*)
    /// general categories with one space
    pub remove_punctuation: bool,
    /// collapse whitespace runs to one space and trim both ends
    pub collapse_whitespace: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            remove_diacritics: true,
            to_lower_case: true,
            remove_punctuation: true,
            collapse_whitespace: true,
        }
    }
}

impl NormalizeOptions {
    /// All stages disabled. `normalize` becomes the identity.
    pub fn none() -> Self {
        Self {
            remove_diacritics: false,
            to_lower_case: false,
            remove_punctuation: false,
            collapse_whitespace: false,
        }
    }
}

/// 比較用に文字列を正規化する
///
/// # Arguments
/// * `s` - 入力文字列
/// * `opts` - 正規化オプション
///
/// # Returns
/// * `String` - 正規化された文字列 (空文字列の場合もある)
///
/// # Examples
/// ```
/// use ngram_vectorizer::utils::normalizer::{normalize, NormalizeOptions};
/// let out = normalize("Room #42, Bldg. 7", &NormalizeOptions::default());
/// assert_eq!(out, "room 42 bldg 7");
/// ```
pub fn normalize(s: &str, opts: &NormalizeOptions) -> String {
    let mut out = s.to_string();
    if opts.remove_diacritics {
        out = out.nfd().filter(|c| !is_combining_mark(*c)).collect();
    }
    if opts.to_lower_case {
        out = out.to_lowercase();
    }
    if opts.remove_punctuation {
        out = replace_non_alphanumeric(&out);
    }
    if opts.collapse_whitespace {
        out = collapse_whitespace(&out);
    }
    out
}

#[inline]
fn replace_non_alphanumeric(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_run = false;
    for ch in s.chars() {
        // L* / N* のみ残す (記号 So や結合文字 M* は区切り)
        if ch.is_letter() || ch.is_number() {
            out.push(ch);
            in_run = false;
        } else if !in_run {
            out.push(' ');
            in_run = true;
        }
    }
    out
}

#[inline]
fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
