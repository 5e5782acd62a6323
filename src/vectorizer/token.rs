use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::vectorizer::Token;

///  TokenFrequency 構造体
/// tokenの出現回数を管理するための構造体です
/// Counts are kept in first-seen order, which is what makes frequency sorting
/// with ties reproducible.
///
/// # Examples
/// ```
/// use ngram_vectorizer::vectorizer::token::TokenFrequency;
/// let mut token_freq = TokenFrequency::new();
/// token_freq.add_tokens(&["ab", "bc", "ab"]);
///
/// assert_eq!(token_freq.token_count("ab"), 2);
/// assert_eq!(token_freq.token_total_count(), 3);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct TokenFrequency {
    #[serde(with = "indexmap::map::serde_seq")]
    token_count: IndexMap<Token, u32>,
    total_token_count: u64,
}

/// Tokenの追加、削除の実装
impl TokenFrequency {
    /// 新しいTokenFrequencyを作成するメソッド
    pub fn new() -> Self {
        TokenFrequency {
            token_count: IndexMap::new(),
            total_token_count: 0,
        }
    }

    /// tokenを追加する
    ///
    /// # Arguments
    /// * `token` - 追加するトークン
    #[inline]
    pub fn add_token(&mut self, token: &str) -> &mut Self {
        if let Some(count) = self.token_count.get_mut(token) {
            *count += 1;
        } else {
            self.token_count.insert(token.to_string(), 1);
        }
        self.total_token_count += 1;
        self
    }

    /// 複数のtokenを追加する
    ///
    /// # Arguments
    /// * `tokens` - 追加するトークンのスライス
    #[inline]
    pub fn add_tokens<T>(&mut self, tokens: &[T]) -> &mut Self
    where
        T: AsRef<str>,
    {
        for token in tokens {
            self.add_token(token.as_ref());
        }
        self
    }

    /// 条件に基づいてtokenを削除します
    ///
    /// # Arguments
    /// * `condition` - 条件を満たすtokenを削除するクロージャ
    ///
    /// # Returns
    /// * `u64` - 削除されたtokenの合計数
    #[inline]
    pub fn remove_tokens_by_condition<F>(&mut self, condition: F) -> u64
    where
        F: Fn(&str, &u32) -> bool,
    {
        let mut removed_total_count: u64 = 0;
        self.token_count.retain(|token, count| {
            if condition(token, count) {
                removed_total_count += *count as u64;
                false
            } else {
                true
            }
        });
        self.total_token_count -= removed_total_count;

        removed_total_count
    }
}

/// TokenFrequencyの情報を取得するための実装
impl TokenFrequency {
    /// 全tokenのカウントの合計を取得します
    #[inline]
    pub fn token_total_count(&self) -> u64 {
        self.total_token_count
    }

    /// あるtokenの出現回数を取得します
    ///
    /// # Arguments
    /// * `token` - トークン
    ///
    /// # Returns
    /// * `u32` - トークンの出現回数 (無い場合は0)
    #[inline]
    pub fn token_count(&self, token: &str) -> u32 {
        self.token_count.get(token).copied().unwrap_or(0)
    }

    /// 出現した単語数を取得します
    #[inline]
    pub fn token_num(&self) -> usize {
        self.token_count.len()
    }

    /// (token, count) を初出順で走査
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.token_count.iter().map(|(t, &c)| (t.as_str(), c))
    }

    /// 頻度でソートされたトークンのベクタを取得(降順)
    /// The sort is stable: tokens with equal counts keep first-seen order.
    ///
    /// # Returns
    /// * `Vec<(String, u32)>` - 頻度でソートされたトークンのベクタ
    #[inline]
    pub fn sorted_frequency_vector(&self) -> Vec<(Token, u32)> {
        let mut token_list: Vec<(Token, u32)> = self
            .token_count
            .iter()
            .map(|(token, &count)| (token.clone(), count))
            .collect();

        token_list.sort_by(|a, b| b.1.cmp(&a.1));
        token_list
    }
}

impl<T: AsRef<str>> FromIterator<T> for TokenFrequency {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut freq = TokenFrequency::new();
        for token in iter {
            freq.add_token(token.as_ref());
        }
        freq
    }
}
