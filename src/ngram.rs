//! Sliding-window n-gram extraction.
//!
//! The extractor keeps the last `max(orders)` tokens in a window that starts
//! out holding `max(orders) - 1` empty placeholders. Each incoming token
//! shifts the window by one and produces one n-gram per requested order, so
//! a stream of `L` tokens yields exactly `L` n-grams of every order. The
//! first n-grams of a high order therefore begin with placeholders: the
//! bigram emitted for the first token of `"the cat"` is `" the"`.
//!
//! # Examples
//!
//! ```
//! use genre_rank::ngram::NGramExtractor;
//!
//! let words = vec!["the".to_string(), "cat".to_string()];
//! let ngrams: Vec<_> = NGramExtractor::new(words, &[1, 2]).unwrap().collect();
//!
//! assert_eq!(
//!     ngrams,
//!     vec![
//!         (1, "the".to_string()),
//!         (2, " the".to_string()),
//!         (1, "cat".to_string()),
//!         (2, "the cat".to_string()),
//!     ]
//! );
//! ```

use std::collections::VecDeque;

use crate::error::{GenreError, Result};

/// Separator placed between the words of an n-gram key.
pub const NGRAM_SEPARATOR: char = ' ';

/// Lazy iterator of `(order, ngram)` pairs over a token stream.
#[derive(Debug)]
pub struct NGramExtractor<I> {
    tokens: I,
    orders: Vec<usize>,
    window: VecDeque<String>,
    /// Index into `orders` of the next n-gram to emit for the current window.
    next_order: usize,
}

impl<I> NGramExtractor<I>
where
    I: Iterator<Item = String>,
{
    /// Create an extractor over `tokens` for the given orders.
    ///
    /// Orders are sorted and deduplicated; an empty set or an order of zero
    /// is rejected.
    pub fn new<T>(tokens: T, orders: &[usize]) -> Result<Self>
    where
        T: IntoIterator<IntoIter = I>,
    {
        let orders = normalize_orders(orders)?;
        let max_order = orders[orders.len() - 1];

        let mut window = VecDeque::with_capacity(max_order);
        window.extend(std::iter::repeat_n(String::new(), max_order - 1));

        Ok(NGramExtractor {
            tokens: tokens.into_iter(),
            next_order: orders.len(),
            orders,
            window,
        })
    }

    /// The orders this extractor emits, ascending.
    pub fn orders(&self) -> &[usize] {
        &self.orders
    }

    fn join_last(&self, n: usize) -> String {
        let start = self.window.len() - n;
        let mut ngram = String::new();
        for (i, word) in self.window.range(start..).enumerate() {
            if i > 0 {
                ngram.push(NGRAM_SEPARATOR);
            }
            ngram.push_str(word);
        }
        ngram
    }
}

impl<I> Iterator for NGramExtractor<I>
where
    I: Iterator<Item = String>,
{
    type Item = (usize, String);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_order == self.orders.len() {
            let token = self.tokens.next()?;
            if self.window.len() == self.max_order() {
                self.window.pop_front();
            }
            self.window.push_back(token);
            self.next_order = 0;
        }

        let n = self.orders[self.next_order];
        self.next_order += 1;
        Some((n, self.join_last(n)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let pending = self.orders.len() - self.next_order;
        let (lower, upper) = self.tokens.size_hint();
        let per_token = self.orders.len();
        (
            lower.saturating_mul(per_token).saturating_add(pending),
            upper.and_then(|u| u.checked_mul(per_token)?.checked_add(pending)),
        )
    }
}

impl<I> NGramExtractor<I> {
    fn max_order(&self) -> usize {
        self.orders[self.orders.len() - 1]
    }
}

/// Sort and deduplicate a set of n-gram orders, rejecting empty sets and
/// zero orders.
pub fn normalize_orders(orders: &[usize]) -> Result<Vec<usize>> {
    if orders.is_empty() {
        return Err(GenreError::invalid_config("at least one n-gram order is required"));
    }
    if orders.contains(&0) {
        return Err(GenreError::invalid_config("n-gram orders must be at least 1"));
    }
    let mut orders = orders.to_vec();
    orders.sort_unstable();
    orders.dedup();
    Ok(orders)
}

/// Extract every n-gram of `words` as owned strings, in emission order.
pub fn extract(words: &[String], orders: &[usize]) -> Result<Vec<String>> {
    Ok(NGramExtractor::new(words.iter().cloned(), orders)?
        .map(|(_, ngram)| ngram)
        .collect())
}
