#![forbid(unsafe_code)]

//! Uniform random selection.
//!
//! Both the scramble frames and the settled word go through
//! [`pick_uniform`], so the two paths share one sampling rule: every element
//! is equally likely and draws are independent.

use rand::Rng;

use crate::config::Alphabet;

/// Pick one element uniformly at random. Returns `None` for an empty slice.
pub fn pick_uniform<'a, T, R>(items: &'a [T], rng: &mut R) -> Option<&'a T>
where
    R: Rng,
{
    if items.is_empty() {
        return None;
    }
    items.get(rng.random_range(0..items.len()))
}

/// Build a scramble frame of `length` characters sampled with replacement.
pub fn scramble_frame<R>(alphabet: &Alphabet, length: usize, rng: &mut R) -> String
where
    R: Rng,
{
    let mut frame = String::with_capacity(length);
    for _ in 0..length {
        if let Some(&ch) = pick_uniform(alphabet.chars(), rng) {
            frame.push(ch);
        }
    }
    frame
}
