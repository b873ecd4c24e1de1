// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Deterministic identifiers derived from human-readable names.

use itertools::Itertools as _;

/// Converts the given `name` into an identifier slug.
///
/// The result is lower-cased, every run of non-alphanumeric characters is
/// collapsed into a single `-`, and no `-` is left at either end.
///
/// ```rust
/// assert_eq!(givenspecs::slug::id("Eating  cucumbers!"), "eating-cucumbers");
/// ```
#[must_use]
pub fn id(name: &str) -> String {
    words(name).map(str::to_lowercase).join("-")
}

/// Converts the given `name` into a method-like identifier.
///
/// Every word gets title-cased unless it's entirely upper-cased (acronyms
/// are kept as is), and then all the words are concatenated.
///
/// ```rust
/// use givenspecs::slug::method_name;
///
/// assert_eq!(
///     method_name("A sentence with an ACRONYM"),
///     "ASentenceWithAnACRONYM",
/// );
/// ```
#[must_use]
pub fn method_name(name: &str) -> String {
    words(name)
        .map(|word| {
            if is_acronym(word) {
                return word.to_owned();
            }
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect()
            })
        })
        .collect()
}

/// Converts the given `name` into a parameter-like identifier: a
/// [`method_name()`] with its first character lower-cased.
#[must_use]
pub fn param_name(name: &str) -> String {
    let method = method_name(name);
    let mut chars = method.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_lowercase().chain(chars).collect()
    })
}

/// Splits the given `name` into alphanumeric words.
fn words(name: &str) -> impl Iterator<Item = &str> {
    name.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty())
}

/// Indicates whether the given `word` is an acronym, i.e. has letters and all
/// of them are upper-cased.
fn is_acronym(word: &str) -> bool {
    word.chars().any(char::is_alphabetic)
        && word.chars().filter(|c| c.is_alphabetic()).all(char::is_uppercase)
        && word.chars().filter(|c| c.is_alphabetic()).count() > 1
}
