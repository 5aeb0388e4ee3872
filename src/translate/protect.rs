//! Placeholder substitution around machine translation
//!
//! Protected names are swapped for `SPNAME<n>X` tokens before the text is
//! sent out and swapped back afterwards. Restoration only recognizes a
//! fixed set of token manglings; anything else the translator does to a
//! token is left in the output as-is.

use regex::Regex;

/// A token standing in for one protected name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub token: String,
    /// The name as first found in the source text
    pub original: String,
}

impl Placeholder {
    /// Forms of the token the translator is known to produce
    fn variants(&self) -> [String; 5] {
        [
            self.token.clone(),
            self.token.to_lowercase(),
            self.token.to_uppercase(),
            self.token.replace('X', " X"),
            self.token.replace('X', "x"),
        ]
    }
}

/// Text with protected names replaced by placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedText {
    pub text: String,
    pub placeholders: Vec<Placeholder>,
}

/// The token used for the `index`-th protected name of a text
pub fn placeholder_token(index: usize) -> String {
    format!("SPNAME{}X", index)
}

/// Replaces every case-insensitive occurrence of each pattern with a token
///
/// Patterns are applied in the given order, each against the text left by
/// the previous ones. Only patterns that match consume a token index.
pub fn protect<'a, I>(text: &str, patterns: I) -> ProtectedText
where
    I: IntoIterator<Item = &'a Regex>,
{
    let mut protected = text.to_string();
    let mut placeholders = Vec::new();

    for pattern in patterns {
        let original = match pattern.find(&protected) {
            Some(found) => found.as_str().to_string(),
            None => continue,
        };

        let token = placeholder_token(placeholders.len());
        protected = pattern
            .replace_all(&protected, regex::NoExpand(&token))
            .into_owned();
        placeholders.push(Placeholder { token, original });
    }

    ProtectedText {
        text: protected,
        placeholders,
    }
}

/// Puts the original names back into translated text
pub fn restore(text: &str, placeholders: &[Placeholder]) -> String {
    let mut restored = text.to_string();
    for placeholder in placeholders {
        for variant in placeholder.variants() {
            restored = restored.replace(&variant, &placeholder.original);
        }
    }
    restored
}
