//! Language strings
//!
//! Built-in UI strings declared by a plaything, keyed by string code and then
//! by language code.

use indexmap::IndexMap;

/// A lookup table of UI strings bound to one language
#[derive(Debug, Clone, Default)]
pub struct LangStrings {
    lang: String,
    strings: IndexMap<String, IndexMap<String, String>>,
}

impl LangStrings {
    /// Create an empty table for `lang`
    pub fn new(lang: impl Into<String>) -> Self {
        Self {
            lang: lang.into(),
            strings: IndexMap::new(),
        }
    }

    /// Add a translation for `code` in `lang`
    #[must_use]
    pub fn with(mut self, code: impl Into<String>, lang: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(code, lang, text);
        self
    }

    /// Add a translation in place
    pub fn insert(&mut self, code: impl Into<String>, lang: impl Into<String>, text: impl Into<String>) {
        self.strings
            .entry(code.into())
            .or_default()
            .insert(lang.into(), text.into());
    }

    /// Language this table answers in
    #[inline]
    #[must_use]
    pub fn lang(&self) -> &str {
        &self.lang
    }

    /// Same strings, answering in another language
    #[must_use]
    pub fn for_lang(&self, lang: impl Into<String>) -> Self {
        Self {
            lang: lang.into(),
            strings: self.strings.clone(),
        }
    }

    /// Text for `code`
    ///
    /// Unknown codes yield `!!code!!`; a known code without the current
    /// language yields `!!code.lang!!`.
    #[must_use]
    pub fn get(&self, code: &str) -> String {
        match self.strings.get(code) {
            None => format!("!!{code}!!"),
            Some(by_lang) => by_lang
                .get(&self.lang)
                .cloned()
                .unwrap_or_else(|| format!("!!{code}.{}!!", self.lang)),
        }
    }
}
