//! Reply strings, one embedded JSON catalog per language.

use std::collections::HashMap;

const FALLBACK_LOCALE: &str = "en";

const CATALOGS: &[(&str, &str)] = &[
    ("en", include_str!("../locales/en.json")),
    ("fi", include_str!("../locales/fi.json")),
];

pub const SLASH_COMMAND_RESPONSE: &str = "slashCommandResponse";
pub const UNKNOWN_COMMAND_RESPONSE: &str = "unknownCommandResponse";

#[derive(Debug, thiserror::Error)]
pub enum LocaleError {
    #[error("no catalog for locale {0:?} and no fallback available")]
    UnknownLocale(String),
    #[error("message key {key:?} missing from locale {locale:?}")]
    MissingKey { locale: String, key: String },
    #[error("failed to parse catalog for locale {locale:?}: {source}")]
    Parse {
        locale: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Messages for a single locale.
#[derive(Debug, Clone)]
pub struct Catalog {
    locale: String,
    messages: HashMap<String, String>,
}

impl Catalog {
    /// Loads the embedded catalog for `locale`.
    ///
    /// `fi_FI` and `fi-FI` resolve to `fi`. Anything without a catalog falls
    /// back to English.
    pub fn load(locale: &str) -> Result<Self, LocaleError> {
        let language = locale
            .split(['_', '-'])
            .next()
            .unwrap_or(locale)
            .to_ascii_lowercase();

        let (resolved, raw) = match find(&language) {
            Some(raw) => (language, raw),
            None => {
                tracing::warn!(locale, fallback = FALLBACK_LOCALE, "No catalog for locale");
                let raw = find(FALLBACK_LOCALE)
                    .ok_or_else(|| LocaleError::UnknownLocale(locale.to_string()))?;
                (FALLBACK_LOCALE.to_string(), raw)
            }
        };

        Self::parse(&resolved, raw)
    }

    pub fn parse(locale: &str, raw: &str) -> Result<Self, LocaleError> {
        let messages = serde_json::from_str(raw).map_err(|source| LocaleError::Parse {
            locale: locale.to_string(),
            source,
        })?;
        Ok(Self {
            locale: locale.to_string(),
            messages,
        })
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Looks up `key` and fills its `%s` placeholders with `args` in order.
    pub fn translate(&self, key: &str, args: &[&str]) -> Result<String, LocaleError> {
        let template = self
            .messages
            .get(key)
            .ok_or_else(|| LocaleError::MissingKey {
                locale: self.locale.clone(),
                key: key.to_string(),
            })?;
        Ok(format_placeholders(template, args))
    }
}

fn find(language: &str) -> Option<&'static str> {
    CATALOGS
        .iter()
        .find(|(name, _)| *name == language)
        .map(|(_, raw)| *raw)
}

/// Placeholders without an argument stay literal; surplus arguments are
/// appended separated by spaces.
fn format_placeholders(template: &str, args: &[&str]) -> String {
    let mut args = args.iter();
    let mut pieces = template.split("%s");
    let mut out = String::with_capacity(template.len());
    if let Some(first) = pieces.next() {
        out.push_str(first);
    }
    for piece in pieces {
        match args.next() {
            Some(arg) => out.push_str(arg),
            None => out.push_str("%s"),
        }
        out.push_str(piece);
    }
    for arg in args {
        out.push(' ');
        out.push_str(arg);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_embedded_catalog_has_the_command_response() {
        for (name, _) in CATALOGS {
            let catalog = Catalog::load(name).unwrap();
            assert!(catalog.translate(SLASH_COMMAND_RESPONSE, &["x"]).is_ok());
            assert!(catalog.translate(UNKNOWN_COMMAND_RESPONSE, &[]).is_ok());
        }
    }

    #[test]
    fn region_suffix_resolves_to_language() {
        assert_eq!(Catalog::load("fi_FI").unwrap().locale(), "fi");
        assert_eq!(Catalog::load("FI-fi").unwrap().locale(), "fi");
    }

    #[test]
    fn unknown_locale_falls_back_to_english() {
        assert_eq!(Catalog::load("sv").unwrap().locale(), "en");
    }

    #[test]
    fn translate_substitutes_argument() {
        let catalog = Catalog::parse("en", r#"{"greet":"Hello %s!"}"#).unwrap();
        assert_eq!(catalog.translate("greet", &["world"]).unwrap(), "Hello world!");
    }

    #[test]
    fn translate_missing_key_is_an_error() {
        let catalog = Catalog::parse("en", "{}").unwrap();
        let err = catalog.translate("nope", &[]).unwrap_err();
        assert!(matches!(err, LocaleError::MissingKey { ref key, .. } if key == "nope"));
    }

    #[test]
    fn parse_rejects_non_string_values() {
        let err = Catalog::parse("en", r#"{"a":1}"#).unwrap_err();
        assert!(matches!(err, LocaleError::Parse { .. }));
    }

    #[test]
    fn placeholders_without_arguments_stay_literal() {
        assert_eq!(format_placeholders("%s and %s", &["a"]), "a and %s");
    }

    #[test]
    fn surplus_arguments_are_appended() {
        assert_eq!(format_placeholders("got %s", &["a", "b"]), "got a b");
    }

    #[test]
    fn empty_argument_is_substituted() {
        assert_eq!(format_placeholders("[%s]", &[""]), "[]");
    }
}
