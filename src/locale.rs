use std::collections::HashMap;

use crate::error::AttachmentError;

/// Labels of a single locale, keyed by message id (e.g. `short_rentcall_reminder`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelMap {
    locale: String,
    labels: HashMap<String, String>,
}

impl LabelMap {
    pub fn new<K, V>(locale: impl Into<String>, labels: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            locale: locale.into(),
            labels: labels
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn label(&self, key: &'static str) -> Result<&str, AttachmentError> {
        self.labels
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| AttachmentError::MissingLabel {
                locale: self.locale.clone(),
                key,
            })
    }
}

pub trait LocaleCatalog: Send + Sync {
    fn get(&self, locale: &str) -> Result<LabelMap, AttachmentError>;
}

/// In-memory catalog. Lookups try the full tag first (`pt-BR`), then the
/// primary language subtag (`fr-FR` resolves to `fr`).
#[derive(Debug, Clone, Default)]
pub struct StaticLocaleCatalog {
    locales: HashMap<String, LabelMap>,
}

impl StaticLocaleCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Labels shipped with the emailer.
    pub fn builtin() -> Self {
        Self::empty()
            .with_locale(
                "en",
                [
                    ("short_rentcall", "Rent call"),
                    ("short_rentcall_reminder", "Rent reminder"),
                    ("short_rentcall_last_reminder", "Last rent reminder"),
                    ("short_invoice", "Invoice"),
                ],
            )
            .with_locale(
                "fr",
                [
                    ("short_rentcall", "Avis d'échéance"),
                    ("short_rentcall_reminder", "Relance"),
                    ("short_rentcall_last_reminder", "Dernière relance"),
                    ("short_invoice", "Quittance"),
                ],
            )
            .with_locale(
                "de",
                [
                    ("short_rentcall", "Mietaufforderung"),
                    ("short_rentcall_reminder", "Mahnung"),
                    ("short_rentcall_last_reminder", "Letzte Mahnung"),
                    ("short_invoice", "Rechnung"),
                ],
            )
            .with_locale(
                "pt-BR",
                [
                    ("short_rentcall", "Aviso de aluguel"),
                    ("short_rentcall_reminder", "Lembrete de aluguel"),
                    ("short_rentcall_last_reminder", "Último lembrete"),
                    ("short_invoice", "Recibo"),
                ],
            )
            .with_locale(
                "es-CO",
                [
                    ("short_rentcall", "Cobro de arriendo"),
                    ("short_rentcall_reminder", "Recordatorio de arriendo"),
                    ("short_rentcall_last_reminder", "Último recordatorio"),
                    ("short_invoice", "Recibo"),
                ],
            )
    }

    pub fn with_locale<K, V>(
        mut self,
        locale: &str,
        labels: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.locales
            .insert(normalize(locale), LabelMap::new(locale, labels));
        self
    }
}

impl LocaleCatalog for StaticLocaleCatalog {
    fn get(&self, locale: &str) -> Result<LabelMap, AttachmentError> {
        let normalized = normalize(locale);
        let primary = normalized.split('-').next().unwrap_or_default();
        self.locales
            .get(&normalized)
            .or_else(|| self.locales.get(primary))
            .cloned()
            .ok_or_else(|| AttachmentError::UnknownLocale {
                locale: locale.to_string(),
            })
    }
}

fn normalize(locale: &str) -> String {
    locale.trim().replace('_', "-").to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_locales_carry_every_short_label() {
        let catalog = StaticLocaleCatalog::builtin();
        for locale in ["en", "fr", "de", "pt-BR", "es-CO"] {
            let labels = catalog.get(locale).unwrap();
            for key in [
                "short_rentcall",
                "short_rentcall_reminder",
                "short_rentcall_last_reminder",
                "short_invoice",
            ] {
                assert!(labels.label(key).is_ok(), "{locale} lacks {key}");
            }
        }
    }

    #[test]
    fn region_tags_fall_back_to_language() {
        let catalog = StaticLocaleCatalog::builtin();
        let labels = catalog.get("fr-FR").unwrap();
        assert_eq!(labels.locale(), "fr");
        assert_eq!(labels.label("short_rentcall_reminder").unwrap(), "Relance");

        let labels = catalog.get("pt_br").unwrap();
        assert_eq!(labels.locale(), "pt-BR");
    }

    #[test]
    fn unknown_locale_is_reported() {
        let err = StaticLocaleCatalog::builtin().get("ja").unwrap_err();
        assert!(matches!(err, AttachmentError::UnknownLocale { locale } if locale == "ja"));
    }

    #[test]
    fn missing_key_is_reported_with_locale() {
        let catalog = StaticLocaleCatalog::empty().with_locale("en", [("short_invoice", "Invoice")]);
        let err = catalog
            .get("en")
            .unwrap()
            .label("short_rentcall_reminder")
            .unwrap_err();
        assert!(matches!(
            err,
            AttachmentError::MissingLabel { ref locale, key: "short_rentcall_reminder" } if locale == "en"
        ));
    }
}
