//! User-facing message catalogs.
//!
//! Status and validation text shown to the commercial comes from an injected
//! [`MessageCatalog`] instead of the error `Display` strings, so a front end
//! can present it in the user's language. [`EnglishMessages`] is the default
//! and matches the `Display` text of [`AgendaError`].

use std::sync::Arc;

use crate::error::AgendaError;

/// Localized text for the messages a caller displays.
pub trait MessageCatalog: Send + Sync {
    /// Language code of the catalog, e.g. `en`.
    fn language(&self) -> &str;

    fn no_clients_selected(&self) -> String;

    fn no_visits(&self) -> String;

    fn submission_succeeded(&self) -> String;

    fn invalid_url(&self, url: &str) -> String;

    fn invalid_response(&self) -> String;

    /// Shown after a visit was completed without coordinates.
    fn location_not_recorded(&self) -> String;

    /// Text for an error, translated where the catalog knows the error and
    /// the error's own `Display` otherwise.
    fn describe(&self, error: &AgendaError) -> String {
        match error {
            AgendaError::NoClientsSelected => self.no_clients_selected(),
            AgendaError::NoVisits => self.no_visits(),
            AgendaError::InvalidUrl { url } => self.invalid_url(url),
            AgendaError::InvalidResponse => self.invalid_response(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishMessages;

impl MessageCatalog for EnglishMessages {
    fn language(&self) -> &str {
        "en"
    }

    fn no_clients_selected(&self) -> String {
        AgendaError::NoClientsSelected.to_string()
    }

    fn no_visits(&self) -> String {
        AgendaError::NoVisits.to_string()
    }

    fn submission_succeeded(&self) -> String {
        "All visits submitted successfully".to_string()
    }

    fn invalid_url(&self, url: &str) -> String {
        AgendaError::InvalidUrl {
            url: url.to_string(),
        }
        .to_string()
    }

    fn invalid_response(&self) -> String {
        AgendaError::InvalidResponse.to_string()
    }

    fn location_not_recorded(&self) -> String {
        "The visit was saved without its location.".to_string()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SpanishMessages;

impl MessageCatalog for SpanishMessages {
    fn language(&self) -> &str {
        "es"
    }

    fn no_clients_selected(&self) -> String {
        "Selecciona al menos un cliente antes de generar la agenda".to_string()
    }

    fn no_visits(&self) -> String {
        "No hay visitas planificadas para enviar".to_string()
    }

    fn submission_succeeded(&self) -> String {
        "Todas las visitas se enviaron correctamente".to_string()
    }

    fn invalid_url(&self, url: &str) -> String {
        format!("URL del servicio de visitas no válida: {url}")
    }

    fn invalid_response(&self) -> String {
        "Respuesta no válida del servicio de visitas".to_string()
    }

    fn location_not_recorded(&self) -> String {
        "La visita se guardó sin su ubicación.".to_string()
    }
}

/// Catalog for a language code such as `es`, `es-CL` or `es_MX`.
///
/// An exact match wins, then the code's language prefix. Unknown languages
/// get [`EnglishMessages`].
pub fn catalog_for_language(code: &str) -> Arc<dyn MessageCatalog> {
    let code = code.trim().to_ascii_lowercase();
    let prefix = code.split(['-', '_']).next().unwrap_or_default();
    match prefix {
        "es" => Arc::new(SpanishMessages),
        _ => Arc::new(EnglishMessages),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_matches_error_text() {
        let messages = EnglishMessages;

        assert_eq!(
            messages.describe(&AgendaError::NoClientsSelected),
            AgendaError::NoClientsSelected.to_string()
        );
        assert_eq!(
            messages.describe(&AgendaError::NoVisits),
            "There are no planned visits to submit"
        );
        assert_eq!(
            messages.describe(&AgendaError::InvalidUrl {
                url: "ftp://x".to_string()
            }),
            "Invalid visit service URL: ftp://x"
        );
    }

    #[test]
    fn test_spanish_translates_known_errors() {
        let messages = SpanishMessages;

        assert_eq!(
            messages.describe(&AgendaError::NoVisits),
            "No hay visitas planificadas para enviar"
        );
        assert!(messages
            .describe(&AgendaError::InvalidUrl {
                url: "::nope::".to_string()
            })
            .ends_with("::nope::"));
    }

    #[test]
    fn test_untranslated_errors_keep_server_text() {
        let error = AgendaError::ServerError {
            status: 409,
            message: "visit already recorded".to_string(),
        };
        assert_eq!(SpanishMessages.describe(&error), "visit already recorded");
    }

    #[test]
    fn test_catalog_for_language_falls_back_by_prefix() {
        assert_eq!(catalog_for_language("es").language(), "es");
        assert_eq!(catalog_for_language("es-CL").language(), "es");
        assert_eq!(catalog_for_language("ES_mx").language(), "es");
        assert_eq!(catalog_for_language("en-US").language(), "en");
        assert_eq!(catalog_for_language("fr").language(), "en");
        assert_eq!(catalog_for_language("").language(), "en");
    }
}
