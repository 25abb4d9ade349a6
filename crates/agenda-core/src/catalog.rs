//! Caller-supplied list of selectable clients.

use std::path::Path;

use crate::{
    error::{AgendaError, Result},
    models::Client,
};

/// Clients a commercial may plan visits for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientCatalog {
    clients: Vec<Client>,
}

impl ClientCatalog {
    pub fn new(clients: Vec<Client>) -> Self {
        Self { clients }
    }

    /// Parses a JSON array of clients.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// Reads a JSON array of clients from a file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| AgendaError::FileSystem {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json_str(&json)
    }

    /// Demonstration catalog used when the caller has none.
    pub fn sample() -> Self {
        let client = |id, name: &str, address: &str, latitude, longitude| Client {
            id,
            name: name.to_string(),
            address: address.to_string(),
            latitude,
            longitude,
        };
        Self::new(vec![
            client(10, "Clinica Andes", "Av. Libertad 123, Santiago", -33.4569, -70.6483),
            client(20, "Hospital Central", "Cra 7 # 40-62, Bogota", 4.6486, -74.0995),
            client(30, "Instituto del Corazon", "Calle 26 # 52-20, Ciudad de Mexico", 19.4326, -99.1332),
            client(40, "Centro Medico Pacifico", "Av. Javier Prado 776, Lima", -12.0464, -77.0428),
            client(50, "Hospital del Sur", "Av. 9 de Julio 999, Buenos Aires", -34.6037, -58.3816),
        ])
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }

    /// Returns the clients with the given ids, in the order the ids are given.
    ///
    /// # Errors
    ///
    /// `AgendaError::InvalidInput` for an id the catalog does not contain.
    pub fn select(&self, ids: &[i64]) -> Result<Vec<Client>> {
        ids.iter()
            .map(|&id| {
                self.get(id).cloned().ok_or_else(|| {
                    AgendaError::invalid_input("client_ids")
                        .with_reason(format!("client {id} is not in the catalog"))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_select_keeps_requested_order() {
        let catalog = ClientCatalog::sample();

        let selected = catalog.select(&[30, 10]).unwrap();

        let ids: Vec<i64> = selected.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![30, 10]);
    }

    #[test]
    fn test_select_unknown_client_fails() {
        let catalog = ClientCatalog::sample();
        assert!(matches!(
            catalog.select(&[10, 99]),
            Err(AgendaError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_from_json_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": 1, "name": "A", "address": "Street 1", "latitude": 1.0, "longitude": 2.0}}]"#
        )
        .unwrap();

        let catalog = ClientCatalog::from_json_file(file.path()).unwrap();

        assert_eq!(catalog.clients().len(), 1);
        assert_eq!(catalog.get(1).map(|c| c.name.as_str()), Some("A"));
    }

    #[test]
    fn test_from_missing_file() {
        let result = ClientCatalog::from_json_file("/definitely/not/here.json");
        assert!(matches!(result, Err(AgendaError::FileSystem { .. })));
    }
}
