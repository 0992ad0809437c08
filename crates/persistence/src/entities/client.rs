//! Client entity (database row mapping).

use sqlx::FromRow;

use domain::models::{Client, ClientWithPhones, Phone};

/// Database row mapping for the client table.
#[derive(Debug, Clone, FromRow)]
pub struct ClientEntity {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
}

impl From<ClientEntity> for Client {
    fn from(entity: ClientEntity) -> Self {
        Self {
            id: entity.id,
            first_name: entity.first_name,
            last_name: entity.last_name,
            email: entity.email,
        }
    }
}

impl ClientEntity {
    /// Attaches the client's phones, producing the read model.
    pub fn with_phones(self, phones: Vec<Phone>) -> ClientWithPhones {
        ClientWithPhones {
            client: self.into(),
            phones,
        }
    }
}
