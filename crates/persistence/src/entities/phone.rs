//! Phone entity (database row mapping).

use sqlx::FromRow;

use domain::models::Phone;

/// Database row mapping for the phone table.
#[derive(Debug, Clone, FromRow)]
pub struct PhoneEntity {
    pub id: i32,
    pub client_id: i32,
    pub phone_number: String,
}

impl From<PhoneEntity> for Phone {
    fn from(entity: PhoneEntity) -> Self {
        Self {
            id: entity.id,
            client_id: entity.client_id,
            phone_number: entity.phone_number,
        }
    }
}
