//! Phone domain model.

use serde::{Deserialize, Serialize};

/// A phone number owned by exactly one client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phone {
    pub id: i32,
    pub client_id: i32,
    pub phone_number: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_serialization() {
        let phone = Phone {
            id: 7,
            client_id: 1,
            phone_number: "+123456788".to_string(),
        };

        let json = serde_json::to_value(&phone).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["clientId"], 1);
        assert_eq!(json["phoneNumber"], "+123456788");
    }
}
