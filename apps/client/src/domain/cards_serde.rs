//! Serialization and deserialization for suits and ranks.
//!
//! The server speaks suit symbols (`"♠"`) and integer ranks (`6..=14`);
//! `Card` derives its serde on top of these as `{"suit": "♠", "rank": 14}`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::cards_types::{Rank, Suit};

// Suit serde
impl Serialize for Suit {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.symbol())
    }
}

impl<'de> Deserialize<'de> for Suit {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<Suit>()
            .map_err(|e| serde::de::Error::custom(e.to_string()))
    }
}

// Rank serde (integer form used by the server)
impl Serialize for Rank {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.value())
    }
}

impl<'de> Deserialize<'de> for Rank {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = u8::deserialize(deserializer)?;
        Rank::from_value(value)
            .ok_or_else(|| serde::de::Error::custom(format!("Invalid rank: {value}")))
    }
}
