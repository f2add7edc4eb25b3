// src/models/dealership.rs
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Dealership {
    pub id: i64,       // Identity taken from the seed data
    pub state: String, // Full state name, used for filtering
    /// Descriptive fields (city, address, zip, names, coordinates) carried through untouched.
    #[serde(flatten)]
    pub details: Map<String, Value>,
}
