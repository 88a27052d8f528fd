use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PetKind {
    Cat,
    Dog,
    Bird,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct Pet {
    pub id: u64,
    pub name: String,
    pub kind: PetKind,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct NewPet {
    pub name: String,
    pub kind: PetKind,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PetId {
    pub id: u64,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PetQuery {
    pub kind: Option<PetKind>,
    pub limit: Option<u32>,
}
