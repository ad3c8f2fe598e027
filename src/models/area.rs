// src/models/area.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::wire::flexible_id;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Area {
    #[serde(deserialize_with = "flexible_id")]
    pub id: String,
    #[serde(default)]
    pub nome: String,
}

// Payload de criação/atualização (o id vai na rota)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AreaInput {
    #[validate(length(min = 1, message = "O nome da área é obrigatório"))]
    pub nome: String,
}

impl AreaInput {
    pub fn new(nome: impl Into<String>) -> Self {
        Self { nome: nome.into().trim().to_string() }
    }
}
