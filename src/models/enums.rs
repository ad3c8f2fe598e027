// src/models/enums.rs

use serde::{Deserialize, Serialize};

// --- Enums canônicos ---
// O servidor manda códigos numéricos ou textos variados; internamente só circulam estes valores.
// A conversão fica exclusivamente em `adapters::normalizer`.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TipoProcesso {
    Manual,
    Sistemico,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusProcesso {
    Implementado,
    EmImplementacao,
    Planejado,
    Problematico,
    Obsoleto,
}

impl TipoProcesso {
    pub const ALL: [TipoProcesso; 2] = [TipoProcesso::Manual, TipoProcesso::Sistemico];

    pub fn name(self) -> &'static str {
        match self {
            TipoProcesso::Manual => "Manual",
            TipoProcesso::Sistemico => "Sistemico",
        }
    }
}

impl StatusProcesso {
    // A ordem importa: é a precedência de busca por substring
    pub const ALL: [StatusProcesso; 5] = [
        StatusProcesso::Implementado,
        StatusProcesso::EmImplementacao,
        StatusProcesso::Planejado,
        StatusProcesso::Problematico,
        StatusProcesso::Obsoleto,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StatusProcesso::Implementado => "Implementado",
            StatusProcesso::EmImplementacao => "EmImplementacao",
            StatusProcesso::Planejado => "Planejado",
            StatusProcesso::Problematico => "Problematico",
            StatusProcesso::Obsoleto => "Obsoleto",
        }
    }
}
