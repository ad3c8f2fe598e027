// src/adapters/normalizer.rs

use crate::models::{
    enums::{StatusProcesso, TipoProcesso},
    wire::WireCode,
};

// Padrões únicos para entradas irreconhecíveis. Nenhum outro lugar do código escolhe defaults.
pub const TIPO_PADRAO: TipoProcesso = TipoProcesso::Manual;
pub const STATUS_PADRAO: StatusProcesso = StatusProcesso::Planejado;

/// Único caminho legal entre os códigos do fio e os enums canônicos.
///
/// Todo adaptador de entrada recebe um `EnumNormalizer`; ninguém reimplementa o mapeamento.
pub trait EnumNormalizer: Send + Sync {
    fn tipo(&self, raw: Option<&WireCode>) -> TipoProcesso;
    fn status(&self, raw: Option<&WireCode>) -> StatusProcesso;
    fn tipo_code(&self, tipo: TipoProcesso) -> u8;
    fn status_code(&self, status: StatusProcesso) -> u8;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CanonicalNormalizer;

// "2" é numérico; "2abc", "02" e "2.0" não são
fn parse_numeric(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    let n = trimmed.parse::<i64>().ok()?;
    (n.to_string() == trimmed).then_some(n)
}

// minúsculas, sem acentos e sem separadores: "Em Implementação" -> "emimplementacao"
fn fold(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

fn tipo_from_code(code: i64) -> TipoProcesso {
    match code {
        0 => TipoProcesso::Manual,
        1 => TipoProcesso::Sistemico,
        _ => TIPO_PADRAO,
    }
}

fn status_from_code(code: i64) -> StatusProcesso {
    match code {
        0 => StatusProcesso::Implementado,
        1 => StatusProcesso::EmImplementacao,
        2 => StatusProcesso::Planejado,
        3 => StatusProcesso::Problematico,
        4 => StatusProcesso::Obsoleto,
        _ => STATUS_PADRAO,
    }
}

impl EnumNormalizer for CanonicalNormalizer {
    fn tipo(&self, raw: Option<&WireCode>) -> TipoProcesso {
        match raw {
            Some(WireCode::Number(n)) => tipo_from_code(*n),
            Some(WireCode::Text(text)) => {
                if let Some(n) = parse_numeric(text) {
                    return tipo_from_code(n);
                }
                let folded = fold(text);
                if folded.is_empty() {
                    TIPO_PADRAO
                } else if folded.contains("manual") {
                    TipoProcesso::Manual
                } else {
                    TipoProcesso::Sistemico
                }
            }
            Some(WireCode::Other(_)) | None => TIPO_PADRAO,
        }
    }

    fn status(&self, raw: Option<&WireCode>) -> StatusProcesso {
        match raw {
            Some(WireCode::Number(n)) => status_from_code(*n),
            Some(WireCode::Text(text)) => {
                if let Some(n) = parse_numeric(text) {
                    return status_from_code(n);
                }
                let folded = fold(text);
                StatusProcesso::ALL
                    .into_iter()
                    .find(|s| folded.contains(&s.name().to_lowercase()))
                    .unwrap_or(STATUS_PADRAO)
            }
            Some(WireCode::Other(_)) | None => STATUS_PADRAO,
        }
    }

    fn tipo_code(&self, tipo: TipoProcesso) -> u8 {
        match tipo {
            TipoProcesso::Manual => 0,
            TipoProcesso::Sistemico => 1,
        }
    }

    fn status_code(&self, status: StatusProcesso) -> u8 {
        match status {
            StatusProcesso::Implementado => 0,
            StatusProcesso::EmImplementacao => 1,
            StatusProcesso::Planejado => 2,
            StatusProcesso::Problematico => 3,
            StatusProcesso::Obsoleto => 4,
        }
    }
}
