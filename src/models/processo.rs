// src/models/processo.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::enums::{StatusProcesso, TipoProcesso};

// Valor usado quando o servidor não informa o nome da área
pub const AREA_NAO_ESPECIFICADA: &str = "Não especificada";

// --- Itens relacionados (os "detalhes") ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsavelProcesso {
    pub id: String,
    pub nome: String,
    pub processo_detalhe_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FerramentaProcesso {
    pub id: String,
    pub nome: String,
    pub descricao: String,
    pub processo_detalhe_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentoProcesso {
    pub id: String,
    pub nome: String,
    pub descricao: String,
    pub processo_detalhe_id: String,
}

// --- Processo canônico ---
// Só o adaptador constrói isto a partir do fio; `tipo`/`status` já estão normalizados.

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Processo {
    pub id: String,
    pub nome: String,
    pub descricao: String,
    pub area_id: String,
    pub area_nome: String,
    pub processo_pai_id: Option<String>,
    pub tipo: TipoProcesso,
    pub status: StatusProcesso,
    pub detalhe_id: Option<String>,
    pub ferramentas: Vec<FerramentaProcesso>,
    pub responsaveis: Vec<ResponsavelProcesso>,
    pub documentos: Vec<DocumentoProcesso>,
}

impl Processo {
    /// Processo "principal": sem pai.
    pub fn is_root(&self) -> bool {
        self.processo_pai_id.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessoDetalhes {
    pub processo_id: String,
    pub detalhe_id: Option<String>,
    pub responsaveis: Vec<ResponsavelProcesso>,
    pub ferramentas: Vec<FerramentaProcesso>,
    pub documentos: Vec<DocumentoProcesso>,
}

// As três relações que vivem em /processos/:id/detalhes/{relacao}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetailRelation {
    Responsaveis,
    Ferramentas,
    Documentos,
}

impl DetailRelation {
    pub const ALL: [DetailRelation; 3] = [
        DetailRelation::Responsaveis,
        DetailRelation::Ferramentas,
        DetailRelation::Documentos,
    ];

    pub fn segment(self) -> &'static str {
        match self {
            DetailRelation::Responsaveis => "responsaveis",
            DetailRelation::Ferramentas => "ferramentas",
            DetailRelation::Documentos => "documentos",
        }
    }

    // Responsáveis só têm nome; ferramentas e documentos levam descrição (vazia na criação)
    pub fn has_description(self) -> bool {
        !matches!(self, DetailRelation::Responsaveis)
    }
}

impl ProcessoDetalhes {
    pub fn item_ids(&self, relation: DetailRelation) -> Vec<String> {
        match relation {
            DetailRelation::Responsaveis => self.responsaveis.iter().map(|r| r.id.clone()).collect(),
            DetailRelation::Ferramentas => self.ferramentas.iter().map(|f| f.id.clone()).collect(),
            DetailRelation::Documentos => self.documentos.iter().map(|d| d.id.clone()).collect(),
        }
    }
}

// --- Entradas ---

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProcessoInput {
    #[validate(length(min = 1, message = "O nome é obrigatório"))]
    pub nome: String,

    #[validate(length(min = 1, message = "A descrição é obrigatória"))]
    pub descricao: String,

    pub tipo: TipoProcesso,
    pub status: StatusProcesso,

    pub area_id: Option<String>,
    pub processo_pai_id: Option<String>,

    // Nomes; cada um vira uma chamada POST separada depois da criação
    #[serde(default)]
    pub responsaveis: Vec<String>,
    #[serde(default)]
    pub ferramentas: Vec<String>,
    #[serde(default)]
    pub documentos: Vec<String>,
}

impl ProcessoInput {
    pub fn new(
        nome: impl Into<String>,
        descricao: impl Into<String>,
        tipo: TipoProcesso,
        status: StatusProcesso,
    ) -> Self {
        Self {
            nome: nome.into(),
            descricao: descricao.into(),
            tipo,
            status,
            area_id: None,
            processo_pai_id: None,
            responsaveis: Vec::new(),
            ferramentas: Vec::new(),
            documentos: Vec::new(),
        }
    }

    pub fn in_area(mut self, area_id: impl Into<String>) -> Self {
        self.area_id = Some(area_id.into());
        self
    }

    pub fn child_of(mut self, processo_pai_id: impl Into<String>) -> Self {
        self.processo_pai_id = Some(processo_pai_id.into());
        self
    }

    pub fn items(&self, relation: DetailRelation) -> &[String] {
        match relation {
            DetailRelation::Responsaveis => &self.responsaveis,
            DetailRelation::Ferramentas => &self.ferramentas,
            DetailRelation::Documentos => &self.documentos,
        }
    }

    // Tira espaços antes de validar: "   " não conta como nome
    pub fn trimmed(mut self) -> Self {
        self.nome = self.nome.trim().to_string();
        self.descricao = self.descricao.trim().to_string();
        self
    }
}

/// O que fazer com uma relação (responsáveis, ferramentas, documentos) numa atualização.
///
/// `Replace` com lista vazia equivale a `Keep`: uma lista vazia nunca apaga nada.
/// Para esvaziar a relação é preciso pedir `Clear` explicitamente.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "acao", content = "itens")]
pub enum RelationChange {
    #[default]
    Keep,
    Replace(Vec<String>),
    Clear,
}

impl RelationChange {
    pub fn is_keep(&self) -> bool {
        match self {
            RelationChange::Keep => true,
            RelationChange::Replace(items) => items.iter().all(|i| i.trim().is_empty()),
            RelationChange::Clear => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProcessoPatch {
    #[validate(length(min = 1, message = "O nome é obrigatório"))]
    pub nome: String,

    #[validate(length(min = 1, message = "A descrição é obrigatória"))]
    pub descricao: String,

    pub tipo: TipoProcesso,
    pub status: StatusProcesso,

    pub area_id: Option<String>,
    pub processo_pai_id: Option<String>,

    #[serde(default)]
    pub responsaveis: RelationChange,
    #[serde(default)]
    pub ferramentas: RelationChange,
    #[serde(default)]
    pub documentos: RelationChange,
}

impl ProcessoPatch {
    // Parte de um processo existente, mantendo todas as relações
    pub fn from_processo(processo: &Processo) -> Self {
        Self {
            nome: processo.nome.clone(),
            descricao: processo.descricao.clone(),
            tipo: processo.tipo,
            status: processo.status,
            area_id: Some(processo.area_id.clone()).filter(|a| !a.is_empty()),
            processo_pai_id: processo.processo_pai_id.clone(),
            responsaveis: RelationChange::Keep,
            ferramentas: RelationChange::Keep,
            documentos: RelationChange::Keep,
        }
    }

    pub fn change(&self, relation: DetailRelation) -> &RelationChange {
        match relation {
            DetailRelation::Responsaveis => &self.responsaveis,
            DetailRelation::Ferramentas => &self.ferramentas,
            DetailRelation::Documentos => &self.documentos,
        }
    }

    pub fn trimmed(mut self) -> Self {
        self.nome = self.nome.trim().to_string();
        self.descricao = self.descricao.trim().to_string();
        self
    }
}

// Filtro das telas de listagem: nome contém o termo (sem diferenciar maiúsculas) e, opcionalmente, área
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessoFilter {
    pub termo: Option<String>,
    pub area_id: Option<String>,
}

impl ProcessoFilter {
    pub fn matches(&self, processo: &Processo) -> bool {
        let termo_ok = match &self.termo {
            Some(termo) => processo.nome.to_lowercase().contains(&termo.to_lowercase()),
            None => true,
        };
        let area_ok = match &self.area_id {
            Some(area_id) => &processo.area_id == area_id,
            None => true,
        };
        termo_ok && area_ok
    }
}
