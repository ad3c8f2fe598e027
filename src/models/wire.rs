// src/models/wire.rs

// Formatos exatamente como trafegam na API REST.
// Nada aqui é usado fora do gateway/adaptador: o resto da aplicação só vê `models::processo`.

use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::Value;

// --- Campos tolerantes ---
// Cada campo é lido como `Value` e convertido na mão: um registro malformado
// vira valores padrão em vez de derrubar a lista inteira.
// O backend às vezes devolve IDs numéricos; internamente são sempre strings opacas.

fn id_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn flexible_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    // `null` vira id vazio, como se o campo não tivesse vindo
    Ok(id_text(Value::deserialize(deserializer)?).unwrap_or_default())
}

pub fn flexible_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(id_text(Value::deserialize(deserializer)?))
}

pub fn nullable_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt_text(deserializer)?.unwrap_or_default())
}

pub fn lenient_opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

pub fn lenient_opt<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(serde_json::from_value(Value::deserialize(deserializer)?).ok())
}

// Itens que não são objetos são descartados; o resto da lista segue
pub fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().filter_map(|v| serde_json::from_value(v).ok()).collect(),
        _ => Vec::new(),
    })
}

pub fn lenient_opt_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(items.into_iter().filter_map(|v| serde_json::from_value(v).ok()).collect()),
        _ => None,
    })
}

// --- Código de enum no fio ---
// `tipo` e `status` chegam como número, string numérica ou texto livre.
// `Other` absorve qualquer outro JSON para que a desserialização nunca falhe por causa deles.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireCode {
    Number(i64),
    Text(String),
    Other(Value),
}

// --- Respostas ---

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NestedEntityApi {
    #[serde(deserialize_with = "lenient_opt_text")]
    pub nome: Option<String>,
    #[serde(deserialize_with = "lenient_opt_text")]
    pub descricao: Option<String>,
}

// Item de responsáveis/ferramentas/documentos.
// Versões diferentes do backend mandam `nome` direto ou aninhado em `responsavel`/`ferramenta`/`documento`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RelatedItemApi {
    #[serde(deserialize_with = "flexible_id")]
    pub id: String,
    #[serde(deserialize_with = "lenient_opt_text")]
    pub nome: Option<String>,
    #[serde(deserialize_with = "lenient_opt_text")]
    pub descricao: Option<String>,
    #[serde(deserialize_with = "flexible_opt_id")]
    pub processo_detalhe_id: Option<String>,
    #[serde(alias = "responsavel", alias = "ferramenta", alias = "documento", deserialize_with = "lenient_opt")]
    pub entidade: Option<NestedEntityApi>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessoApiResponse {
    #[serde(deserialize_with = "flexible_id")]
    pub id: String,
    #[serde(deserialize_with = "nullable_text")]
    pub nome: String,
    #[serde(deserialize_with = "nullable_text")]
    pub descricao: String,
    #[serde(deserialize_with = "flexible_id")]
    pub area_id: String,
    #[serde(deserialize_with = "lenient_opt_text")]
    pub area_nome: Option<String>,
    #[serde(deserialize_with = "flexible_opt_id")]
    pub processo_pai_id: Option<String>,
    pub tipo: Option<WireCode>,
    pub status: Option<WireCode>,
    #[serde(deserialize_with = "flexible_opt_id")]
    pub detalhe_id: Option<String>,
    #[serde(deserialize_with = "lenient_opt_list")]
    pub ferramentas: Option<Vec<RelatedItemApi>>,
    #[serde(deserialize_with = "lenient_opt_list")]
    pub responsaveis: Option<Vec<RelatedItemApi>>,
    #[serde(deserialize_with = "lenient_opt_list")]
    pub documentos: Option<Vec<RelatedItemApi>>,
    // Só preenchido por GET /processos/:id/hierarquia
    #[serde(deserialize_with = "lenient_opt_list")]
    pub sub_processos: Option<Vec<ProcessoApiResponse>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DetalhesApiResponse {
    #[serde(alias = "detalheId", deserialize_with = "flexible_opt_id")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub responsaveis: Vec<RelatedItemApi>,
    #[serde(deserialize_with = "lenient_list")]
    pub ferramentas: Vec<RelatedItemApi>,
    #[serde(deserialize_with = "lenient_list")]
    pub documentos: Vec<RelatedItemApi>,
}

// --- Requisições ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessoApiRequest {
    pub nome: String,
    pub descricao: String,
    pub tipo: u8,
    pub status: u8,
    // Omitidos quando ausentes: o backend diferencia "não informado" de `null`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processo_pai_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedItemRequest {
    pub nome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descricao: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_ids_and_missing_fields_are_tolerated() {
        let raw: ProcessoApiResponse = serde_json::from_value(json!({
            "id": 42,
            "nome": "Compras",
            "areaId": 7,
            "processoPaiId": "",
            "descricao": null,
            "tipo": 1.5,
            "status": null
        }))
        .unwrap();

        assert_eq!(raw.id, "42");
        assert_eq!(raw.area_id, "7");
        assert_eq!(raw.processo_pai_id, None);
        assert_eq!(raw.descricao, "");
        assert!(matches!(raw.tipo, Some(WireCode::Other(_))));
        assert_eq!(raw.status, None);
    }

    #[test]
    fn one_malformed_record_does_not_sink_the_list() {
        let raws: Vec<ProcessoApiResponse> = serde_json::from_value(json!([
            { "id": 1, "nome": "Compras", "areaNome": "Suprimentos" },
            {
                "id": 2.5,
                "nome": 123,
                "descricao": ["x"],
                "areaId": true,
                "areaNome": false,
                "processoPaiId": {},
                "ferramentas": "SAP",
                "responsaveis": [7, { "id": "r1", "nome": "Ana" }],
                "subProcessos": { "id": "c" }
            }
        ]))
        .unwrap();

        assert_eq!(raws.len(), 2);
        assert_eq!(raws[0].area_nome.as_deref(), Some("Suprimentos"));

        let ruim = &raws[1];
        assert_eq!(ruim.id, "2.5");
        assert_eq!((ruim.nome.as_str(), ruim.descricao.as_str(), ruim.area_id.as_str()), ("", "", ""));
        assert_eq!(ruim.area_nome, None);
        assert_eq!(ruim.processo_pai_id, None);
        assert!(ruim.ferramentas.is_none());
        assert!(ruim.sub_processos.is_none());
        let responsaveis = ruim.responsaveis.as_ref().unwrap();
        assert_eq!(responsaveis.len(), 1);
        assert_eq!(responsaveis[0].nome.as_deref(), Some("Ana"));
    }

    #[test]
    fn nested_hierarchy_is_read_recursively() {
        let raw: ProcessoApiResponse = serde_json::from_value(json!({
            "id": "r",
            "subProcessos": [
                { "id": "a", "subProcessos": [ { "id": "a1" } ] },
                { "id": "b" }
            ]
        }))
        .unwrap();

        let filhos = raw.sub_processos.unwrap();
        assert_eq!(filhos.len(), 2);
        assert_eq!(filhos[0].sub_processos.as_ref().unwrap()[0].id, "a1");
        assert!(filhos[1].sub_processos.is_none());
    }

    #[test]
    fn related_item_name_may_come_nested() {
        let item: RelatedItemApi = serde_json::from_value(json!({
            "id": "f1",
            "ferramentaId": "x",
            "ferramenta": { "nome": "SAP", "descricao": "ERP" }
        }))
        .unwrap();

        assert_eq!(item.nome, None);
        assert_eq!(item.entidade.unwrap().nome.as_deref(), Some("SAP"));
    }

    #[test]
    fn absent_relations_are_omitted_from_requests() {
        let body = serde_json::to_value(ProcessoApiRequest {
            nome: "n".into(),
            descricao: "d".into(),
            tipo: 0,
            status: 2,
            area_id: None,
            processo_pai_id: None,
        })
        .unwrap();

        assert_eq!(body, json!({ "nome": "n", "descricao": "d", "tipo": 0, "status": 2 }));
    }
}
