// tests/common/mod.rs
//
// Backend falso da API de processos, em memória, servido por axum em 127.0.0.1:0.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use serde_json::{Value, json};
use uuid::Uuid;

use gestao_processos::{AppConfig, AppState};

pub const RELACOES: [&str; 3] = ["responsaveis", "ferramentas", "documentos"];

#[derive(Debug, Clone)]
pub struct ProcessoRow {
    pub id: String,
    pub nome: String,
    pub descricao: String,
    pub area_id: Option<u64>,
    pub processo_pai_id: Option<String>,
    pub tipo: i64,
    pub status: i64,
}

#[derive(Debug, Clone)]
pub struct ItemRow {
    pub id: String,
    pub processo_id: String,
    pub relacao: String,
    pub nome: String,
    pub descricao: Option<String>,
}

#[derive(Default)]
pub struct FakeDb {
    next_area: u64,
    pub areas: Vec<(u64, String)>,
    pub processos: Vec<ProcessoRow>,
    pub itens: Vec<ItemRow>,
    // Chaves de simulação
    pub subprocessos_fora_do_ar: bool,
    pub relacao_com_falha: Option<String>,
    pub enums_como_texto: bool,
    pub hits: HashMap<String, usize>,
    pub ultimo_post_processo: Option<Value>,
}

type Shared = Arc<Mutex<FakeDb>>;
type Reply = Result<(StatusCode, Json<Value>), StatusCode>;

const TIPOS: [&str; 2] = ["Manual", "Sistêmico"];
const STATUS: [&str; 5] = ["Implementado", "Em Implementação", "Planejado", "Problemático", "Obsoleto"];

impl FakeDb {
    fn hit(&mut self, route: &str) {
        *self.hits.entry(route.to_string()).or_default() += 1;
    }

    pub fn hits(&self, route: &str) -> usize {
        self.hits.get(route).copied().unwrap_or(0)
    }

    pub fn add_area(&mut self, nome: &str) -> u64 {
        self.next_area += 1;
        self.areas.push((self.next_area, nome.to_string()));
        self.next_area
    }

    pub fn add_processo(&mut self, nome: &str, area_id: Option<u64>, pai: Option<&str>) -> String {
        let id = Uuid::new_v4().to_string();
        self.processos.push(ProcessoRow {
            id: id.clone(),
            nome: nome.to_string(),
            descricao: format!("Descrição de {nome}"),
            area_id,
            processo_pai_id: pai.map(str::to_string),
            tipo: 0,
            status: 2,
        });
        id
    }

    pub fn processo(&self, id: &str) -> Option<&ProcessoRow> {
        self.processos.iter().find(|p| p.id == id)
    }

    pub fn itens_de(&self, processo_id: &str, relacao: &str) -> Vec<String> {
        self.itens
            .iter()
            .filter(|i| i.processo_id == processo_id && i.relacao == relacao)
            .map(|i| i.nome.clone())
            .collect()
    }

    fn item_json(&self, item: &ItemRow) -> Value {
        let mut value = json!({ "id": item.id, "nome": item.nome });
        if let Some(descricao) = &item.descricao {
            value["descricao"] = json!(descricao);
        }
        // responsáveis vêm sem processoDetalheId, como em versões antigas da API
        if item.relacao != "responsaveis" {
            value["processoDetalheId"] = json!(format!("det-{}", item.processo_id));
        }
        value
    }

    fn itens_json(&self, processo_id: &str, relacao: &str) -> Value {
        Value::Array(
            self.itens
                .iter()
                .filter(|i| i.processo_id == processo_id && i.relacao == relacao)
                .map(|i| self.item_json(i))
                .collect(),
        )
    }

    fn processo_json(&self, row: &ProcessoRow) -> Value {
        let area_nome = row
            .area_id
            .and_then(|a| self.areas.iter().find(|(id, _)| *id == a))
            .map(|(_, nome)| nome.clone());

        let (tipo, status) = if self.enums_como_texto {
            (json!(TIPOS[row.tipo as usize]), json!(STATUS[row.status as usize]))
        } else {
            (json!(row.tipo), json!(row.status))
        };

        json!({
            "id": row.id,
            "nome": row.nome,
            "descricao": row.descricao,
            "areaId": row.area_id,
            "areaNome": area_nome,
            "processoPaiId": row.processo_pai_id,
            "tipo": tipo,
            "status": status,
            "detalheId": format!("det-{}", row.id),
            "responsaveis": self.itens_json(&row.id, "responsaveis"),
            "ferramentas": self.itens_json(&row.id, "ferramentas"),
            "documentos": self.itens_json(&row.id, "documentos"),
        })
    }

    fn arvore_json(&self, row: &ProcessoRow) -> Value {
        let mut value = self.processo_json(row);
        value["subProcessos"] = Value::Array(
            self.processos
                .iter()
                .filter(|p| p.processo_pai_id.as_deref() == Some(row.id.as_str()))
                .map(|p| self.arvore_json(p))
                .collect(),
        );
        value
    }

    // Exclusão em cascata: filhos e itens vão junto
    fn remover_processo(&mut self, id: &str) {
        let filhos: Vec<String> = self
            .processos
            .iter()
            .filter(|p| p.processo_pai_id.as_deref() == Some(id))
            .map(|p| p.id.clone())
            .collect();
        for filho in filhos {
            self.remover_processo(&filho);
        }
        self.processos.retain(|p| p.id != id);
        self.itens.retain(|i| i.processo_id != id);
    }
}

fn lock(db: &Shared) -> MutexGuard<'_, FakeDb> {
    db.lock().unwrap()
}

fn ok(value: Value) -> Reply {
    Ok((StatusCode::OK, Json(value)))
}

fn bad_request(message: &str) -> Reply {
    Ok((StatusCode::BAD_REQUEST, Json(json!({ "message": message }))))
}

fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// --- Áreas ---

async fn list_areas(State(db): State<Shared>) -> Reply {
    let mut db = lock(&db);
    db.hit("GET /areas");
    ok(Value::Array(db.areas.iter().map(|(id, nome)| json!({ "id": id, "nome": nome })).collect()))
}

async fn create_area(State(db): State<Shared>, Json(body): Json<Value>) -> Reply {
    let mut db = lock(&db);
    let Some(nome) = body["nome"].as_str().filter(|n| !n.trim().is_empty()) else {
        return bad_request("nome é obrigatório");
    };
    let id = db.add_area(nome);
    Ok((StatusCode::CREATED, Json(json!({ "id": id, "nome": nome }))))
}

async fn get_area(State(db): State<Shared>, Path(id): Path<u64>) -> Reply {
    let db = lock(&db);
    match db.areas.iter().find(|(a, _)| *a == id) {
        Some((id, nome)) => ok(json!({ "id": id, "nome": nome })),
        None => Err(StatusCode::NOT_FOUND),
    }
}

async fn update_area(State(db): State<Shared>, Path(id): Path<u64>, Json(body): Json<Value>) -> Result<StatusCode, StatusCode> {
    let mut db = lock(&db);
    let nome = body["nome"].as_str().unwrap_or_default().to_string();
    match db.areas.iter_mut().find(|(a, _)| *a == id) {
        Some(area) => {
            area.1 = nome;
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(StatusCode::NOT_FOUND),
    }
}

async fn delete_area(State(db): State<Shared>, Path(id): Path<u64>) -> StatusCode {
    let mut db = lock(&db);
    db.hit("DELETE /areas");
    db.areas.retain(|(a, _)| *a != id);
    StatusCode::NO_CONTENT
}

async fn list_area_processos(State(db): State<Shared>, Path(id): Path<u64>) -> Reply {
    let mut db = lock(&db);
    db.hit("GET /areas/:id/processos");
    ok(Value::Array(
        db.processos
            .iter()
            .filter(|p| p.area_id == Some(id))
            .map(|p| db.processo_json(p))
            .collect(),
    ))
}

// --- Processos ---

async fn list_processos(State(db): State<Shared>) -> Reply {
    let mut db = lock(&db);
    db.hit("GET /processos");
    ok(Value::Array(db.processos.iter().map(|p| db.processo_json(p)).collect()))
}

async fn create_processo(State(db): State<Shared>, Json(body): Json<Value>) -> Reply {
    let mut db = lock(&db);
    db.hit("POST /processos");
    db.ultimo_post_processo = Some(body.clone());

    let (Some(nome), Some(tipo), Some(status)) = (body["nome"].as_str(), body["tipo"].as_i64(), body["status"].as_i64()) else {
        return bad_request("nome, tipo e status são obrigatórios");
    };
    let id = Uuid::new_v4().to_string();
    db.processos.push(ProcessoRow {
        id: id.clone(),
        nome: nome.to_string(),
        descricao: body["descricao"].as_str().unwrap_or_default().to_string(),
        area_id: id_text(&body["areaId"]).and_then(|a| a.parse().ok()),
        processo_pai_id: id_text(&body["processoPaiId"]),
        tipo,
        status,
    });
    let row = db.processos.last().cloned().unwrap();
    Ok((StatusCode::CREATED, Json(db.processo_json(&row))))
}

async fn get_processo(State(db): State<Shared>, Path(id): Path<String>) -> Reply {
    let mut db = lock(&db);
    db.hit("GET /processos/:id");
    match db.processo(&id).cloned() {
        Some(row) => ok(db.processo_json(&row)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

async fn update_processo(State(db): State<Shared>, Path(id): Path<String>, Json(body): Json<Value>) -> Result<StatusCode, StatusCode> {
    let mut db = lock(&db);
    let Some(row) = db.processos.iter_mut().find(|p| p.id == id) else {
        return Err(StatusCode::NOT_FOUND);
    };
    if let Some(nome) = body["nome"].as_str() {
        row.nome = nome.to_string();
    }
    if let Some(descricao) = body["descricao"].as_str() {
        row.descricao = descricao.to_string();
    }
    if let Some(tipo) = body["tipo"].as_i64() {
        row.tipo = tipo;
    }
    if let Some(status) = body["status"].as_i64() {
        row.status = status;
    }
    if let Some(area) = id_text(&body["areaId"]) {
        row.area_id = area.parse().ok();
    }
    if let Some(pai) = id_text(&body["processoPaiId"]) {
        row.processo_pai_id = Some(pai);
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_processo(State(db): State<Shared>, Path(id): Path<String>) -> StatusCode {
    let mut db = lock(&db);
    if db.processo(&id).is_none() {
        return StatusCode::NOT_FOUND;
    }
    db.remover_processo(&id);
    StatusCode::NO_CONTENT
}

async fn list_subprocessos(State(db): State<Shared>, Path(id): Path<String>) -> Reply {
    let mut db = lock(&db);
    db.hit("GET /processos/:id/subprocessos");
    if db.subprocessos_fora_do_ar {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    ok(Value::Array(
        db.processos
            .iter()
            .filter(|p| p.processo_pai_id.as_deref() == Some(id.as_str()))
            .map(|p| db.processo_json(p))
            .collect(),
    ))
}

async fn get_hierarquia(State(db): State<Shared>, Path(id): Path<String>) -> Reply {
    let mut db = lock(&db);
    db.hit("GET /processos/:id/hierarquia");
    match db.processo(&id).cloned() {
        Some(row) => ok(db.arvore_json(&row)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

// --- Detalhes ---

async fn get_detalhes(State(db): State<Shared>, Path(id): Path<String>) -> Reply {
    let mut db = lock(&db);
    db.hit("GET /processos/:id/detalhes");
    if db.processo(&id).is_none() {
        return Err(StatusCode::NOT_FOUND);
    }
    ok(json!({
        "detalheId": format!("det-{id}"),
        "responsaveis": db.itens_json(&id, "responsaveis"),
        "ferramentas": db.itens_json(&id, "ferramentas"),
        "documentos": db.itens_json(&id, "documentos"),
    }))
}

async fn add_item(State(db): State<Shared>, Path((id, relacao)): Path<(String, String)>, Json(body): Json<Value>) -> Reply {
    let mut db = lock(&db);
    db.hit(&format!("POST /processos/:id/detalhes/{relacao}"));
    if !RELACOES.contains(&relacao.as_str()) || db.processo(&id).is_none() {
        return Err(StatusCode::NOT_FOUND);
    }
    if db.relacao_com_falha.as_deref() == Some(relacao.as_str()) {
        return Ok((StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "falha simulada" }))));
    }
    let item = ItemRow {
        id: Uuid::new_v4().to_string(),
        processo_id: id,
        relacao,
        nome: body["nome"].as_str().unwrap_or_default().to_string(),
        descricao: body["descricao"].as_str().map(str::to_string),
    };
    let value = db.item_json(&item);
    db.itens.push(item);
    Ok((StatusCode::CREATED, Json(value)))
}

async fn remove_item(State(db): State<Shared>, Path((id, relacao, item_id)): Path<(String, String, String)>) -> StatusCode {
    let mut db = lock(&db);
    db.hit(&format!("DELETE /processos/:id/detalhes/{relacao}"));
    let antes = db.itens.len();
    db.itens
        .retain(|i| !(i.id == item_id && i.processo_id == id && i.relacao == relacao));
    if db.itens.len() == antes { StatusCode::NOT_FOUND } else { StatusCode::NO_CONTENT }
}

fn router(db: Shared) -> Router {
    Router::new()
        .route("/areas", get(list_areas).post(create_area))
        .route("/areas/{id}", get(get_area).put(update_area).delete(delete_area))
        .route("/areas/{id}/processos", get(list_area_processos))
        .route("/processos", get(list_processos).post(create_processo))
        .route("/processos/{id}", get(get_processo).put(update_processo).delete(delete_processo))
        .route("/processos/{id}/subprocessos", get(list_subprocessos))
        .route("/processos/{id}/hierarquia", get(get_hierarquia))
        .route("/processos/{id}/detalhes", get(get_detalhes))
        .route("/processos/{id}/detalhes/{relacao}", post(add_item))
        .route("/processos/{id}/detalhes/{relacao}/{item_id}", delete(remove_item))
        .with_state(db)
}

pub struct FakeBackend {
    pub base_url: String,
    pub db: Shared,
}

impl FakeBackend {
    pub async fn spawn() -> Self {
        let db: Shared = Arc::new(Mutex::new(FakeDb::default()));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(db.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self { base_url: format!("http://{addr}"), db }
    }

    pub fn db(&self) -> MutexGuard<'_, FakeDb> {
        lock(&self.db)
    }

    pub fn config(&self) -> AppConfig {
        AppConfig { api_base_url: self.base_url.clone(), ..AppConfig::default() }
    }

    pub fn state(&self) -> AppState {
        AppState::new(self.config()).unwrap()
    }
}
