//! Shared fixtures for integration tests
//!
//! Catalog: users -> roles (many-to-one), roles -> members (one-to-many),
//! plus an `audit_events` entity with no text, enum or integer fields.

#![allow(dead_code)]

use filterdsl::executor::{Dataset, ExecutionResult, QueryExecutor};
use filterdsl::planner::{CompiledPlan, QueryCompiler, QueryRequest};
use filterdsl::schema::SchemaCatalog;
use serde_json::{json, Value};

pub const CATALOG_JSON: &str = r#"{
  "entities": [
    {
      "entity": "roles",
      "fields": [
        {"name": "id", "kind": "integer"},
        {"name": "name", "kind": "text"}
      ],
      "relationships": [
        {"name": "members", "target": "users", "local_key": "id", "remote_key": "role_id"}
      ]
    },
    {
      "entity": "users",
      "fields": [
        {"name": "id", "kind": "integer"},
        {"name": "name", "kind": "text"},
        {"name": "email", "kind": "text"},
        {"name": "age", "kind": "integer"},
        {"name": "is_active", "kind": "boolean"},
        {"name": "status", "kind": "enum"},
        {"name": "role_id", "kind": "integer"},
        {"name": "created_at", "kind": "temporal"},
        {"name": "attributes", "kind": "document"}
      ],
      "relationships": [
        {"name": "role", "target": "roles", "local_key": "role_id", "remote_key": "id"}
      ]
    },
    {
      "entity": "audit_events",
      "fields": [
        {"name": "archived", "kind": "boolean"},
        {"name": "happened_at", "kind": "temporal"},
        {"name": "payload", "kind": "document"}
      ]
    }
  ]
}"#;

pub fn catalog() -> SchemaCatalog {
    SchemaCatalog::from_json(CATALOG_JSON).unwrap()
}

pub fn roles() -> Vec<Value> {
    vec![
        json!({"id": 1, "name": "admin"}),
        json!({"id": 2, "name": "user"}),
        json!({"id": 3, "name": "manager"}),
    ]
}

/// Five users. `created_at` values sit on the edges of 2024-03-01.
pub fn users() -> Vec<Value> {
    vec![
        json!({
            "id": 1, "name": "Alice", "email": "alice@example.com", "age": 30,
            "is_active": true, "status": "active", "role_id": 1,
            "created_at": "2024-03-01T00:00:00",
            "attributes": {"hair": "Brown", "score": 90, "tags": ["vip"]}
        }),
        json!({
            "id": 2, "name": "Bob", "email": "bob@example.com", "age": 25,
            "is_active": false, "status": "inactive", "role_id": 2,
            "created_at": "2024-03-01T12:30:00",
            "attributes": {"hair": "brown", "score": "high"}
        }),
        json!({
            "id": 3, "name": "Carol", "email": "carol@example.org", "age": 41,
            "is_active": true, "status": "active", "role_id": 3,
            "created_at": "2024-03-01T23:59:59",
            "attributes": {"hair": "Black", "score": 85, "joined": "2024-03-01"}
        }),
        json!({
            "id": 4, "name": "Dave", "email": "dave@example.com", "age": 35,
            "is_active": true, "status": "active", "role_id": null,
            "created_at": "2024-02-29T23:59:59",
            "attributes": {"score": 95, "joined": "2023-11-20"}
        }),
        json!({
            "id": 5, "name": "Eve", "email": "eve@example.net", "age": 28,
            "is_active": false, "status": "pending", "role_id": 1,
            "created_at": "2024-03-02T00:00:00",
            "attributes": null
        }),
    ]
}

pub fn audit_events() -> Vec<Value> {
    vec![
        json!({"archived": false, "happened_at": "2024-01-01T10:00:00", "payload": {"n": 2024}}),
        json!({"archived": true, "happened_at": "2024-01-02T10:00:00", "payload": {}}),
    ]
}

pub fn dataset() -> Dataset {
    Dataset::new()
        .with_rows("roles", roles())
        .unwrap()
        .with_rows("users", users())
        .unwrap()
        .with_rows("audit_events", audit_events())
        .unwrap()
}

pub fn compile(catalog: &SchemaCatalog, entity: &str, request: &QueryRequest) -> CompiledPlan {
    QueryCompiler::new(catalog, entity)
        .unwrap()
        .compile(request)
        .unwrap()
}

pub fn run(entity: &str, request: QueryRequest) -> ExecutionResult {
    let catalog = catalog();
    let dataset = dataset();
    let plan = compile(&catalog, entity, &request);
    QueryExecutor::new(&dataset).execute(&plan).unwrap()
}

pub fn ids(result: &ExecutionResult) -> Vec<i64> {
    result
        .column("id")
        .iter()
        .map(|v| v.as_i64().unwrap())
        .collect()
}

pub fn run_filters(entity: &str, filters: Value) -> ExecutionResult {
    run(entity, QueryRequest::new().with_filters(filters.to_string()))
}
