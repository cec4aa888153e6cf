//! V1 batch handler: `POST /` and `POST /v1`.
//!
//! The simple protocol: execute every statement in order, return one result
//! per statement. There is no stream and no per-statement error isolation:
//! the first failure turns the whole response into `{"error": …}` with 400,
//! and the successful prefix is not returned.

use crate::handlers::params::v1_params_to_args;
use crate::models::{BatchRequestBody, V1BatchEntry, V1Statement};
use actix_web::{web, HttpResponse};
use hranad_core::executor::StmtArgs;
use hranad_core::StatementExecutor;
use log::debug;
use serde_json::json;
use std::sync::Arc;

pub async fn batch_v1(
    executor: web::Data<Arc<StatementExecutor>>,
    body: web::Bytes,
) -> HttpResponse {
    let request: BatchRequestBody = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(err) => {
            return HttpResponse::BadRequest().json(json!({
                "error": format!("Invalid request body: {}", err)
            }));
        },
    };

    debug!("v1 batch: {} statement(s)", request.statements.len());

    let mut entries = Vec::with_capacity(request.statements.len());
    for statement in &request.statements {
        let (sql, args) = match split_statement(statement) {
            Ok(parts) => parts,
            Err(message) => return HttpResponse::BadRequest().json(json!({ "error": message })),
        };
        match executor.execute(sql, &args) {
            Ok(result) => entries.push(V1BatchEntry::from_result(&result)),
            Err(err) => return HttpResponse::BadRequest().json(json!({ "error": err.to_string() })),
        }
    }

    HttpResponse::Ok().json(entries)
}

fn split_statement(statement: &V1Statement) -> Result<(&str, StmtArgs), String> {
    match statement {
        V1Statement::Sql(sql) => Ok((sql, StmtArgs::default())),
        V1Statement::Parameterized { q, params } => Ok((q, v1_params_to_args(params.as_ref())?)),
    }
}
