//! Hrana pipeline engine: `POST /v2/pipeline` and `POST /v3/pipeline`.
//!
//! A pipeline checks one stream out of the registry, evaluates its requests
//! in order, and checks the stream back in under a rotated baton. Failures
//! are isolated per request: a failed slot is tagged `error` and later
//! requests still run.

use crate::handlers::params::{decode_named, decode_positional};
use crate::models::{
    stmt_result_to_json, Batch, BatchCond, BatchResult, DescribeCol, DescribeParam, DescribeResponse, ErrorBody,
    PipelineRequestBody, PipelineResponseBody, Stmt, StreamRequest, StreamResponse, StreamResult,
};
use actix_web::{web, HttpResponse};
use hranad_commons::ProtocolVersion;
use hranad_core::executor::StmtArgs;
use hranad_core::{StatementExecutor, Stream, StreamRegistry};
use log::debug;
use serde_json::json;
use std::sync::Arc;

pub async fn pipeline_v2(
    executor: web::Data<Arc<StatementExecutor>>,
    registry: web::Data<Arc<StreamRegistry>>,
    body: web::Bytes,
) -> HttpResponse {
    run_pipeline(&executor, &registry, &body, ProtocolVersion::V2)
}

pub async fn pipeline_v3(
    executor: web::Data<Arc<StatementExecutor>>,
    registry: web::Data<Arc<StreamRegistry>>,
    body: web::Bytes,
) -> HttpResponse {
    run_pipeline(&executor, &registry, &body, ProtocolVersion::V3)
}

fn run_pipeline(
    executor: &StatementExecutor,
    registry: &StreamRegistry,
    body: &[u8],
    version: ProtocolVersion,
) -> HttpResponse {
    let request: PipelineRequestBody = match serde_json::from_slice(body) {
        Ok(request) => request,
        Err(err) => {
            return HttpResponse::BadRequest().json(json!({
                "error": format!("Invalid request body: {}", err)
            }));
        },
    };

    // Consumes the presented baton; a concurrent pipeline racing on the same
    // baton finds nothing and fails here.
    let mut stream = match registry.checkout(request.baton.as_deref()) {
        Ok(stream) => stream,
        Err(err) => return HttpResponse::BadRequest().json(json!({ "error": err.to_string() })),
    };

    debug!("{} pipeline: {} request(s)", version, request.requests.len());

    let mut results = Vec::with_capacity(request.requests.len());
    let mut close_requested = false;
    for stream_request in request.requests {
        if matches!(stream_request, StreamRequest::Close) {
            // The stream dies after this pipeline; remaining requests still run.
            close_requested = true;
            results.push(StreamResult::ok(StreamResponse::Close));
            continue;
        }
        match handle_request(executor, &mut stream, version, stream_request) {
            Ok(response) => results.push(StreamResult::ok(response)),
            Err(message) => results.push(StreamResult::error(message)),
        }
    }

    let baton = if close_requested { None } else { Some(registry.checkin(stream)) };
    HttpResponse::Ok().json(PipelineResponseBody { baton, base_url: None, results })
}

fn handle_request(
    executor: &StatementExecutor,
    stream: &mut Stream,
    version: ProtocolVersion,
    request: StreamRequest,
) -> Result<StreamResponse, String> {
    match request {
        StreamRequest::Execute { stmt } => {
            let (sql, args) = prepare_stmt(stream, &stmt)?;
            let result = executor.execute(&sql, &args).map_err(|err| err.to_string())?;
            Ok(StreamResponse::Execute { result: stmt_result_to_json(&result, version) })
        },
        StreamRequest::Batch { batch } => eval_batch(executor, stream, version, &batch),
        StreamRequest::Sequence { sql, sql_id } => {
            let sql = resolve_sql(stream, sql.as_deref(), sql_id)?;
            executor.run_script(&sql).map_err(|err| err.to_string())?;
            Ok(StreamResponse::Sequence)
        },
        StreamRequest::Describe { sql, sql_id } => {
            let sql = resolve_sql(stream, sql.as_deref(), sql_id)?;
            let describe = executor.describe(&sql).map_err(|err| err.to_string())?;
            Ok(StreamResponse::Describe {
                result: DescribeResponse {
                    params: describe.params.into_iter().map(|name| DescribeParam { name }).collect(),
                    cols: describe
                        .cols
                        .into_iter()
                        .map(|col| DescribeCol { name: col.name, decltype: col.decltype })
                        .collect(),
                    is_explain: describe.is_explain,
                    is_readonly: describe.is_readonly,
                },
            })
        },
        StreamRequest::StoreSql { sql_id, sql } => {
            stream.store_sql(sql_id, sql);
            Ok(StreamResponse::StoreSql)
        },
        StreamRequest::CloseSql { sql_id } => {
            stream.close_sql(sql_id);
            Ok(StreamResponse::CloseSql)
        },
        // The backend runs every statement in its own implicit transaction.
        StreamRequest::GetAutocommit => Ok(StreamResponse::GetAutocommit { is_autocommit: true }),
        // Handled by the pipeline loop before dispatch.
        StreamRequest::Close => Ok(StreamResponse::Close),
    }
}

/// Evaluate batch steps in order, tracking per-step outcomes for conditions.
///
/// A skipped step records null in both parallel arrays and counts as neither
/// ok nor error for later conditions.
fn eval_batch(
    executor: &StatementExecutor,
    stream: &mut Stream,
    version: ProtocolVersion,
    batch: &Batch,
) -> Result<StreamResponse, String> {
    #[derive(Clone, Copy, PartialEq)]
    enum StepOutcome {
        Ok,
        Error,
        Skipped,
    }

    fn eval_cond(cond: &BatchCond, outcomes: &[StepOutcome]) -> bool {
        match cond {
            BatchCond::Ok { step } => outcomes.get(*step) == Some(&StepOutcome::Ok),
            BatchCond::Error { step } => outcomes.get(*step) == Some(&StepOutcome::Error),
            BatchCond::Not { cond } => !eval_cond(cond, outcomes),
        }
    }

    let mut step_results = Vec::with_capacity(batch.steps.len());
    let mut step_errors = Vec::with_capacity(batch.steps.len());
    let mut outcomes = Vec::with_capacity(batch.steps.len());

    for step in &batch.steps {
        let should_run = step.condition.as_ref().map_or(true, |cond| eval_cond(cond, &outcomes));
        if !should_run {
            step_results.push(serde_json::Value::Null);
            step_errors.push(None);
            outcomes.push(StepOutcome::Skipped);
            continue;
        }

        let executed = prepare_stmt(stream, &step.stmt)
            .and_then(|(sql, args)| executor.execute(&sql, &args).map_err(|err| err.to_string()));
        match executed {
            Ok(result) => {
                step_results.push(stmt_result_to_json(&result, version));
                step_errors.push(None);
                outcomes.push(StepOutcome::Ok);
            },
            Err(message) => {
                step_results.push(serde_json::Value::Null);
                step_errors.push(Some(ErrorBody { message }));
                outcomes.push(StepOutcome::Error);
            },
        }
    }

    Ok(StreamResponse::Batch { result: BatchResult { step_results, step_errors } })
}

/// Resolve a statement's SQL text and decode its arguments.
fn prepare_stmt(stream: &Stream, stmt: &Stmt) -> Result<(String, StmtArgs), String> {
    let sql = resolve_sql(stream, stmt.sql.as_deref(), stmt.sql_id)?;
    let positional = decode_positional(&stmt.args)?;
    let named = match &stmt.named_args {
        Some(named_args) => decode_named(named_args)?,
        None => Vec::new(),
    };
    Ok((sql, StmtArgs { positional, named }))
}

/// Exactly one of `sql`/`sql_id` must be present; `sql_id` must be stored on
/// this stream.
fn resolve_sql(stream: &Stream, sql: Option<&str>, sql_id: Option<i32>) -> Result<String, String> {
    match (sql, sql_id) {
        (Some(_), Some(_)) => Err("Statement cannot have both `sql` and `sql_id`".to_string()),
        (Some(sql), None) => Ok(sql.to_string()),
        (None, Some(sql_id)) => stream
            .stored_sql(sql_id)
            .map(str::to_string)
            .ok_or_else(|| format!("SQL text {} is not stored on this stream", sql_id)),
        (None, None) => Err("Statement requires either `sql` or `sql_id`".to_string()),
    }
}
