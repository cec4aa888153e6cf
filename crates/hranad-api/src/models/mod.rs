//! Wire models for all three protocol versions.

mod batch_request;
mod batch_response;
mod pipeline_request;
mod pipeline_response;
mod stmt_result;

pub use batch_request::{BatchRequestBody, V1Params, V1Statement};
pub use batch_response::{V1BatchEntry, V1ResultSet};
pub use pipeline_request::{Batch, BatchCond, BatchStep, NamedArg, NamedArgs, PipelineRequestBody, Stmt, StreamRequest};
pub use pipeline_response::{
    BatchResult, DescribeCol, DescribeParam, DescribeResponse, ErrorBody, PipelineResponseBody, StreamResponse,
    StreamResult,
};
pub use stmt_result::stmt_result_to_json;
