use utoipa::OpenApi;

pub mod todo;

pub use todo::*;

use crate::routing_utils::{BasicErrorResponse, ExtraInfo, ValidationErrorSchema};

/// Shared schemas which show up across the API's operations
#[derive(OpenApi)]
#[openapi(components(schemas(BasicErrorResponse, ExtraInfo, ValidationErrorSchema)))]
pub struct OpenApiSchemas;
