mod todo;

pub use todo::*;
use utoipa::OpenApi;

/// Collects the schemas of every DTO so they show up in the generated OpenAPI document
#[derive(OpenApi)]
#[openapi(components(
    schemas(NewTodo, TodoItem, TodoStatusMessage, ErrorMessage)
))]
pub struct OpenApiSchemas;
