//! OpenAPI document for the test strip API.

use utoipa::OpenApi;

use crate::error::ErrorResponse;
use stripscan_core::models::{
    PageInfo, Paginated, SubmissionListItem, SubmissionResponse, SubmissionStatus,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::upload_test_strip,
        crate::handlers::list_test_strips,
        crate::handlers::get_test_strip,
        crate::handlers::health_check,
    ),
    components(schemas(
        SubmissionResponse,
        SubmissionListItem,
        SubmissionStatus,
        PageInfo,
        Paginated<SubmissionListItem>,
        ErrorResponse,
    )),
    tags(
        (name = "test-strips", description = "Test strip submission endpoints"),
        (name = "health", description = "Service health")
    ),
    info(
        title = "Stripscan API",
        description = "Test strip photo ingestion and classification service"
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document_builds() {
        let doc = ApiDoc::openapi();
        let json = doc.to_json().unwrap();
        assert!(json.contains("/api/test-strips/upload"));
        assert!(json.contains("/api/test-strips/{id}"));
        assert!(json.contains("/health"));
    }
}
