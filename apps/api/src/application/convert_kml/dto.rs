use bytes::Bytes;

/// One uploaded file, owned by the request that carried it.
#[derive(Debug, Clone)]
pub struct ConvertKmlRequest {
    pub filename: Option<String>,
    pub content: Bytes,
}
