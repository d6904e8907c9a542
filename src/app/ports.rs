use crate::error::Result;
use crate::storage::Frame;
use async_trait::async_trait;

// Fetch-side port
#[async_trait]
pub trait HttpClientPort: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpGetResult>;
}

#[derive(Clone, Debug)]
pub struct HttpGetResult {
    pub status: u16,
    pub body: String,
}

impl HttpGetResult {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// Sink-side port
pub trait TabularSink: Send + Sync {
    /// Appends `frame` to `table`, creating the table on first use. With
    /// `use_row_index` the frame's index is written as the leading column.
    fn append(&self, table: &str, frame: &Frame, use_row_index: bool) -> Result<()>;
}
