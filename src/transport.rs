//! Pluggable request execution.

use async_trait::async_trait;

use crate::error::TransportError;

/// Executes a prepared request, the default one is [`reqwest::Client`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// # Errors
    ///
    /// When the request could not be sent or the response head could not be received.
    async fn execute(
        &self,
        request: http::Request<()>,
    ) -> Result<http::Response<Box<dyn Body>>, TransportError>;
}

/// Streamed response body, released on drop.
#[async_trait]
pub trait Body: Send {
    /// Pull the next chunk, `None` marks the end of the body.
    ///
    /// # Errors
    ///
    /// When the stream breaks midway.
    async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, TransportError>;
}

#[async_trait]
impl Transport for reqwest::Client {
    async fn execute(
        &self,
        request: http::Request<()>,
    ) -> Result<http::Response<Box<dyn Body>>, TransportError> {
        let (parts, ()) = request.into_parts();
        // The URL carries the credentials, keep them out of the error messages.
        let response = self
            .request(parts.method, parts.uri.to_string())
            .headers(parts.headers)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;
        let status = response.status();
        let mut wrapped = http::Response::new(Box::new(response) as Box<dyn Body>);
        *wrapped.status_mut() = status;
        Ok(wrapped)
    }
}

#[async_trait]
impl Body for reqwest::Response {
    async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
        Ok(Self::chunk(self).await.map_err(reqwest::Error::without_url)?.map(Vec::from))
    }
}

/// Buffers the body so that its head can be inspected before the full read.
pub struct PeekableBody {
    inner: Box<dyn Body>,
    buffer: Vec<u8>,
    is_exhausted: bool,
}

impl PeekableBody {
    pub fn new(inner: Box<dyn Body>) -> Self {
        Self { inner, buffer: Vec::new(), is_exhausted: false }
    }

    /// Return up to `n` leading bytes without consuming them.
    pub async fn peek(&mut self, n: usize) -> Result<&[u8], TransportError> {
        while self.buffer.len() < n && !self.is_exhausted {
            self.pull().await?;
        }
        Ok(&self.buffer[..n.min(self.buffer.len())])
    }

    /// Read the entire body, including the already peeked bytes.
    pub async fn read_to_end(mut self) -> Result<Vec<u8>, TransportError> {
        while !self.is_exhausted {
            self.pull().await?;
        }
        Ok(self.buffer)
    }

    async fn pull(&mut self) -> Result<(), TransportError> {
        match self.inner.next_chunk().await? {
            Some(chunk) => self.buffer.extend_from_slice(&chunk),
            None => self.is_exhausted = true,
        }
        Ok(())
    }
}
