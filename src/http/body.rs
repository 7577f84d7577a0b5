//! Response bodies returned by applications.

use bytes::Bytes;

/// One piece of a response body. Text is encoded as UTF-8 on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chunk {
    Text(String),
    Bytes(Bytes),
}

impl Chunk {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Chunk::Text(text) => text.as_bytes(),
            Chunk::Bytes(bytes) => bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<&str> for Chunk {
    fn from(text: &str) -> Self {
        Chunk::Text(text.to_string())
    }
}

impl From<String> for Chunk {
    fn from(text: String) -> Self {
        Chunk::Text(text)
    }
}

impl From<Vec<u8>> for Chunk {
    fn from(bytes: Vec<u8>) -> Self {
        Chunk::Bytes(Bytes::from(bytes))
    }
}

impl From<&'static [u8]> for Chunk {
    fn from(bytes: &'static [u8]) -> Self {
        Chunk::Bytes(Bytes::from_static(bytes))
    }
}

impl From<Bytes> for Chunk {
    fn from(bytes: Bytes) -> Self {
        Chunk::Bytes(bytes)
    }
}

/// The sequence of chunks an application returns.
///
/// Iteration may fail part way through; the gateway then abandons the
/// response and closes the connection.
pub struct Body {
    chunks: Box<dyn Iterator<Item = anyhow::Result<Chunk>> + Send>,
}

impl Body {
    pub fn empty() -> Self {
        Self::from_fallible(std::iter::empty())
    }

    /// A body made of infallible chunks.
    pub fn from_chunks<I, C>(chunks: I) -> Self
    where
        I: IntoIterator<Item = C>,
        I::IntoIter: Send + 'static,
        C: Into<Chunk>,
    {
        Self::from_fallible(chunks.into_iter().map(|chunk| Ok(chunk.into())))
    }

    /// A body whose iteration can fail.
    pub fn from_fallible<I>(chunks: I) -> Self
    where
        I: IntoIterator<Item = anyhow::Result<Chunk>>,
        I::IntoIter: Send + 'static,
    {
        Self {
            chunks: Box::new(chunks.into_iter()),
        }
    }
}

impl Iterator for Body {
    type Item = anyhow::Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        self.chunks.next()
    }
}

impl std::fmt::Debug for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Body").finish_non_exhaustive()
    }
}

impl From<&'static str> for Body {
    fn from(text: &'static str) -> Self {
        Body::from_chunks([text])
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::from_chunks([text])
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Body::from_chunks([bytes])
    }
}
