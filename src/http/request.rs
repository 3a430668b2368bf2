use std::ops::{Deref, DerefMut};

use tokio::io::{AsyncRead, BufReader};

use super::{FirstLine, Headers, HttpCommon, HttpProtocol, HttpResult};

#[derive(Debug, Clone)]
pub struct HttpRequest(HttpProtocol);

impl HttpRequest {
    pub async fn read_from<T>(stream: &mut BufReader<T>) -> HttpResult<HttpRequest>
    where
        T: Unpin,
        T: AsyncRead,
    {
        Ok(HttpRequest(HttpProtocol::read_from(stream).await?))
    }

    /// Creates a new [`HttpRequest`].
    pub fn new(method: &str, uri: &str, version: &str) -> Self {
        Self(HttpProtocol::new(
            FirstLine::new(method, uri, version),
            Headers::default(),
            Vec::new(),
        ))
    }

    /// Returns a reference to the get method of this [`HttpRequest`].
    pub fn get_method(&self) -> &str {
        self.first_line.get_first()
    }

    /// Returns a reference to the get uri of this [`HttpRequest`].
    pub fn get_uri(&self) -> &str {
        self.first_line.get_second()
    }

    /// Returns a reference to the get version of this [`HttpRequest`].
    pub fn get_version(&self) -> &str {
        self.first_line.get_third()
    }
}

impl HttpCommon for HttpRequest {
    fn protocol(&self) -> &HttpProtocol {
        &self.0
    }

    fn protocol_mut(&mut self) -> &mut HttpProtocol {
        &mut self.0
    }
}

impl Deref for HttpRequest {
    type Target = HttpProtocol;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for HttpRequest {
    fn deref_mut(&mut self) -> &mut HttpProtocol {
        &mut self.0
    }
}
