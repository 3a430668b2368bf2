use std::ops::{Deref, DerefMut};

use tokio::io::{AsyncRead, BufReader};

use super::{FirstLine, Headers, HttpCommon, HttpProtocol, HttpResult};

#[derive(Debug, Clone)]
pub struct HttpResponse(HttpProtocol);

impl HttpResponse {
    pub async fn read_from<T>(stream: &mut BufReader<T>) -> HttpResult<HttpResponse>
    where
        T: Unpin,
        T: AsyncRead,
    {
        Self::read_reply_from(stream, "GET").await
    }

    /// Read the response to a request sent with `method`.
    ///
    /// Responses to HEAD and 1xx, 204 and 304 responses never carry a body, whatever their
    /// headers say. Any other response without a length runs until the peer closes.
    pub async fn read_reply_from<T>(
        stream: &mut BufReader<T>,
        method: &str,
    ) -> HttpResult<HttpResponse>
    where
        T: Unpin,
        T: AsyncRead,
    {
        let mut res = Self::read_header_from(stream).await?;
        if !method.eq_ignore_ascii_case("HEAD") && res.has_body() {
            res.0.read_payload_from(stream, true).await?;
        }
        Ok(res)
    }

    /// Read only the header section, leaving the payload in the stream.
    pub async fn read_header_from<T>(stream: &mut BufReader<T>) -> HttpResult<HttpResponse>
    where
        T: Unpin,
        T: AsyncRead,
    {
        Ok(HttpResponse(HttpProtocol::read_header_from(stream).await?))
    }

    /// Creates a new [`HttpResponse`].
    pub fn new(status: u16, text: &str, version: &str) -> Self {
        Self(HttpProtocol::new(
            FirstLine::new(version, &status.to_string(), text),
            Headers::default(),
            Vec::new(),
        ))
    }

    /// Returns a reference to the get version of this [`HttpResponse`].
    pub fn get_version(&self) -> &str {
        self.first_line.get_first()
    }

    /// Returns the get status of this [`HttpResponse`].
    pub fn get_status(&self) -> u16 {
        self.first_line.get_second().parse().unwrap_or_default()
    }

    /// Returns a reference to the get text of this [`HttpResponse`].
    pub fn get_text(&self) -> &str {
        self.first_line.get_third()
    }

    fn has_body(&self) -> bool {
        !matches!(self.get_status(), 100..=199 | 204 | 304)
    }
}

impl HttpCommon for HttpResponse {
    fn protocol(&self) -> &HttpProtocol {
        &self.0
    }

    fn protocol_mut(&mut self) -> &mut HttpProtocol {
        &mut self.0
    }
}

impl Deref for HttpResponse {
    type Target = HttpProtocol;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for HttpResponse {
    fn deref_mut(&mut self) -> &mut HttpProtocol {
        &mut self.0
    }
}
