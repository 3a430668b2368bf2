use tokio::io::{
    self, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader,
};

use super::{FirstLine, Headers, HttpError, HttpResult};

/// Read a group of lines ending with an empty line from a BufReader.
async fn read_lines<T>(stream: &mut BufReader<T>) -> HttpResult<Vec<String>>
where
    T: Unpin,
    T: AsyncRead,
{
    let mut lines: Vec<String> = Vec::new();
    let mut buf = String::new();
    loop {
        // The `buf` memory space is reused, so it must be cleared each time it is used.
        buf.clear();

        // Normally, the `read` method will wait for any bytes received, so zero bytes read indicate an EOF received.
        if stream.read_line(&mut buf).await? == 0 {
            return Err(HttpError::ClosedByPeer);
        }

        // The `read_line` retains separator characters such as CR or LF at the end, which should be trimmed.
        let s = buf.trim_end();

        // If an empty line is received.
        if s.is_empty() {
            // And it is the first line of the current context, ignore it and continue reading the next line.
            // otherwise, finish reading and return read lines.
            if lines.is_empty() {
                continue;
            } else {
                break;
            }
        }

        lines.push(String::from(s));
    }
    Ok(lines)
}

/// Read a chunked body, trailers are consumed and dropped.
async fn read_chunked<T>(stream: &mut BufReader<T>, buf: &mut Vec<u8>) -> HttpResult<u64>
where
    T: Unpin,
    T: AsyncRead,
{
    let mut total = 0u64;
    let mut line = String::new();
    loop {
        line.clear();
        if stream.read_line(&mut line).await? == 0 {
            return Err(HttpError::ClosedByPeer);
        }

        // Chunk extensions after ';' are ignored.
        let size = line.trim_end().split(';').next().unwrap_or("").trim();
        let len = u64::from_str_radix(size, 16)
            .map_err(|_| HttpError::InvalidChunk(size.to_string()))?;

        if len == 0 {
            // Trailer section ends with an empty line.
            loop {
                line.clear();
                if stream.read_line(&mut line).await? == 0 || line.trim_end().is_empty() {
                    return Ok(total);
                }
            }
        }

        let read = (&mut *stream).take(len).read_to_end(buf).await? as u64;
        if read < len {
            return Err(HttpError::ClosedByPeer);
        }
        total += len;

        // Every chunk is followed by CRLF.
        line.clear();
        stream.read_line(&mut line).await?;
    }
}

/// Read payload as a Vec<u8>.
///
/// Without chunked encoding or Content-Length, a body that `until_close` allows runs until the
/// peer closes the stream, otherwise it is empty.
async fn read_payload<T>(
    stream: &mut BufReader<T>,
    headers: &Headers,
    buf: &mut Vec<u8>,
    until_close: bool,
) -> HttpResult<u64>
where
    T: Unpin,
    T: AsyncRead,
{
    if headers.has_token("Transfer-Encoding", "chunked") {
        return read_chunked(stream, buf).await;
    }

    // Get the Content-Length field.
    if let Some(value) = headers.get_header("Content-Length") {
        // Parse it into a integer.
        let len = value
            .parse::<u64>()
            .map_err(|_| HttpError::InvalidContentLength(value.to_string()))?;
        if len > 0 {
            let read = (&mut *stream).take(len).read_to_end(buf).await? as u64;
            if read < len {
                return Err(HttpError::ClosedByPeer);
            }
        }
        return Ok(len);
    }

    if until_close {
        return Ok(stream.read_to_end(buf).await? as u64);
    }

    Ok(0)
}

pub trait HttpCommon: Sized {
    fn protocol(&self) -> &HttpProtocol;

    fn protocol_mut(&mut self) -> &mut HttpProtocol;

    /// Get HTTP headers
    fn get_headers(&self) -> &Headers {
        &self.protocol().headers
    }

    /// Get the payload.
    fn get_payload(&self) -> &Vec<u8> {
        &self.protocol().payload
    }

    /// Append a raw header line such as "Connection: close".
    fn add_header(mut self, line: &str) -> Self {
        self.protocol_mut().headers.push(line);
        self
    }

    fn add_header_kv(self, key: &str, value: &str) -> Self {
        self.add_header(&format!("{}: {}", key, value))
    }

    fn add_header_option(self, line: &Option<String>) -> Self {
        match line {
            Some(v) => self.add_header(v),
            None => self,
        }
    }

    /// Append bytes to the payload and keep Content-Length in sync.
    fn add_payload(mut self, bytes: &[u8]) -> Self {
        let protocol = self.protocol_mut();
        protocol.payload.extend_from_slice(bytes);
        let len = protocol.payload.len().to_string();
        protocol.headers.set("Content-Length", &len);
        self
    }
}

#[derive(Debug, Clone)]
pub struct HttpProtocol {
    pub first_line: FirstLine,
    pub headers: Headers,
    pub payload: Vec<u8>,
}

impl HttpProtocol {
    pub fn new(
        first_line: FirstLine,
        headers: impl Into<Headers>,
        payload: Vec<u8>,
    ) -> HttpProtocol {
        HttpProtocol {
            first_line,
            headers: headers.into(),
            payload,
        }
    }

    pub async fn read_from<T>(stream: &mut BufReader<T>) -> HttpResult<HttpProtocol>
    where
        T: Unpin,
        T: AsyncRead,
    {
        let mut pl = Self::read_header_from(stream).await?;

        // A request without framing headers has no body.
        pl.read_payload_from(stream, false).await?;

        Ok(pl)
    }

    /// Read the body announced by the headers already parsed into `self`.
    pub(crate) async fn read_payload_from<T>(
        &mut self,
        stream: &mut BufReader<T>,
        until_close: bool,
    ) -> HttpResult<u64>
    where
        T: Unpin,
        T: AsyncRead,
    {
        read_payload(stream, &self.headers, &mut self.payload, until_close).await
    }

    pub(crate) async fn read_header_from<T>(stream: &mut BufReader<T>) -> HttpResult<HttpProtocol>
    where
        T: Unpin,
        T: AsyncRead,
    {
        // Read HTTP header lines.
        let mut lines = read_lines(stream).await?;

        // Try to parse HTTP first line.
        let first_line: FirstLine = lines.remove(0).try_into()?;

        // Create headers (The first line has remove above).
        let headers: Headers = lines.into();

        Ok(HttpProtocol::new(first_line, headers, Vec::new()))
    }

    /// Write all data to an AsyncWrite
    pub async fn write_to<T>(&self, w: &mut T) -> io::Result<()>
    where
        T: Unpin,
        T: AsyncWrite,
    {
        self.first_line.write_to(w).await?;
        self.headers.write_to(w).await?;
        w.write_all(b"\r\n").await?;
        if !self.payload.is_empty() {
            w.write_all(&self.payload).await?;
        }
        Ok(())
    }
}

impl HttpCommon for HttpProtocol {
    fn protocol(&self) -> &HttpProtocol {
        self
    }

    fn protocol_mut(&mut self) -> &mut HttpProtocol {
        self
    }
}
