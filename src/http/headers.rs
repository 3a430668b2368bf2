use tokio::io::{self, AsyncWrite, AsyncWriteExt};

/// Raw header lines in the order they were received or added.
#[derive(Debug, Clone, Default)]
pub struct Headers(Vec<String>);

impl From<Vec<String>> for Headers {
    fn from(value: Vec<String>) -> Self {
        Self(value)
    }
}

impl FromIterator<String> for Headers {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Headers {
    type Item = String;

    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

fn split_line<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let p = line.find(':')?;
    if line[..p].trim().eq_ignore_ascii_case(key) {
        Some(line[p + 1..].trim())
    } else {
        None
    }
}

impl Headers {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Get the value of the first header named `key` (case-insensitive).
    pub fn get_header(&self, key: &str) -> Option<&str> {
        self.0.iter().find_map(|l| split_line(l, key))
    }

    /// Whether the comma separated header `key` lists `token` (case-insensitive).
    pub fn has_token(&self, key: &str, token: &str) -> bool {
        self.0
            .iter()
            .filter_map(|l| split_line(l, key))
            .flat_map(|v| v.split(','))
            .any(|t| t.trim().eq_ignore_ascii_case(token))
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.0.push(line.into());
    }

    /// Replace every header named `key` with a single `key: value` line.
    pub fn set(&mut self, key: &str, value: &str) {
        while self.remove(key).is_some() {}
        self.0.push(format!("{}: {}", key, value));
    }

    /// Remove the first header named `key` and return the whole line.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.0.iter().position(|l| split_line(l, key).is_some())?;
        Some(self.0.remove(index))
    }

    /// Write all lines to an AsyncWrite
    pub async fn write_to<T: AsyncWrite + Unpin>(&self, w: &mut T) -> io::Result<()> {
        for line in &self.0 {
            w.write_all(line.as_bytes()).await?;
            w.write_all(b"\r\n").await?;
        }
        Ok(())
    }
}
