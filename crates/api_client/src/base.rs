use std::fmt;

use url::Url;

use crate::error::{ClientError, Result};

/// Port the landing API listens on locally when the page URL carries none.
pub const DEFAULT_LOCAL_PORT: u16 = 8081;

/// The address of the page a component acts for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLocation {
    url: Url,
}

impl PageLocation {
    pub fn parse(raw: &str) -> Result<Self> {
        let url = Url::parse(raw)?;
        Ok(Self { url })
    }

    pub fn hostname(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    /// Explicit port only; `None` when the scheme default applies.
    pub fn port(&self) -> Option<u16> {
        self.url.port()
    }

    pub fn origin(&self) -> Result<String> {
        let origin = self.url.origin();
        if !origin.is_tuple() {
            return Err(ClientError::OpaqueOrigin(self.url.to_string()));
        }
        Ok(origin.ascii_serialization())
    }

    fn is_local(&self) -> bool {
        matches!(self.hostname(), "localhost" | "127.0.0.1")
    }
}

/// Root every endpoint path is joined onto. Always stored with a trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiBase {
    root: Url,
}

impl ApiBase {
    pub fn parse(raw: &str) -> Result<Self> {
        let mut raw = raw.trim_end_matches('/').to_string();
        raw.push('/');
        Ok(Self { root: Url::parse(&raw)? })
    }

    /// `{origin}/api`, used by pages that call relative `/api/...` paths.
    pub fn same_origin(location: &PageLocation) -> Result<Self> {
        Self::parse(&format!("{}/api", location.origin()?))
    }

    /// Local hostnames talk to `http://localhost:<port>/api` directly; anything
    /// else goes through `{origin}/api`.
    pub fn for_landing(location: &PageLocation) -> Result<Self> {
        if location.is_local() {
            let port = location.port().unwrap_or(DEFAULT_LOCAL_PORT);
            return Self::parse(&format!("http://localhost:{port}/api"));
        }
        Self::same_origin(location)
    }

    pub fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.root.join(path.trim_start_matches('/'))?)
    }
}

impl fmt::Display for ApiBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.root.as_str().trim_end_matches('/'))
    }
}
