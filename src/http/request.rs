use std::fmt;

/// HTTP request methods.
///
/// Only `GET` has behaviour of its own. Everything else is carried through
/// so it can be logged, and is answered as not found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    GET,
    HEAD,
    POST,
    PUT,
    DELETE,
    OPTIONS,
    PATCH,
    /// Any other token, kept verbatim.
    Other(String),
}

impl Method {
    /// Parses a method token. Case-sensitive, as in HTTP.
    ///
    /// # Example
    ///
    /// ```
    /// # use gatehouse::http::request::Method;
    /// assert_eq!(Method::from_token("GET"), Method::GET);
    /// assert_eq!(Method::from_token("get"), Method::Other("get".to_string()));
    /// ```
    pub fn from_token(s: &str) -> Self {
        match s {
            "GET" => Method::GET,
            "HEAD" => Method::HEAD,
            "POST" => Method::POST,
            "PUT" => Method::PUT,
            "DELETE" => Method::DELETE,
            "OPTIONS" => Method::OPTIONS,
            "PATCH" => Method::PATCH,
            other => Method::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::OPTIONS => "OPTIONS",
            Method::PATCH => "PATCH",
            Method::Other(s) => s,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The first line of a request: `METHOD SP target SP version`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRequestLine {
    pub method: Method,
    /// Request-target exactly as sent, query included.
    pub target: String,
    pub version: String,
}

impl ParsedRequestLine {
    /// The request-target with any query string or fragment removed.
    ///
    /// ```
    /// # use gatehouse::http::request::{Method, ParsedRequestLine};
    /// let line = ParsedRequestLine {
    ///     method: Method::GET,
    ///     target: "/docs/a.txt?lang=en".to_string(),
    ///     version: "HTTP/1.1".to_string(),
    /// };
    /// assert_eq!(line.path(), "/docs/a.txt");
    /// ```
    pub fn path(&self) -> &str {
        self.target
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
    }
}
