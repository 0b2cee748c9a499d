//! HTTP methods, partitioned by whether a request payload is expected.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseMethodError;

/// Whether a method carries a request payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodClass {
    WithBody,
    WithoutBody,
}

/// Standard HTTP request methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Options,
    Head,
    Connect,
    Trace,
}

/// Methods that send a request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyMethod {
    Post,
    Put,
    Patch,
}

/// Methods that never send a request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodylessMethod {
    Get,
    Delete,
    Options,
    Head,
    Connect,
    Trace,
}

impl Method {
    pub const ALL: [Method; 9] = [
        Method::Get,
        Method::Post,
        Method::Put,
        Method::Patch,
        Method::Delete,
        Method::Options,
        Method::Head,
        Method::Connect,
        Method::Trace,
    ];

    /// Upper-case wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Options => "OPTIONS",
            Method::Head => "HEAD",
            Method::Connect => "CONNECT",
            Method::Trace => "TRACE",
        }
    }

    pub fn class(self) -> MethodClass {
        match self {
            Method::Post | Method::Put | Method::Patch => MethodClass::WithBody,
            _ => MethodClass::WithoutBody,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = ParseMethodError;

    /// Parse a method name, ignoring ASCII case.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(input))
            .ok_or_else(|| ParseMethodError(input.to_string()))
    }
}

impl From<BodyMethod> for Method {
    fn from(method: BodyMethod) -> Self {
        match method {
            BodyMethod::Post => Method::Post,
            BodyMethod::Put => Method::Put,
            BodyMethod::Patch => Method::Patch,
        }
    }
}

impl From<BodylessMethod> for Method {
    fn from(method: BodylessMethod) -> Self {
        match method {
            BodylessMethod::Get => Method::Get,
            BodylessMethod::Delete => Method::Delete,
            BodylessMethod::Options => Method::Options,
            BodylessMethod::Head => Method::Head,
            BodylessMethod::Connect => Method::Connect,
            BodylessMethod::Trace => Method::Trace,
        }
    }
}

impl TryFrom<Method> for BodyMethod {
    type Error = Method;

    fn try_from(method: Method) -> Result<Self, Self::Error> {
        match method {
            Method::Post => Ok(BodyMethod::Post),
            Method::Put => Ok(BodyMethod::Put),
            Method::Patch => Ok(BodyMethod::Patch),
            other => Err(other),
        }
    }
}

impl TryFrom<Method> for BodylessMethod {
    type Error = Method;

    fn try_from(method: Method) -> Result<Self, Self::Error> {
        match method {
            Method::Get => Ok(BodylessMethod::Get),
            Method::Delete => Ok(BodylessMethod::Delete),
            Method::Options => Ok(BodylessMethod::Options),
            Method::Head => Ok(BodylessMethod::Head),
            Method::Connect => Ok(BodylessMethod::Connect),
            Method::Trace => Ok(BodylessMethod::Trace),
            other => Err(other),
        }
    }
}
