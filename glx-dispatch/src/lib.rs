use std::fmt;

mod table;
pub use table::{req, DescriptorError, RequestSpec, RequestTable, REQUEST_LIST, RESERVED_REQUESTS};
pub mod generate;
pub use generate::{dispatch_function, program};

/// How a generated dispatch function finds the vendor that handles a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// The member is a screen index, bounds-checked against `screenInfo.numScreens`.
    Screen,
    /// The member is a context tag, looked up per client.
    ContextTag,
    /// The member is an XID, looked up in the shared XID map.
    Xid,
}

impl Method {
    /// Error returned when no vendor is found and the table row names none.
    /// XID lookups have no default: every such request must pick its own error.
    pub fn default_error(self) -> Option<&'static str> {
        match self {
            Method::Screen => Some("BadMatch"),
            Method::ContextTag => Some("GLXBadContextTag"),
            Method::Xid => None,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Screen => "SCREEN",
            Method::ContextTag => "TAG",
            Method::Xid => "XID",
        })
    }
}

/// An X error code. GLX errors are offsets from the extension's error base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCode {
    Core(String),
    Glx(String),
}

impl ErrorCode {
    pub fn new(name: &str) -> ErrorCode {
        if name.starts_with("GLX") {
            ErrorCode::Glx(name.to_string())
        } else {
            ErrorCode::Core(name.to_string())
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ErrorCode::Core(name) | ErrorCode::Glx(name) => name,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::Core(name) => f.write_str(name),
            ErrorCode::Glx(name) => write!(f, "__glXerrorBase + {name}"),
        }
    }
}

/// A validated table row. Built through [`RequestDescriptor::new`] or
/// [`RequestTable::build`]; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    name: String,
    method: Method,
    member: String,
    error: ErrorCode,
    add_xid: Option<String>,
    remove_xid: Option<String>,
    request_struct: String,
}

impl RequestDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn method(&self) -> Method {
        self.method
    }
    pub fn member(&self) -> &str {
        &self.member
    }
    pub fn error(&self) -> &ErrorCode {
        &self.error
    }
    pub fn add_xid(&self) -> Option<&str> {
        self.add_xid.as_deref()
    }
    pub fn remove_xid(&self) -> Option<&str> {
        self.remove_xid.as_deref()
    }
    pub fn request_struct(&self) -> &str {
        &self.request_struct
    }

    /// Opcode symbol from `glxproto.h`.
    pub fn opcode(&self) -> String {
        format!("X_GLX{}", self.name)
    }

    pub fn function_name(&self) -> String {
        format!("dispatch_{}", self.name)
    }
}

/// Builds the compiled-in GLX table and renders the whole C source file.
pub fn gen_dispatch_source() -> Result<String, DescriptorError> {
    let table = RequestTable::glx()?;
    Ok(program(&table))
}
