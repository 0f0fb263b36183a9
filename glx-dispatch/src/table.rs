use crate::{ErrorCode, Method, RequestDescriptor};
use log::debug;
use std::collections::HashSet;
use thiserror::Error;

/// Requests dispatched by hand-written code in the server module. Their
/// lookups don't fit any [`Method`], so they can never be table rows.
pub const RESERVED_REQUESTS: &[&str] = &[
    "MakeCurrent",
    "QueryVersion",
    "CopyContext",
    "SwapBuffers",
    "VendorPrivate",
    "VendorPrivateWithReply",
    "ClientInfo",
    "MakeContextCurrent",
    "SetClientInfoARB",
    "SetConfigInfo2ARB",
];

/// Names the generated function body declares itself.
const GENERATED_LOCALS: &[&str] = &["client", "stuff", "vendor", "ret"];

/// An unvalidated table row, usable in `const` context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestSpec {
    name: &'static str,
    method: Method,
    member: &'static str,
    error: Option<&'static str>,
    add_xid: Option<&'static str>,
    remove_xid: Option<&'static str>,
    request_struct: Option<&'static str>,
}

pub const fn req(name: &'static str, method: Method, member: &'static str) -> RequestSpec {
    RequestSpec {
        name,
        method,
        member,
        error: None,
        add_xid: None,
        remove_xid: None,
        request_struct: None,
    }
}

impl RequestSpec {
    pub const fn error(self, error: &'static str) -> Self {
        Self { error: Some(error), ..self }
    }
    /// Field holding an XID the request creates.
    pub const fn add_xid(self, field: &'static str) -> Self {
        Self { add_xid: Some(field), ..self }
    }
    /// Field holding an XID the request destroys.
    pub const fn remove_xid(self, field: &'static str) -> Self {
        Self { remove_xid: Some(field), ..self }
    }
    pub const fn request_struct(self, name: &'static str) -> Self {
        Self { request_struct: Some(name), ..self }
    }
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

pub const REQUEST_LIST: &[RequestSpec] = &[
    req("Render", Method::ContextTag, "contextTag"),
    req("RenderLarge", Method::ContextTag, "contextTag"),
    req("CreateContext", Method::Screen, "screen").add_xid("context"),
    req("DestroyContext", Method::Xid, "context").error("GLXBadContext").remove_xid("context"),
    req("WaitGL", Method::ContextTag, "contextTag"),
    req("WaitX", Method::ContextTag, "contextTag"),
    req("UseXFont", Method::ContextTag, "contextTag"),
    req("CreateGLXPixmap", Method::Screen, "screen").add_xid("glxpixmap"),
    req("GetVisualConfigs", Method::Screen, "screen"),
    req("DestroyGLXPixmap", Method::Xid, "glxpixmap").error("GLXBadPixmap"),
    req("QueryExtensionsString", Method::Screen, "screen"),
    req("QueryServerString", Method::Screen, "screen"),
    req("ChangeDrawableAttributes", Method::Xid, "drawable").error("BadDrawable"),
    req("CreateNewContext", Method::Screen, "screen").add_xid("context"),
    req("CreatePbuffer", Method::Screen, "screen").add_xid("pbuffer"),
    req("CreatePixmap", Method::Screen, "screen").add_xid("glxpixmap"),
    req("CreateWindow", Method::Screen, "screen").add_xid("glxwindow"),
    req("CreateContextAttribsARB", Method::Screen, "screen").add_xid("context"),
    req("DestroyPbuffer", Method::Xid, "pbuffer").error("GLXBadPbuffer").remove_xid("pbuffer"),
    req("DestroyPixmap", Method::Xid, "glxpixmap").error("GLXBadPixmap").remove_xid("glxpixmap"),
    req("DestroyWindow", Method::Xid, "glxwindow").error("GLXBadWindow").remove_xid("glxwindow"),
    req("GetDrawableAttributes", Method::Xid, "drawable").error("BadDrawable"),
    req("GetFBConfigs", Method::Screen, "screen"),
    req("QueryContext", Method::Xid, "context").error("GLXBadContext"),
    req("IsDirect", Method::Xid, "context").error("GLXBadContext"),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    #[error("request {name}: addXid field `{field}` is also the lookup member")]
    AddXidIsMember { name: String, field: String },
    #[error("request {name}: `{field}` is both the addXid and the removeXid field")]
    AddXidIsRemoveXid { name: String, field: String },
    #[error("request {name}: {method} lookups need an explicit error code")]
    MissingErrorCode { name: String, method: Method },
    #[error("request {name}: reserved for hand-written dispatch")]
    Reserved { name: String },
    #[error("request {name}: listed more than once")]
    Duplicate { name: String },
    #[error("request {name}: {what} `{value}` is not a C identifier")]
    InvalidIdentifier { name: String, what: &'static str, value: String },
    #[error("request {name}: {what} `{value}` shadows a local of the dispatch function")]
    ShadowsLocal { name: String, what: &'static str, value: String },
}

fn is_c_ident(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn check_ident(name: &str, what: &'static str, value: &str) -> Result<(), DescriptorError> {
    if is_c_ident(value) {
        return Ok(());
    }
    Err(DescriptorError::InvalidIdentifier {
        name: name.to_string(),
        what,
        value: value.to_string(),
    })
}

fn check_field(name: &str, what: &'static str, value: &str) -> Result<(), DescriptorError> {
    check_ident(name, what, value)?;
    if GENERATED_LOCALS.contains(&value) {
        return Err(DescriptorError::ShadowsLocal {
            name: name.to_string(),
            what,
            value: value.to_string(),
        });
    }
    Ok(())
}

impl RequestDescriptor {
    pub fn new(spec: &RequestSpec) -> Result<RequestDescriptor, DescriptorError> {
        let RequestSpec { name, method, member, error, add_xid, remove_xid, request_struct } =
            *spec;

        check_ident(name, "request name", name)?;
        if RESERVED_REQUESTS.contains(&name) {
            return Err(DescriptorError::Reserved { name: name.to_string() });
        }
        check_field(name, "member field", member)?;
        if let Some(field) = add_xid {
            check_field(name, "addXid field", field)?;
        }
        if let Some(field) = remove_xid {
            check_field(name, "removeXid field", field)?;
        }
        if let Some(error) = error {
            check_ident(name, "error code", error)?;
        }
        if let Some(request_struct) = request_struct {
            check_ident(name, "request struct", request_struct)?;
        }

        if add_xid == Some(member) {
            return Err(DescriptorError::AddXidIsMember {
                name: name.to_string(),
                field: member.to_string(),
            });
        }
        if let (Some(add), Some(remove)) = (add_xid, remove_xid) {
            if add == remove {
                return Err(DescriptorError::AddXidIsRemoveXid {
                    name: name.to_string(),
                    field: add.to_string(),
                });
            }
        }
        let Some(error) = error.or(method.default_error()) else {
            return Err(DescriptorError::MissingErrorCode { name: name.to_string(), method });
        };

        Ok(RequestDescriptor {
            name: name.to_string(),
            method,
            member: member.to_string(),
            error: ErrorCode::new(error),
            add_xid: add_xid.map(str::to_string),
            remove_xid: remove_xid.map(str::to_string),
            request_struct: match request_struct {
                Some(s) => s.to_string(),
                None => format!("xGLX{name}Req"),
            },
        })
    }
}

/// The ordered, validated set of requests that get generated dispatch functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTable {
    requests: Vec<RequestDescriptor>,
}

impl RequestTable {
    /// Validates every row in order and stops at the first bad one.
    pub fn build(specs: &[RequestSpec]) -> Result<RequestTable, DescriptorError> {
        let mut seen = HashSet::with_capacity(specs.len());
        let mut requests = Vec::with_capacity(specs.len());
        for spec in specs {
            let desc = RequestDescriptor::new(spec)?;
            if !seen.insert(spec.name) {
                return Err(DescriptorError::Duplicate { name: desc.name });
            }
            debug!(
                "request {}: {} lookup on {}, error {}",
                desc.name, desc.method, desc.member, desc.error
            );
            requests.push(desc);
        }
        Ok(RequestTable { requests })
    }

    /// The compiled-in GLX table.
    pub fn glx() -> Result<RequestTable, DescriptorError> {
        Self::build(REQUEST_LIST)
    }

    pub fn requests(&self) -> &[RequestDescriptor] {
        &self.requests
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

impl<'t> IntoIterator for &'t RequestTable {
    type Item = &'t RequestDescriptor;
    type IntoIter = std::slice::Iter<'t, RequestDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.requests.iter()
    }
}
