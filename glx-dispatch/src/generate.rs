//! C source emitters for the generated GLX dispatch functions.
//!
//! Every emitter appends to a `String`, so rendering can't fail once a
//! [`RequestDescriptor`] has been validated.

use crate::{Method, RequestDescriptor, RequestTable};
use std::fmt::Write;

macro_rules! emitln {
    ($($t:tt)*) => {{
        writeln!($($t)*).unwrap()
    }};
}

/// Includes and symbol fixups placed ahead of the generated functions.
pub const PREAMBLE: &str = include_str!("preamble.c");

/// Renders the dispatch function for one request.
pub fn dispatch_function(desc: &RequestDescriptor) -> String {
    let mut g = String::new();
    gen_dispatch_function(&mut g, desc);
    g
}

/// Renders the whole C file: preamble, one function per request in table
/// order, then `GENERATED_DISPATCH_LIST`.
pub fn program(table: &RequestTable) -> String {
    let mut g = String::from(PREAMBLE);
    for desc in table {
        gen_dispatch_function(&mut g, desc);
        emitln!(g);
    }
    gen_dispatch_list(&mut g, table);
    g
}

fn gen_dispatch_function(
    g: &mut String,
    RequestDescriptor { name, method, member, error, add_xid, remove_xid, request_struct }: &RequestDescriptor,
) {
    emitln!(g, "static int dispatch_{name}(ClientPtr client)");
    emitln!(g, "{{");
    emitln!(g, "    REQUEST({request_struct});");
    emitln!(g, "    CARD32 {member} = __glXCheckSwap(client, stuff->{member});");
    emitln!(g, "    __GLXServerVendor *vendor = NULL;");
    // A new XID has to be free before any vendor sees the request.
    if let Some(add) = add_xid {
        emitln!(g, "    CARD32 {add} = __glXCheckSwap(client, stuff->{add});");
        emitln!(g, "    LEGAL_NEW_RESOURCE({add}, client);");
    }
    gen_vendor_lookup(g, *method, member);

    emitln!(g, "    if (vendor != NULL) {{");
    // The vendor may rewrite the request buffer, so read the XID first.
    if let Some(remove) = remove_xid.as_ref().filter(|remove| *remove != member) {
        emitln!(g, "        CARD32 {remove} = __glXCheckSwap(client, stuff->{remove});");
    }
    emitln!(g, "        int ret;");
    if let Some(add) = add_xid {
        emitln!(g, "        if (!__glXvendorExports.addXIDMap({add}, vendor)) {{");
        emitln!(g, "            return BadAlloc;");
        emitln!(g, "        }}");
    }
    emitln!(g, "        ret = __glXvendorExports.forwardRequest(vendor, client);");
    if let Some(add) = add_xid {
        emitln!(g, "        if (ret != Success) {{");
        emitln!(g, "            __glXvendorExports.removeXIDMap({add});");
        emitln!(g, "        }}");
    }
    if let Some(remove) = remove_xid {
        emitln!(g, "        if (ret == Success) {{");
        emitln!(g, "            __glXvendorExports.removeXIDMap({remove});");
        emitln!(g, "        }}");
    }
    emitln!(g, "        return ret;");
    emitln!(g, "    }} else {{");
    emitln!(g, "        client->errorValue = {member};");
    emitln!(g, "        return {error};");
    emitln!(g, "    }}");
    emitln!(g, "}}");
}

fn gen_vendor_lookup(g: &mut String, method: Method, member: &str) {
    match method {
        Method::Screen => {
            emitln!(g, "    if ({member} < screenInfo.numScreens) {{");
            emitln!(
                g,
                "        vendor = __glXvendorExports.getVendorForScreen(client, screenInfo.screens[{member}]);"
            );
            emitln!(g, "    }}");
        }
        Method::Xid => emitln!(g, "    vendor = __glXvendorExports.getXIDMap({member});"),
        Method::ContextTag => {
            emitln!(g, "    vendor = __glXvendorExports.getContextTag(client, {member});")
        }
    }
}

fn gen_dispatch_list(g: &mut String, table: &RequestTable) {
    emitln!(g, "const __GLXGeneratedDispatchFunc GENERATED_DISPATCH_LIST[] = {{");
    for desc in table {
        emitln!(g, "    {{ {}, {} }},", desc.opcode(), desc.function_name());
    }
    emitln!(g, "    {{ -1, NULL }}");
    emitln!(g, "}};");
}
