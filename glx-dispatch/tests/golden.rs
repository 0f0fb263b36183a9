use glx_dispatch::{dispatch_function, program, req, Method, RequestDescriptor, RequestTable};
use pretty_assertions::assert_eq;

fn glx_request(name: &str) -> RequestDescriptor {
    let table = RequestTable::glx().expect("GLX table is valid");
    table.requests().iter().find(|d| d.name() == name).cloned().expect(name)
}

#[test]
fn destroy_context() {
    let expected = r#"static int dispatch_DestroyContext(ClientPtr client)
{
    REQUEST(xGLXDestroyContextReq);
    CARD32 context = __glXCheckSwap(client, stuff->context);
    __GLXServerVendor *vendor = NULL;
    vendor = __glXvendorExports.getXIDMap(context);
    if (vendor != NULL) {
        int ret;
        ret = __glXvendorExports.forwardRequest(vendor, client);
        if (ret == Success) {
            __glXvendorExports.removeXIDMap(context);
        }
        return ret;
    } else {
        client->errorValue = context;
        return __glXerrorBase + GLXBadContext;
    }
}
"#;
    assert_eq!(dispatch_function(&glx_request("DestroyContext")), expected);
}

#[test]
fn create_context() {
    let expected = r#"static int dispatch_CreateContext(ClientPtr client)
{
    REQUEST(xGLXCreateContextReq);
    CARD32 screen = __glXCheckSwap(client, stuff->screen);
    __GLXServerVendor *vendor = NULL;
    CARD32 context = __glXCheckSwap(client, stuff->context);
    LEGAL_NEW_RESOURCE(context, client);
    if (screen < screenInfo.numScreens) {
        vendor = __glXvendorExports.getVendorForScreen(client, screenInfo.screens[screen]);
    }
    if (vendor != NULL) {
        int ret;
        if (!__glXvendorExports.addXIDMap(context, vendor)) {
            return BadAlloc;
        }
        ret = __glXvendorExports.forwardRequest(vendor, client);
        if (ret != Success) {
            __glXvendorExports.removeXIDMap(context);
        }
        return ret;
    } else {
        client->errorValue = screen;
        return BadMatch;
    }
}
"#;
    assert_eq!(dispatch_function(&glx_request("CreateContext")), expected);
}

#[test]
fn render() {
    let expected = r#"static int dispatch_Render(ClientPtr client)
{
    REQUEST(xGLXRenderReq);
    CARD32 contextTag = __glXCheckSwap(client, stuff->contextTag);
    __GLXServerVendor *vendor = NULL;
    vendor = __glXvendorExports.getContextTag(client, contextTag);
    if (vendor != NULL) {
        int ret;
        ret = __glXvendorExports.forwardRequest(vendor, client);
        return ret;
    } else {
        client->errorValue = contextTag;
        return __glXerrorBase + GLXBadContextTag;
    }
}
"#;
    assert_eq!(dispatch_function(&glx_request("Render")), expected);
}

#[test]
fn get_drawable_attributes() {
    let expected = r#"static int dispatch_GetDrawableAttributes(ClientPtr client)
{
    REQUEST(xGLXGetDrawableAttributesReq);
    CARD32 drawable = __glXCheckSwap(client, stuff->drawable);
    __GLXServerVendor *vendor = NULL;
    vendor = __glXvendorExports.getXIDMap(drawable);
    if (vendor != NULL) {
        int ret;
        ret = __glXvendorExports.forwardRequest(vendor, client);
        return ret;
    } else {
        client->errorValue = drawable;
        return BadDrawable;
    }
}
"#;
    assert_eq!(dispatch_function(&glx_request("GetDrawableAttributes")), expected);
}

#[test]
fn add_and_remove_in_one_request() {
    let spec = req("SwapContext", Method::ContextTag, "contextTag")
        .add_xid("newContext")
        .remove_xid("oldContext");
    let desc = RequestDescriptor::new(&spec).expect("valid descriptor");
    let expected = r#"static int dispatch_SwapContext(ClientPtr client)
{
    REQUEST(xGLXSwapContextReq);
    CARD32 contextTag = __glXCheckSwap(client, stuff->contextTag);
    __GLXServerVendor *vendor = NULL;
    CARD32 newContext = __glXCheckSwap(client, stuff->newContext);
    LEGAL_NEW_RESOURCE(newContext, client);
    vendor = __glXvendorExports.getContextTag(client, contextTag);
    if (vendor != NULL) {
        CARD32 oldContext = __glXCheckSwap(client, stuff->oldContext);
        int ret;
        if (!__glXvendorExports.addXIDMap(newContext, vendor)) {
            return BadAlloc;
        }
        ret = __glXvendorExports.forwardRequest(vendor, client);
        if (ret != Success) {
            __glXvendorExports.removeXIDMap(newContext);
        }
        if (ret == Success) {
            __glXvendorExports.removeXIDMap(oldContext);
        }
        return ret;
    } else {
        client->errorValue = contextTag;
        return __glXerrorBase + GLXBadContextTag;
    }
}
"#;
    assert_eq!(dispatch_function(&desc), expected);
}

#[test]
fn three_request_dispatch_list() {
    let table = RequestTable::build(&[
        req("WaitGL", Method::ContextTag, "contextTag"),
        req("GetFBConfigs", Method::Screen, "screen"),
        req("IsDirect", Method::Xid, "context").error("GLXBadContext"),
    ])
    .expect("valid table");
    let text = program(&table);
    let list = &text[text.find("const __GLXGeneratedDispatchFunc").expect("dispatch list")..];
    let expected = r#"const __GLXGeneratedDispatchFunc GENERATED_DISPATCH_LIST[] = {
    { X_GLXWaitGL, dispatch_WaitGL },
    { X_GLXGetFBConfigs, dispatch_GetFBConfigs },
    { X_GLXIsDirect, dispatch_IsDirect },
    { -1, NULL }
};
"#;
    assert_eq!(list, expected);
}

#[test]
fn program_joins_functions_with_blank_lines() {
    let table = RequestTable::build(&[
        req("WaitGL", Method::ContextTag, "contextTag"),
        req("WaitX", Method::ContextTag, "contextTag"),
    ])
    .expect("valid table");
    let text = program(&table);
    let wait_gl = dispatch_function(&table.requests()[0]);
    let wait_x = dispatch_function(&table.requests()[1]);
    assert!(text.contains(&format!("{wait_gl}\n{wait_x}\nconst __GLXGeneratedDispatchFunc")));
}
