use quick_xml::escape::escape;
use std::fmt::Write;

use super::types::SoapAction;

pub const ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
pub const SERVICE_NS: &str = "http://service.cooklyst/";

/// Build the request document for `action`.
///
/// The secret is always `arg0`; `args` follow as `arg1..argN` in the order
/// given. The service binds arguments by position, so callers must pass the
/// creator id before the subscriber id.
pub fn build_envelope(action: SoapAction, secret: &str, args: &[String]) -> String {
    let mut params = String::new();
    let values = std::iter::once(secret).chain(args.iter().map(String::as_str));
    for (index, value) in values.enumerate() {
        // writing to a String cannot fail
        let _ = write!(
            params,
            "<arg{index} xmlns=\"\">{value}</arg{index}>",
            index = index,
            value = escape(value)
        );
    }

    format!(
        concat!(
            "<Envelope xmlns=\"{envelope_ns}\">",
            "<Body>",
            "<{action} xmlns=\"{service_ns}\">{params}</{action}>",
            "</Body>",
            "</Envelope>"
        ),
        envelope_ns = ENVELOPE_NS,
        service_ns = SERVICE_NS,
        action = action.name(),
        params = params,
    )
}
