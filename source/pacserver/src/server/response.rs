//! Response rendering (part of C7): picks the MIME type and, for debug
//! requests, wraps the rendered PAC in the diagnostic JSON envelope.
//!
//! Grounded in `original_source/internal/webserver.py`'s `get_file_for_ip`.

use crate::core::element::Element;
use crate::core::prefix::Ipv4Prefix;
use crate::server::request::ParsedQuery;

pub const PAC_MIME: &str = "application/x-ns-proxy-autoconfig";
pub const DEBUG_MIME: &str = "text/plain";
const DEBUG_SEPARATOR: &str = "\n\n---------------------------------------\n\n";

pub struct RenderedResponse {
    pub body: String,
    pub content_type: &'static str,
}

/// Build the response body for a resolved (or unresolved, `hit: None`)
/// query. `debug` mirrors the presence of the `?debug` query parameter,
/// regardless of its value.
pub fn render(query: &ParsedQuery, parsed: &Ipv4Prefix, hit: Option<&Element>, debug: bool) -> RenderedResponse {
    let rendered = hit.map(|e| e.rendered.as_str()).unwrap_or("");

    if !debug {
        return RenderedResponse {
            body: rendered.to_string(),
            content_type: PAC_MIME,
        };
    }

    let pac_json = match hit {
        Some(elem) => serde_json::json!({
            "ip_net": elem.zone.prefix.to_string(),
            "pac": elem.template_name,
        }),
        None => serde_json::Value::Null,
    };

    let payload = serde_json::json!({
        "raw_requester": {
            "ip": query.ip,
            "cidr": query.prefix_len,
        },
        "parsed_requester": parsed.to_string(),
        "pac": pac_json,
    });

    let body = format!(
        "{}{}{}",
        serde_json::to_string_pretty(&payload).expect("debug envelope is always serialisable"),
        DEBUG_SEPARATOR,
        rendered
    );

    RenderedResponse {
        body,
        content_type: DEBUG_MIME,
    }
}
