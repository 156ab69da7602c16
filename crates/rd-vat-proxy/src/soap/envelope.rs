//! SOAP 1.2 envelopes for the `Service` and `ServiceArr` operations.

use quick_xml::escape::escape;

use crate::types::{BatchLookupRequest, LookupRequest};

pub const SOAP_NS: &str = "http://www.w3.org/2003/05/soap-envelope";
pub const VAT_NS: &str = "https://rdws.rd.go.th/serviceRD3/vatserviceRD3";

fn wrap(body: &str) -> String {
    format!(
        "<soap:Envelope xmlns:soap=\"{SOAP_NS}\" xmlns:vat=\"{VAT_NS}\">\n\
         <soap:Header/>\n\
         <soap:Body>\n\
         {body}\n\
         </soap:Body>\n\
         </soap:Envelope>"
    )
}

/// `<vat:{tag}>value</vat:{tag}>`, escaped; empty element for `None`.
fn element(tag: &str, value: Option<&str>) -> String {
    let text = value.map(|v| escape(v)).unwrap_or_default();
    format!("<vat:{tag}>{text}</vat:{tag}>")
}

/// Envelope for a single taxpayer lookup.
pub fn single_envelope(req: &LookupRequest) -> String {
    let tin = req.tin.as_deref().filter(|s| !s.is_empty());
    let name = req.name.as_deref().filter(|s| !s.is_empty());
    let body = [
        "<vat:Service>".to_string(),
        element("username", Some(req.username.as_str())),
        element("password", Some(req.password.as_str())),
        element("TIN", tin),
        element("Name", name),
        element("ProvinceCode", Some(req.province_code.to_string().as_str())),
        element("BranchNumber", Some(req.branch_number.to_string().as_str())),
        element("AmphurCode", Some(req.amphur_code.to_string().as_str())),
        "</vat:Service>".to_string(),
    ]
    .join("\n");
    wrap(&body)
}

/// Envelope for a batch lookup by TIN list.
pub fn batch_envelope(req: &BatchLookupRequest) -> String {
    let items: String = req
        .tins
        .iter()
        .map(|tin| element("string", Some(tin.as_str())))
        .collect();
    let body = [
        "<vat:ServiceArr>".to_string(),
        element("username", Some(req.username.as_str())),
        element("password", Some(req.password.as_str())),
        "<vat:TINs>".to_string(),
        items,
        "</vat:TINs>".to_string(),
        "</vat:ServiceArr>".to_string(),
    ]
    .join("\n");
    wrap(&body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rd_vat::{xml, Node};

    #[test]
    fn test_single_envelope_fields() {
        let env = single_envelope(&LookupRequest::for_tin("0105536000000"));
        assert!(env.contains(&format!("xmlns:soap=\"{SOAP_NS}\"")));
        assert!(env.contains("<vat:TIN>0105536000000</vat:TIN>"));
        assert!(env.contains("<vat:Name></vat:Name>"));
        assert!(env.contains("<vat:ProvinceCode>0</vat:ProvinceCode>"));
        assert!(env.contains("<vat:username>anonymous</vat:username>"));
    }

    #[test]
    fn test_values_are_escaped() {
        let req = LookupRequest {
            name: Some("A & B <Co>".to_string()),
            ..LookupRequest::default()
        };
        let env = single_envelope(&req);
        assert!(env.contains("<vat:Name>A &amp; B &lt;Co&gt;</vat:Name>"));

        let tree = xml::parse(&env).unwrap();
        let name = tree
            .get("soap:Envelope")
            .and_then(|e| e.get("soap:Body"))
            .and_then(|b| b.get("vat:Service"))
            .and_then(|s| s.get("vat:Name"))
            .and_then(Node::as_text);
        assert_eq!(name, Some("A & B <Co>"));
    }

    #[test]
    fn test_batch_envelope_lists_tins() {
        let env = batch_envelope(&BatchLookupRequest::for_tins(["1111111111111", "2222222222222"]));
        assert!(env.contains("<vat:ServiceArr>"));
        assert!(env.contains(
            "<vat:TINs>\n<vat:string>1111111111111</vat:string><vat:string>2222222222222</vat:string>\n</vat:TINs>"
        ));

        let tree = xml::parse(&env).unwrap();
        let tins = tree
            .get("soap:Envelope")
            .and_then(|e| e.get("soap:Body"))
            .and_then(|b| b.get("vat:ServiceArr"))
            .and_then(|s| s.get("vat:TINs"))
            .and_then(|t| t.get("vat:string"))
            .and_then(Node::as_seq)
            .map(|s| s.len());
        assert_eq!(tins, Some(2));
    }
}
