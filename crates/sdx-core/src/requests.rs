// ── L2VPN request records ──
//
// Wire shapes for incoming provisioning requests, in the current
// (`/l2vpn/1.0`) and legacy point-to-point (`/v1/l2vpn_ptp`) dialects.
// Every wire struct rejects unknown fields. `from_json` validates the
// request shape only; port ids are resolved later against the registry.

use serde::Deserialize;

use crate::error::CoreError;

const CREATE: &str = "Create L2VPN failed";
const DELETE: &str = "Delete L2VPN failed";

// ── Validated requests ───────────────────────────────────────────────

/// One side of a requested circuit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestedEndpoint {
    pub port_id: String,
    pub vlan: i64,
}

/// A create request that passed shape validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateL2vpn {
    pub name: String,
    pub endpoints: [RequestedEndpoint; 2],
}

/// Attributes a legacy delete matches circuits against. Missing endpoint
/// fields stay `None` and match nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteL2vpnMatch {
    pub name: String,
    pub endpoints: [MatchEndpoint; 2],
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchEndpoint {
    /// Canonical port id, resolved through the reverse registry.
    pub port_id: Option<String>,
    pub vlan: Option<i64>,
}

fn parse<'de, T: Deserialize<'de>>(op: &str, body: &'de str) -> Result<T, CoreError> {
    if body.trim().is_empty() {
        return Err(CoreError::validation(format!("{op} - not a valid JSON payload")));
    }
    serde_json::from_str(body)
        .map_err(|e| CoreError::validation(format!("{op} - not a valid JSON payload: {e}")))
}

fn missing(op: &str, attribute: &str) -> CoreError {
    CoreError::validation(format!("{op} - missing attribute: {attribute}"))
}

// ── Current dialect ──────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateL2vpnRequest {
    pub name: Option<String>,
    #[serde(default)]
    pub endpoints: Vec<EndpointRequest>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EndpointRequest {
    pub port_id: Option<String>,
    pub vlan: Option<i64>,
}

impl CreateL2vpnRequest {
    pub fn from_json(body: &str) -> Result<CreateL2vpn, CoreError> {
        parse::<Self>(CREATE, body)?.validate()
    }

    pub fn validate(self) -> Result<CreateL2vpn, CoreError> {
        let name = self.name.ok_or_else(|| missing(CREATE, "name"))?;
        let endpoints: [EndpointRequest; 2] = self.endpoints.try_into().map_err(|e: Vec<_>| {
            CoreError::validation(format!(
                "{CREATE} - invalid list of endpoints: expected=2 was={}",
                e.len()
            ))
        })?;
        let [a, z] = endpoints;
        Ok(CreateL2vpn {
            name,
            endpoints: [a.validate()?, z.validate()?],
        })
    }
}

impl EndpointRequest {
    fn validate(self) -> Result<RequestedEndpoint, CoreError> {
        let port_id = self
            .port_id
            .ok_or_else(|| missing(CREATE, "endpoint port_id"))?;
        let vlan = self.vlan.ok_or_else(|| {
            CoreError::validation(format!("{CREATE} - invalid or missing vlan for {port_id}"))
        })?;
        Ok(RequestedEndpoint { port_id, vlan })
    }
}

// ── Legacy point-to-point dialect ────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TagRequest {
    pub value: Option<i64>,
    pub tag_type: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UniRequest {
    pub port_id: Option<String>,
    pub tag: Option<TagRequest>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateL2vpnPtpRequest {
    pub name: Option<String>,
    pub uni_a: Option<UniRequest>,
    pub uni_z: Option<UniRequest>,
}

impl CreateL2vpnPtpRequest {
    pub fn from_json(body: &str) -> Result<CreateL2vpn, CoreError> {
        parse::<Self>(CREATE, body)?.validate()
    }

    pub fn validate(self) -> Result<CreateL2vpn, CoreError> {
        let name = self.name.ok_or_else(|| missing(CREATE, "name"))?;
        Ok(CreateL2vpn {
            name,
            endpoints: [uni("uni_a", self.uni_a)?, uni("uni_z", self.uni_z)?],
        })
    }
}

fn uni(label: &str, uni: Option<UniRequest>) -> Result<RequestedEndpoint, CoreError> {
    let uni = uni.unwrap_or_default();
    let port_id = uni.port_id.ok_or_else(|| {
        CoreError::validation(format!("Invalid/Missing L2VPN endpoint attribute {label}"))
    })?;
    let vlan = uni.tag.and_then(|t| t.value).ok_or_else(|| {
        CoreError::validation(format!("Invalid/Missing L2VPN endpoint vlan for {label}"))
    })?;
    Ok(RequestedEndpoint { port_id, vlan })
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeleteUniRequest {
    /// Canonical port id, despite the field name.
    pub interface_id: Option<String>,
    pub tag: Option<TagRequest>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeleteL2vpnPtpRequest {
    pub name: Option<String>,
    pub uni_a: Option<DeleteUniRequest>,
    pub uni_z: Option<DeleteUniRequest>,
}

impl DeleteL2vpnPtpRequest {
    pub fn from_json(body: &str) -> Result<DeleteL2vpnMatch, CoreError> {
        parse::<Self>(DELETE, body)?.validate()
    }

    pub fn validate(self) -> Result<DeleteL2vpnMatch, CoreError> {
        let name = self.name.ok_or_else(|| missing(DELETE, "name"))?;
        let side = |uni: Option<DeleteUniRequest>| {
            let uni = uni.unwrap_or_default();
            MatchEndpoint {
                port_id: uni.interface_id,
                vlan: uni.tag.and_then(|t| t.value),
            }
        };
        Ok(DeleteL2vpnMatch {
            name,
            endpoints: [side(self.uni_a), side(self.uni_z)],
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const A: &str = "urn:sdx:port:ampath.net:mia-sw1:et-0/0/1";
    const Z: &str = "urn:sdx:port:ampath.net:jax-sw1:et-0/0/2";

    #[test]
    fn create_current_dialect() {
        let body = format!(
            r#"{{"name": "vlan-100", "endpoints": [
                {{"port_id": "{A}", "vlan": 100}},
                {{"port_id": "{Z}", "vlan": 200}}
            ]}}"#
        );
        let req = CreateL2vpnRequest::from_json(&body).unwrap();
        assert_eq!(req.name, "vlan-100");
        assert_eq!(req.endpoints[1].port_id, Z);
        assert_eq!(req.endpoints[1].vlan, 200);
    }

    #[test]
    fn create_requires_name() {
        let err = CreateL2vpnRequest::from_json(r#"{"endpoints": []}"#).unwrap_err();
        assert!(err.is_client_error());
        assert_eq!(err.to_string(), "Create L2VPN failed - missing attribute: name");
    }

    #[test]
    fn create_requires_exactly_two_endpoints() {
        let body = format!(r#"{{"name": "x", "endpoints": [{{"port_id": "{A}", "vlan": 1}}]}}"#);
        let err = CreateL2vpnRequest::from_json(&body).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Create L2VPN failed - invalid list of endpoints: expected=2 was=1"
        );
    }

    #[test]
    fn create_rejects_non_integer_vlan_and_unknown_fields() {
        let body = format!(
            r#"{{"name": "x", "endpoints": [{{"port_id": "{A}", "vlan": "any"}}, {{"port_id": "{Z}", "vlan": 1}}]}}"#
        );
        assert!(CreateL2vpnRequest::from_json(&body).unwrap_err().is_client_error());

        let err = CreateL2vpnRequest::from_json(r#"{"name": "x", "colour": "blue"}"#).unwrap_err();
        assert!(err.to_string().contains("unknown field"), "{err}");
    }

    #[test]
    fn empty_body_is_rejected() {
        let err = CreateL2vpnRequest::from_json("  ").unwrap_err();
        assert_eq!(err.to_string(), "Create L2VPN failed - not a valid JSON payload");
    }

    #[test]
    fn create_legacy_dialect() {
        let body = format!(
            r#"{{"name": "legacy",
                "uni_a": {{"port_id": "{A}", "tag": {{"value": 10, "tag_type": 1}}}},
                "uni_z": {{"port_id": "{Z}", "tag": {{"value": 20, "tag_type": 1}}}}}}"#
        );
        let req = CreateL2vpnPtpRequest::from_json(&body).unwrap();
        assert_eq!(req.endpoints[0].port_id, A);
        assert_eq!(req.endpoints[0].vlan, 10);
    }

    #[test]
    fn legacy_missing_tag_names_the_uni() {
        let body = format!(r#"{{"name": "l", "uni_a": {{"port_id": "{A}"}}, "uni_z": {{"port_id": "{Z}"}}}}"#);
        let err = CreateL2vpnPtpRequest::from_json(&body).unwrap_err();
        assert_eq!(err.to_string(), "Invalid/Missing L2VPN endpoint vlan for uni_a");

        let err = CreateL2vpnPtpRequest::from_json(r#"{"name": "l"}"#).unwrap_err();
        assert_eq!(err.to_string(), "Invalid/Missing L2VPN endpoint attribute uni_a");
    }

    #[test]
    fn legacy_delete_keeps_partial_endpoints() {
        let body = format!(
            r#"{{"name": "l", "uni_a": {{"interface_id": "{A}", "tag": {{"value": 10}}}}}}"#
        );
        let req = DeleteL2vpnPtpRequest::from_json(&body).unwrap();
        assert_eq!(req.endpoints[0].port_id.as_deref(), Some(A));
        assert_eq!(req.endpoints[0].vlan, Some(10));
        assert_eq!(req.endpoints[1], MatchEndpoint::default());

        assert!(DeleteL2vpnPtpRequest::from_json("{}").unwrap_err().is_client_error());
    }
}
