// OESS HTTP client
//
// Wraps `reqwest::Client` with OESS URL construction, basic auth,
// workgroup scoping and envelope unwrapping. One method per CGI call the
// gateway needs; nothing here retries.

use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{
    OessCircuit, OessInterface, OessLink, OessNode, OessResponse, ProvisionCircuit,
    ProvisionResponse,
};
use crate::transport::{BasicAuth, TransportConfig};

/// Raw HTTP client for the OESS CGI services.
///
/// All read methods return the unwrapped `results` array; the envelope is
/// stripped and checked before the caller sees it.
pub struct OessClient {
    http: reqwest::Client,
    base_url: Url,
    workgroup_id: u64,
    auth: Option<BasicAuth>,
    timeout_secs: u64,
}

impl OessClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the OESS root (e.g. `https://oess.example.net/oess`);
    /// `services/<name>.cgi` is appended to it.
    pub fn new(base_url: Url, workgroup_id: u64, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            workgroup_id,
            auth: transport.auth.clone(),
            timeout_secs: transport.timeout_secs(),
        })
    }

    /// Create a client with a pre-built `reqwest::Client` and no credentials.
    pub fn with_client(http: reqwest::Client, base_url: Url, workgroup_id: u64) -> Self {
        Self {
            http,
            base_url,
            workgroup_id,
            auth: None,
            timeout_secs: 0,
        }
    }

    /// The workgroup every circuit and interface call is scoped to.
    pub fn workgroup_id(&self) -> u64 {
        self.workgroup_id
    }

    /// The OESS base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Topology ─────────────────────────────────────────────────────

    /// All nodes with their status columns.
    pub async fn list_nodes(&self) -> Result<Vec<OessNode>, Error> {
        let url = self.service_url("data.cgi", &[("method", "get_all_node_status".into())])?;
        self.get(url).await
    }

    /// All links with their status columns.
    pub async fn list_links(&self) -> Result<Vec<OessLink>, Error> {
        let url = self.service_url("data.cgi", &[("method", "get_all_link_status".into())])?;
        self.get(url).await
    }

    /// Interfaces the workgroup is authorized to use.
    pub async fn list_workgroup_interfaces(&self) -> Result<Vec<OessInterface>, Error> {
        let url = self.service_url(
            "interface.cgi",
            &[
                ("method", "get_workgroup_interfaces".into()),
                ("workgroup_id", self.workgroup_id.to_string()),
            ],
        )?;
        self.get(url).await
    }

    // ── Circuits ─────────────────────────────────────────────────────

    /// Every circuit visible to the workgroup.
    pub async fn list_circuits(&self) -> Result<Vec<OessCircuit>, Error> {
        let url = self.service_url(
            "circuit.cgi",
            &[
                ("method", "get".into()),
                ("workgroup_id", self.workgroup_id.to_string()),
            ],
        )?;
        self.get(url).await
    }

    /// Circuits matching `circuit_id` (OESS answers with a list, usually of one).
    pub async fn get_circuit(&self, circuit_id: u64) -> Result<Vec<OessCircuit>, Error> {
        let url = self.service_url(
            "circuit.cgi",
            &[
                ("method", "get".into()),
                ("workgroup_id", self.workgroup_id.to_string()),
                ("circuit_id", circuit_id.to_string()),
            ],
        )?;
        self.get(url).await
    }

    /// Provision a circuit and return the id OESS assigned to it.
    pub async fn provision_circuit(&self, circuit: &ProvisionCircuit) -> Result<u64, Error> {
        let url = self.service_url("circuit.cgi", &[])?;

        let mut form: Vec<(&str, String)> = vec![
            ("method", "provision".into()),
            ("workgroup_id", self.workgroup_id.to_string()),
            ("provision_time", circuit.provision_time.to_string()),
            ("remove_time", circuit.remove_time.to_string()),
            ("circuit_id", circuit.circuit_id.to_string()),
            ("description", circuit.description.clone()),
        ];
        for endpoint in &circuit.endpoints {
            let encoded = serde_json::to_string(endpoint).map_err(|e| Error::Deserialization {
                message: format!("failed to encode endpoint: {e}"),
                body: String::new(),
            })?;
            form.push(("endpoint", encoded));
        }

        debug!("POST {}", url);
        let resp = self
            .authorize(self.http.post(url))
            .form(&form)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let body = self.success_body(resp).await?;

        let parsed: ProvisionResponse =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: body.clone(),
            })?;
        if let Some(message) = parsed.error_text {
            return Err(Error::Oess { message });
        }
        parsed.circuit_id.ok_or_else(|| Error::Deserialization {
            message: "provision response has no circuit_id".into(),
            body,
        })
    }

    /// Remove a circuit immediately.
    pub async fn remove_circuit(&self, circuit_id: u64) -> Result<(), Error> {
        let url = self.service_url(
            "circuit.cgi",
            &[
                ("method", "remove".into()),
                ("workgroup_id", self.workgroup_id.to_string()),
                ("circuit_id", circuit_id.to_string()),
            ],
        )?;

        debug!("GET {}", url);
        let resp = self
            .authorize(self.http.get(url))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.success_body(resp).await.map(|_| ())
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// `{base}/services/{cgi}?{query}`
    pub(crate) fn service_url(&self, cgi: &str, query: &[(&str, String)]) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}/services/{cgi}"))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            Some(auth) => req.basic_auth(&auth.username, Some(auth.password.expose_secret())),
            None => req,
        }
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            Error::Transport(err)
        }
    }

    /// Send a GET request and unwrap the `results` envelope.
    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, Error> {
        debug!("GET {}", url);

        let resp = self
            .authorize(self.http.get(url))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let body = self.success_body(resp).await?;

        let envelope: OessResponse<T> =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: body.clone(),
            })?;

        match envelope.error_text {
            Some(message) => Err(Error::Oess { message }),
            None => Ok(envelope.results),
        }
    }

    /// Read the body, rejecting any non-200 answer.
    async fn success_body(&self, resp: reqwest::Response) -> Result<String, Error> {
        let status = resp.status();
        let body = resp.text().await.map_err(|e| self.transport_error(e))?;
        if status != reqwest::StatusCode::OK {
            return Err(Error::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}
