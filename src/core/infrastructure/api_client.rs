//! HTTP implementation of [`ProxmoxApi`] with authentication and automatic
//! ticket refresh.

use crate::{
    auth::application::{request::login_request::LoginRequest, service::login_service::LoginService},
    core::{
        domain::{
            error::{ProxmoxError, ProxmoxResult, ValidationError},
            model::{
                access::{
                    AclEntry, AclUpdate, ChangePasswordParams, CreateUserParams, RoleEntry,
                    UserListItem,
                },
                client_config::{ClientConfig, RateLimitConfig},
                cluster_resource::{ClusterResource, ResourceType},
                guest::{CloneParams, GuestKind, GuestListItem, PowerAction, PowerParams},
                node_list_item::NodeListItem,
                proxmox_auth::ProxmoxAuth,
                proxmox_connection::{Credentials, ProxmoxConnection},
                task::{TaskListItem, TaskLogLine, TaskStatus},
            },
        },
        infrastructure::proxmox_api::ProxmoxApi,
    },
};
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota};
use reqwest::{
    Client, Method, Response, StatusCode,
    header::{AUTHORIZATION, COOKIE},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::num::NonZeroU32;
use std::sync::Arc;
use tokio::sync::RwLock;

/// The `{"data": ...}` wrapper around every API response.
#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

/// HTTP client that authenticates requests and talks to the Proxmox API.
///
/// With password credentials the client logs in lazily, sends the
/// `PVEAuthCookie` cookie and `CSRFPreventionToken` header with every
/// request, refreshes the ticket once it is older than the configured
/// lifetime, and on a `401 Unauthorized` logs in again and retries once.
/// With an API token the `Authorization` header is sent instead and no
/// login happens.
#[derive(Debug)]
pub struct ApiClient {
    http_client: Client,
    connection: Arc<ProxmoxConnection>,
    auth: Arc<RwLock<Option<ProxmoxAuth>>>,
    config: Arc<ClientConfig>,
    rate_limiter: Option<Arc<DefaultDirectRateLimiter>>,
}

impl ApiClient {
    /// Creates a new `ApiClient`. The client starts unauthenticated.
    ///
    /// # Errors
    /// Returns `ProxmoxError::Connection` if the HTTP client cannot be built
    /// and `ProxmoxError::Validation` for a zero rate limit.
    pub fn new(connection: ProxmoxConnection, config: ClientConfig) -> ProxmoxResult<Self> {
        let http_client = Client::builder()
            .danger_accept_invalid_certs(connection.accept_invalid_certs())
            .build()
            .map_err(|e| ProxmoxError::Connection(e.to_string()))?;

        let rate_limiter = config
            .rate_limit
            .map(build_rate_limiter)
            .transpose()?
            .map(Arc::new);

        Ok(Self {
            http_client,
            connection: Arc::new(connection),
            auth: Arc::new(RwLock::new(None)),
            config: Arc::new(config),
            rate_limiter,
        })
    }

    /// Returns a reference to the underlying connection details.
    pub fn connection(&self) -> &ProxmoxConnection {
        &self.connection
    }

    /// Sets the authentication state (used after a successful login or session restore).
    pub async fn set_auth(&self, auth: ProxmoxAuth) {
        let mut lock = self.auth.write().await;
        *lock = Some(auth);
    }

    /// Returns the current authentication state, if any.
    pub async fn auth(&self) -> Option<ProxmoxAuth> {
        self.auth.read().await.clone()
    }

    /// Returns `true` if requests can be sent without logging in first.
    pub async fn is_authenticated(&self) -> bool {
        if !self.uses_ticket() {
            return true;
        }
        let lock = self.auth.read().await;
        lock.as_ref()
            .map(|a| !a.ticket().is_expired(self.config.ticket_lifetime))
            .unwrap_or(false)
    }

    pub(crate) async fn get<T>(&self, path: &str, query: &[(&str, String)]) -> ProxmoxResult<T>
    where
        T: DeserializeOwned,
    {
        self.execute_request(Method::GET, path, query, None::<&()>)
            .await
    }

    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> ProxmoxResult<T>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        self.execute_request(Method::POST, path, &[], Some(body))
            .await
    }

    pub(crate) async fn put<B, T>(&self, path: &str, body: &B) -> ProxmoxResult<T>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        self.execute_request(Method::PUT, path, &[], Some(body))
            .await
    }

    pub(crate) async fn delete<T>(&self, path: &str) -> ProxmoxResult<T>
    where
        T: DeserializeOwned,
    {
        self.execute_request(Method::DELETE, path, &[], None::<&()>)
            .await
    }

    /// Ensures authentication, sends the request, refreshes once on 401 and
    /// unwraps the response envelope.
    async fn execute_request<B, T>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> ProxmoxResult<T>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        self.ensure_authenticated().await?;

        let url = self.build_url(path, query);
        tracing::debug!(%method, %url, "sending request");
        let mut response = self.send(&method, &url, body).await?;

        // Retry exactly once with a fresh ticket
        if response.status() == StatusCode::UNAUTHORIZED && self.uses_ticket() {
            tracing::debug!(%url, "ticket rejected, logging in again");
            self.refresh_auth().await?;
            response = self.send(&method, &url, body).await?;
        }

        parse_response(response).await
    }

    fn build_url(&self, path: &str, query: &[(&str, String)]) -> String {
        let mut url = self.connection.url().api_path(path);
        if !query.is_empty() {
            let encoded = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(query.iter().map(|(key, value)| (*key, value.as_str())))
                .finish();
            url.push('?');
            url.push_str(&encoded);
        }
        url
    }

    async fn send<B>(&self, method: &Method, url: &str, body: Option<&B>) -> ProxmoxResult<Response>
    where
        B: Serialize,
    {
        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }

        let mut req_builder = self.http_client.request(method.clone(), url);

        match self.connection.credentials() {
            Credentials::ApiToken(token) => {
                req_builder = req_builder.header(AUTHORIZATION, token.as_authorization_header());
            }
            Credentials::Password { .. } => {
                let auth_guard = self.auth.read().await;
                if let Some(auth) = auth_guard.as_ref() {
                    req_builder = req_builder.header(COOKIE, auth.ticket().as_cookie_header());
                    if let Some(csrf) = auth.csrf_token() {
                        req_builder = req_builder.header("CSRFPreventionToken", csrf.as_str());
                    }
                }
            }
        }

        if let Some(body) = body {
            req_builder = req_builder.json(body);
        }

        req_builder
            .send()
            .await
            .map_err(|e| ProxmoxError::Connection(format!("HTTP request failed: {}", e)))
    }

    fn uses_ticket(&self) -> bool {
        matches!(self.connection.credentials(), Credentials::Password { .. })
    }

    /// Ensures that we have a valid (non‑expired) ticket. If not, attempts to refresh.
    async fn ensure_authenticated(&self) -> ProxmoxResult<()> {
        if !self.is_authenticated().await {
            self.refresh_auth().await?;
        }
        Ok(())
    }

    /// Performs a fresh login using the stored credentials to obtain a new ticket.
    async fn refresh_auth(&self) -> ProxmoxResult<()> {
        let Credentials::Password {
            username,
            password,
            realm,
        } = self.connection.credentials()
        else {
            return Ok(());
        };
        let request = LoginRequest {
            username: username.as_str().to_string(),
            password: password.as_str().to_string(),
            realm: Some(realm.as_str().to_string()),
        };
        let auth = self.login(&request).await?;
        self.set_auth(auth).await;
        Ok(())
    }

    async fn login(&self, request: &LoginRequest) -> ProxmoxResult<ProxmoxAuth> {
        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }
        LoginService::new()
            .execute(&self.http_client, self.connection.url(), request)
            .await
    }
}

fn build_rate_limiter(config: RateLimitConfig) -> ProxmoxResult<DefaultDirectRateLimiter> {
    let non_zero = |value: u32, field: &str| {
        NonZeroU32::new(value).ok_or_else(|| ValidationError::Field {
            field: field.to_string(),
            message: "Must be greater than zero".to_string(),
        })
    };
    let quota = Quota::per_second(non_zero(config.requests_per_second, "requests_per_second")?)
        .allow_burst(non_zero(config.burst_size, "burst_size")?);
    Ok(DefaultDirectRateLimiter::direct(quota))
}

async fn parse_response<T>(response: Response) -> ProxmoxResult<T>
where
    T: DeserializeOwned,
{
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(ProxmoxError::Authentication(
            "Request rejected as unauthorized".to_string(),
        ));
    }
    if !status.is_success() {
        let message = response
            .text()
            .await
            .ok()
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());
        return Err(ProxmoxError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| ProxmoxError::Connection(format!("Failed to read response: {}", e)))?;
    let envelope: Envelope<T> = serde_json::from_slice(&bytes)?;
    Ok(envelope.data)
}

fn guest_path(kind: GuestKind, node: &str, vmid: &str) -> String {
    format!("nodes/{}/{}/{}", node, kind.as_str(), vmid)
}

#[async_trait]
impl ProxmoxApi for ApiClient {
    async fn version(&self) -> ProxmoxResult<Value> {
        self.get("version", &[]).await
    }

    async fn list_users(&self) -> ProxmoxResult<Vec<UserListItem>> {
        self.get("access/users", &[]).await
    }

    async fn get_user(&self, userid: &str) -> ProxmoxResult<Value> {
        self.get(&format!("access/users/{}", userid), &[]).await
    }

    async fn create_user(&self, params: CreateUserParams) -> ProxmoxResult<Value> {
        self.post("access/users", &params).await
    }

    async fn delete_user(&self, userid: &str) -> ProxmoxResult<Value> {
        self.delete(&format!("access/users/{}", userid)).await
    }

    async fn change_user_password(&self, params: ChangePasswordParams) -> ProxmoxResult<Value> {
        self.put("access/password", &params).await
    }

    async fn get_user_tokens(&self, userid: &str, password: &str) -> ProxmoxResult<ProxmoxAuth> {
        let request = LoginRequest {
            username: userid.to_string(),
            password: password.to_string(),
            realm: None,
        };
        self.login(&request).await
    }

    async fn list_roles(&self) -> ProxmoxResult<Vec<RoleEntry>> {
        self.get("access/roles", &[]).await
    }

    async fn list_permissions(&self, userid: Option<String>) -> ProxmoxResult<Value> {
        let query: Vec<(&str, String)> = userid.into_iter().map(|id| ("userid", id)).collect();
        self.get("access/permissions", &query).await
    }

    async fn get_access_control_list(&self) -> ProxmoxResult<Vec<AclEntry>> {
        self.get("access/acl", &[]).await
    }

    async fn update_access_control_list(&self, update: AclUpdate) -> ProxmoxResult<Value> {
        self.put("access/acl", &update).await
    }

    async fn list_nodes(&self) -> ProxmoxResult<Vec<NodeListItem>> {
        self.get("nodes", &[]).await
    }

    async fn get_node_status(&self, node: &str) -> ProxmoxResult<Value> {
        self.get(&format!("nodes/{}/status", node), &[]).await
    }

    async fn list_resources(
        &self,
        resource_type: Option<ResourceType>,
    ) -> ProxmoxResult<Vec<ClusterResource>> {
        let query: Vec<(&str, String)> = resource_type
            .into_iter()
            .map(|t| ("type", t.as_str().to_string()))
            .collect();
        self.get("cluster/resources", &query).await
    }

    async fn list_guests(&self, kind: GuestKind, node: &str) -> ProxmoxResult<Vec<GuestListItem>> {
        self.get(&format!("nodes/{}/{}", node, kind.as_str()), &[])
            .await
    }

    async fn get_guest_status(
        &self,
        kind: GuestKind,
        node: &str,
        vmid: &str,
    ) -> ProxmoxResult<Value> {
        self.get(&format!("{}/status/current", guest_path(kind, node, vmid)), &[])
            .await
    }

    async fn get_guest_config(
        &self,
        kind: GuestKind,
        node: &str,
        vmid: &str,
    ) -> ProxmoxResult<Value> {
        self.get(&format!("{}/config", guest_path(kind, node, vmid)), &[])
            .await
    }

    async fn delete_guest(&self, kind: GuestKind, node: &str, vmid: &str) -> ProxmoxResult<Value> {
        self.delete(&guest_path(kind, node, vmid)).await
    }

    async fn clone_guest(
        &self,
        kind: GuestKind,
        node: &str,
        vmid: &str,
        params: CloneParams,
    ) -> ProxmoxResult<Value> {
        self.post(&format!("{}/clone", guest_path(kind, node, vmid)), &params)
            .await
    }

    async fn guest_power_action(
        &self,
        kind: GuestKind,
        node: &str,
        vmid: &str,
        action: PowerAction,
        params: PowerParams,
    ) -> ProxmoxResult<Value> {
        self.post(
            &format!("{}/status/{}", guest_path(kind, node, vmid), action.as_str()),
            &params,
        )
        .await
    }

    async fn list_tasks(&self, node: &str) -> ProxmoxResult<Vec<TaskListItem>> {
        self.get(&format!("nodes/{}/tasks", node), &[]).await
    }

    async fn get_task_log(&self, node: &str, upid: &str) -> ProxmoxResult<Vec<TaskLogLine>> {
        self.get(&format!("nodes/{}/tasks/{}/log", node, upid), &[])
            .await
    }

    async fn get_task_status(&self, node: &str, upid: &str) -> ProxmoxResult<TaskStatus> {
        self.get(&format!("nodes/{}/tasks/{}/status", node, upid), &[])
            .await
    }
}
