//! Authenticated gRPC channel to Tachikoma.
//!
//! One channel is opened at startup and shared by the send gateway and the
//! notification stream. tonic channels multiplex calls, so clones are cheap
//! and safe to use from any task.

use anyhow::{Context, Result};
use tonic::metadata::{Ascii, MetadataValue};
use tonic::service::interceptor::InterceptedService;
use tonic::service::Interceptor;
use tonic::transport::{Channel, ClientTlsConfig, Endpoint, Identity};
use tonic::{Request, Status};
use tracing::info;

use crate::error::ConfigError;
use crate::Config;

/// Metadata key carrying the API token on every call.
pub const API_TOKEN_HEADER: &str = "x-apitoken";

/// Channel with the API token attached to every request.
pub type AuthenticatedChannel = InterceptedService<Channel, ApiToken>;

/// Interceptor adding the static `x-apitoken` metadata.
#[derive(Clone)]
pub struct ApiToken {
    token: MetadataValue<Ascii>,
}

impl ApiToken {
    pub fn new(token: &str) -> Result<Self, ConfigError> {
        let token = token.parse().map_err(|_| ConfigError::InvalidApiKey)?;
        Ok(Self { token })
    }
}

impl Interceptor for ApiToken {
    fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
        request
            .metadata_mut()
            .insert(API_TOKEN_HEADER, self.token.clone());
        Ok(request)
    }
}

/// PEM material for mutual TLS.
pub struct TlsMaterial {
    pub certificate: Vec<u8>,
    pub key: Vec<u8>,
}

impl TlsMaterial {
    /// Read the client certificate/key pair named in the configuration.
    pub async fn load(config: &Config) -> Result<Self> {
        let certificate = tokio::fs::read(&config.certificate).await.with_context(|| {
            format!(
                "failed to load client certificate '{}'",
                config.certificate.display()
            )
        })?;
        let key = tokio::fs::read(&config.key)
            .await
            .with_context(|| format!("failed to load client key '{}'", config.key.display()))?;

        Ok(Self { certificate, key })
    }

    fn tls_config(&self, domain: &str) -> ClientTlsConfig {
        ClientTlsConfig::new()
            .identity(Identity::from_pem(&self.certificate, &self.key))
            .domain_name(domain)
            .with_native_roots()
    }
}

/// Build the endpoint for the configured URI without dialing it.
pub fn endpoint(config: &Config, tls: &TlsMaterial) -> Result<Endpoint> {
    let address = config.tachikoma_endpoint()?;
    let domain = config
        .tachikoma_host()
        .ok_or_else(|| ConfigError::InvalidUri(config.uri.to_string()))?;

    let endpoint = Endpoint::from_shared(address.clone())
        .with_context(|| format!("not a valid URI: {}", address))?
        .tls_config(tls.tls_config(domain))
        .context("failed to configure TLS")?;

    Ok(endpoint)
}

/// Dial Tachikoma and wrap the channel with the API token.
pub async fn connect(config: &Config, tls: &TlsMaterial) -> Result<AuthenticatedChannel> {
    let token = ApiToken::new(&config.api_key)?;
    let endpoint = endpoint(config, tls)?;

    info!(uri = %endpoint.uri(), "tachikoma_connecting");

    let channel = endpoint
        .connect()
        .await
        .context("failed to dial gRPC server")?;

    info!("tachikoma_connected");

    Ok(InterceptedService::new(channel, token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_token_is_attached() {
        let mut token = ApiToken::new("example.com:mysupersecretpassword").unwrap();

        let request = token.call(Request::new(())).unwrap();

        assert_eq!(
            request
                .metadata()
                .get(API_TOKEN_HEADER)
                .unwrap()
                .to_str()
                .unwrap(),
            "example.com:mysupersecretpassword"
        );
    }

    #[test]
    fn test_api_token_rejects_control_characters() {
        assert!(matches!(
            ApiToken::new("bad\ntoken"),
            Err(ConfigError::InvalidApiKey)
        ));
    }
}
