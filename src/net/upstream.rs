//! HTTP clients for the upstream.
//!
//! # Responsibilities
//! - Build a certificate-verifying client (webpki roots)
//! - Build a client that accepts any upstream certificate
//! - Pick one per request from the connection's security and the config
//!
//! The non-verifying client exists because requests that arrive over TLS
//! are forwarded over https to an operator-chosen upstream, which commonly
//! runs a self-signed certificate. It is selected only when
//! `upstream.skip_cert_verification` is on.

use std::sync::Arc;

use axum::body::Body;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::{verify_tls12_signature, verify_tls13_signature, CryptoProvider};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, SignatureScheme};

/// Client type used for forwarding.
pub type UpstreamClient = Client<HttpsConnector<HttpConnector>, Body>;

/// The two forwarding clients. Cloning is cheap; both share their pools.
#[derive(Clone)]
pub struct UpstreamClients {
    verified: UpstreamClient,
    insecure: UpstreamClient,
}

impl UpstreamClients {
    /// Build both clients.
    pub fn new() -> Result<Self, rustls::Error> {
        let verified = HttpsConnectorBuilder::new()
            .with_webpki_roots()
            .https_or_http()
            .enable_http1()
            .build();

        let provider = Arc::new(rustls::crypto::aws_lc_rs::default_provider());
        let insecure_tls = ClientConfig::builder_with_provider(provider.clone())
            .with_safe_default_protocol_versions()?
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(AcceptAnyCertificate(provider)))
            .with_no_client_auth();
        let insecure = HttpsConnectorBuilder::new()
            .with_tls_config(insecure_tls)
            .https_or_http()
            .enable_http1()
            .build();

        Ok(Self {
            verified: Client::builder(TokioExecutor::new()).build(verified),
            insecure: Client::builder(TokioExecutor::new()).build(insecure),
        })
    }

    /// Client for a request; `secure` is whether it arrived over TLS.
    pub fn select(&self, secure: bool, skip_cert_verification: bool) -> &UpstreamClient {
        if skips_verification(secure, skip_cert_verification) {
            &self.insecure
        } else {
            &self.verified
        }
    }
}

fn skips_verification(secure: bool, skip_cert_verification: bool) -> bool {
    secure && skip_cert_verification
}

/// Accepts every server certificate. Handshake signatures are still checked
/// so the session keys belong to whoever presented the certificate.
#[derive(Debug)]
struct AcceptAnyCertificate(Arc<CryptoProvider>);

impl ServerCertVerifier for AcceptAnyCertificate {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls12_signature(message, cert, dss, &self.0.signature_verification_algorithms)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls13_signature(message, cert, dss, &self.0.signature_verification_algorithms)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.0.signature_verification_algorithms.supported_schemes()
    }
}
