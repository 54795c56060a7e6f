//! Transport decoration: attach provisioned tokens to outgoing requests.
//!
//! [`RequestSender`] is the minimal "send an HTTP request" capability the crate
//! depends on; [`AsapTransport`] wraps any implementation and implements the
//! capability itself, provisioning a token and attaching it as a bearer
//! authorization header before delegating. A provisioning failure surfaces to
//! the caller without the request ever leaving the process.

#[cfg(feature = "reqwest")]
use reqwest::header::{AUTHORIZATION, HeaderValue};
// self
use crate::{_prelude::*, error::TransportError, provision::CachingProvisioner, token::TokenSecret};

/// Boxed future returned by [`RequestSender::send`].
pub type SendFuture<'a, R, E> = Pin<Box<dyn Future<Output = Result<R, E>> + 'a + Send>>;

/// Request types that can carry a bearer authorization header.
///
/// The trait is the crate's only assumption about request shapes, so downstream
/// services can decorate any client whose requests can absorb an
/// `Authorization: Bearer <token>` header.
pub trait BearerRequest
where
	Self: Send + Sized,
{
	/// Consumes the request and injects the bearer authorization header.
	fn with_bearer(self, token: &TokenSecret) -> Result<Self>;
}

/// Minimal outbound-request capability decorated by [`AsapTransport`].
pub trait RequestSender
where
	Self: Send + Sync,
{
	/// Request type accepted by the sender.
	type Request: BearerRequest;
	/// Response type produced on success.
	type Response: Send;
	/// Transport-specific error emitted by the sender.
	type Error: 'static + Send + Sync + StdError;

	/// Sends the request and resolves to the response.
	fn send(&self, request: Self::Request) -> SendFuture<'_, Self::Response, Self::Error>;
}

/// Decorator that signs every outgoing request with a provisioned token.
#[derive(Clone, Debug)]
pub struct AsapTransport<S> {
	inner: S,
	provisioner: Arc<CachingProvisioner>,
}
impl<S> AsapTransport<S> {
	/// Wraps an inner sender with the shared provisioner.
	pub fn new(inner: S, provisioner: Arc<CachingProvisioner>) -> Self {
		Self { inner, provisioner }
	}

	/// Returns the wrapped sender.
	pub fn inner(&self) -> &S {
		&self.inner
	}

	/// Returns the provisioner feeding this decorator.
	pub fn provisioner(&self) -> &Arc<CachingProvisioner> {
		&self.provisioner
	}
}
impl<S> RequestSender for AsapTransport<S>
where
	S: RequestSender,
	S::Error: Into<TransportError>,
{
	type Error = Error;
	type Request = S::Request;
	type Response = S::Response;

	fn send(&self, request: Self::Request) -> SendFuture<'_, Self::Response, Self::Error> {
		Box::pin(async move {
			let token = self.provisioner.provision().await?;
			let request = request.with_bearer(&token.value)?;

			self.inner.send(request).await.map_err(|e| Error::Transport(e.into()))
		})
	}
}

#[cfg(feature = "reqwest")]
/// Decorated transport specialized for the crate's default reqwest stack.
pub type ReqwestAsapTransport = AsapTransport<ReqwestSender>;

/// Thin request-sender wrapper around [`ReqwestClient`].
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestSender(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestSender {
	/// Wraps an existing [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl RequestSender for ReqwestSender {
	type Error = ReqwestError;
	type Request = reqwest::Request;
	type Response = reqwest::Response;

	fn send(&self, request: Self::Request) -> SendFuture<'_, Self::Response, Self::Error> {
		let client = self.0.clone();

		Box::pin(async move { client.execute(request).await })
	}
}
#[cfg(feature = "reqwest")]
impl BearerRequest for reqwest::Request {
	fn with_bearer(mut self, token: &TokenSecret) -> Result<Self> {
		let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose()))
			.map_err(TransportError::header)?;

		value.set_sensitive(true);
		self.headers_mut().insert(AUTHORIZATION, value);

		Ok(self)
	}
}
