use {
	crate::{operation::Binding, prelude::*},
	futures::FutureExt as _,
	serde_with::{DurationSecondsWithFrac, serde_as},
	std::{
		collections::VecDeque,
		path::{Path, PathBuf},
		sync::Arc,
		time::Duration,
	},
	tagkit_http::{Body, request::builder::Ext as _, response::Ext as _},
	tokio::net::{TcpStream, UnixStream},
	url::Url,
};

type Sender = hyper::client::conn::http2::SendRequest<Body>;

type Response = http::Response<hyper::body::Incoming>;

/// An HTTP client for the entity tag service. It implements [`tg::Dispatch`], so it is the transport a [`tg::Proxy`] forwards to.
#[derive(Clone, Debug)]
pub struct Client(Arc<Inner>);

#[derive(Debug)]
pub struct Inner {
	url: Url,
	options: Options,
	sender: tokio::sync::Mutex<Option<Sender>>,
}

#[serde_as]
#[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
pub struct Options {
	/// A bearer token sent with every request.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub token: Option<String>,

	/// The delays to wait before each retry of a request that failed to send or got a server error. Empty by default, in which case every request is sent once.
	#[serde_as(as = "Vec<DurationSecondsWithFrac>")]
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub retries: Vec<Duration>,

	#[serde_as(as = "Option<DurationSecondsWithFrac>")]
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub timeout: Option<Duration>,
}

impl Client {
	#[must_use]
	pub fn new(url: Url, options: Options) -> Self {
		let sender = tokio::sync::Mutex::new(None);
		Self(Arc::new(Inner {
			url,
			options,
			sender,
		}))
	}

	pub fn with_env() -> tg::Result<Self> {
		Self::with_vars(|name| std::env::var(name).ok())
	}

	fn with_vars(var: impl Fn(&str) -> Option<String>) -> tg::Result<Self> {
		let url = var("TAGKIT_URL")
			.ok_or_else(|| tg::error!("failed to get the TAGKIT_URL environment variable"))?
			.parse()
			.map_err(|source| {
				tg::error!(
					!source,
					"could not parse a URL from the TAGKIT_URL environment variable"
				)
			})?;
		let token = var("TAGKIT_TOKEN");
		let options = Options {
			token,
			..Default::default()
		};
		Ok(Self::new(url, options))
	}

	#[must_use]
	pub fn url(&self) -> &Url {
		&self.url
	}

	pub async fn connect(&self) -> tg::Result<()> {
		self.sender().boxed().await.map(|_| ())
	}

	pub async fn connected(&self) -> bool {
		self.sender
			.lock()
			.await
			.as_ref()
			.is_some_and(Sender::is_ready)
	}

	pub async fn disconnect(&self) -> tg::Result<()> {
		self.sender.lock().await.take();
		Ok(())
	}

	pub async fn dispatch(
		&self,
		operation: tg::Operation,
		payload: serde_json::Value,
	) -> tg::Result<Option<serde_json::Value>> {
		// Create the request.
		let route = operation.route();
		let uri = format!("{}{}", self.base(), route.path);
		let mut builder = http::request::Builder::default()
			.method(route.method)
			.uri(uri)
			.header(http::header::ACCEPT, mime::APPLICATION_JSON.to_string());
		if let Some(token) = &self.options.token {
			builder = builder.header(http::header::AUTHORIZATION, format!("Bearer {token}"));
		}
		let request = match route.binding {
			Binding::Body => builder
				.json(&payload)
				.map_err(|source| tg::error!(!source, %operation, "failed to serialize the payload"))?
				.map_err(|source| tg::error!(!source, %operation, "failed to create the request"))?,
			Binding::Query => builder
				.query(&payload)
				.map_err(|source| tg::error!(!source, %operation, "failed to serialize the payload"))?
				.empty()
				.map_err(|source| tg::error!(!source, %operation, "failed to create the request"))?,
		};
		tracing::debug!(%operation, method = %request.method(), uri = %request.uri(), "dispatching");

		// Send the request.
		let response = self.send(request).await?;
		if !response.status().is_success() {
			let error = Self::error_from_response(operation, response).await;
			tracing::debug!(%operation, error = %error.trace(false), "the remote call failed");
			return Err(error);
		}

		// Read the response.
		let output = response.optional_json().await.map_err(
			|source| tg::error!(!source, %operation, "failed to deserialize the response"),
		)?;
		Ok(output)
	}

	async fn error_from_response(operation: tg::Operation, response: Response) -> tg::Error {
		let status = response.status();
		let bytes = match response.bytes().await {
			Ok(bytes) => bytes,
			Err(source) => {
				return tg::error!(!source, %operation, %status, "failed to read the error response");
			},
		};
		if let Ok(error) = serde_json::from_slice::<tg::Error>(&bytes) {
			return error;
		}
		let body = String::from_utf8_lossy(&bytes).into_owned();
		let mut error = tg::error!(%operation, %status, %body, "the remote call failed");
		error.code = tg::error::Code::from_status(status);
		error
	}

	fn base(&self) -> String {
		match self.url.scheme() {
			"http+unix" => "http://localhost".to_owned(),
			_ => self.url.as_str().trim_end_matches('/').to_owned(),
		}
	}

	async fn sender(&self) -> tg::Result<Sender> {
		// The lock is held while connecting so that concurrent callers wait for one connection instead of each opening their own.
		let mut guard = self.sender.lock().await;
		if let Some(sender) = guard.as_ref() {
			if sender.is_ready() {
				return Ok(sender.clone());
			}
		}
		let sender = self.connect_h2().await?;
		guard.replace(sender.clone());
		Ok(sender)
	}

	async fn connect_h2(&self) -> tg::Result<Sender> {
		match self.url.scheme() {
			"http+unix" => {
				let path = self
					.url
					.host_str()
					.ok_or_else(|| tg::error!(%url = self.url, "invalid url"))?;
				let path = urlencoding::decode(path)
					.map_err(|source| tg::error!(!source, %url = self.url, "invalid url"))?;
				let path = PathBuf::from(path.into_owned());
				self.connect_unix_h2(&path).await
			},
			"http" => {
				let host = self
					.url
					.host_str()
					.ok_or_else(|| tg::error!(%url = self.url, "invalid url"))?;
				let port = self
					.url
					.port_or_known_default()
					.ok_or_else(|| tg::error!(%url = self.url, "invalid url"))?;
				self.connect_tcp_h2(host, port).await
			},
			scheme => Err(tg::error!(%scheme, "unsupported url scheme")),
		}
	}

	async fn connect_unix_h2(&self, path: &Path) -> tg::Result<Sender> {
		// Connect via UNIX.
		let stream = UnixStream::connect(path).await.map_err(
			|source| tg::error!(!source, %path = path.display(), "failed to connect to the socket"),
		)?;

		// Perform the HTTP handshake.
		let executor = hyper_util::rt::TokioExecutor::new();
		let io = hyper_util::rt::TokioIo::new(stream);
		let (mut sender, connection) = hyper::client::conn::http2::handshake(executor, io)
			.await
			.map_err(|source| tg::error!(!source, "failed to perform the HTTP handshake"))?;

		// Spawn the connection.
		tokio::spawn(async move {
			connection
				.await
				.inspect_err(|error| {
					tracing::error!(error = ?error, "the connection failed");
				})
				.ok();
		});

		// Wait for the sender to be ready.
		sender
			.ready()
			.await
			.map_err(|source| tg::error!(!source, "failed to ready the sender"))?;

		Ok(sender)
	}

	async fn connect_tcp_h2(&self, host: &str, port: u16) -> tg::Result<Sender> {
		// Connect via TCP.
		let stream = TcpStream::connect(format!("{host}:{port}"))
			.await
			.map_err(|source| tg::error!(!source, %host, %port, "failed to create the TCP connection"))?;
		stream.set_nodelay(true).ok();

		// Perform the HTTP handshake.
		let executor = hyper_util::rt::TokioExecutor::new();
		let io = hyper_util::rt::TokioIo::new(stream);
		let (mut sender, connection) = hyper::client::conn::http2::handshake(executor, io)
			.await
			.map_err(|source| tg::error!(!source, "failed to perform the HTTP handshake"))?;

		// Spawn the connection.
		tokio::spawn(async move {
			connection
				.await
				.inspect_err(|error| {
					tracing::error!(error = ?error, "the connection failed");
				})
				.ok();
		});

		// Wait for the sender to be ready.
		sender
			.ready()
			.await
			.map_err(|source| tg::error!(!source, "failed to ready the sender"))?;

		Ok(sender)
	}

	async fn send(&self, request: http::Request<Body>) -> tg::Result<Response> {
		if !self.options.retries.is_empty() && request.body().try_clone().is_some() {
			self.send_with_retry(request).await
		} else {
			self.send_without_retry(request).await
		}
	}

	async fn send_with_retry(&self, request: http::Request<Body>) -> tg::Result<Response> {
		let mut retries = self.options.retries.iter().copied().collect::<VecDeque<_>>();
		let (head, body) = request.into_parts();
		loop {
			let body = body
				.try_clone()
				.ok_or_else(|| tg::error!("failed to clone the request body"))?;
			let request = http::Request::from_parts(head.clone(), body);
			let result = self.send_without_retry(request).await;
			let retry = match &result {
				Ok(response) => response.status().is_server_error(),
				Err(_) => true,
			};
			if retry {
				if let Some(duration) = retries.pop_front() {
					tracing::debug!(?duration, "retrying the request");
					tokio::time::sleep(duration).await;
					continue;
				}
			}
			return result;
		}
	}

	async fn send_without_retry(&self, request: http::Request<Body>) -> tg::Result<Response> {
		let send = async {
			let mut sender = self.sender().boxed().await?;
			sender
				.send_request(request)
				.await
				.map_err(|source| tg::error!(!source, "failed to send the request"))
		};
		match self.options.timeout {
			Some(timeout) => tokio::time::timeout(timeout, send)
				.await
				.map_err(|source| tg::error!(!source, ?timeout, "the request timed out"))?,
			None => send.await,
		}
	}
}

impl tg::Dispatch for Client {
	fn dispatch(
		&self,
		operation: tg::Operation,
		payload: serde_json::Value,
	) -> impl Future<Output = tg::Result<Option<serde_json::Value>>> + Send {
		self.dispatch(operation, payload)
	}
}

impl tg::Handle for Client {
	fn add_tag_to_entity(
		&self,
		arg: tg::tag::add::Arg,
	) -> impl Future<Output = tg::Result<()>> + Send {
		let proxy = tg::Proxy::new(self.clone());
		async move { proxy.add_tag_to_entity(arg).await }
	}

	fn remove_tag_from_entity(
		&self,
		arg: tg::tag::remove::Arg,
	) -> impl Future<Output = tg::Result<()>> + Send {
		let proxy = tg::Proxy::new(self.clone());
		async move { proxy.remove_tag_from_entity(arg).await }
	}

	fn set_entity_tags(
		&self,
		arg: tg::tag::set::Arg,
	) -> impl Future<Output = tg::Result<()>> + Send {
		let proxy = tg::Proxy::new(self.clone());
		async move { proxy.set_entity_tags(arg).await }
	}
}

impl std::ops::Deref for Client {
	type Target = Inner;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

#[cfg(test)]
mod tests {
	use {
		crate::prelude::*,
		std::time::{Duration, Instant},
	};

	#[test]
	fn options_from_json() {
		let options: tg::client::Options = serde_json::from_value(serde_json::json!({
			"token": "secret",
			"retries": [0.1, 1],
			"timeout": 2.5,
		}))
		.unwrap();
		assert_eq!(options.token.as_deref(), Some("secret"));
		assert_eq!(
			options.retries,
			[Duration::from_millis(100), Duration::from_secs(1)]
		);
		assert_eq!(options.timeout, Some(Duration::from_millis(2500)));
	}

	#[tokio::test]
	async fn unsupported_scheme() {
		let url = "ftp://localhost".parse().unwrap();
		let client = tg::Client::new(url, tg::client::Options::default());
		let error = client
			.dispatch(tg::Operation::AddTagToEntity, serde_json::json!({}))
			.await
			.unwrap_err();
		assert_eq!(error.message, "unsupported url scheme");
		assert_eq!(error.values["scheme"], "ftp");
	}

	#[test]
	fn with_vars() {
		let vars = std::collections::BTreeMap::from([
			("TAGKIT_URL", "http://localhost:8476"),
			("TAGKIT_TOKEN", "secret"),
		]);
		let client =
			tg::Client::with_vars(|name| vars.get(name).map(ToString::to_string)).unwrap();
		assert_eq!(client.url().as_str(), "http://localhost:8476/");
		assert_eq!(client.options.token.as_deref(), Some("secret"));
		assert!(client.options.retries.is_empty());

		let error = tg::Client::with_vars(|_| None).unwrap_err();
		assert_eq!(
			error.message,
			"failed to get the TAGKIT_URL environment variable"
		);

		let error = tg::Client::with_vars(|_| Some("not a url".to_owned())).unwrap_err();
		assert_eq!(
			error.message,
			"could not parse a URL from the TAGKIT_URL environment variable"
		);
	}

	#[tokio::test]
	async fn failed_connections_are_retried_on_schedule() {
		let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
		let address = listener.local_addr().unwrap();
		drop(listener);
		let url = format!("http://{address}").parse().unwrap();
		let options = tg::client::Options {
			retries: vec![Duration::from_millis(100), Duration::from_millis(100)],
			..Default::default()
		};
		let client = tg::Client::new(url, options);
		let start = Instant::now();
		let error = client
			.dispatch(tg::Operation::AddTagToEntity, serde_json::json!({}))
			.await
			.unwrap_err();
		assert!(start.elapsed() >= Duration::from_millis(200));
		assert_eq!(error.message, "failed to create the TCP connection");
	}

	#[tokio::test]
	async fn requests_time_out() {
		let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
		let address = listener.local_addr().unwrap();
		let peer = tokio::spawn(async move {
			// Accept the connection and never answer.
			let (_stream, _) = listener.accept().await.unwrap();
			std::future::pending::<()>().await;
		});
		let url = format!("http://{address}").parse().unwrap();
		let options = tg::client::Options {
			timeout: Some(Duration::from_millis(200)),
			..Default::default()
		};
		let client = tg::Client::new(url, options);
		let start = Instant::now();
		let error = client
			.dispatch(tg::Operation::SetEntityTags, serde_json::json!({}))
			.await
			.unwrap_err();
		assert!(start.elapsed() >= Duration::from_millis(200));
		assert!(start.elapsed() < Duration::from_secs(10));
		assert_eq!(error.message, "the request timed out");
		peer.abort();
	}

	#[tokio::test]
	async fn connection_failures_surface_as_errors() {
		let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
		let address = listener.local_addr().unwrap();
		drop(listener);
		let url = format!("http://{address}").parse().unwrap();
		let client = tg::Client::new(url, tg::client::Options::default());
		let error = client
			.dispatch(tg::Operation::SetEntityTags, serde_json::json!({}))
			.await
			.unwrap_err();
		assert_eq!(error.message, "failed to create the TCP connection");
		assert!(!client.connected().await);
	}
}
