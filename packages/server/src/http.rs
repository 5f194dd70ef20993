use {
	crate::Server,
	futures::{FutureExt as _, future},
	std::{convert::Infallible, os::unix::fs::FileTypeExt as _, path::PathBuf, pin::pin},
	tagkit_client::{operation::Binding, prelude::*},
	tagkit_http::{Body, request::Ext as _, response::builder::Ext as _},
	tokio::net::{TcpListener, UnixListener},
	tokio_util::sync::CancellationToken,
	tower::ServiceExt as _,
	url::Url,
};

pub type Listener = tokio_util::either::Either<UnixListener, TcpListener>;

impl Server {
	pub async fn listen(url: &Url) -> tg::Result<Listener> {
		let listener = match url.scheme() {
			"http+unix" => {
				let path = url
					.host_str()
					.ok_or_else(|| tg::error!(%url, "invalid url"))?;
				let path = urlencoding::decode(path)
					.map_err(|source| tg::error!(!source, %url, "invalid url"))?;
				let path = PathBuf::from(path.into_owned());

				// Remove a stale socket.
				if let Ok(metadata) = tokio::fs::symlink_metadata(&path).await {
					if metadata.file_type().is_socket() {
						tokio::fs::remove_file(&path).await.ok();
					}
				}

				let listener = UnixListener::bind(&path).map_err(
					|source| tg::error!(!source, %path = path.display(), "failed to bind"),
				)?;
				tokio_util::either::Either::Left(listener)
			},
			"http" => {
				let host = url
					.host_str()
					.ok_or_else(|| tg::error!(%url, "invalid url"))?;
				let port = url
					.port_or_known_default()
					.ok_or_else(|| tg::error!(%url, "invalid url"))?;
				let listener = TcpListener::bind(format!("{host}:{port}"))
					.await
					.map_err(|source| tg::error!(!source, %host, %port, "failed to bind"))?;
				tokio_util::either::Either::Right(listener)
			},
			scheme => {
				return Err(tg::error!(%scheme, "unsupported url scheme"));
			},
		};
		Ok(listener)
	}

	/// Serve connections from the listener until `stop` is cancelled. Connections that are open when it is cancelled are shut down gracefully.
	pub async fn serve(&self, listener: Listener, stop: CancellationToken) {
		// Create the task tracker.
		let task_tracker = tokio_util::task::TaskTracker::new();

		// Create the service.
		let service = tower::ServiceBuilder::new()
			.layer(
				tagkit_http::layer::tracing::TracingLayer::new().operation(|request| {
					tg::Operation::from_route(request.method(), request.uri().path())
						.map(tg::Operation::name)
				}),
			)
			.layer(tower_http::timeout::TimeoutLayer::with_status_code(
				http::StatusCode::REQUEST_TIMEOUT,
				self.config.http.timeout,
			))
			.service_fn({
				let server = self.clone();
				move |request| {
					let server = server.clone();
					async move {
						let response = Self::handle_request(&server, request).await;
						Ok::<_, Infallible>(response)
					}
				}
			})
			.map_request(|request: http::Request<hyper::body::Incoming>| {
				request.map(Body::with_body)
			});

		loop {
			// Accept a new connection.
			let accept = async {
				let stream = match &listener {
					tokio_util::either::Either::Left(listener) => {
						tokio_util::either::Either::Left(listener.accept().await?.0)
					},
					tokio_util::either::Either::Right(listener) => {
						let stream = listener.accept().await?.0;
						stream.set_nodelay(true).ok();
						tokio_util::either::Either::Right(stream)
					},
				};
				Ok::<_, std::io::Error>(stream)
			};
			let stream = match future::select(pin!(accept), pin!(stop.cancelled())).await {
				future::Either::Left((result, _)) => match result {
					Ok(stream) => stream,
					Err(error) => {
						tracing::error!(?error, "failed to accept a connection");
						continue;
					},
				},
				future::Either::Right(((), _)) => {
					break;
				},
			};

			// Spawn a task to serve the connection.
			task_tracker.spawn({
				let service = service.clone();
				let stop = stop.clone();
				async move {
					let executor = hyper_util::rt::TokioExecutor::new();
					let builder = hyper_util::server::conn::auto::Builder::new(executor);
					let service = hyper_util::service::TowerToHyperService::new(service);
					let stream = hyper_util::rt::TokioIo::new(stream);
					let connection = builder.serve_connection(stream, service);
					let result = match future::select(pin!(connection), pin!(stop.cancelled()))
						.await
					{
						future::Either::Left((result, _)) => result,
						future::Either::Right(((), mut connection)) => {
							connection.as_mut().graceful_shutdown();
							connection.await
						},
					};
					result
						.inspect_err(|error| {
							tracing::trace!(?error, "connection failed");
						})
						.ok();
				}
			});
		}

		// Wait for all tasks to finish.
		task_tracker.close();
		task_tracker.wait().await;
	}

	#[tracing::instrument(level = "trace", name = "request", skip_all, fields(method, path))]
	async fn handle_request(server: &Server, request: http::Request<Body>) -> http::Response<Body> {
		let span = tracing::Span::current();
		span.record("method", request.method().as_str());
		span.record("path", request.uri().path());

		let method = request.method().clone();
		let path = request.uri().path().to_owned();
		let response = match tg::Operation::from_route(&method, &path) {
			Some(operation) => async move {
				server.authorize(&request)?;
				match operation {
					tg::Operation::AddTagToEntity => {
						server.handle_add_tag_to_entity_request(request).await
					},
					tg::Operation::RemoveTagFromEntity => {
						server.handle_remove_tag_from_entity_request(request).await
					},
					tg::Operation::SetEntityTags => {
						server.handle_set_entity_tags_request(request).await
					},
				}
			}
			.boxed(),
			None => future::err(tg::error!(
				code = tg::error::Code::NotFound,
				%method,
				%path,
				"not found"
			))
			.boxed(),
		}
		.await;

		// Handle an error.
		response.unwrap_or_else(|error| {
			let status = error
				.code()
				.map_or(http::StatusCode::INTERNAL_SERVER_ERROR, tg::error::Code::status);
			if status.is_server_error() {
				tracing::error!(error = %error.trace(true));
			} else {
				tracing::debug!(error = %error.trace(false), %status);
			}
			http::Response::builder()
				.status(status)
				.json(&error)
				.ok()
				.and_then(Result::ok)
				.unwrap_or_else(|| {
					let mut response = http::Response::new(Body::empty());
					*response.status_mut() = status;
					response
				})
		})
	}

	fn authorize(&self, request: &http::Request<Body>) -> tg::Result<()> {
		let Some(authorization) = &self.config.authorization else {
			return Ok(());
		};
		match request.token() {
			Some(token) if token == authorization.token => Ok(()),
			Some(_) => Err(tg::error!(
				code = tg::error::Code::Unauthorized,
				"invalid token"
			)),
			None => Err(tg::error!(
				code = tg::error::Code::Unauthorized,
				"missing token"
			)),
		}
	}

	/// Read the arg of an operation from the body or the query string, according to the operation's route.
	pub(crate) async fn read_arg<T>(
		operation: tg::Operation,
		request: http::Request<Body>,
	) -> tg::Result<T>
	where
		T: serde::de::DeserializeOwned,
	{
		match operation.route().binding {
			Binding::Body => request.json().await.map_err(|source| {
				tg::error!(
					!source,
					code = tg::error::Code::BadRequest,
					%operation,
					"failed to deserialize the request body"
				)
			}),
			Binding::Query => request
				.query_params()
				.ok_or_else(|| {
					tg::error!(
						code = tg::error::Code::BadRequest,
						%operation,
						"missing query string"
					)
				})?
				.map_err(|source| {
					tg::error!(
						!source,
						code = tg::error::Code::BadRequest,
						%operation,
						"failed to deserialize the query string"
					)
				}),
		}
	}

	pub(crate) fn empty_response() -> tg::Result<http::Response<Body>> {
		http::Response::builder()
			.ok()
			.empty()
			.map_err(|source| tg::error!(!source, "failed to create the response"))
	}
}
