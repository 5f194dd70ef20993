use {
	crate::{Request, Response},
	std::{sync::Arc, time::Instant},
	tower::ServiceExt as _,
};

type Classify = Arc<dyn Fn(&Request) -> Option<&'static str> + Send + Sync>;

/// A layer that logs each request with its resolved operation, status, and latency.
#[derive(Clone, Default)]
pub struct TracingLayer {
	operation: Option<Classify>,
}

impl TracingLayer {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Name the operation a request resolves to. Requests that resolve to nothing are logged without one.
	#[must_use]
	pub fn operation<F>(mut self, classify: F) -> Self
	where
		F: Fn(&Request) -> Option<&'static str> + Send + Sync + 'static,
	{
		self.operation = Some(Arc::new(classify));
		self
	}
}

impl<S> tower::layer::Layer<S> for TracingLayer
where
	S: tower::Service<Request, Response = Response> + Clone + Send + Sync + 'static,
	S::Future: Send + 'static,
	S::Error: Send + 'static,
{
	type Service = tower::util::BoxCloneSyncService<Request, Response, S::Error>;

	fn layer(&self, service: S) -> Self::Service {
		let layer = self.clone();
		tower::util::BoxCloneSyncService::new(tower::service_fn(move |request: Request| {
			let layer = layer.clone();
			let mut service = service.clone();
			async move {
				let operation = layer
					.operation
					.as_ref()
					.and_then(|classify| classify(&request));
				let method = request.method().clone();
				let path = request.uri().path().to_owned();
				tracing::trace!(headers = ?request.headers(), %method, %path, operation, "request");
				let start = Instant::now();
				let response = service.ready().await?.call(request).await?;
				let elapsed = start.elapsed();
				let status = response.status();
				if status.is_server_error() {
					tracing::warn!(%method, %path, operation, %status, ?elapsed, "response");
				} else {
					tracing::debug!(%method, %path, operation, %status, ?elapsed, "response");
				}
				Ok(response)
			}
		}))
	}
}
