use {
	crate::Error,
	bytes::Bytes,
	http_body_util::BodyExt as _,
	std::pin::{Pin, pin},
	sync_wrapper::SyncWrapper,
};

pub enum Body {
	Empty,
	Bytes(Option<Bytes>),
	Boxed(SyncWrapper<Pin<Box<dyn http_body::Body<Data = Bytes, Error = Error> + Send + 'static>>>),
}

impl Body {
	/// Clone the body if it is fully buffered. Streaming bodies cannot be cloned.
	#[must_use]
	pub fn try_clone(&self) -> Option<Self> {
		match self {
			Self::Empty => Some(Self::Empty),
			Self::Bytes(bytes) => Some(Self::Bytes(bytes.clone())),
			Self::Boxed(_) => None,
		}
	}

	#[must_use]
	pub fn empty() -> Self {
		Self::Empty
	}

	pub fn with_bytes<T>(bytes: T) -> Self
	where
		T: Into<Bytes>,
	{
		Self::Bytes(Some(bytes.into()))
	}

	pub fn with_body<B>(body: B) -> Self
	where
		B: http_body::Body<Data = Bytes> + Send + 'static,
		<B as http_body::Body>::Error: Into<Error>,
	{
		Self::Boxed(SyncWrapper::new(Box::pin(body.map_err(Into::into))))
	}
}

impl Default for Body {
	fn default() -> Self {
		Self::empty()
	}
}

impl hyper::body::Body for Body {
	type Data = Bytes;

	type Error = Error;

	fn poll_frame(
		self: Pin<&mut Self>,
		cx: &mut std::task::Context<'_>,
	) -> std::task::Poll<Option<Result<http_body::Frame<Self::Data>, Self::Error>>> {
		match self.get_mut() {
			Body::Empty => std::task::Poll::Ready(None),
			Body::Bytes(option) => {
				std::task::Poll::Ready(option.take().map(hyper::body::Frame::data).map(Ok))
			},
			Body::Boxed(body) => pin!(body.get_mut()).poll_frame(cx),
		}
	}

	fn is_end_stream(&self) -> bool {
		match self {
			Body::Empty | Body::Bytes(None) => true,
			Body::Bytes(Some(_)) | Body::Boxed(_) => false,
		}
	}

	fn size_hint(&self) -> http_body::SizeHint {
		match self {
			Body::Empty | Body::Bytes(None) => http_body::SizeHint::with_exact(0),
			Body::Bytes(Some(bytes)) => http_body::SizeHint::with_exact(bytes.len() as u64),
			Body::Boxed(_) => http_body::SizeHint::default(),
		}
	}
}
