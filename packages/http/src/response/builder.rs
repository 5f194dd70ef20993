use {
	crate::{Body, Error},
	bytes::Bytes,
};

pub trait Ext: Sized {
	#[must_use]
	fn ok(self) -> Self;

	fn empty(self) -> http::Result<http::Response<Body>>;

	fn bytes<T>(self, value: T) -> http::Result<http::Response<Body>>
	where
		T: Into<Bytes>;

	fn json<T>(self, value: T) -> Result<http::Result<http::Response<Body>>, Error>
	where
		T: serde::Serialize;
}

impl Ext for http::response::Builder {
	fn ok(self) -> Self {
		self.status(http::StatusCode::OK)
	}

	fn empty(self) -> http::Result<http::Response<Body>> {
		self.header(
			http::header::CONTENT_LENGTH,
			http::HeaderValue::from_static("0"),
		)
		.body(Body::empty())
	}

	fn bytes<T>(self, value: T) -> http::Result<http::Response<Body>>
	where
		T: Into<Bytes>,
	{
		let value = value.into();
		self.header(http::header::CONTENT_LENGTH, value.len())
			.body(Body::with_bytes(value))
	}

	fn json<T>(self, value: T) -> Result<http::Result<http::Response<Body>>, Error>
	where
		T: serde::Serialize,
	{
		let value = serde_json::to_string(&value)?;
		Ok(self
			.header(
				http::header::CONTENT_TYPE,
				http::HeaderValue::from_static("application/json"),
			)
			.bytes(value))
	}
}
