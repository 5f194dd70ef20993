use {
	crate::{Body, Error},
	bytes::Bytes,
};

pub trait Ext: Sized {
	fn empty(self) -> http::Result<http::Request<Body>>;

	fn bytes<T>(self, value: T) -> http::Result<http::Request<Body>>
	where
		T: Into<Bytes>;

	fn json<T>(self, value: T) -> Result<http::Result<http::Request<Body>>, Error>
	where
		T: serde::Serialize;

	fn query<T>(self, value: &T) -> Result<Self, Error>
	where
		T: serde::Serialize;
}

impl Ext for http::request::Builder {
	fn empty(self) -> http::Result<http::Request<Body>> {
		self.header(
			http::header::CONTENT_LENGTH,
			http::HeaderValue::from_static("0"),
		)
		.body(Body::empty())
	}

	fn bytes<T>(self, value: T) -> http::Result<http::Request<Body>>
	where
		T: Into<Bytes>,
	{
		let value = value.into();
		self.header(http::header::CONTENT_LENGTH, value.len())
			.body(Body::with_bytes(value))
	}

	fn json<T>(self, value: T) -> Result<http::Result<http::Request<Body>>, Error>
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

	/// Append a query string to the builder's URI.
	fn query<T>(self, value: &T) -> Result<Self, Error>
	where
		T: serde::Serialize,
	{
		let query = serde_urlencoded::to_string(value)?;
		if query.is_empty() {
			return Ok(self);
		}
		let uri = self
			.uri_ref()
			.map(ToString::to_string)
			.ok_or("the builder has no uri")?;
		let separator = if uri.contains('?') { '&' } else { '?' };
		Ok(self.uri(format!("{uri}{separator}{query}")))
	}
}

#[cfg(test)]
mod tests {
	use super::Ext as _;

	#[derive(serde::Serialize)]
	struct Query {
		entity: &'static str,
		tag: &'static str,
	}

	#[test]
	fn query_is_appended() {
		let query = Query {
			entity: "Page",
			tag: "a b",
		};
		let request = http::request::Builder::default()
			.uri("/tags")
			.query(&query)
			.unwrap()
			.empty()
			.unwrap();
		assert_eq!(request.uri(), "/tags?entity=Page&tag=a+b");
	}

	#[test]
	fn json_sets_content_type() {
		let request = http::request::Builder::default()
			.uri("/tags")
			.json(serde_json::json!({ "tag": "blue" }))
			.unwrap()
			.unwrap();
		assert_eq!(
			request.headers().get(http::header::CONTENT_TYPE).unwrap(),
			"application/json"
		);
		assert_eq!(
			request.headers().get(http::header::CONTENT_LENGTH).unwrap(),
			"14"
		);
	}
}
