use {
	crate::{Body, Error},
	bytes::Bytes,
	http_body_util::BodyExt as _,
};

pub mod builder;

pub trait Ext {
	fn query_params<T>(&self) -> Option<Result<T, Error>>
	where
		T: serde::de::DeserializeOwned;

	/// Get the bearer token from an HTTP request.
	fn token(&self) -> Option<&str>;

	fn bytes(self) -> impl Future<Output = Result<Bytes, Error>> + Send;

	fn json<T>(self) -> impl Future<Output = Result<T, Error>> + Send
	where
		T: serde::de::DeserializeOwned;
}

impl Ext for http::Request<Body> {
	fn query_params<T>(&self) -> Option<Result<T, Error>>
	where
		T: serde::de::DeserializeOwned,
	{
		self.uri()
			.query()
			.map(|query| serde_urlencoded::from_str(query).map_err(Into::into))
	}

	fn token(&self) -> Option<&str> {
		self.headers()
			.get(http::header::AUTHORIZATION)
			.and_then(|authorization| authorization.to_str().ok())
			.and_then(|authorization| authorization.split_once(' '))
			.filter(|(name, _)| *name == "Bearer")
			.map(|(_, value)| value)
	}

	async fn bytes(self) -> Result<Bytes, Error> {
		Ok(self.into_body().collect().await?.to_bytes())
	}

	async fn json<T>(self) -> Result<T, Error>
	where
		T: serde::de::DeserializeOwned,
	{
		let bytes = self.bytes().await?;
		let json = serde_json::from_slice(&bytes)?;
		Ok(json)
	}
}

#[cfg(test)]
mod tests {
	use {super::Ext as _, crate::Body};

	#[derive(serde::Deserialize)]
	struct Query {
		name: String,
	}

	#[test]
	fn token_and_query() {
		let request = http::Request::builder()
			.uri("/tags?name=blue")
			.header(http::header::AUTHORIZATION, "Bearer secret")
			.body(Body::empty())
			.unwrap();
		assert_eq!(request.token(), Some("secret"));
		let query = request.query_params::<Query>().unwrap().unwrap();
		assert_eq!(query.name, "blue");
	}

	#[test]
	fn missing_token() {
		let request = http::Request::builder()
			.header(http::header::AUTHORIZATION, "Basic abc")
			.body(Body::empty())
			.unwrap();
		assert_eq!(request.token(), None);
		assert!(request.query_params::<Query>().is_none());
	}
}
