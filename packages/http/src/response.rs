use {crate::Error, bytes::Bytes, http_body_util::BodyExt as _};

pub mod builder;

pub trait Ext: Sized {
	fn bytes(self) -> impl Future<Output = Result<Bytes, Error>> + Send;

	/// Deserialize the body as JSON, or return `None` if the body is empty.
	fn optional_json<T>(self) -> impl Future<Output = Result<Option<T>, Error>> + Send
	where
		T: serde::de::DeserializeOwned;
}

impl<B> Ext for http::Response<B>
where
	B: http_body::Body<Data = Bytes> + Send + Unpin + 'static,
	B::Error: Into<Error> + Send,
{
	async fn bytes(self) -> Result<Bytes, Error> {
		Ok(self
			.into_body()
			.collect()
			.await
			.map_err(Into::<Error>::into)?
			.to_bytes())
	}

	async fn optional_json<T>(self) -> Result<Option<T>, Error>
	where
		T: serde::de::DeserializeOwned,
	{
		let bytes = self.bytes().await?;
		if bytes.is_empty() {
			return Ok(None);
		}
		let json = serde_json::from_slice(&bytes)?;
		Ok(Some(json))
	}
}

#[cfg(test)]
mod tests {
	use {super::Ext as _, crate::Body};

	#[tokio::test]
	async fn optional_json() {
		let response = http::Response::new(Body::empty());
		let value = response.optional_json::<serde_json::Value>().await.unwrap();
		assert!(value.is_none());

		let response = http::Response::new(Body::with_bytes(r#"{"ok":true}"#));
		let value = response.optional_json::<serde_json::Value>().await.unwrap();
		assert_eq!(value, Some(serde_json::json!({ "ok": true })));
	}
}
