use {tagkit_client as tg, url::Url};

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Config {
	/// Options for the client used when `url` is set.
	#[serde(default)]
	pub client: tg::client::Options,

	#[serde(default)]
	pub server: tagkit_server::Config,

	/// The bearer token sent to the remote service. Takes precedence over `client.token`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub token: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub tracing: Option<Tracing>,

	/// The url of the remote service. Commands run against an in-process server when it is not set.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub url: Option<Url>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Tracing {
	#[serde(default)]
	pub filter: String,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub format: Option<TracingFormat>,
}

#[derive(Clone, Copy, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TracingFormat {
	Json,
	#[default]
	Pretty,
}

#[cfg(test)]
mod tests {
	use super::{Config, TracingFormat};

	#[test]
	fn parse() {
		let config: Config = serde_json::from_value(serde_json::json!({
			"url": "http://localhost:8476",
			"token": "secret",
			"client": { "retries": [0.5], "timeout": 10 },
			"tracing": { "filter": "tagkit_client=debug", "format": "json" },
		}))
		.unwrap();
		assert_eq!(config.url.unwrap().as_str(), "http://localhost:8476/");
		assert_eq!(config.token.as_deref(), Some("secret"));
		assert_eq!(
			config.client.retries,
			[std::time::Duration::from_millis(500)]
		);
		let tracing = config.tracing.unwrap();
		assert_eq!(tracing.filter, "tagkit_client=debug");
		assert!(matches!(tracing.format, Some(TracingFormat::Json)));
		assert!(config.server.authorization.is_none());
	}

	#[test]
	fn empty() {
		let config: Config = serde_json::from_str("{}").unwrap();
		insta::assert_json_snapshot!(config, @r#"
		{
		  "client": {},
		  "server": {
		    "http": {
		      "timeout": 60.0
		    }
		  }
		}
		"#);
	}
}
