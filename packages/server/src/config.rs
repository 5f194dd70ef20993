use {
	serde_with::{DurationSecondsWithFrac, serde_as},
	std::time::Duration,
	url::Url,
};

#[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub authorization: Option<Authorization>,

	#[serde(default)]
	pub http: Http,
}

/// Requests must carry this bearer token.
#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
#[serde(deny_unknown_fields)]
pub struct Authorization {
	pub token: String,
}

#[serde_as]
#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
#[serde(deny_unknown_fields)]
pub struct Http {
	/// The url to listen on. Falls back to [`crate::Server::DEFAULT_URL`].
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub url: Option<Url>,

	#[serde_as(as = "DurationSecondsWithFrac")]
	#[serde(default = "default_timeout")]
	pub timeout: Duration,
}

impl Default for Http {
	fn default() -> Self {
		Self {
			url: None,
			timeout: default_timeout(),
		}
	}
}

fn default_timeout() -> Duration {
	Duration::from_secs(60)
}

#[cfg(test)]
mod tests {
	use super::Config;

	#[test]
	fn defaults() {
		let config: Config = serde_json::from_str("{}").unwrap();
		assert!(config.authorization.is_none());
		assert!(config.http.url.is_none());
		assert_eq!(config.http.timeout, std::time::Duration::from_secs(60));
	}

	#[test]
	fn parse() {
		let config: Config = serde_json::from_value(serde_json::json!({
			"authorization": { "token": "secret" },
			"http": { "url": "http://localhost:9000", "timeout": 1.5 },
		}))
		.unwrap();
		insta::assert_json_snapshot!(config, @r#"
		{
		  "authorization": {
		    "token": "secret"
		  },
		  "http": {
		    "url": "http://localhost:9000/",
		    "timeout": 1.5
		  }
		}
		"#);
	}

	#[test]
	fn unknown_fields_are_rejected() {
		let result = serde_json::from_str::<Config>(r#"{ "database": {} }"#);
		assert!(result.is_err());
	}
}
