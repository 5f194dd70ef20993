use std::{collections::BTreeMap, sync::Arc};

/// A result alias that defaults to `Error` as the error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// An error.
#[derive(Clone, Debug, derive_more::Display, serde::Deserialize, serde::Serialize)]
#[display("{message}")]
pub struct Error {
	/// The error's code.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub code: Option<Code>,

	/// The error's message.
	pub message: String,

	/// The location where the error occurred.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub location: Option<Location>,

	/// The error's source.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub source: Option<Arc<Error>>,

	/// Values associated with the error.
	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	pub values: BTreeMap<String, String>,
}

/// An error code. Codes survive the trip over the wire and map to HTTP statuses.
#[derive(
	Clone,
	Copy,
	Debug,
	PartialEq,
	Eq,
	Hash,
	derive_more::Display,
	serde::Deserialize,
	serde::Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Code {
	#[display("bad_request")]
	BadRequest,
	#[display("unauthorized")]
	Unauthorized,
	#[display("forbidden")]
	Forbidden,
	#[display("not_found")]
	NotFound,
	#[display("conflict")]
	Conflict,
}

/// An error location.
#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct Location {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub symbol: Option<String>,
	pub file: String,
	pub line: u32,
	pub column: u32,
}

pub struct Trace<'a> {
	pub error: &'a Error,
	pub internal: bool,
}

impl Error {
	/// Render the error and its sources, one per line. Locations are included when `internal` is set.
	#[must_use]
	pub fn trace(&self, internal: bool) -> Trace<'_> {
		Trace {
			error: self,
			internal,
		}
	}

	/// Get the first code in the error's source chain.
	#[must_use]
	pub fn code(&self) -> Option<Code> {
		let mut error = self;
		loop {
			if let Some(code) = error.code {
				return Some(code);
			}
			error = error.source.as_deref()?;
		}
	}
}

impl Code {
	#[must_use]
	pub fn status(self) -> http::StatusCode {
		match self {
			Self::BadRequest => http::StatusCode::BAD_REQUEST,
			Self::Unauthorized => http::StatusCode::UNAUTHORIZED,
			Self::Forbidden => http::StatusCode::FORBIDDEN,
			Self::NotFound => http::StatusCode::NOT_FOUND,
			Self::Conflict => http::StatusCode::CONFLICT,
		}
	}

	#[must_use]
	pub fn from_status(status: http::StatusCode) -> Option<Self> {
		match status {
			http::StatusCode::BAD_REQUEST => Some(Self::BadRequest),
			http::StatusCode::UNAUTHORIZED => Some(Self::Unauthorized),
			http::StatusCode::FORBIDDEN => Some(Self::Forbidden),
			http::StatusCode::NOT_FOUND => Some(Self::NotFound),
			http::StatusCode::CONFLICT => Some(Self::Conflict),
			_ => None,
		}
	}
}

/// Convert any error, boxed or not, into an [Error] to be used as a source.
#[doc(hidden)]
pub fn source<E>(error: E) -> Error
where
	E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
{
	let error: Box<dyn std::error::Error + Send + Sync + 'static> = error.into();
	error.into()
}

impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		self.source
			.as_ref()
			.map(|source| source.as_ref() as &(dyn std::error::Error + 'static))
	}
}

impl From<Box<dyn std::error::Error + Send + Sync + 'static>> for Error {
	fn from(value: Box<dyn std::error::Error + Send + Sync + 'static>) -> Self {
		match value.downcast::<Error>() {
			Ok(error) => *error,
			Err(error) => Self {
				code: None,
				message: error.to_string(),
				location: None,
				source: error.source().map(Into::into).map(Arc::new),
				values: BTreeMap::new(),
			},
		}
	}
}

impl From<&(dyn std::error::Error + 'static)> for Error {
	fn from(value: &(dyn std::error::Error + 'static)) -> Self {
		if let Some(error) = value.downcast_ref::<Error>() {
			return error.clone();
		}
		Self {
			code: None,
			message: value.to_string(),
			location: None,
			source: value.source().map(Into::into).map(Arc::new),
			values: BTreeMap::new(),
		}
	}
}

impl std::fmt::Display for Trace<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let mut error = Some(self.error);
		while let Some(current) = error {
			write!(f, "-> {}", current.message)?;
			if let Some(code) = current.code {
				write!(f, " ({code})")?;
			}
			writeln!(f)?;
			if self.internal {
				if let Some(location) = &current.location {
					writeln!(f, "   {location}")?;
				}
			}
			for (name, value) in &current.values {
				writeln!(f, "   {name} = {value}")?;
			}
			error = current.source.as_deref();
		}
		Ok(())
	}
}

impl std::fmt::Display for Location {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}:{}:{}", self.file, self.line + 1, self.column + 1)?;
		if let Some(symbol) = &self.symbol {
			write!(f, " {symbol}")?;
		}
		Ok(())
	}
}

/// Generate an [Error].
///
/// Usage:
/// ```rust
/// use tagkit_client as tg;
/// tg::error!("error message");
/// tg::error!("error message with interpolation {}", 42);
///
/// let name = "value";
/// tg::error!(%name, "error message with a named value (pretty printed)");
/// tg::error!(?name, "error message with a named value (debug printed)");
///
/// tg::error!(code = tg::error::Code::NotFound, "an error with a code");
///
/// let error = std::io::Error::last_os_error();
/// tg::error!(source = error, "an error that wraps an existing error");
/// ```
#[macro_export]
macro_rules! error {
	({ $error:ident }, %$name:ident, $($arg:tt)*) => {
		$error.values.insert(stringify!($name).to_owned(), $name.to_string());
		$crate::error!({ $error }, $($arg)*)
	};
	({ $error:ident }, ?$name:ident, $($arg:tt)*) => {
		$error.values.insert(stringify!($name).to_owned(), format!("{:?}", $name));
		$crate::error!({ $error }, $($arg)*)
	};
	({ $error:ident }, %$name:ident = $value:expr, $($arg:tt)*) => {
		$error.values.insert(stringify!($name).to_owned(), $value.to_string());
		$crate::error!({ $error }, $($arg)*)
	};
	({ $error:ident }, ?$name:ident = $value:expr, $($arg:tt)*) => {
		$error.values.insert(stringify!($name).to_owned(), format!("{:?}", $value));
		$crate::error!({ $error }, $($arg)*)
	};
	({ $error:ident }, !$source:expr, $($arg:tt)*) => {
		$error.source.replace(std::sync::Arc::new($crate::error::source($source)));
		$crate::error!({ $error }, $($arg)*)
	};
	({ $error:ident }, source = $source:expr, $($arg:tt)*) => {
		$error.source.replace(std::sync::Arc::new($crate::error::source($source)));
		$crate::error!({ $error }, $($arg)*)
	};
	({ $error:ident }, code = $code:expr, $($arg:tt)*) => {
		$error.code = Some($code);
		$crate::error!({ $error }, $($arg)*)
	};
	({ $error:ident }, $($arg:tt)*) => {
		$error.message = format!($($arg)*);
	};
	($($arg:tt)*) => {{
		let mut __error = $crate::Error {
			code: None,
			message: String::new(),
			location: Some($crate::error::Location {
				symbol: Some($crate::function!().to_owned()),
				file: file!().to_owned(),
				line: line!() - 1,
				column: column!() - 1,
			}),
			source: None,
			values: std::collections::BTreeMap::new(),
		};
		$crate::error!({ __error }, $($arg)*);
		__error
	}};
}

#[macro_export]
macro_rules! function {
	() => {{
		struct __Dummy {}
		let name = std::any::type_name::<__Dummy>();
		name.strip_suffix("::__Dummy").unwrap_or(name)
	}};
}

#[cfg(test)]
mod tests {
	use crate as tg;

	#[test]
	fn error_macro() {
		let foo = "foo";
		let bar = "bar";
		let error = tg::error!(?foo, %bar, %baz = "baz", ?qux = "qux", "{}", "message");
		assert_eq!(error.message, "message");
		assert_eq!(error.values["foo"], "\"foo\"");
		assert_eq!(error.values["bar"], "bar");
		assert_eq!(error.values["baz"], "baz");
		assert_eq!(error.values["qux"], "\"qux\"");

		let source = std::io::Error::other("an io error");
		let error = tg::error!(!source, "another error");
		let trace = error.trace(false).to_string();
		assert_eq!(trace, "-> another error\n-> an io error\n");
	}

	#[test]
	fn code_is_found_in_the_source_chain() {
		let source = tg::error!(code = tg::error::Code::Conflict, "the entity already has the tag");
		let error = tg::error!(!source, "failed to add the tag");
		assert_eq!(error.code, None);
		assert_eq!(error.code(), Some(tg::error::Code::Conflict));
		let trace = error.trace(false).to_string();
		assert_eq!(
			trace,
			"-> failed to add the tag\n-> the entity already has the tag (conflict)\n"
		);
	}

	#[test]
	fn errors_survive_the_wire() {
		let tag = "7";
		let error = tg::error!(code = tg::error::Code::NotFound, %tag, "the tag was not found");
		let json = serde_json::to_string(&error).unwrap();
		let error: tg::Error = serde_json::from_str(&json).unwrap();
		assert_eq!(error.code, Some(tg::error::Code::NotFound));
		assert_eq!(error.message, "the tag was not found");
		assert_eq!(error.values["tag"], "7");
		assert_eq!(error.code.unwrap().status(), http::StatusCode::NOT_FOUND);
	}

	#[test]
	fn function_macro() {
		let f = tg::function!();
		assert_eq!(f, "tagkit_client::error::tests::function_macro");
	}
}
