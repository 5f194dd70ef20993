use crate as tg;

/// The path of the entity tag endpoints.
pub const PATH: &str = "/api/cms-kit-admin/entity-tags";

/// A remote operation. The name of each operation is the key the remote service routes on and must not change.
#[derive(
	Clone,
	Copy,
	Debug,
	PartialEq,
	Eq,
	Hash,
	serde_with::DeserializeFromStr,
	serde_with::SerializeDisplay,
)]
pub enum Operation {
	AddTagToEntity,
	RemoveTagFromEntity,
	SetEntityTags,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
	pub method: http::Method,
	pub path: &'static str,
	pub binding: Binding,
}

/// Where the payload of a request is carried.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Binding {
	Body,
	Query,
}

impl Operation {
	pub const ALL: [Self; 3] = [
		Self::AddTagToEntity,
		Self::RemoveTagFromEntity,
		Self::SetEntityTags,
	];

	#[must_use]
	pub fn name(self) -> &'static str {
		match self {
			Self::AddTagToEntity => "AddTagToEntityAsync",
			Self::RemoveTagFromEntity => "RemoveTagFromEntityAsync",
			Self::SetEntityTags => "SetEntityTagsAsync",
		}
	}

	#[must_use]
	pub fn route(self) -> Route {
		let (method, binding) = match self {
			Self::AddTagToEntity => (http::Method::POST, Binding::Body),
			Self::RemoveTagFromEntity => (http::Method::DELETE, Binding::Query),
			Self::SetEntityTags => (http::Method::PUT, Binding::Body),
		};
		Route {
			method,
			path: PATH,
			binding,
		}
	}

	#[must_use]
	pub fn from_route(method: &http::Method, path: &str) -> Option<Self> {
		let path = path.strip_suffix('/').unwrap_or(path);
		Self::ALL.into_iter().find(|operation| {
			let route = operation.route();
			&route.method == method && route.path.eq_ignore_ascii_case(path)
		})
	}
}

impl std::fmt::Display for Operation {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.name())
	}
}

impl std::str::FromStr for Operation {
	type Err = tg::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|operation| operation.name() == s)
			.ok_or_else(|| {
				tg::error!(
					code = tg::error::Code::BadRequest,
					%operation = s,
					"invalid operation"
				)
			})
	}
}
