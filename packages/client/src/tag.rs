pub mod add;
pub mod remove;
pub mod set;

/// The entity a set of tags is attached to, for example a blog post or a page.
#[derive(
	Clone,
	Debug,
	PartialEq,
	Eq,
	PartialOrd,
	Ord,
	Hash,
	serde::Deserialize,
	serde::Serialize,
)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
	pub entity_type: String,
	pub entity_id: String,
}

impl Entity {
	#[must_use]
	pub fn new(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
		Self {
			entity_type: entity_type.into(),
			entity_id: entity_id.into(),
		}
	}
}

impl std::fmt::Display for Entity {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}/{}", self.entity_type, self.entity_id)
	}
}
