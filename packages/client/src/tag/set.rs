use crate::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Arg {
	pub entity_id: String,
	pub entity_type: String,

	/// The tags the entity should have once the call completes, in order.
	#[serde(default)]
	pub tags: Vec<String>,
}

impl Arg {
	#[must_use]
	pub fn entity(&self) -> tg::tag::Entity {
		tg::tag::Entity::new(&self.entity_type, &self.entity_id)
	}
}

impl<D> tg::Proxy<D>
where
	D: tg::Dispatch,
{
	pub async fn set_entity_tags(&self, arg: Arg) -> tg::Result<()> {
		self.call(tg::Operation::SetEntityTags, arg).await
	}
}
