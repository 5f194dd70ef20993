use crate::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Arg {
	pub entity_id: String,
	pub entity_type: String,
	pub tag_id: String,
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
	pub async fn add_tag_to_entity(&self, arg: Arg) -> tg::Result<()> {
		self.call(tg::Operation::AddTagToEntity, arg).await
	}
}
