use {crate::Server, tagkit_client::prelude::*};

impl Server {
	/// Get the tags of an entity in ascending order, or `None` if the entity has no tags.
	#[must_use]
	pub fn try_get_entity_tags(&self, entity: &tg::tag::Entity) -> Option<Vec<String>> {
		self.tags
			.get(entity)
			.map(|tags| tags.iter().cloned().collect())
	}
}
