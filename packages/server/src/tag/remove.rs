use {crate::Server, tagkit_client::prelude::*, tagkit_http::Body};

impl Server {
	pub async fn remove_tag_from_entity(&self, arg: tg::tag::remove::Arg) -> tg::Result<()> {
		let entity = arg.entity();
		let tag = arg.tag_id;
		super::validate(&entity)?;
		super::validate_tag(&tag)?;
		let removed = self
			.tags
			.get_mut(&entity)
			.is_some_and(|mut tags| tags.remove(&tag));
		if !removed {
			return Err(tg::error!(
				code = tg::error::Code::NotFound,
				%entity,
				%tag,
				"the entity does not have the tag"
			));
		}

		// Drop the entity once its last tag is gone.
		self.tags.remove_if(&entity, |_, tags| tags.is_empty());

		tracing::debug!(%entity, %tag, "removed the tag");
		Ok(())
	}

	pub(crate) async fn handle_remove_tag_from_entity_request(
		&self,
		request: http::Request<Body>,
	) -> tg::Result<http::Response<Body>> {
		let arg = Self::read_arg(tg::Operation::RemoveTagFromEntity, request).await?;
		self.remove_tag_from_entity(arg).await?;
		Self::empty_response()
	}
}
