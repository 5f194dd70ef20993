use {crate::Server, tagkit_client::prelude::*, tagkit_http::Body};

impl Server {
	pub async fn add_tag_to_entity(&self, arg: tg::tag::add::Arg) -> tg::Result<()> {
		let entity = arg.entity();
		super::validate(&entity)?;
		super::validate_tag(&arg.tag_id)?;
		let mut tags = self.tags.entry(entity.clone()).or_default();
		if !tags.insert(arg.tag_id.clone()) {
			let tag = arg.tag_id;
			return Err(tg::error!(
				code = tg::error::Code::Conflict,
				%entity,
				%tag,
				"the entity already has the tag"
			));
		}
		tracing::debug!(%entity, tag = %arg.tag_id, "added the tag");
		Ok(())
	}

	pub(crate) async fn handle_add_tag_to_entity_request(
		&self,
		request: http::Request<Body>,
	) -> tg::Result<http::Response<Body>> {
		let arg = Self::read_arg(tg::Operation::AddTagToEntity, request).await?;
		self.add_tag_to_entity(arg).await?;
		Self::empty_response()
	}
}
