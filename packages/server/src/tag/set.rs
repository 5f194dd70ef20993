use {
	crate::Server,
	std::collections::BTreeSet,
	tagkit_client::prelude::*,
	tagkit_http::Body,
};

impl Server {
	pub async fn set_entity_tags(&self, arg: tg::tag::set::Arg) -> tg::Result<()> {
		let entity = arg.entity();
		super::validate(&entity)?;
		for tag in &arg.tags {
			super::validate_tag(tag)?;
		}
		let tags = arg.tags.into_iter().collect::<BTreeSet<_>>();
		let count = tags.len();
		if tags.is_empty() {
			self.tags.remove(&entity);
		} else {
			self.tags.insert(entity.clone(), tags);
		}
		tracing::debug!(%entity, %count, "set the tags");
		Ok(())
	}

	pub(crate) async fn handle_set_entity_tags_request(
		&self,
		request: http::Request<Body>,
	) -> tg::Result<http::Response<Body>> {
		let arg = Self::read_arg(tg::Operation::SetEntityTags, request).await?;
		self.set_entity_tags(arg).await?;
		Self::empty_response()
	}
}
