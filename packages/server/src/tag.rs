use tagkit_client::prelude::*;

mod add;
mod get;
mod remove;
mod set;

#[cfg(test)]
mod tests;

fn validate(entity: &tg::tag::Entity) -> tg::Result<()> {
	if entity.entity_type.is_empty() {
		return Err(tg::error!(
			code = tg::error::Code::BadRequest,
			"the entity type must not be empty"
		));
	}
	if entity.entity_id.is_empty() {
		return Err(tg::error!(
			code = tg::error::Code::BadRequest,
			"the entity id must not be empty"
		));
	}
	Ok(())
}

fn validate_tag(tag: &str) -> tg::Result<()> {
	if tag.is_empty() {
		return Err(tg::error!(
			code = tg::error::Code::BadRequest,
			"the tag id must not be empty"
		));
	}
	Ok(())
}
