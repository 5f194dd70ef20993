use {crate::Cli, tagkit_client::prelude::*};

/// Remove a tag from an entity.
#[derive(Clone, Debug, clap::Args)]
#[group(skip)]
pub struct Args {
	#[arg(index = 1)]
	pub entity_type: String,

	#[arg(index = 2)]
	pub entity_id: String,

	#[arg(index = 3)]
	pub tag: String,
}

impl Cli {
	pub async fn command_tag_remove(&mut self, args: Args) -> tg::Result<()> {
		let handle = self.handle().await?;
		let arg = tg::tag::remove::Arg {
			entity_id: args.entity_id,
			entity_type: args.entity_type,
			tag_id: args.tag,
		};
		let entity = arg.entity();
		handle
			.remove_tag_from_entity(arg)
			.await
			.map_err(|source| tg::error!(!source, %entity, "failed to remove the tag"))?;
		Self::print_entity_tags(&handle, &entity)?;
		Ok(())
	}
}
