use {crate::Cli, tagkit_client::prelude::*};

/// Replace the tags of an entity. Pass no tags to clear them.
#[derive(Clone, Debug, clap::Args)]
#[group(skip)]
pub struct Args {
	#[arg(index = 1)]
	pub entity_type: String,

	#[arg(index = 2)]
	pub entity_id: String,

	#[arg(index = 3, num_args = 0..)]
	pub tags: Vec<String>,
}

impl Cli {
	pub async fn command_tag_set(&mut self, args: Args) -> tg::Result<()> {
		let handle = self.handle().await?;
		let arg = tg::tag::set::Arg {
			entity_id: args.entity_id,
			entity_type: args.entity_type,
			tags: args.tags,
		};
		let entity = arg.entity();
		handle
			.set_entity_tags(arg)
			.await
			.map_err(|source| tg::error!(!source, %entity, "failed to set the tags"))?;
		Self::print_entity_tags(&handle, &entity)?;
		Ok(())
	}
}
