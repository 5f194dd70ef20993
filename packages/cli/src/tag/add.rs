use {crate::Cli, tagkit_client::prelude::*};

/// Add a tag to an entity.
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
	pub async fn command_tag_add(&mut self, args: Args) -> tg::Result<()> {
		let handle = self.handle().await?;
		let arg = tg::tag::add::Arg {
			entity_id: args.entity_id,
			entity_type: args.entity_type,
			tag_id: args.tag,
		};
		let entity = arg.entity();
		handle
			.add_tag_to_entity(arg)
			.await
			.map_err(|source| tg::error!(!source, %entity, "failed to add the tag"))?;
		Self::print_entity_tags(&handle, &entity)?;
		Ok(())
	}
}
