use {crate::Cli, either::Either, tagkit_client::prelude::*};

pub mod add;
pub mod remove;
pub mod set;

/// Manage the tags of entities.
#[derive(Clone, Debug, clap::Args)]
#[group(skip)]
pub struct Args {
	#[command(subcommand)]
	pub command: Command,
}

#[derive(Clone, Debug, clap::Subcommand)]
pub enum Command {
	Add(self::add::Args),
	Remove(self::remove::Args),
	Set(self::set::Args),
}

impl Cli {
	pub async fn command_tag(&mut self, args: Args) -> tg::Result<()> {
		match args.command {
			Command::Add(args) => {
				self.command_tag_add(args).await?;
			},
			Command::Remove(args) => {
				self.command_tag_remove(args).await?;
			},
			Command::Set(args) => {
				self.command_tag_set(args).await?;
			},
		}
		Ok(())
	}

	/// Print the tags of an entity when the handle is an in-process server. A remote service has no operation to read them back.
	fn print_entity_tags(handle: &crate::Handle, entity: &tg::tag::Entity) -> tg::Result<()> {
		let Either::Right(server) = handle else {
			return Ok(());
		};
		let tags = server.try_get_entity_tags(entity).unwrap_or_default();
		let json = serde_json::to_string(&tags)
			.map_err(|source| tg::error!(!source, "failed to serialize the tags"))?;
		println!("{json}");
		Ok(())
	}
}
