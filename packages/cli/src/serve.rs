use {
	crate::Cli,
	tagkit_client::prelude::*,
	tagkit_server::Server,
	tokio_util::sync::CancellationToken,
	url::Url,
};

/// Run the server in the foreground.
#[derive(Clone, Debug, clap::Args)]
#[group(skip)]
pub struct Args {
	/// Override the `server.http.url` key in the config.
	#[arg(long, short)]
	pub url: Option<Url>,
}

impl Cli {
	pub async fn command_serve(&mut self, args: Args) -> tg::Result<()> {
		let config = self
			.config
			.as_ref()
			.map(|config| config.server.clone())
			.unwrap_or_default();

		// Get the url.
		let url = match args.url.or(config.http.url.clone()) {
			Some(url) => url,
			None => Server::DEFAULT_URL
				.parse()
				.map_err(|source| tg::error!(!source, "failed to parse the default url"))?,
		};

		// Bind.
		let listener = Server::listen(&url)
			.await
			.map_err(|source| tg::error!(!source, %url, "failed to listen"))?;
		tracing::info!(%url, "serving");

		// Stop the server on the first interrupt signal and exit the process on the second.
		let stop = CancellationToken::new();
		tokio::spawn({
			let stop = stop.clone();
			async move {
				tokio::signal::ctrl_c().await.ok();
				stop.cancel();
				tokio::signal::ctrl_c().await.ok();
				std::process::exit(130);
			}
		});

		// Serve.
		let server = Server::new(config);
		server.serve(listener, stop).await;

		Ok(())
	}
}
