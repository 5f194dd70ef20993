use {
	clap::Parser as _,
	either::Either,
	futures::FutureExt as _,
	owo_colors::OwoColorize as _,
	std::path::PathBuf,
	tagkit_client::prelude::*,
	tagkit_server::Server,
	tracing_subscriber::prelude::*,
	url::Url,
};

mod serve;
mod tag;

pub use self::config::Config;

pub mod config;

type Handle = Either<tg::Proxy<tg::Client>, Server>;

pub struct Cli {
	args: Args,
	config: Option<Config>,
	handle: Option<Handle>,
}

#[derive(Clone, Debug, clap::Parser)]
#[command(
	about = "Tag entities locally or through a remote entity tag service.",
	arg_required_else_help = true,
	disable_help_subcommand = true,
	name = "tagkit",
	version
)]
struct Args {
	#[command(subcommand)]
	command: Command,

	/// The path to the config file.
	#[arg(env = "TAGKIT_CONFIG", long, short)]
	config: Option<PathBuf>,

	/// Override the `token` key in the config.
	#[arg(env = "TAGKIT_TOKEN", long)]
	token: Option<String>,

	/// Override the tracing filter.
	#[arg(env = "TAGKIT_TRACING", long)]
	tracing: Option<String>,

	/// Override the `url` key in the config.
	#[arg(env = "TAGKIT_URL", long, short)]
	url: Option<Url>,
}

#[derive(Clone, Debug, clap::Subcommand)]
enum Command {
	Serve(self::serve::Args),
	Tag(self::tag::Args),
}

fn main() -> std::process::ExitCode {
	// Parse the args.
	let args = Args::parse();

	// Read the config.
	let config = match Cli::read_config(args.config.clone()) {
		Ok(config) => config,
		Err(error) => {
			Cli::print_error_message("failed to read the config");
			Cli::print_error(&error);
			return std::process::ExitCode::FAILURE;
		},
	};

	// Initialize tracing.
	Cli::initialize_tracing(config.as_ref(), args.tracing.as_ref());

	// Create the tokio runtime.
	let runtime = match tokio::runtime::Builder::new_multi_thread()
		.enable_all()
		.build()
	{
		Ok(runtime) => runtime,
		Err(error) => {
			Cli::print_error_message(&format!("failed to create the runtime: {error}"));
			return std::process::ExitCode::FAILURE;
		},
	};

	// Create the CLI.
	let mut cli = Cli {
		args,
		config,
		handle: None,
	};

	// Run the command.
	let result = runtime.block_on(cli.command(cli.args.clone()).boxed());

	// Handle the result.
	let exit = match result {
		Ok(()) => std::process::ExitCode::SUCCESS,
		Err(error) => {
			Cli::print_error_message("an error occurred");
			Cli::print_error(&error);
			std::process::ExitCode::FAILURE
		},
	};

	// Drop the handle.
	runtime.block_on(async {
		if let Some(Either::Left(proxy)) = cli.handle.take() {
			proxy.dispatcher().disconnect().await.ok();
		}
	});

	exit
}

impl Cli {
	/// Get the handle, creating it on first use. Commands go to the remote service when a url is configured and to an in-process server otherwise.
	async fn handle(&mut self) -> tg::Result<Handle> {
		// If the handle has already been created, then return it.
		if let Some(handle) = self.handle.clone() {
			return Ok(handle);
		}

		// Create the handle.
		let handle = match self.url() {
			Some(url) => {
				tracing::debug!(%url, "using the remote service");
				let client = tg::Client::new(url.clone(), self.client_options());
				client.connect().await.map_err(
					|source| tg::error!(!source, %url, "failed to connect to the remote service"),
				)?;
				Either::Left(tg::Proxy::new(client))
			},
			None => {
				tracing::debug!("using an in-process server");
				let config = self
					.config
					.as_ref()
					.map(|config| config.server.clone())
					.unwrap_or_default();
				Either::Right(Server::new(config))
			},
		};

		// Set the handle.
		self.handle.replace(handle.clone());

		Ok(handle)
	}

	fn url(&self) -> Option<Url> {
		self.args
			.url
			.clone()
			.or(self.config.as_ref().and_then(|config| config.url.clone()))
	}

	fn client_options(&self) -> tg::client::Options {
		let mut options = self
			.config
			.as_ref()
			.map(|config| config.client.clone())
			.unwrap_or_default();
		let token = self
			.args
			.token
			.clone()
			.or(self.config.as_ref().and_then(|config| config.token.clone()));
		if let Some(token) = token {
			options.token = Some(token);
		}
		options
	}

	// Run the command.
	async fn command(&mut self, args: Args) -> tg::Result<()> {
		match args.command {
			Command::Serve(args) => self.command_serve(args).boxed(),
			Command::Tag(args) => self.command_tag(args).boxed(),
		}
		.await
	}

	fn read_config(path: Option<PathBuf>) -> tg::Result<Option<Config>> {
		let path = match path {
			Some(path) => path,
			None => {
				let Some(home) = std::env::var_os("HOME") else {
					return Ok(None);
				};
				PathBuf::from(home).join(".config/tagkit/config.json")
			},
		};
		let config = match std::fs::read_to_string(&path) {
			Ok(config) => config,
			Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
				return Ok(None);
			},
			Err(source) => {
				return Err(
					tg::error!(!source, %path = path.display(), "failed to read the config file"),
				);
			},
		};
		let config = serde_json::from_str(&config).map_err(
			|source| tg::error!(!source, %path = path.display(), "failed to deserialize the config"),
		)?;
		Ok(Some(config))
	}

	/// Initialize tracing.
	fn initialize_tracing(config: Option<&Config>, tracing_filter: Option<&String>) {
		let config_tracing = config.and_then(|config| config.tracing.as_ref());
		let output_layer = if tracing_filter.is_some() || config_tracing.is_some() {
			let filter_string = tracing_filter
				.or(config_tracing.map(|tracing| &tracing.filter))
				.cloned()
				.unwrap_or_default();
			let filter = tracing_subscriber::filter::EnvFilter::try_new(&filter_string)
				.inspect_err(|error| {
					Self::print_warning_message(&format!("invalid tracing filter: {error}"));
				})
				.ok();
			let format = config_tracing
				.and_then(|tracing| tracing.format)
				.unwrap_or_default();
			filter.map(|filter| {
				let output_layer = match format {
					self::config::TracingFormat::Json => tracing_subscriber::fmt::layer()
						.with_span_events(tracing_subscriber::fmt::format::FmtSpan::FULL)
						.with_writer(std::io::stderr)
						.json()
						.boxed(),
					self::config::TracingFormat::Pretty => tracing_tree::HierarchicalLayer::new(2)
						.with_bracketed_fields(true)
						.with_span_retrace(true)
						.with_targets(true)
						.boxed(),
				};
				output_layer.with_filter(filter)
			})
		} else {
			None
		};
		tracing_subscriber::registry().with(output_layer).init();
		std::panic::set_hook(Box::new(|info| {
			let payload = info.payload_as_str();
			let location = info.location().map(ToString::to_string);
			let backtrace = std::backtrace::Backtrace::force_capture();
			tracing::error!(payload, location, %backtrace, "a panic occurred");
		}));
	}

	fn print_warning_message(string: &str) {
		eprintln!("{} {string}", "warning".yellow().bold());
	}

	fn print_error_message(string: &str) {
		eprintln!("{} {string}", "error".red().bold());
	}

	fn print_error(error: &tg::Error) {
		eprint!("{}", error.trace(false));
	}
}
