use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use clap::ArgAction;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use log::LevelFilter;
use sbv2_cli::CliError;
use sbv2_cli::hex::hex_decode;
use sbv2_cli::hex::hex_encode;
use sbv2_layout::Discriminator;
use sbv2_layout::Pubkey;
use sbv2_layout::pubkey_from_base58;
use sbv2_oracle::Cluster;
use serde_json::Value as Json;

#[derive(Parser, Debug)]
#[command(
	name = "sbv2",
	version,
	about = "Decode and build Switchboard v2 oracle program records"
)]
struct Cli {
	#[command(flatten)]
	global: GlobalArgs,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Args, Debug)]
struct GlobalArgs {
	/// Cluster whose program id is used when `--program-id` is not given.
	#[arg(long, global = true, default_value_t = Cluster::Mainnet)]
	cluster: Cluster,

	/// Override the oracle program id.
	#[arg(long, global = true)]
	program_id: Option<String>,

	/// Log more. Repeat for trace output.
	#[arg(short, long, global = true, action = ArgAction::Count)]
	verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// List every known account and instruction schema.
	Schemas {
		/// Print JSON instead of a table.
		#[arg(long)]
		json: bool,
	},
	/// Print the anchor discriminator of a name.
	Discriminator {
		/// Instruction name (`oracle_heartbeat`) or, with `--account`, account
		/// type name (`OracleAccountData`).
		name: String,

		#[arg(long)]
		account: bool,
	},
	/// Decode a wire record to JSON.
	Decode {
		/// Schema to decode as. Detected from the discriminator when omitted.
		#[arg(long)]
		schema: Option<String>,

		#[command(flatten)]
		input: WireInput,
	},
	/// Encode JSON fields as a wire record, printed as hex.
	Encode {
		#[arg(long)]
		schema: String,

		/// JSON file holding the fields. `-` reads stdin.
		#[arg(long)]
		json: PathBuf,
	},
	/// Build an instruction payload as JSON.
	Instruction {
		/// Instruction schema, for example `permission_set`.
		#[arg(long)]
		schema: String,

		/// JSON file holding the `params` fields wrapper. `-` reads stdin.
		#[arg(long)]
		json: PathBuf,

		/// JSON array of base58 account keys, in instruction order.
		#[arg(long)]
		accounts: PathBuf,
	},
	/// Decode an account from an exported snapshot file.
	Fetch {
		/// JSON array of `{ address, owner, data }` accounts.
		#[arg(long)]
		account_file: PathBuf,

		#[arg(long)]
		address: String,

		/// Account schema. Detected from the discriminator when omitted.
		#[arg(long)]
		schema: Option<String>,
	},
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct WireInput {
	/// Wire bytes as hex.
	#[arg(long)]
	hex: Option<String>,

	/// File holding raw wire bytes.
	#[arg(long)]
	file: Option<PathBuf>,
}

fn main() {
	let cli = Cli::parse();
	init_logging(cli.global.verbose);

	if let Err(e) = run(cli) {
		eprintln!("Error: {e}");
		std::process::exit(1);
	}
}

fn init_logging(verbose: u8) {
	let level = match verbose {
		0 => LevelFilter::Warn,
		1 => LevelFilter::Info,
		2 => LevelFilter::Debug,
		_ => LevelFilter::Trace,
	};

	env_logger::Builder::new()
		.filter_level(level)
		.parse_default_env()
		.init();
}

fn run(cli: Cli) -> Result<(), CliError> {
	let registry = sbv2_oracle::registry()?;

	match cli.command {
		Commands::Schemas { json } => {
			if json {
				print_json(&sbv2_cli::schemas_json(registry))?;
			} else {
				println!("{}", sbv2_cli::schemas_table(registry));
			}
		}
		Commands::Discriminator { name, account } => {
			let discriminator = if account {
				Discriminator::for_account(&name)
			} else {
				Discriminator::for_instruction(&name)
			};
			println!("{discriminator}");
		}
		Commands::Decode { schema, input } => {
			let bytes = read_wire(&input)?;
			print_json(&sbv2_cli::decode(registry, schema.as_deref(), &bytes)?)?;
		}
		Commands::Encode { schema, json } => {
			let fields = read_json(&json)?;
			println!("{}", hex_encode(&sbv2_cli::encode(registry, &schema, &fields)?));
		}
		Commands::Instruction {
			schema,
			json,
			accounts,
		} => {
			let fields = read_json(&json)?;
			let accounts: Vec<String> = serde_json::from_value(read_json(&accounts)?)
				.map_err(|source| CliError::json(accounts.display().to_string(), source))?;
			let program_id = program_id(&cli.global)?;
			print_json(&sbv2_cli::instruction(
				registry,
				&schema,
				&fields,
				&accounts,
				program_id,
			)?)?;
		}
		Commands::Fetch {
			account_file,
			address,
			schema,
		} => {
			let source = sbv2_cli::load_snapshot(&account_file)?;
			let address = pubkey_from_base58(&address)?;
			let program_id = program_id(&cli.global)?;
			let record = sbv2_cli::fetch(registry, &source, &address, &program_id, schema.as_deref())?;
			match record {
				Some(record) => print_json(&record)?,
				None => {
					return Err(CliError::AccountNotFound {
						address,
						path: account_file,
					});
				}
			}
		}
	}

	Ok(())
}

fn program_id(global: &GlobalArgs) -> Result<Pubkey, CliError> {
	match &global.program_id {
		Some(text) => Ok(pubkey_from_base58(text)?),
		None => Ok(global.cluster.program_id()),
	}
}

fn read_input(path: &Path) -> Result<Vec<u8>, CliError> {
	if path == Path::new("-") {
		let mut buf = Vec::new();
		std::io::stdin()
			.read_to_end(&mut buf)
			.map_err(|source| CliError::io(path, source))?;
		Ok(buf)
	} else {
		std::fs::read(path).map_err(|source| CliError::io(path, source))
	}
}

fn read_json(path: &Path) -> Result<Json, CliError> {
	let bytes = read_input(path)?;
	serde_json::from_slice(&bytes).map_err(|source| CliError::json(path.display().to_string(), source))
}

fn read_wire(input: &WireInput) -> Result<Vec<u8>, CliError> {
	match (&input.hex, &input.file) {
		(Some(hex), _) => hex_decode(hex),
		(None, Some(file)) => read_input(file),
		(None, None) => Ok(Vec::new()),
	}
}

fn print_json(value: &Json) -> Result<(), CliError> {
	let text = serde_json::to_string_pretty(value).map_err(|source| CliError::json("output", source))?;
	println!("{text}");
	Ok(())
}
