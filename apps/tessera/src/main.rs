use clap::Parser;

fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = tessera::Args::parse();
	tessera::run(args)
}
