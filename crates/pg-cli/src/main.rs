use pg_core::{init_logging, HostEnvironment};

fn main() -> anyhow::Result<()> {
    let matches = pg_cli::build_cli().get_matches();
    let env = HostEnvironment::from_process();

    let plaything = matches
        .subcommand()
        .and_then(|(_, args)| args.get_one::<String>("plaything"))
        .map_or("pg", String::as_str);
    let guard = init_logging(&env, plaything, None)?;

    let code = pg_cli::run(&matches, env)?;
    drop(guard);
    std::process::exit(code);
}
