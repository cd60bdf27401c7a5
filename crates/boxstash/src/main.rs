//! `boxstash` - web server and CLI for the box inventory.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use clap::Parser;

use boxstash::cli::{Cli, Command, ConfigCommand, ServeCommand};
use boxstash::{init_logging, Config};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let mut config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::Serve(serve_cmd) => handle_serve(&mut config, &serve_cmd),
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

fn handle_serve(config: &mut Config, cmd: &ServeCommand) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(bind) = &cmd.bind {
        config.server.bind = bind.clone();
    }
    if let Some(root) = &cmd.root {
        config.storage.root = Some(root.clone());
    }
    config.validate()?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(boxstash::web::serve(config))?;
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Server]");
                println!("  Bind address:   {}", config.server.bind);
                println!(
                    "  Public URL:     {}",
                    config.server.public.as_deref().unwrap_or("(from request)")
                );
                println!();
                println!("[Storage]");
                println!("  Data root:      {}", config.data_root().display());
                println!();
                println!("[Upload]");
                println!("  Size limit:     {} bytes", config.upload.limit);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
