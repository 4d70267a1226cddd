use anyhow::Result;
use clap::Parser;
use voxreport::app::{run_config_show, run_fields_command, run_report_command};
use voxreport::cli::{Cli, Commands, ConfigAction};
use voxreport::config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let config = Config::load_or_default(&config_path)?.with_env_overrides();

    match cli.command {
        Commands::Run {
            audio,
            output,
            template,
            mapping,
            timeout,
        } => run_report_command(config, audio, output, template, mapping, timeout),
        Commands::Fields { template } => run_fields_command(&template),
        Commands::Config { action } => match action {
            ConfigAction::Show => run_config_show(&config),
            ConfigAction::Path => {
                println!("{}", config_path.display());
                Ok(())
            }
        },
    }
}

fn init_tracing(verbosity: u8) {
    let default_filter = match verbosity {
        0 => "voxreport=info",
        1 => "voxreport=debug",
        _ => "voxreport=trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}
