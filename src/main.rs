use clap::Parser;
use std::process::ExitCode;
use trainer_etl::utils::{logger, validation::Validate};
use trainer_etl::{CliConfig, EtlEngine, EtlError, LocalStorage, Result, TrainerPipeline};

fn main() -> ExitCode {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting trainer-etl");
    tracing::debug!("CLI config: {:?}", cli);

    match run(&cli) {
        Ok(output_path) => {
            println!("✅ JSON file saved as {}", output_path);
            ExitCode::SUCCESS
        }
        Err(e) => {
            report(&e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: &CliConfig) -> Result<String> {
    let config = cli.resolve()?;
    config.validate()?;

    let storage = LocalStorage::new(String::new());
    let pipeline = TrainerPipeline::new(storage, config);

    EtlEngine::new(pipeline).run()
}

fn report(e: &EtlError) {
    tracing::error!("❌ Conversion failed: {} (Category: {:?})", e, e.category());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
}
