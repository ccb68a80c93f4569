use clap::Parser;
use rds_snapshot_info::cli::Cli;
use rds_snapshot_info::client::AwsCliClient;
use rds_snapshot_info::config::{Config, OutputFormat};
use rds_snapshot_info::error::{ClientError, ClientErrorKind, Error};
use rds_snapshot_info::{logging, platform, query, report};

fn fail(error: Error, output: OutputFormat) -> ! {
    report::print_failure(&error, output);
    std::process::exit(1);
}

fn main() {
    let cli = Cli::parse();
    let fallback_output = if cli.json { OutputFormat::Json } else { OutputFormat::Table };

    let config = match Config::load(&cli) {
        Ok(config) => config,
        Err(e) => fail(e, fallback_output),
    };

    logging::init(config.verbose);

    // conflicting identifiers must fail before anything touches the network
    let filter = cli.filter();
    if let Err(e) = filter.validate() {
        fail(e, config.output);
    }

    if !platform::aws_available(&config.aws_binary) {
        let unavailable = ClientError::new(
            ClientErrorKind::Unavailable,
            format!("aws cli not found or not runnable at {}", config.aws_binary.display()),
        );
        fail(Error::remote(unavailable), config.output);
    }

    let client = AwsCliClient::from_config(&config);
    match query::run(&client, &filter) {
        Ok(result) => report::print(&result, &config),
        Err(e) => fail(e, config.output),
    }
}
