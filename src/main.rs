use clap::Parser;
use log::*;

use kd_admin::{
    Args, Command, Result,
    command::{
        check, check_release_notes, check_version, create_pr, init,
        prepare_release, self_install, self_update,
    },
    error,
};

fn initialize_logger(debug: bool) -> Result<()> {
    let filter = if debug {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };

    let config = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("kd_admin")
        .build();

    simplelog::TermLogger::init(
        filter,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    Ok(())
}

async fn run(command: Command) -> Result<()> {
    match command {
        Command::CreatePr { settings } => create_pr::execute(&settings).await,
        Command::PrepareForRelease { settings } => {
            prepare_release::execute(&settings).await
        }
        Command::Init => init::execute().await,
        Command::Install { version } => {
            self_install::execute(version.as_deref()).await
        }
        Command::Update => self_update::execute().await,
        Command::CheckVersion {
            owner,
            repo,
            version_type,
            version,
        } => {
            check_version::execute(check_version::CheckVersionArgs {
                owner,
                repo,
                version_type,
                version,
            })
            .await
        }
        Command::CheckReleaseNotes {
            release_type,
            version,
        } => check_release_notes::execute(release_type, version).await,
        Command::Check {
            dir,
            ext,
            program,
            args,
        } => check::execute(&dir, &ext, &program, &args).await,
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli_args = Args::parse();

    initialize_logger(cli_args.debug)?;

    let runtime = tokio::runtime::Runtime::new()?;

    if let Err(report) = runtime.block_on(run(cli_args.command)) {
        error!("{report:#}");
        std::process::exit(error::exit_code_for(&report));
    }

    Ok(())
}
