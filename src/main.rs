use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, Command};

use simbank_nav::{
    boot, ivt, navigation::Navigator, terminal::s3270::S3270Session, SimbankConfig,
    TerminalSession,
};

fn main() -> Result<()> {
    boot::init_logger();
    let matches = Command::new("simbank-nav")
        .about("Drive a SimBank 3270 session to the bank main menu")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Path to the TOML configuration file")
                .default_value("simbank.toml"),
        )
        .arg(
            Arg::new("max-recoveries")
                .long("max-recoveries")
                .help("Reconnects allowed while the screen is unrecognised")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            Arg::new("verify")
                .long("verify")
                .help("Check the bank main menu offers its expected options")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let config_path = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or("simbank.toml");
    let mut config = SimbankConfig::from_file(config_path)?;
    if let Some(max) = matches.get_one::<u32>("max-recoveries") {
        config.navigation.max_recoveries = *max;
    }

    let navigator = Navigator::from_config(&config)?;
    log::info!(
        "Navigating {}:{} to application {}",
        config.terminal.host,
        config.terminal.port,
        navigator.application()
    );

    let mut session = S3270Session::spawn(config.terminal.clone())?;
    session.connect().context("initial connect failed")?;

    let report = navigator
        .goto_main_menu(&mut session)
        .context("failed to reach the SimBank main menu")?;
    println!(
        "Reached SimBank main menu: {} transitions, {} reconnects",
        report.transitions, report.recoveries
    );

    if matches.get_flag("verify") {
        ivt::verify_bank_menu(&report.screen)?;
        println!("SimBank main menu verified");
    }

    Ok(())
}
