// notes-client: headless client session runner
//
// Logs a user in and keeps the session's presence loops alive:
// - heartbeat marker refresh every 5s
// - admin command polling every 2s
// Runs until Ctrl-C or until an admin `close` command arrives. Delivered
// commands render as terminal effects.

use anyhow::{anyhow, Result};
use infinity_notes_lib::auth;
use infinity_notes_lib::session::config::Config;
use infinity_notes_lib::session::context::SessionContext;
use infinity_notes_lib::session::notify::TerminalEffects;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;

fn print_help() {
    println!(
        r#"notes-client - headless Infinity Notes session

USAGE:
    notes-client --user <name> --password <password> [OPTIONS]

OPTIONS:
    --user <name>          Account to log in as
    --password <password>  Account password
    --register             Create the account first, then log in
    --data-dir <path>      Data directory (default: ~/.infinity-notes,
                           or $INFINITY_NOTES_DATA_DIR)
    --help                 Show this help message

While running, the session is visible as online to the admin console and
executes any command the admin dispatches. Press Ctrl-C to log out.
"#
    );
}

struct Args {
    user: Option<String>,
    password: Option<String>,
    register: bool,
    data_dir: Option<PathBuf>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        user: None,
        password: None,
        register: false,
        data_dir: None,
    };

    let mut iter = env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--user" => args.user = iter.next(),
            "--password" => args.password = iter.next(),
            "--register" => args.register = true,
            "--data-dir" => args.data_dir = iter.next().map(PathBuf::from),
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            other => return Err(anyhow!("Unknown argument: {}", other)),
        }
    }

    Ok(args)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args()?;

    let (Some(user), Some(password)) = (args.user, args.password) else {
        print_help();
        return Err(anyhow!("--user and --password are required"));
    };

    let config = match args.data_dir {
        Some(data_dir) => Config { data_dir },
        None => Config::from_env(),
    };
    config.ensure_dirs()?;

    let authenticated = if args.register {
        auth::register(&config, &user, &password)?
    } else {
        auth::login(&config, &user, &password)?
    };

    let (effects, mut close_rx) = TerminalEffects::new();
    let ctx = SessionContext::begin(&config, &authenticated, Arc::new(effects));

    println!(
        "Logged in as {} (data dir: {})",
        ctx.username(),
        config.data_dir.display()
    );
    println!("Session online. Press Ctrl-C to log out.");

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            println!("\nLogging out...");
        }
        _ = close_rx.changed() => {
            println!("Close command received, shutting down...");
        }
    }

    ctx.end().await;
    Ok(())
}
