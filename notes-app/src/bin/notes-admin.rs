// notes-admin: CLI front-end for the admin console
//
// Commands:
//   notes-admin users                      List target users
//   notes-admin status <user>              Show online/offline for a user
//   notes-admin send <user> <command>      Dispatch a command (troll|axel|close|fake_msg)
//   notes-admin delete <user>              Delete a non-admin account

use anyhow::{anyhow, Result};
use infinity_notes_lib::admin::AdminConsole;
use infinity_notes_lib::auth;
use infinity_notes_lib::session::config::Config;
use infinity_notes_lib::session::protocol::AdminCommand;
use std::env;
use std::path::PathBuf;

fn print_help() {
    println!(
        r#"notes-admin - Infinity Notes admin console

USAGE:
    notes-admin <COMMAND> [OPTIONS]

COMMANDS:
    users                  List target users (admin accounts excluded)
    status <user>          Show online/offline status for a user
    send <user> <command>  Dispatch a command: troll | axel | close | fake_msg
    delete <user>          Delete a non-admin account
    help                   Show this help message

OPTIONS:
    --as <name>            Admin account to authenticate as (default: Admin)
    --password <password>  Admin password (default: $NOTES_ADMIN_PASSWORD)
    --data-dir <path>      Data directory (default: ~/.infinity-notes,
                           or $INFINITY_NOTES_DATA_DIR)

EXAMPLES:
    notes-admin users
    notes-admin status bob
    notes-admin send bob close
    notes-admin delete bob

Dispatch is fire-and-forget: "sent" means the envelope was written, not
that the target saw it. Sending to an offline user parks the command until
their session next polls.
"#
    );
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();

    let mut admin_user = "Admin".to_string();
    let mut password = env::var("NOTES_ADMIN_PASSWORD").ok();
    let mut data_dir: Option<PathBuf> = None;
    let mut positional: Vec<String> = Vec::new();

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--as" => {
                admin_user = iter
                    .next()
                    .ok_or_else(|| anyhow!("--as requires a value"))?;
            }
            "--password" => password = iter.next(),
            "--data-dir" => data_dir = iter.next().map(PathBuf::from),
            "--help" | "-h" | "help" => {
                print_help();
                return Ok(());
            }
            _ => positional.push(arg),
        }
    }

    if positional.is_empty() {
        print_help();
        return Ok(());
    }

    let config = match data_dir {
        Some(data_dir) => Config { data_dir },
        None => Config::from_env(),
    };
    config.ensure_dirs()?;

    let password =
        password.ok_or_else(|| anyhow!("No password given (--password or $NOTES_ADMIN_PASSWORD)"))?;
    let user = auth::login(&config, &admin_user, &password)?;
    let console = AdminConsole::open(&config, &user)?;

    match positional[0].as_str() {
        "users" => {
            let users = console.list_users()?;
            if users.is_empty() {
                println!("No target users registered.");
            }
            for username in users {
                let status = console.target_status(&username);
                println!(
                    "{:<20} {}",
                    username,
                    if status.online { "ONLINE" } else { "offline" }
                );
            }
        }
        "status" => {
            let target = positional
                .get(1)
                .ok_or_else(|| anyhow!("Usage: notes-admin status <user>"))?;
            let status = console.target_status(target);
            if status.online {
                println!("{} is ONLINE", status.username);
            } else {
                match status.last_seen {
                    Some(seen) => println!("{} is offline (last seen {})", status.username, seen),
                    None => println!("{} is offline (never seen)", status.username),
                }
            }
        }
        "send" => {
            let target = positional
                .get(1)
                .ok_or_else(|| anyhow!("Usage: notes-admin send <user> <command>"))?;
            let command: AdminCommand = positional
                .get(2)
                .ok_or_else(|| anyhow!("Usage: notes-admin send <user> <command>"))?
                .parse()
                .map_err(|e| anyhow!("{}", e))?;

            let receipt = console.dispatch(target, command)?;
            println!(
                "Command \"{}\" sent to {} at {}",
                receipt.command, receipt.username, receipt.sent_at
            );
        }
        "delete" => {
            let target = positional
                .get(1)
                .ok_or_else(|| anyhow!("Usage: notes-admin delete <user>"))?;
            if console.delete_account(target)? {
                println!("Deleted account {}", target);
            } else {
                println!("Cannot delete {}: not found or is an admin", target);
            }
        }
        other => {
            print_help();
            return Err(anyhow!("Unknown command: {}", other));
        }
    }

    Ok(())
}
