use clap::{Arg, Command};

fn confirm_password() -> Arg {
    Arg::new("confirm-password")
        .long("confirm-password")
        .help("Repeat the new password (defaults to the password given)")
}

#[must_use]
pub fn with_subcommands(command: Command) -> Command {
    command
        .subcommand(
            Command::new("status").about("Verify the stored session and show who is signed in"),
        )
        .subcommand(
            Command::new("login")
                .about("Sign in with username and password")
                .arg(
                    Arg::new("username")
                        .short('u')
                        .long("username")
                        .help("Account username")
                        .env("FINFLOW_USERNAME")
                        .required(true),
                )
                .arg(
                    Arg::new("password")
                        .short('p')
                        .long("password")
                        .help("Account password")
                        .env("FINFLOW_PASSWORD")
                        .hide_env_values(true)
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("register")
                .about("Create an account and sign in")
                .arg(
                    Arg::new("username")
                        .short('u')
                        .long("username")
                        .help("Account username")
                        .required(true),
                )
                .arg(
                    Arg::new("email")
                        .short('e')
                        .long("email")
                        .help("Account email")
                        .required(true),
                )
                .arg(
                    Arg::new("password")
                        .short('p')
                        .long("password")
                        .help("Account password, at least 6 characters")
                        .env("FINFLOW_PASSWORD")
                        .hide_env_values(true)
                        .required(true),
                )
                .arg(confirm_password())
                .arg(Arg::new("first-name").long("first-name").help("First name"))
                .arg(Arg::new("last-name").long("last-name").help("Last name")),
        )
        .subcommand(Command::new("logout").about("Forget the stored session"))
        .subcommand(
            Command::new("forgot-password")
                .about("Request a password reset email")
                .arg(
                    Arg::new("email")
                        .short('e')
                        .long("email")
                        .help("Account email")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("reset-password")
                .about("Set a new password using a reset token")
                .arg(
                    Arg::new("token")
                        .long("token")
                        .help("Reset token from the email")
                        .required(true),
                )
                .arg(
                    Arg::new("new-password")
                        .long("new-password")
                        .help("New password, at least 6 characters")
                        .required(true),
                )
                .arg(confirm_password()),
        )
        .subcommand(
            Command::new("change-password")
                .about("Change the password of the signed-in account")
                .arg(
                    Arg::new("current-password")
                        .long("current-password")
                        .help("Current password")
                        .required(true),
                )
                .arg(
                    Arg::new("new-password")
                        .long("new-password")
                        .help("New password, at least 6 characters")
                        .required(true),
                )
                .arg(confirm_password()),
        )
        .subcommand(
            Command::new("open")
                .about("Show what the app renders for a route")
                .arg(
                    Arg::new("path")
                        .help("Route path, for example /budget")
                        .default_value("/"),
                ),
        )
        .subcommand(Command::new("views").about("List the navigation views"))
}
