//! `users` subcommands for the user directory.

use clap::Subcommand;

use crate::client::{AppContext, CliResult, store_error};
use crate::output::{OutputFormat, render_records};

#[derive(Subcommand)]
pub(crate) enum UsersCommand {
    /// List known users.
    List,
}

impl UsersCommand {
    pub(crate) const fn label(&self) -> &'static str {
        match self {
            Self::List => "users_list",
        }
    }
}

pub(crate) async fn dispatch(
    ctx: &AppContext,
    command: UsersCommand,
    output: OutputFormat,
) -> CliResult<()> {
    match command {
        UsersCommand::List => {
            let users = ctx.directory().fetch().await.map_err(store_error)?;
            render_records(&users, output, &["id", "login"])
        }
    }
}
