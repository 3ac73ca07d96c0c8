//! User command handlers.

use tourdesk_core::User;

use crate::cli::{EntityCommand, GlobalOpts, UsersArgs, UsersCommand};
use crate::config::Session;
use crate::error::CliError;
use crate::output;

use super::entity;
use super::rows::Listing;

pub async fn handle(
    session: &Session,
    args: UsersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let command = match args.command {
        UsersCommand::Me => {
            let me = session.client.me().await?;
            let out = output::render_single(global.output, &*me, User::detail, |u| u.id.clone())?;
            output::print_output(&out, global.quiet);
            return Ok(());
        }
        UsersCommand::List(list) => EntityCommand::List(list),
        UsersCommand::Get { id } => EntityCommand::Get { id },
        UsersCommand::Update { id, write } => EntityCommand::Update { id, write },
        UsersCommand::Delete { id } => EntityCommand::Delete { id },
    };
    entity::handle::<User>(session, command, global).await
}
