//! Command dispatch: bridges CLI args -> query client -> output formatting.

pub mod config_cmd;
pub mod entity;
pub mod forms;
pub mod orders;
pub mod rows;
pub mod users;
pub mod util;

use tourdesk_core::{Advertisement, Hotel, Posada, Restaurant, Service, Sponsor, TouristSpot};

use crate::cli::{Command, GlobalOpts};
use crate::config::Session;
use crate::error::CliError;

/// Dispatch an API-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    session: &Session,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Hotels(args) => entity::handle::<Hotel>(session, args.command, global).await,
        Command::Posadas(args) => entity::handle::<Posada>(session, args.command, global).await,
        Command::Restaurants(args) => {
            entity::handle::<Restaurant>(session, args.command, global).await
        }
        Command::Services(args) => entity::handle::<Service>(session, args.command, global).await,
        Command::Sponsors(args) => entity::handle::<Sponsor>(session, args.command, global).await,
        Command::Ads(args) => {
            entity::handle::<Advertisement>(session, args.command, global).await
        }
        Command::Spots(args) => {
            entity::handle::<TouristSpot>(session, args.command, global).await
        }
        Command::Orders(args) => orders::handle(session, args, global).await,
        Command::Users(args) => users::handle(session, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
