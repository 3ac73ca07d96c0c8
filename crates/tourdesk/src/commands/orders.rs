//! Order command handlers.

use tourdesk_core::{EntityView, Order, OrderStatus};

use crate::cli::{EntityCommand, GlobalOpts, OrdersArgs, OrdersCommand, StatusArg};
use crate::config::Session;
use crate::error::CliError;
use crate::output::StderrNotifier;

use super::entity;

impl From<StatusArg> for OrderStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Pending => Self::Pending,
            StatusArg::Completed => Self::Completed,
            StatusArg::Cancelled => Self::Cancelled,
        }
    }
}

pub async fn handle(
    session: &Session,
    args: OrdersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let command = match args.command {
        OrdersCommand::List { list, status } => {
            let filters: Vec<(&str, String)> = status
                .map(|s| ("status", OrderStatus::from(s).as_str().to_owned()))
                .into_iter()
                .collect();
            return entity::list::<Order>(session, &list, &filters, global).await;
        }
        OrdersCommand::Status { id, status } => {
            let notifier = StderrNotifier::new(global.quiet, global.color);
            let mut view = EntityView::<Order, _>::new(session.client.clone(), notifier);
            view.update_status(&id, status.into()).await?;
            return Ok(());
        }
        OrdersCommand::Get { id } => EntityCommand::Get { id },
        OrdersCommand::Create(write) => EntityCommand::Create(write),
        OrdersCommand::Update { id, write } => EntityCommand::Update { id, write },
        OrdersCommand::Delete { id } => EntityCommand::Delete { id },
    };
    entity::handle::<Order>(session, command, global).await
}
