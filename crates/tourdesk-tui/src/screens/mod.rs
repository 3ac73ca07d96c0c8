//! Entity screens. Each one is an `EntityScreen` backed by its own list worker.

pub mod columns;
pub mod entity;

use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tourdesk_core::{
    Advertisement, EntityView, Hotel, ListController, Order, Posada, QueryClient, Restaurant,
    Service, Sponsor, TouristSpot, User,
};

use crate::action::{Action, ActionNotifier};
use crate::component::Component;
use crate::screen::ScreenId;
use crate::worker::run_list_worker;

use self::columns::TableRow;
use self::entity::EntityScreen;

/// What every screen's worker shares.
#[derive(Clone)]
pub struct ScreenContext {
    pub client: QueryClient,
    pub action_tx: mpsc::UnboundedSender<Action>,
    pub debounce: Duration,
    pub cancel: CancellationToken,
}

fn spawn<T: TableRow>(id: ScreenId, ctx: &ScreenContext) -> Box<dyn Component> {
    let list = ListController::<T>::new(ctx.client.clone()).with_debounce(ctx.debounce);
    let state = list.subscribe();
    let view = EntityView::new(ctx.client.clone(), ActionNotifier(ctx.action_tx.clone()));
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(run_list_worker(list, view, rx, ctx.cancel.child_token()));
    Box::new(EntityScreen::<T>::new(id, state, tx))
}

/// Spawn one worker per screen. Must be called inside a tokio runtime.
pub fn create_screens(ctx: &ScreenContext) -> Vec<(ScreenId, Box<dyn Component>)> {
    ScreenId::ALL
        .into_iter()
        .map(|id| {
            let screen = match id {
                ScreenId::Hotels => spawn::<Hotel>(id, ctx),
                ScreenId::Posadas => spawn::<Posada>(id, ctx),
                ScreenId::Restaurants => spawn::<Restaurant>(id, ctx),
                ScreenId::Services => spawn::<Service>(id, ctx),
                ScreenId::Sponsors => spawn::<Sponsor>(id, ctx),
                ScreenId::Ads => spawn::<Advertisement>(id, ctx),
                ScreenId::Spots => spawn::<TouristSpot>(id, ctx),
                ScreenId::Orders => spawn::<Order>(id, ctx),
                ScreenId::Users => spawn::<User>(id, ctx),
            };
            (id, screen)
        })
        .collect()
}
