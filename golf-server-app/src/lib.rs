use std::sync::Arc;

use golf_core::{SettlementPolicy, VenueCalendar};

use crate::{
    domain::{
        admin::AdminRepository,
        demo::{DemoNumberRepository, DemoRegistry, DemoRegistryImpl},
        game::{GameLedger, GameLedgerImpl, GameRepository},
        player::PlayerRepository,
        rate::{RateRepository, RateTable, RateTableImpl},
        sales::{SalesAggregator, SalesAggregatorImpl},
    },
    ports::clock::Clock,
    workflow::{
        admin::{
            bootstrap::{BootstrapWorkflow, BootstrapWorkflowImpl},
            get_admin::{GetAdminUseCase, GetAdminUseCaseImpl},
            login::{AdminLoginUseCase, AdminLoginUseCaseImpl},
        },
        game::start::{StartGameUseCase, StartGameUseCaseImpl},
        player::register::{RegisterPlayerUseCase, RegisterPlayerUseCaseImpl},
        reporting::{
            breakdown::{SalesBreakdownUseCase, SalesBreakdownUseCaseImpl},
            dashboard::{DashboardUseCase, DashboardUseCaseImpl},
            recent_games::{RecentGamesUseCase, RecentGamesUseCaseImpl},
            sales_period::{SalesPeriodUseCase, SalesPeriodUseCaseImpl},
            transactions::{TransactionsUseCase, TransactionsUseCaseImpl},
        },
    },
};

pub mod domain;
pub mod ports;
pub mod workflow;

#[cfg(test)]
mod test_support;

pub struct Application {
    pub rate_table: Arc<dyn RateTable + Send + Sync + 'static>,
    pub game_ledger: Arc<dyn GameLedger + Send + Sync + 'static>,
    pub demo_registry: Arc<dyn DemoRegistry + Send + Sync + 'static>,
    pub sales_aggregator: Arc<dyn SalesAggregator + Send + Sync + 'static>,

    pub player_register_use_case: Box<dyn RegisterPlayerUseCase + Send + Sync + 'static>,
    pub game_start_use_case: Box<dyn StartGameUseCase + Send + Sync + 'static>,

    pub admin_login_use_case: Box<dyn AdminLoginUseCase + Send + Sync + 'static>,
    pub admin_get_use_case: Box<dyn GetAdminUseCase + Send + Sync + 'static>,
    pub admin_bootstrap_workflow: Box<dyn BootstrapWorkflow + Send + Sync + 'static>,

    pub report_dashboard_use_case: Box<dyn DashboardUseCase + Send + Sync + 'static>,
    pub report_recent_games_use_case: Box<dyn RecentGamesUseCase + Send + Sync + 'static>,
    pub report_sales_period_use_case: Box<dyn SalesPeriodUseCase + Send + Sync + 'static>,
    pub report_breakdown_use_case: Box<dyn SalesBreakdownUseCase + Send + Sync + 'static>,
    pub report_transactions_use_case: Box<dyn TransactionsUseCase + Send + Sync + 'static>,
}

pub fn build_application<
    P: PlayerRepository + Send + Sync + 'static,
    A: AdminRepository + Send + Sync + 'static,
    R: RateRepository + Send + Sync + 'static,
    G: GameRepository + Send + Sync + 'static,
    D: DemoNumberRepository + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
>(
    player_repository: Arc<P>,
    admin_repository: Arc<A>,
    rate_repository: Arc<R>,
    game_repository: Arc<G>,
    demo_repository: Arc<D>,
    clock: Arc<C>,
    calendar: VenueCalendar,
    policy: SettlementPolicy,
) -> Application {
    let rate_table = Arc::new(RateTableImpl::new(rate_repository.clone(), clock.clone()));
    let demo_registry = Arc::new(DemoRegistryImpl::new(demo_repository.clone(), clock.clone()));
    let game_ledger = Arc::new(GameLedgerImpl::new(
        game_repository.clone(),
        rate_table.clone(),
        clock.clone(),
        policy,
    ));
    let sales_aggregator = Arc::new(SalesAggregatorImpl::new(
        game_repository.clone(),
        clock.clone(),
        calendar,
    ));

    Application {
        player_register_use_case: Box::new(RegisterPlayerUseCaseImpl::new(
            player_repository.clone(),
            clock.clone(),
        )),
        game_start_use_case: Box::new(StartGameUseCaseImpl::new(
            player_repository.clone(),
            demo_registry.clone(),
            game_ledger.clone(),
        )),

        admin_login_use_case: Box::new(AdminLoginUseCaseImpl::new(admin_repository.clone())),
        admin_get_use_case: Box::new(GetAdminUseCaseImpl::new(admin_repository.clone())),
        admin_bootstrap_workflow: Box::new(BootstrapWorkflowImpl::new(
            admin_repository.clone(),
            rate_table.clone(),
        )),

        report_dashboard_use_case: Box::new(DashboardUseCaseImpl::new(
            sales_aggregator.clone(),
            clock.clone(),
            calendar,
        )),
        report_recent_games_use_case: Box::new(RecentGamesUseCaseImpl::new(
            game_repository.clone(),
            clock.clone(),
            calendar,
        )),
        report_sales_period_use_case: Box::new(SalesPeriodUseCaseImpl::new(
            sales_aggregator.clone(),
            clock.clone(),
            calendar,
        )),
        report_breakdown_use_case: Box::new(SalesBreakdownUseCaseImpl::new(
            sales_aggregator.clone(),
            clock.clone(),
            calendar,
        )),
        report_transactions_use_case: Box::new(TransactionsUseCaseImpl::new(
            game_ledger.clone(),
            clock.clone(),
            calendar,
        )),

        rate_table,
        game_ledger,
        demo_registry,
        sales_aggregator,
    }
}
