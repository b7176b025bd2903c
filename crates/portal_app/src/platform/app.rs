use std::collections::VecDeque;
use std::io::{self, Write};
use std::time::Duration;

use anyhow::Context;
use log::LevelFilter;
use portal_core::{
    update, update_table, ApplicationsTable, Banner, BoardState, FilterField, Msg, TableMsg, Toast,
};
use portal_engine::{ApplicationsBus, EngineHandle, Signal, Subscription};
use portal_logging::portal_info;

use super::config;
use super::effects::{AppMsg, EffectRunner};
use super::logging;
use super::ui::render;
use crate::Cli;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub fn run_app(cli: Cli) -> anyhow::Result<()> {
    let config = config::load(cli.config.as_deref())?;
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        config.log_level
    };
    logging::initialize(config.log_destination, level);
    portal_info!("portal_app starting against {}", config.api.base_url);

    let engine = EngineHandle::new(config.api).context("cannot start the engine")?;
    let bus = ApplicationsBus::new();
    let mut session = Session::new(EffectRunner::new(engine, bus.clone()), &bus);
    // Only the runner's clone stays alive from here on.
    drop(bus);

    let mut initial = filter_messages(&cli);
    initial.push(AppMsg::Board(Msg::Mounted));
    initial.push(AppMsg::Table(TableMsg::Mounted));
    let mut out = io::stdout().lock();
    session.run(initial, cli.apply, &mut out)?;

    write!(out, "\n{}", render::render_board(&session.board.view()))?;
    write!(out, "\n{}", render::render_table(&session.table.view()))?;
    out.flush()?;
    Ok(())
}

fn filter_messages(cli: &Cli) -> Vec<AppMsg> {
    let mut messages: Vec<AppMsg> = [
        (FilterField::Keyword, &cli.keyword),
        (FilterField::JobType, &cli.job_type),
        (FilterField::Location, &cli.location),
        (FilterField::SalaryRange, &cli.salary),
        (FilterField::ExperienceRange, &cli.experience),
    ]
    .into_iter()
    .filter_map(|(field, value)| {
        value.as_ref().map(|value| {
            AppMsg::Board(Msg::FilterChanged {
                field,
                value: value.clone(),
            })
        })
    })
    .collect();
    if let Some(sort) = cli.sort {
        messages.push(AppMsg::Board(Msg::SortChanged(sort)));
    }
    messages
}

/// Both views, the runner executing their effects, and each view's
/// subscription to the applications bus.
struct Session {
    board: BoardState,
    table: ApplicationsTable,
    runner: EffectRunner,
    board_changes: Option<Subscription>,
    table_changes: Option<Subscription>,
    last_banner: Option<Banner>,
    last_toast: Option<Toast>,
    login_notified: bool,
}

impl Session {
    fn new(runner: EffectRunner, bus: &ApplicationsBus) -> Self {
        Self {
            board: BoardState::new(),
            table: ApplicationsTable::new(),
            runner,
            board_changes: Some(bus.subscribe()),
            table_changes: Some(bus.subscribe()),
            last_banner: None,
            last_toast: None,
            login_notified: false,
        }
    }

    /// Processes messages until nothing is queued or in flight, then
    /// clicks Apply on the next queued job and goes again.
    fn run(
        &mut self,
        initial: Vec<AppMsg>,
        applies: Vec<String>,
        out: &mut impl Write,
    ) -> anyhow::Result<()> {
        let mut queue: VecDeque<AppMsg> = initial.into();
        let mut applies: VecDeque<String> = applies.into();
        loop {
            while let Some(msg) = queue.pop_front() {
                self.dispatch(msg, out)?;
            }
            self.poll_bus(&mut queue);
            if !queue.is_empty() {
                continue;
            }
            if let Some(msg) = self.runner.next_event(POLL_INTERVAL) {
                queue.push_back(msg);
                continue;
            }
            if self.runner.in_flight() > 0 {
                continue;
            }
            // The counter drops after the event is queued, so anything
            // finished is now waiting in the channel.
            if let Some(msg) = self.runner.try_next_event() {
                queue.push_back(msg);
                continue;
            }
            match applies.pop_front() {
                Some(job_id) => queue.push_back(AppMsg::Board(Msg::ApplyClicked { job_id })),
                None => break,
            }
        }
        self.dispatch(AppMsg::Board(Msg::Unmounted), out)?;
        self.dispatch(AppMsg::Table(TableMsg::Unmounted), out)
    }

    fn dispatch(&mut self, msg: AppMsg, out: &mut impl Write) -> anyhow::Result<()> {
        let effects = match msg {
            AppMsg::Board(msg) => {
                let (state, effects) = update(std::mem::take(&mut self.board), msg);
                self.board = state;
                if self.board.consume_dirty() {
                    self.report_board_changes(out)?;
                }
                effects
            }
            AppMsg::Table(msg) => {
                let (table, effects) = update_table(std::mem::take(&mut self.table), msg);
                self.table = table;
                self.table.consume_dirty();
                effects
            }
        };
        if self.runner.run(effects) && !self.login_notified {
            self.login_notified = true;
            writeln!(out, "{}", render::LOGIN_REQUIRED_NOTICE)?;
        }
        Ok(())
    }

    fn report_board_changes(&mut self, out: &mut impl Write) -> io::Result<()> {
        let view = self.board.view();
        if view.banner != self.last_banner {
            if let Some(banner) = &view.banner {
                writeln!(out, "{}", render::render_banner(banner))?;
            }
            self.last_banner = view.banner;
        }
        if view.toast != self.last_toast {
            if let Some(toast) = &view.toast {
                writeln!(out, "{}", render::render_toast(toast))?;
            }
            self.last_toast = view.toast;
        }
        Ok(())
    }

    fn poll_bus(&mut self, queue: &mut VecDeque<AppMsg>) {
        if poll_subscription(&mut self.board_changes) {
            queue.push_back(AppMsg::Board(Msg::ApplicationsChanged));
        }
        if poll_subscription(&mut self.table_changes) {
            queue.push_back(AppMsg::Table(TableMsg::ApplicationsChanged));
        }
    }
}

/// Drains pending signals; true if any was a change. A closed bus drops
/// the subscription.
fn poll_subscription(slot: &mut Option<Subscription>) -> bool {
    let mut changed = false;
    while let Some(subscription) = slot.as_mut() {
        match subscription.try_next() {
            Some(Signal::Changed) => changed = true,
            Some(Signal::Closed) => *slot = None,
            None => break,
        }
    }
    changed
}
