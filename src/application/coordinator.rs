use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo::events::EventListener;
use gloo_timers::callback::{Interval, Timeout};
use wasm_bindgen_futures::spawn_local;

use crate::application::fetch_markets::FetchMarketsUseCase;
use crate::domain::{
    logging::{LogComponent, get_logger, get_time_provider},
    market_data::MarketDataRepository,
    polling::{PollCommand, PollController, PollSettings, RefreshTrigger},
    state::PollSnapshot,
};

/// Получает каждое изменение состояния контроллера
pub type SnapshotListener = Box<dyn Fn(PollSnapshot)>;

#[derive(Default)]
struct DriverHandles {
    interval: Option<Interval>,
    retry: Option<Timeout>,
    focus: Option<EventListener>,
    online: Option<EventListener>,
}

/// Драйвер [`PollController`]: владеет таймерами обновления и повтора и
/// слушателями окна, запускает загрузки и публикует снапшоты.
pub struct DashboardCoordinator<R: MarketDataRepository + 'static> {
    controller: RefCell<PollController>,
    use_case: FetchMarketsUseCase<R>,
    listener: SnapshotListener,
    handles: RefCell<DriverHandles>,
}

impl<R: MarketDataRepository + 'static> DashboardCoordinator<R> {
    pub fn new(use_case: FetchMarketsUseCase<R>, settings: PollSettings, listener: SnapshotListener) -> Rc<Self> {
        get_logger().info(
            LogComponent::Application("DashboardCoordinator"),
            &format!(
                "Creating coordinator: refresh every {}s, fresh for {}s",
                settings.refresh_interval.as_secs(),
                settings.fresh_window.as_secs()
            ),
        );

        Rc::new(Self {
            controller: RefCell::new(PollController::new(settings)),
            use_case,
            listener,
            handles: RefCell::new(DriverHandles::default()),
        })
    }

    fn now() -> u64 {
        get_time_provider().current_timestamp()
    }

    pub fn snapshot(&self) -> PollSnapshot {
        self.controller.borrow().snapshot(Self::now())
    }

    fn publish(&self) {
        let snapshot = self.snapshot();
        (self.listener)(snapshot);
    }

    /// Обработать один запрос обновления целиком. Возвращает следующую команду
    /// драйверу (обычно ничего, иногда повтор).
    pub async fn refresh(&self, trigger: RefreshTrigger) -> PollCommand {
        let command = self.controller.borrow_mut().request_refresh(trigger, Self::now());
        match command {
            PollCommand::StartFetch { sequence } => {
                self.publish();
                self.run_fetch(sequence).await
            }
            other => other,
        }
    }

    /// Заменить текущую загрузку новой
    pub async fn invalidate(&self) -> PollCommand {
        let command = self.controller.borrow_mut().invalidate();
        match command {
            PollCommand::StartFetch { sequence } => {
                self.publish();
                self.run_fetch(sequence).await
            }
            other => other,
        }
    }

    async fn run_fetch(&self, sequence: u64) -> PollCommand {
        get_logger().debug(
            LogComponent::Application("DashboardCoordinator"),
            &format!("📡 Fetch #{sequence} started"),
        );

        let result = self.use_case.execute(Self::now()).await;
        let now = Self::now();

        let command = {
            let mut controller = self.controller.borrow_mut();
            match result {
                Ok(assets) => {
                    controller.complete_success(sequence, assets, now);
                    PollCommand::Idle
                }
                Err(e) => {
                    get_logger().error(
                        LogComponent::Application("DashboardCoordinator"),
                        &format!("❌ Fetch #{sequence} failed: {e}"),
                    );
                    controller.complete_failure(sequence, e)
                }
            }
        };

        self.publish();
        command
    }

    /// Запуск: таймер интервала и слушатели окна, затем сразу загрузка.
    /// `focus` просит обновление, `online` заменяет текущую загрузку.
    pub fn start(self: &Rc<Self>) {
        let interval_ms = self.controller.borrow().settings().refresh_interval.as_millis() as u32;

        let weak = Rc::downgrade(self);
        let interval = Interval::new(interval_ms, move || {
            Self::spawn_from_weak(&weak, RefreshTrigger::Interval);
        });

        let focus = self.listen_window("focus", |this| this.spawn_refresh(RefreshTrigger::WindowFocus));
        // Запрос, начатый до обрыва связи, скорее всего не завершится
        let online = self.listen_window("online", |this| this.spawn_invalidate());
        if focus.is_none() {
            get_logger().warn(
                LogComponent::Application("DashboardCoordinator"),
                "No window available, focus and reconnect refresh disabled",
            );
        }

        {
            let mut handles = self.handles.borrow_mut();
            handles.interval = Some(interval);
            handles.focus = focus;
            handles.online = online;
        }

        self.spawn_refresh(RefreshTrigger::Initial);
    }

    /// Остановить таймеры и отписаться от окна (drop хэндлов делает и то и другое)
    pub fn stop(&self) {
        drop(std::mem::take(&mut *self.handles.borrow_mut()));
        get_logger().info(LogComponent::Application("DashboardCoordinator"), "Polling stopped");
    }

    fn listen_window(self: &Rc<Self>, event: &'static str, on_event: fn(&Rc<Self>)) -> Option<EventListener> {
        let window = web_sys::window()?;
        let weak = Rc::downgrade(self);
        Some(EventListener::new(&window, event, move |_| {
            if let Some(this) = weak.upgrade() {
                on_event(&this);
            }
        }))
    }

    fn spawn_from_weak(weak: &Weak<Self>, trigger: RefreshTrigger) {
        if let Some(this) = weak.upgrade() {
            this.spawn_refresh(trigger);
        }
    }

    pub fn spawn_refresh(self: &Rc<Self>, trigger: RefreshTrigger) {
        let this = Rc::clone(self);
        spawn_local(async move {
            let command = this.refresh(trigger).await;
            this.handle_command(command);
        });
    }

    pub fn spawn_invalidate(self: &Rc<Self>) {
        let this = Rc::clone(self);
        spawn_local(async move {
            let command = this.invalidate().await;
            this.handle_command(command);
        });
    }

    fn handle_command(self: &Rc<Self>, command: PollCommand) {
        if let PollCommand::ScheduleRetry { attempt, delay } = command {
            get_logger().warn(
                LogComponent::Application("DashboardCoordinator"),
                &format!("🔁 Retry {attempt} in {}ms", delay.as_millis()),
            );
            let weak = Rc::downgrade(self);
            let timeout = Timeout::new(delay.as_millis() as u32, move || {
                Self::spawn_from_weak(&weak, RefreshTrigger::Retry);
            });
            self.handles.borrow_mut().retry = Some(timeout);
        }
    }
}
