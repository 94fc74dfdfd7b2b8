use std::time::{Duration, Instant};

use anyhow::{Result, bail};
use bpaf::Bpaf;
use indoc::indoc;
use rand::Rng;
use storefront_client::{ClientTrait, ProductId};
use storefront_sdk::models::home::{HomeAction, HomeEvent, handle_event};
use storefront_sdk::models::notification::Notification;
use storefront_sdk::models::page::{LoadOutcome, PageController};
use tracing::{debug, instrument};

use crate::config::Config;
use crate::utils::dialog::{Dialog, Spinner, Text};
use crate::utils::init::init_client;
use crate::utils::message;
use crate::utils::render::{DisplayHome, DisplayProduct, SEARCH_PROMPT};

const SPINNER_DELAY: Duration = Duration::from_millis(300);

const INTERACTIVE_HELP: &str = indoc! {"
    n: next page, p: previous page, <number>: go to page,
    v <id>: show product, s <text>: search, q: quit"
};

// Show the home page
#[derive(Bpaf, Clone, Debug)]
pub struct Home {
    /// Page to show, starting at 1
    #[bpaf(long, short, argument("PAGE"))]
    page: Option<u32>,

    /// Keep the home page open and read commands from the terminal
    #[bpaf(long, short)]
    interactive: bool,
}

impl Home {
    #[instrument(name = "home", skip_all)]
    pub async fn handle(self, config: Config) -> Result<()> {
        if self.interactive && !Dialog::can_prompt() {
            bail!("Interactive mode needs a terminal");
        }

        let client = init_client(&config)?;
        let controller = PageController::new(client).with_page_size(config.page_size);
        let mut screen = Screen::new(controller, config.notification_timeout());

        screen.mount().await;
        if let Some(page) = self.page {
            screen.dispatch(HomeEvent::RequestPage(page)).await;
        }
        screen.render();

        if !self.interactive {
            return Ok(());
        }

        loop {
            let input = Dialog {
                message: SEARCH_PROMPT,
                help_message: Some(INTERACTIVE_HELP),
                typed: Text::default(),
            }
            .prompt()
            .await?;

            let Some(event) = parse_input(&input) else {
                message::warning(format!("Unknown command '{}'", input.trim()));
                continue;
            };

            if screen.dispatch(event).await == Flow::Quit {
                return Ok(());
            }
            screen.render();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// The home page as shown in the terminal,
/// with the notifications that have not timed out yet.
struct Screen<C, R> {
    controller: PageController<C, R>,
    notifications: Vec<Notification>,
    notification_timeout: Duration,
}

impl<C: ClientTrait, R: Rng> Screen<C, R> {
    fn new(controller: PageController<C, R>, notification_timeout: Duration) -> Self {
        Self {
            controller,
            notifications: Vec::new(),
            notification_timeout,
        }
    }

    async fn mount(&mut self) {
        let outcome = Dialog {
            message: "Cargando productos...",
            help_message: None,
            typed: Spinner::new(self.controller.load()),
        }
        .spin_with_delay(SPINNER_DELAY)
        .await;

        if let LoadOutcome::Failed(_) = outcome {
            self.notify(Notification::error("Could not load products"));
        }
    }

    async fn dispatch(&mut self, event: HomeEvent) -> Flow {
        debug!(?event, "handling home event");
        let actions = Dialog {
            message: "Cargando productos...",
            help_message: None,
            typed: Spinner::new(handle_event(&mut self.controller, event)),
        }
        .spin_with_delay(SPINNER_DELAY)
        .await;

        let mut flow = Flow::Continue;
        for action in actions {
            match action {
                HomeAction::Render => {},
                HomeAction::ShowDetail(product) => {
                    println!("{}", DisplayProduct::new(&product));
                },
                HomeAction::Notify(notification) => self.notify(notification),
                HomeAction::Quit => flow = Flow::Quit,
            }
        }
        flow
    }

    fn notify(&mut self, notification: Notification) {
        self.notifications
            .push(notification.with_delay(self.notification_timeout));
    }

    /// Print the page followed by the notifications that are still visible.
    fn render(&mut self) {
        let now = Instant::now();
        for notification in &mut self.notifications {
            notification.tick(now);
        }
        self.notifications.retain(Notification::is_visible);

        println!("{}", DisplayHome::new(&self.controller.view()));
        for notification in &self.notifications {
            message::notification(notification);
        }
    }
}

/// Translate a line of user input into a home page event.
fn parse_input(input: &str) -> Option<HomeEvent> {
    let input = input.trim();
    let (command, argument) = match input.split_once(char::is_whitespace) {
        Some((command, argument)) => (command, argument.trim()),
        None => (input, ""),
    };

    match (command, argument) {
        ("n" | "next" | ">", "") => Some(HomeEvent::NextPage),
        ("p" | "prev" | "previous" | "<", "") => Some(HomeEvent::PreviousPage),
        ("q" | "quit" | "exit", "") => Some(HomeEvent::Quit),
        ("v" | "view", id) => id.parse::<ProductId>().ok().map(HomeEvent::ViewDetail),
        ("s" | "search", query) if !query.is_empty() => Some(HomeEvent::Search(query.to_string())),
        (page, "") => page.parse().ok().map(HomeEvent::RequestPage),
        _ => None,
    }
}
