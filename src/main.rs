#![deny(clippy::all, clippy::nursery, clippy::perf, clippy::pedantic)]
#![allow(
    clippy::items_after_statements,
    clippy::module_name_repetitions,
    clippy::unused_self
)]

mod views;

use clap::Parser;
use iced::{
    alignment::Horizontal,
    time,
    widget::{button, column, container, horizontal_space, pick_list, row, text, text_input},
    Element, Length, Size, Subscription, Task, Theme,
};
use iced_aw::Card;
use rental_store::{
    fail,
    model::StoreId,
    notify::{Notification, Notifications},
    utils::Result,
    Client, Session, Settings,
};
use std::{
    io,
    path::PathBuf,
    sync::Arc,
    time::{Duration, Instant},
};
use tap::Pipe;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use views::{cart, catalog, detail, returns, CartPanel, CatalogView, DetailPanel, ReturnsDialog};

/// Desktop storefront for the movie rental service.
#[derive(Debug, Parser)]
#[command(name = "rental-store", version)]
struct Args {
    /// Base url of the rental service
    #[arg(long)]
    api: Option<String>,
    /// Store to open the catalog with
    #[arg(long)]
    store: Option<u32>,
    /// Settings file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,
}

pub fn main() -> anyhow::Result<()> {
    let (non_blocking, _guard) = tracing_appender::non_blocking(io::stdout());
    tracing_subscriber::fmt()
        // ---
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(non_blocking)
        .init();

    let Args { api, store, config } = Args::parse();
    let mut settings = Settings::load(config.as_deref())?;
    settings.apply_overrides(api, store);
    let settings = settings.finish()?;
    info!(api = %settings.api, store = %settings.store, "starting");

    iced::application(App::title, App::update, App::view)
        .subscription(App::subscription)
        .theme(App::theme)
        .window_size(Size::new(1280.0, 800.0))
        .run_with(move || App::new(settings))?;
    Ok(())
}

#[derive(Debug, Clone)]
enum Message {
    ResetConnect,

    HostChanged(String),
    OnConnect,
    OnConnectResponse(Result<String>),

    StoreSelected(StoreId),
    ToggleReturns,
    Tick,
    Dismiss(u64),

    Catalog(catalog::Message),
    Detail(detail::Message),
    Cart(cart::Message),
    Returns(returns::Message),
}

#[derive(Debug)]
struct Storefront {
    session: Session,
    catalog: CatalogView,
    detail: DetailPanel,
    cart: CartPanel,
    returns: Option<ReturnsDialog>,

    client: Arc<Client>,
}

#[derive(Debug)]
enum State {
    Connect,
    WaitConnect { client: Arc<Client> },
    Ready(Box<Storefront>),
}

struct App {
    state: State,
    host: String,
    settings: Settings,
    notifications: Notifications,
}

impl App {
    fn new(settings: Settings) -> (Self, Task<Message>) {
        (
            Self {
                state: State::Connect,
                host: settings.api.clone(),
                notifications: Notifications::new(settings.notification_ttl()),
                settings,
            },
            Task::none(),
        )
    }

    fn title(&self) -> String {
        match &self.state {
            State::Connect => "Connect".to_owned(),
            State::WaitConnect { .. } => "Connecting".to_owned(),
            State::Ready(storefront) => storefront.session.store().to_string(),
        }
        .pipe(|str| format!("Movie Rental - {str}"))
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn subscription(&self) -> Subscription<Message> {
        if self.notifications.is_empty() {
            Subscription::none()
        } else {
            time::every(Duration::from_millis(250)).map(|_| Message::Tick)
        }
    }

    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => {
                self.notifications.expire(Instant::now());
                return Task::none();
            }
            Message::Dismiss(id) => {
                self.notifications.dismiss(id);
                return Task::none();
            }
            _ => {}
        }

        match &mut self.state {
            State::Connect => match message {
                Message::HostChanged(new) => {
                    self.host = new;
                    Task::none()
                }
                Message::OnConnect => {
                    let host = self.host.trim();
                    if !(host.starts_with("http://") || host.starts_with("https://")) {
                        let error = fail!("`{host}` is not an http(s) url");
                        self.notify(Notification::error(error));
                        return Task::none();
                    }
                    let client = Arc::new(
                        Client::new(host, reqwest::Client::new())
                            .with_rental_timeout(self.settings.rental_timeout()),
                    );
                    self.state = State::WaitConnect {
                        client: client.clone(),
                    };
                    Task::perform(Self::greet(client), Message::OnConnectResponse)
                }
                _ => Task::none(),
            },
            State::WaitConnect { client } => match message {
                Message::ResetConnect => {
                    self.state = State::Connect;
                    Task::none()
                }
                Message::OnConnectResponse(Ok(greeting)) => {
                    info!(api = client.api(), %greeting, "connected");
                    let client = client.clone();
                    let (storefront, command) = self.open(client);
                    self.state = State::Ready(Box::new(storefront));
                    command
                }
                Message::OnConnectResponse(Err(error)) => {
                    self.state = State::Connect;
                    self.notify(Notification::error(format!("cannot connect: {error}")));
                    Task::none()
                }
                _ => Task::none(),
            },
            State::Ready(storefront) => {
                let (task, notification) = Self::ready_update(storefront, message);
                if let Some(notification) = notification {
                    self.notify(notification);
                }
                task
            }
        }
    }

    async fn greet(client: Arc<Client>) -> Result<String> {
        Ok(client.greet().await?.message)
    }

    fn open(&self, client: Arc<Client>) -> (Storefront, Task<Message>) {
        let session = Session::new(self.settings.store);
        let (catalog, command) = CatalogView::new(
            client.clone(),
            self.settings.sample_size,
            session.catalog_query(),
        );
        (
            Storefront {
                session,
                catalog,
                detail: DetailPanel::new(client.clone()),
                cart: CartPanel::new(client.clone()),
                returns: None,
                client,
            },
            command.map(Message::Catalog),
        )
    }

    /// Routes a storefront message; the notification, if any, goes to the surface.
    fn ready_update(
        storefront: &mut Storefront,
        message: Message,
    ) -> (Task<Message>, Option<Notification>) {
        let Storefront {
            session,
            catalog,
            detail,
            cart,
            returns,
            client,
        } = storefront;

        match message {
            Message::StoreSelected(store) => {
                let query = session.switch_store(store);
                let close = detail
                    .update(session, detail::Message::Close)
                    .map(Message::Detail);
                let fetch = catalog.fetch(query).map(Message::Catalog);
                (Task::batch([close, fetch]), None)
            }
            Message::ToggleReturns => {
                *returns = match returns {
                    Some(_) => None,
                    None => Some(ReturnsDialog::new(client.clone())),
                };
                (Task::none(), None)
            }
            Message::Catalog(message) => {
                let mut commands = Vec::new();
                if let catalog::Message::Select(film) = &message {
                    commands.push(
                        detail
                            .update(session, detail::Message::Fetch(*film))
                            .map(Message::Detail),
                    );
                }
                let notification = match &message {
                    catalog::Message::Notify(notification) => Some(notification.clone()),
                    _ => None,
                };
                commands.push(catalog.update(session, message).map(Message::Catalog));
                (Task::batch(commands), notification)
            }
            Message::Detail(detail::Message::Notify(notification)) => {
                (Task::none(), Some(notification))
            }
            Message::Detail(message) => {
                (detail.update(session, message).map(Message::Detail), None)
            }
            Message::Cart(cart::Message::Notify(notification)) => {
                (Task::none(), Some(notification))
            }
            Message::Cart(message) => (cart.update(session, message).map(Message::Cart), None),
            Message::Returns(returns::Message::Close) => {
                *returns = None;
                (Task::none(), None)
            }
            Message::Returns(returns::Message::Notify(notification)) => {
                (Task::none(), Some(notification))
            }
            Message::Returns(message) => match returns {
                Some(dialog) => (dialog.update(message).map(Message::Returns), None),
                None => {
                    debug!(?message, "returns dialog already closed");
                    (Task::none(), None)
                }
            },
            _ => (Task::none(), None),
        }
    }

    fn view(&self) -> Element<'_, Message> {
        let notifications = views::notifications::view(&self.notifications, Message::Dismiss);

        let content: Element<'_, Message> = match &self.state {
            State::Connect | State::WaitConnect { .. } => self.connect(),
            State::Ready(storefront) => self.ready(storefront),
        };

        let page = column![
            container(content).height(Length::Fill),
            notifications
        ]
        .padding(10)
        .spacing(10);

        match &self.state {
            State::WaitConnect { .. } => views::modal(
                page,
                Card::new(
                    text("Wait please..."),
                    button(text("Cancel").align_x(Horizontal::Center))
                        .width(Length::Fill)
                        .on_press(Message::ResetConnect),
                )
                .max_width(400.0),
                Message::ResetConnect,
            ),
            State::Ready(storefront) => match &storefront.returns {
                Some(dialog) => views::modal(
                    page,
                    dialog.view().map(Message::Returns),
                    Message::ToggleReturns,
                ),
                None => page.into(),
            },
            State::Connect => page.into(),
        }
    }

    fn connect(&self) -> Element<'_, Message> {
        column![
            text("Movie Rental").size(32),
            text_input("Rental service url", &self.host)
                .on_input(Message::HostChanged)
                .on_submit(Message::OnConnect)
                .padding(8),
            button("Connect").on_press(Message::OnConnect),
        ]
        .spacing(10)
        .max_width(480)
        .into()
    }

    fn ready<'a>(&'a self, storefront: &'a Storefront) -> Element<'a, Message> {
        let Storefront {
            session,
            catalog,
            detail,
            cart,
            ..
        } = storefront;

        let header = row![
            text("Movie Rental").size(28),
            horizontal_space(),
            pick_list(
                self.settings.stores.as_slice(),
                Some(session.store()),
                Message::StoreSelected
            ),
            button("Returns").on_press(Message::ToggleReturns),
            text(if cart.is_busy() {
                format!("Cart ({}) - renting...", session.cart().len())
            } else {
                format!("Cart ({})", session.cart().len())
            }),
        ]
        .spacing(15);

        column![
            header,
            row![
                container(catalog.view(session).map(Message::Catalog))
                    .width(Length::FillPortion(3)),
                column![
                    detail.view(session).map(Message::Detail),
                    cart.view(session).map(Message::Cart),
                ]
                .spacing(10)
                .width(Length::Fixed(380.0)),
            ]
            .spacing(10),
        ]
        .spacing(10)
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rental_store::model::Movie;
    use rust_decimal::Decimal;

    fn storefront() -> Storefront {
        let (app, _) = App::new(Settings::default());
        let client = Arc::new(Client::new(Client::DEFAULT_API, reqwest::Client::new()));
        app.open(client).0
    }

    #[test]
    fn store_switch_resets_cart_and_detail() {
        let mut storefront = storefront();
        storefront
            .session
            .cart_mut()
            .add(Movie::new(1, "ACADEMY DINOSAUR", Decimal::ONE));
        let _ = App::ready_update(
            &mut storefront,
            Message::Catalog(catalog::Message::Select(1)),
        );
        assert!(storefront.detail.is_open());

        let (_, notification) =
            App::ready_update(&mut storefront, Message::StoreSelected(StoreId(2)));

        assert!(notification.is_none());
        assert_eq!(storefront.session.store(), StoreId(2));
        assert!(storefront.session.cart().is_empty());
        assert!(!storefront.detail.is_open());
    }
}
