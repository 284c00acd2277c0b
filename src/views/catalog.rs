use iced::{
    alignment::Horizontal,
    widget::{button, column, container, row, scrollable, text, text_input},
    Element, Length, Task,
};
use rental_store::{
    catalog::{self, CatalogQuery},
    model::{FilmId, Movie},
    notify::Notification,
    utils::Result,
    Cart, Client, Session,
};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, PartialEq)]
enum State {
    Loading,
    Ready,
}

#[derive(Debug, Clone)]
pub enum Message {
    SearchChanged(String),
    SearchSubmit,
    Loaded(CatalogQuery, Result<Vec<Movie>>),

    Toggle(Movie),
    Select(FilmId),

    Notify(Notification),
}

// cards per row
const COLUMNS: usize = 3;

#[derive(Debug)]
pub struct CatalogView {
    state: State,
    movies: Vec<Movie>,
    pending: Option<CatalogQuery>,
    sample_size: usize,

    client: Arc<Client>,
}

impl CatalogView {
    pub fn new(client: Arc<Client>, sample_size: usize, query: CatalogQuery) -> (Self, Task<Message>) {
        let mut view = Self {
            state: State::Loading,
            movies: vec![],
            pending: None,
            sample_size,
            client,
        };
        let command = view.fetch(query);
        (view, command)
    }

    /// Starts a fetch; answers to earlier fetches are dropped once this one is pending.
    pub fn fetch(&mut self, query: CatalogQuery) -> Task<Message> {
        self.state = State::Loading;
        self.pending = Some(query.clone());

        let client = Arc::clone(&self.client);
        let sample_size = self.sample_size;
        Task::perform(
            async move {
                let movies = catalog::fetch(&*client, &query, sample_size).await;
                (query, movies)
            },
            |(query, movies)| Message::Loaded(query, movies),
        )
    }

    pub fn update(&mut self, session: &mut Session, message: Message) -> Task<Message> {
        match message {
            Message::SearchChanged(query) => {
                session.set_query(query);
                Task::none()
            }
            Message::SearchSubmit => self.fetch(session.catalog_query()),
            Message::Loaded(query, movies) => {
                if self.pending.as_ref() != Some(&query) {
                    debug!(?query, "stale catalog response");
                    return Task::none();
                }
                self.pending = None;
                self.state = State::Ready;
                match movies {
                    Ok(movies) => {
                        self.movies = movies;
                        Task::none()
                    }
                    Err(error) => Task::done(Message::Notify(Notification::error(format!(
                        "could not load movies: {error}"
                    )))),
                }
            }
            Message::Toggle(movie) => {
                session.cart_mut().toggle(movie);
                Task::none()
            }
            Message::Select(_) | Message::Notify(_) => Task::none(),
        }
    }

    pub fn view<'a>(&'a self, session: &'a Session) -> Element<'a, Message> {
        let search = row![
            text_input("Search movies...", session.query())
                .on_input(Message::SearchChanged)
                .on_submit(Message::SearchSubmit)
                .padding(8),
            button("Search").on_press(Message::SearchSubmit).padding(8),
        ]
        .spacing(10);

        let visible = catalog::filter_by_title(&self.movies, session.query());
        let cart = session.cart();

        let body: Element<'a, Message> = if self.state == State::Loading {
            text("Loading movies...")
                .width(Length::Fill)
                .align_x(Horizontal::Center)
                .into()
        } else if visible.is_empty() {
            text("No movies found.")
                .width(Length::Fill)
                .align_x(Horizontal::Center)
                .into()
        } else {
            let rows = visible.chunks(COLUMNS).map(|chunk| {
                row(chunk.iter().map(|movie| card(*movie, cart)))
                    .spacing(10)
                    .into()
            });
            scrollable(column(rows).spacing(10))
                .height(Length::Fill)
                .into()
        };

        column![search, body].spacing(15).padding(10).into()
    }
}

fn card<'a>(movie: &'a Movie, cart: &Cart) -> Element<'a, Message> {
    let action = if cart.contains(movie.id) {
        button("In cart").style(button::success)
    } else {
        button("Add to cart")
    }
    .on_press(Message::Toggle(movie.clone()));

    container(
        column![
            button(text(movie.title.as_str()).size(18))
                .style(button::text)
                .padding(0)
                .on_press(Message::Select(movie.id)),
            text(movie.description.as_str()).size(14),
            text(format!("${:.2}", movie.rental_rate)),
            action,
        ]
        .spacing(6),
    )
    .padding(10)
    .width(Length::FillPortion(1))
    .style(container::rounded_box)
    .into()
}
