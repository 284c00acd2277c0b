use iced::{
    widget::{button, column, container, row, text},
    Element, Length, Task,
};
use rental_store::{
    client::RentalApi,
    model::{FilmId, Movie, MovieDetails, StoreId},
    notify::Notification,
    utils::Result,
    Client, Session,
};
use std::sync::Arc;
use tap::Pipe;

#[derive(Debug, Clone)]
pub enum Message {
    Fetch(FilmId),
    Fetched(FilmId, Result<MovieDetails>),
    AddToCart(Movie),
    Close,

    Notify(Notification),
}

#[derive(Debug, Clone, Copy)]
enum State {
    Loading { film: FilmId },
    Ready,
}

#[derive(Debug)]
pub struct DetailPanel {
    state: State,
    details: Option<MovieDetails>,

    client: Arc<Client>,
}

impl DetailPanel {
    async fn fetch_details(client: Arc<Client>, film: FilmId, store: StoreId) -> Result<MovieDetails> {
        Ok(client.movie_details(film, store).await?)
    }

    pub const fn new(client: Arc<Client>) -> Self {
        Self {
            state: State::Ready,
            details: None,
            client,
        }
    }

    pub const fn is_open(&self) -> bool {
        self.details.is_some() || matches!(self.state, State::Loading { .. })
    }

    pub fn update(&mut self, session: &mut Session, message: Message) -> Task<Message> {
        match message {
            Message::Fetch(film) => {
                self.state = State::Loading { film };
                let client = self.client.clone();
                let store = session.store();
                Task::perform(Self::fetch_details(client, film, store), move |details| {
                    Message::Fetched(film, details)
                })
            }
            Message::Fetched(film, details) => match self.state {
                State::Loading { film: latest } if latest == film => {
                    self.state = State::Ready;
                    match details {
                        Ok(details) => {
                            self.details = Some(details);
                            Task::none()
                        }
                        Err(error) => Task::done(Message::Notify(Notification::error(format!(
                            "could not load movie details: {error}"
                        )))),
                    }
                }
                // an older selection
                _ => Task::none(),
            },
            Message::AddToCart(movie) => {
                session.cart_mut().add(movie);
                Task::none()
            }
            Message::Close => {
                self.state = State::Ready;
                self.details = None;
                Task::none()
            }
            Message::Notify(_) => Task::none(),
        }
    }

    pub fn view<'a>(&'a self, session: &'a Session) -> Element<'a, Message> {
        let Some(details) = &self.details else {
            return match self.state {
                State::Loading { .. } => text("Loading details...").into(),
                State::Ready => text("Select a movie to see its details.").size(14).into(),
            };
        };
        let MovieDetails {
            movie,
            actors,
            available,
            inventory_ids,
        } = details;

        let facts = [
            movie.release_year.map(|year| year.to_string()),
            movie.length.map(|length| format!("{length} min")),
            movie.rating.clone(),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" · ");

        let availability = if *available {
            match inventory_ids.len() {
                1 => "Available (1 copy)".to_owned(),
                copies => format!("Available ({copies} copies)"),
            }
        } else {
            "Not available at this store".to_owned()
        };

        let action = if session.cart().contains(movie.id) {
            button("In cart").style(button::success)
        } else {
            button("Add to cart").on_press(Message::AddToCart(movie.clone()))
        };

        column![
            row![
                text(movie.title.as_str()).size(22).width(Length::Fill),
                button("x").style(button::text).on_press(Message::Close),
            ],
            text(movie.description.as_str()).size(14),
            text(facts).size(14),
            text(format!("${:.2}", movie.rental_rate)),
            text(if actors.is_empty() {
                "Cast unknown".to_owned()
            } else {
                actors.join(", ")
            })
            .size(14),
            text(availability),
            action,
        ]
        .spacing(6)
        .pipe(container)
        .padding(10)
        .style(container::rounded_box)
        .into()
    }
}
