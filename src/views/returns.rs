use iced::{
    widget::{button, checkbox, column, row, scrollable, text, text_input},
    Color, Element, Length, Task,
};
use iced_aw::Card;
use rental_store::{
    model::{Rental, RentalId},
    notify::Notification,
    returns::{self, Returned, ReturnsError, Selection},
    Client,
};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub enum Message {
    CustomerChanged(String),
    Search,
    Found(Result<Vec<Rental>, ReturnsError>),

    Toggle(RentalId),
    Return,
    Returned(Result<Returned, ReturnsError>),

    Close,
    Notify(Notification),
}

/// Dialog for giving rented movies back. Errors keep it open for another try.
#[derive(Debug)]
pub struct ReturnsDialog {
    customer: String,
    rentals: Vec<Rental>,
    selection: Selection,
    loading: bool,
    error: Option<String>,

    client: Arc<Client>,
}

impl ReturnsDialog {
    pub fn new(client: Arc<Client>) -> Self {
        Self {
            customer: String::new(),
            rentals: vec![],
            selection: Selection::default(),
            loading: false,
            error: None,
            client,
        }
    }

    fn failed(&mut self, error: &ReturnsError) -> Task<Message> {
        self.loading = false;
        self.error = Some(error.to_string());
        Task::done(Message::Notify(error.notification()))
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::CustomerChanged(customer) => {
                self.customer = customer;
                Task::none()
            }
            Message::Search => {
                self.loading = true;
                let client = Arc::clone(&self.client);
                let customer = self.customer.clone();
                Task::perform(
                    async move { returns::lookup(&*client, &customer).await },
                    Message::Found,
                )
            }
            Message::Found(Ok(rentals)) => {
                self.loading = false;
                self.error = None;
                self.selection.retain_active(&rentals);
                self.rentals = rentals;
                Task::none()
            }
            Message::Found(Err(error)) => {
                self.rentals.clear();
                self.selection.clear();
                self.failed(&error)
            }
            Message::Toggle(id) => {
                self.selection.toggle(id);
                Task::none()
            }
            Message::Return => {
                self.loading = true;
                let client = Arc::clone(&self.client);
                let customer = self.customer.clone();
                let selection = self.selection.clone();
                Task::perform(
                    async move { returns::submit(&*client, &customer, &selection).await },
                    Message::Returned,
                )
            }
            Message::Returned(Ok(returned)) => {
                self.loading = false;
                self.error = None;
                self.selection.clear();
                if let Some(rentals) = &returned.rentals {
                    self.rentals.clone_from(rentals);
                }
                Task::done(Message::Notify(returned.notification()))
            }
            Message::Returned(Err(error)) => self.failed(&error),
            Message::Close | Message::Notify(_) => Task::none(),
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let search = row![
            text_input("Customer id", &self.customer)
                .on_input(Message::CustomerChanged)
                .on_submit(Message::Search)
                .padding(8),
            button("Search")
                .on_press_maybe((!self.loading && !self.customer.trim().is_empty()).then_some(Message::Search)),
        ]
        .spacing(10);

        let rentals = column(self.rentals.iter().map(|rental| {
            let id = rental.rental_id;
            checkbox(
                format!("{} (rented {})", rental.title, rental.rented_on_label()),
                self.selection.contains(id),
            )
            .on_toggle(move |_| Message::Toggle(id))
            .into()
        }))
        .spacing(6);

        let mut body = column![search].spacing(10);
        if let Some(error) = &self.error {
            body = body.push(text(error.as_str()).color(Color::from_rgb(0.9, 0.3, 0.3)));
        }
        if self.loading {
            body = body.push(text("Working..."));
        }
        if !self.rentals.is_empty() {
            body = body
                .push(text("Rented movies").size(18))
                .push(scrollable(rentals).height(Length::Fixed(300.0)));
        }

        Card::new(text("Return movies"), body)
            .foot(
                row![
                    button("Cancel").on_press(Message::Close),
                    button("Return selected").on_press_maybe(
                        (!self.loading && !self.selection.is_empty()).then_some(Message::Return)
                    ),
                ]
                .spacing(10),
            )
            .max_width(520.0)
            .on_close(Message::Close)
            .into()
    }
}
