use iced::{
    widget::{button, column, container, horizontal_rule, row, scrollable, text, text_input},
    Element, Length, Task,
};
use rental_store::{
    checkout::{Checkout, CheckoutError, CheckoutOutcome},
    model::{FilmId, StoreId},
    notify::Notification,
    Client, Session,
};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub enum Message {
    CustomerChanged(String),
    Remove(FilmId),

    Checkout,
    Finished(StoreId, Result<CheckoutOutcome, CheckoutError>),

    Notify(Notification),
}

#[derive(Debug)]
pub struct CartPanel {
    customer: String,
    // the trigger stays disabled while a checkout is in flight
    busy: bool,

    client: Arc<Client>,
}

impl CartPanel {
    pub const fn new(client: Arc<Client>) -> Self {
        Self {
            customer: String::new(),
            busy: false,
            client,
        }
    }

    pub const fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn can_checkout(&self, session: &Session) -> bool {
        !self.busy && !session.cart().is_empty()
    }

    pub fn update(&mut self, session: &mut Session, message: Message) -> Task<Message> {
        match message {
            Message::CustomerChanged(customer) => {
                self.customer = customer;
                Task::none()
            }
            Message::Remove(id) => {
                session.cart_mut().remove(id);
                Task::none()
            }
            Message::Checkout => {
                // an empty cart still runs, so the user gets its notification
                if self.busy {
                    return Task::none();
                }
                self.busy = true;

                let client = Arc::clone(&self.client);
                let store = session.store();
                let customer = self.customer.clone();
                let movies = session.cart().movies().to_vec();
                Task::perform(
                    async move {
                        let mut checkout = Checkout::new(&*client, store);
                        checkout.run(&customer, &movies).await
                    },
                    move |outcome| Message::Finished(store, outcome),
                )
            }
            Message::Finished(store, outcome) => {
                self.busy = false;
                let notification = match outcome {
                    Ok(outcome) => {
                        session.settle(store, &outcome);
                        outcome.notification()
                    }
                    Err(error) => error.notification(),
                };
                Task::done(Message::Notify(notification))
            }
            Message::Notify(_) => Task::none(),
        }
    }

    pub fn view<'a>(&'a self, session: &'a Session) -> Element<'a, Message> {
        let cart = session.cart();

        let items = column(cart.movies().iter().map(|movie| {
            row![
                text(movie.title.as_str()).width(Length::Fill),
                text(format!("${:.2}", movie.rental_rate)),
                button("Remove")
                    .style(button::danger)
                    .on_press(Message::Remove(movie.id)),
            ]
            .spacing(10)
            .into()
        }))
        .spacing(5);

        let items: Element<'a, Message> = if cart.is_empty() {
            text("Your cart is empty.").size(14).into()
        } else {
            scrollable(items).height(Length::Shrink).into()
        };

        let label = if self.busy { "Processing..." } else { "Rent" };

        container(
            column![
                text(format!("Cart ({})", cart.len())).size(22),
                text_input("Customer id", &self.customer)
                    .on_input(Message::CustomerChanged)
                    .on_submit(Message::Checkout)
                    .padding(8),
                items,
                horizontal_rule(1),
                text(format!("Total: ${:.2}", cart.total())),
                button(label)
                    .width(Length::Fill)
                    .on_press_maybe(self.can_checkout(session).then_some(Message::Checkout)),
            ]
            .spacing(8),
        )
        .padding(10)
        .style(container::rounded_box)
        .into()
    }
}
