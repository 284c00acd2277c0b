use iced::{
    color,
    widget::{button, column, container, row, text},
    Color, Element, Length,
};
use rental_store::notify::{Notifications, Severity};

fn as_color(severity: Severity) -> Color {
    match severity {
        Severity::Success => color!(0x4caf50),
        Severity::Info => color!(0x2196f3),
        Severity::Warning => color!(0xffc107),
        Severity::Error => color!(0xf44336),
    }
}

/// Newest on top; each entry can be dismissed before it expires.
pub fn view<'a, Message>(
    notifications: &'a Notifications,
    on_dismiss: impl Fn(u64) -> Message + 'a,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    column(notifications.iter().map(|entry| {
        let severity = entry.notification.severity;
        container(
            row![
                text(entry.notification.message.as_str())
                    .color(as_color(severity))
                    .width(Length::Fill),
                button("x").style(button::text).on_press(on_dismiss(entry.id)),
            ]
            .spacing(10),
        )
        .padding(8)
        .width(Length::Fill)
        .style(container::rounded_box)
        .into()
    }))
    .spacing(4)
    .into()
}
