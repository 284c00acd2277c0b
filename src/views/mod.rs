pub mod cart;
pub mod catalog;
pub mod detail;
pub mod notifications;
pub mod returns;

pub use cart::CartPanel;
pub use catalog::CatalogView;
pub use detail::DetailPanel;
pub use returns::ReturnsDialog;

use iced::{
    widget::{center, container, mouse_area, opaque, stack},
    Color, Element,
};

/// Lays `content` over `base`; clicking outside of it emits `on_blur`.
pub fn modal<'a, Message>(
    base: impl Into<Element<'a, Message>>,
    content: impl Into<Element<'a, Message>>,
    on_blur: Message,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    stack![
        base.into(),
        opaque(
            mouse_area(center(opaque(content)).style(|_theme| {
                container::Style {
                    background: Some(
                        Color {
                            a: 0.8,
                            ..Color::BLACK
                        }
                        .into(),
                    ),
                    ..container::Style::default()
                }
            }))
            .on_press(on_blur)
        )
    ]
    .into()
}
