//! Domain models for events, guests, menus and order items

mod event;
mod guest;
mod menu;
mod order_item;

pub use event::{Event, EventDetails, EventSummary, Restaurant};
pub use guest::{Guest, GuestWithTotal, Role};
pub use menu::MenuItem;
pub use order_item::{BillLine, GuestBill, GuestOrderLine, OrderItem, bill_total, line_subtotal};
