pub mod account;
pub mod application;
pub mod event;
pub mod status;
pub mod ticket;
pub mod user;

pub use account::{Account, PendingReset, Session};
pub use application::{BusinessType, NewApplication, SellerApplication};
pub use event::{Event, NewEvent};
pub use status::{ApprovalStatus, Decision};
pub use ticket::{NewTicket, Ticket};
pub use user::{NewProfile, Role, SellerStatus, UserProfile};
