pub mod matches;
pub mod ticket;
pub mod user;

pub use matches::{CreateMatchRequest, Match, NewMatch};
pub use ticket::{NewTicket, PurchaseTicketRequest, Ticket};
pub use user::{NewUser, PublicUser, SignupRequest, User};
