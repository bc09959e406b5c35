//! Domain entities - the core business objects.

mod booking;
mod membership;
mod role;
mod session;
mod user;

pub use booking::{BookedSession, Booking, CONFIRMED};
pub use membership::{ContactDetails, MembershipPurchase, MembershipType};
pub use role::Role;
pub use session::{Category, Session, SessionDetails};
pub use user::User;
