//! Application services - use cases orchestrated over the ports.

mod account;
mod admin;
mod booking;
mod membership;
mod session;
pub mod validation;

pub use account::{AccountError, AccountService, IssuedToken, MIN_PASSWORD_LEN, Registration};
pub use admin::{
    DASHBOARD_LIMIT, Dashboard, TrainerOverview, UserAdminService, UserDetailsUpdate, UserOverview,
};
pub use booking::{
    BOOKING_CANCELLED, BOOKING_CONFIRMED, BookingError, BookingRejection, BookingService,
};
pub use membership::{MembershipService, MembershipSummary, Profile, SignupForm};
pub use session::{NewSession, SessionService};
