//! Domain to wire conversions.

use chrono::{Datelike, Utc, Weekday};

use gym_core::domain::{
    BookedSession, Booking, ContactDetails, MembershipPurchase, MembershipType, Role, Session,
    SessionDetails, User,
};
use gym_core::services::UserOverview;
use gym_shared::dto::{
    AdminUserResponse, BookedSessionResponse, BookingResponse, ContactRequest,
    MembershipTypeResponse, PurchaseResponse, SessionResponse, SessionSummary, UserResponse,
};

fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

pub fn role_names(roles: &[Role]) -> Vec<String> {
    roles.iter().map(|r| r.as_str().to_string()).collect()
}

pub fn user(user: &User, roles: &[Role]) -> UserResponse {
    UserResponse {
        id: user.id,
        user_name: user.user_name.clone(),
        email: user.email.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        address: user.address.clone(),
        postal_code: user.postal_code.clone(),
        city: user.city.clone(),
        country: user.country.clone(),
        phone: user.phone.clone(),
        membership_type_id: user.membership_type_id,
        roles: role_names(roles),
        created_at: user.created_at,
    }
}

pub fn admin_user(overview: &UserOverview) -> AdminUserResponse {
    AdminUserResponse {
        user: user(&overview.user, &overview.roles),
        is_locked: overview.is_locked,
        is_deleted: overview.user.is_deleted,
        locked_until: overview.user.locked_until.filter(|until| *until > Utc::now()),
    }
}

pub fn session(details: &SessionDetails) -> SessionResponse {
    let s = &details.session;
    let capacity = s.max_participants.max(0) as u64;
    SessionResponse {
        id: s.id,
        title: s.title.clone(),
        description: s.description.clone(),
        category: s.category.clone(),
        max_participants: s.max_participants,
        current_bookings: details.current_bookings,
        available_spots: capacity.saturating_sub(details.current_bookings),
        is_full: details.is_full(),
        instructor_id: s.instructor_id,
        instructor_user_name: details.instructor_user_name.clone(),
        day_of_week: day_name(s.start_time.weekday()).to_string(),
        start_time: s.start_time,
        end_time: s.end_time,
    }
}

pub fn session_summary(s: &Session) -> SessionSummary {
    SessionSummary {
        id: s.id,
        title: s.title.clone(),
        category: s.category.clone(),
        max_participants: s.max_participants,
        start_time: s.start_time,
        end_time: s.end_time,
        is_deleted: s.is_deleted,
    }
}

pub fn booking(b: &Booking) -> BookingResponse {
    BookingResponse {
        id: b.id,
        user_id: b.user_id,
        session_id: b.session_id,
        booked_at: b.booked_at,
        status: b.status.clone(),
    }
}

pub fn booked_session(b: &BookedSession) -> BookedSessionResponse {
    BookedSessionResponse {
        booking: booking(&b.booking),
        session: session(&b.session),
    }
}

pub fn membership(m: &MembershipType) -> MembershipTypeResponse {
    MembershipTypeResponse {
        id: m.id,
        name: m.name.clone(),
        price: m.price,
        description: m.description.clone(),
        image_url: m.image_url.clone(),
    }
}

pub fn purchase(p: &MembershipPurchase) -> PurchaseResponse {
    PurchaseResponse {
        id: p.id,
        membership_type_id: p.membership_type_id,
        email: p.email.clone(),
        start_date: p.start_date,
        purchase_date: p.purchase_date,
    }
}

pub fn contact(req: ContactRequest) -> ContactDetails {
    ContactDetails {
        first_name: req.first_name,
        last_name: req.last_name,
        email: req.email,
        address: req.address,
        phone: req.phone,
    }
}

pub fn contact_request(c: &ContactDetails) -> ContactRequest {
    ContactRequest {
        first_name: c.first_name.clone(),
        last_name: c.last_name.clone(),
        email: c.email.clone(),
        address: c.address.clone(),
        phone: c.phone.clone(),
    }
}
