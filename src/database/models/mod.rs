pub mod event;
pub mod feedback;
pub mod q_and_a;
pub mod registration;
pub mod user;

pub use event::{Event, NewEvent, EVENT_COLUMNS};
pub use feedback::{Feedback, FEEDBACK_COLUMNS};
pub use q_and_a::{Answer, Question};
pub use registration::{EventRegistrant, Registration, UserRegistration};
pub use user::{NewUser, User, USER_COLUMNS};
